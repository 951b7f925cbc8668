use std::collections::HashSet;

/// Combines AI output with fallback output into at most `count` unique ids
///
/// AI ids keep their order and come first. Fallback ids not already present
/// are appended in fallback order until `count` is reached or they run out.
pub fn merge(ai_ids: Vec<String>, fallback_ids: &[String], count: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(count);
    let mut merged = Vec::with_capacity(count);

    let ai_len = ai_ids.len();
    let candidates = ai_ids.into_iter().chain(fallback_ids.iter().cloned());

    for id in candidates {
        if merged.len() == count {
            break;
        }
        if seen.insert(id.clone()) {
            merged.push(id);
        }
    }

    if merged.len() > ai_len.min(count) {
        tracing::debug!(
            ai = ai_len,
            padded = merged.len() - ai_len.min(count),
            "Padded AI recommendations with fallback ids"
        );
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ai_order_takes_precedence() {
        let merged = merge(strings(&["c", "a"]), &strings(&["a", "b", "c"]), 3);
        assert_eq!(merged, strings(&["c", "a", "b"]));
    }

    #[test]
    fn test_pads_until_count() {
        let merged = merge(strings(&["x"]), &strings(&["a", "b", "c", "d"]), 3);
        assert_eq!(merged, strings(&["x", "a", "b"]));
    }

    #[test]
    fn test_stops_when_candidates_exhausted() {
        let merged = merge(strings(&["a"]), &strings(&["a", "b"]), 5);
        assert_eq!(merged, strings(&["a", "b"]));
    }

    #[test]
    fn test_truncates_oversized_ai_output() {
        let merged = merge(strings(&["a", "b", "c", "d"]), &strings(&["e"]), 2);
        assert_eq!(merged, strings(&["a", "b"]));
    }

    #[test]
    fn test_drops_duplicate_ai_ids() {
        let merged = merge(strings(&["a", "a", "b"]), &strings(&["c"]), 3);
        assert_eq!(merged, strings(&["a", "b", "c"]));
    }
}
