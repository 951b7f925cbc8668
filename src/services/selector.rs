use std::collections::HashSet;

use crate::models::Product;

use super::tiers::{Tier, TierMatcher};

/// Per-tier limits on how many products go into the AI candidate subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateCaps {
    pub same_company: usize,
    pub matching: usize,
    pub other: usize,
}

impl CandidateCaps {
    /// 20 + 20 + 10 = 50 candidates
    pub const STANDARD: CandidateCaps = CandidateCaps {
        same_company: 20,
        matching: 20,
        other: 10,
    };

    /// 15 + 15 + 10 = 40 candidates, for callers with a smaller token budget
    pub const LIGHT: CandidateCaps = CandidateCaps {
        same_company: 15,
        matching: 15,
        other: 10,
    };

    /// Hard maximum size of the candidate subset
    pub fn total(&self) -> usize {
        self.same_company + self.matching + self.other
    }

    fn for_tier(&self, tier: Tier) -> usize {
        match tier {
            Tier::SameCompany => self.same_company,
            Tier::Matching => self.matching,
            Tier::Other => self.other,
        }
    }
}

impl Default for CandidateCaps {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Output of candidate selection
///
/// `bounded` is what the AI service gets to see. `catalog` is the complete,
/// unbounded catalog and is what the fallback ranker and id validation use.
#[derive(Debug)]
pub struct CandidateSet<'a> {
    pub bounded: Vec<&'a Product>,
    pub catalog: &'a [Product],
}

impl CandidateSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.bounded.is_empty()
    }
}

/// Builds the bounded AI candidate subset for a request
///
/// Takes up to the tier cap from each tier in precedence order, skipping ids
/// already taken, and never exceeds `caps.total()`.
pub fn select_candidates<'a>(
    matcher: &TierMatcher,
    catalog: &'a [Product],
    caps: &CandidateCaps,
) -> CandidateSet<'a> {
    let tiers = matcher.partition(catalog);
    let limit = caps.total();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut bounded = Vec::with_capacity(limit.min(catalog.len()));

    for (tier, products) in tiers.in_order() {
        for product in products.iter().take(caps.for_tier(tier)) {
            if bounded.len() == limit {
                break;
            }
            if seen.insert(product.id.as_str()) {
                bounded.push(*product);
            }
        }
    }

    tracing::debug!(
        catalog_size = catalog.len(),
        same_company = tiers.same_company.len(),
        matching = tiers.matching.len(),
        other = tiers.other.len(),
        selected = bounded.len(),
        "Selected AI candidates"
    );

    CandidateSet { bounded, catalog }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationRequest;

    fn matcher() -> TierMatcher {
        TierMatcher::new(&RecommendationRequest::new("Acme", "pump", 5))
    }

    fn ids(set: &CandidateSet<'_>) -> Vec<String> {
        set.bounded.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_empty_catalog_yields_empty_subset() {
        let set = select_candidates(&matcher(), &[], &CandidateCaps::STANDARD);
        assert!(set.is_empty());
        assert!(set.catalog.is_empty());
    }

    #[test]
    fn test_tiers_are_concatenated_in_precedence_order() {
        let catalog = vec![
            Product::new("o1", "Zenith", "Heater"),
            Product::new("m1", "Zenith", "Pump"),
            Product::new("s1", "Acme", "Boiler"),
        ];

        let set = select_candidates(&matcher(), &catalog, &CandidateCaps::STANDARD);
        assert_eq!(ids(&set), vec!["s1", "m1", "o1"]);
    }

    #[test]
    fn test_per_tier_caps_are_applied() {
        let mut catalog = Vec::new();
        for i in 0..30 {
            catalog.push(Product::new(format!("s{i}"), "Acme", "Boiler"));
            catalog.push(Product::new(format!("m{i}"), "Zenith", "Pump Spares"));
            catalog.push(Product::new(format!("o{i}"), "Zenith", "Heater"));
        }

        let set = select_candidates(&matcher(), &catalog, &CandidateCaps::STANDARD);
        let selected = ids(&set);

        assert_eq!(selected.len(), 50);
        assert_eq!(selected.iter().filter(|id| id.starts_with('s')).count(), 20);
        assert_eq!(selected.iter().filter(|id| id.starts_with('m')).count(), 20);
        assert_eq!(selected.iter().filter(|id| id.starts_with('o')).count(), 10);
        // Full catalog is still available untouched
        assert_eq!(set.catalog.len(), 90);
    }

    #[test]
    fn test_light_caps() {
        let catalog: Vec<Product> = (0..100)
            .map(|i| Product::new(format!("m{i}"), "Zenith", "Pump"))
            .collect();

        let set = select_candidates(&matcher(), &catalog, &CandidateCaps::LIGHT);
        assert_eq!(set.bounded.len(), 15);
        assert_eq!(CandidateCaps::LIGHT.total(), 40);
    }

    #[test]
    fn test_duplicate_ids_keep_first_seen() {
        let catalog = vec![
            Product::new("dup", "Acme", "Boiler"),
            Product::new("dup", "Zenith", "Pump"),
            Product::new("x", "Zenith", "Pump"),
        ];

        let set = select_candidates(&matcher(), &catalog, &CandidateCaps::STANDARD);
        assert_eq!(ids(&set), vec!["dup", "x"]);
        assert_eq!(set.bounded[0].company_name, "Acme");
    }
}
