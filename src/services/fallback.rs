use std::collections::HashSet;

use crate::models::Product;

use super::tiers::TierMatcher;

/// Deterministic, AI-free ranking over the full catalog
///
/// Same-company products first, then products matching the requested term,
/// then everything else, each in catalog order, truncated to `count`.
/// Repeated ids keep their first position. Pure function of its inputs.
pub fn rank(matcher: &TierMatcher, catalog: &[Product], count: usize) -> Vec<String> {
    let tiers = matcher.partition(catalog);

    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranked = Vec::with_capacity(count);

    'tiers: for (_, products) in tiers.in_order() {
        for product in products {
            if ranked.len() == count {
                break 'tiers;
            }
            if seen.insert(product.id.as_str()) {
                ranked.push(product.id.clone());
            }
        }
    }

    tracing::debug!(
        same_company = tiers.same_company.len(),
        matching = tiers.matching.len(),
        other = tiers.other.len(),
        ranked = ranked.len(),
        "Fallback ranking computed"
    );

    ranked
}
