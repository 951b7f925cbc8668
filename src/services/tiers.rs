use crate::models::{Product, RecommendationRequest};

/// Relevance class of a product for a given request, most relevant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Product belongs to the requester's own company
    SameCompany,
    /// Product line matches the requested product term
    Matching,
    /// Everything else
    Other,
}

/// Classifies products against one request
///
/// Lower-cases the request once so classification over a large catalog only
/// lower-cases the product side. Precedence is first-match: a same-company
/// product is never counted as `Matching`, even when its product line matches.
#[derive(Debug, Clone)]
pub struct TierMatcher {
    company: String,
    term: String,
    tokens: Vec<String>,
}

impl TierMatcher {
    pub fn new(request: &RecommendationRequest) -> Self {
        let term = request.product_name.trim().to_lowercase();
        let tokens = term.split_whitespace().map(str::to_string).collect();

        Self {
            company: request.company_name.trim().to_lowercase(),
            term,
            tokens,
        }
    }

    pub fn is_same_company(&self, product: &Product) -> bool {
        product.company_name.trim().to_lowercase() == self.company
    }

    /// True when the whole term, or any whitespace-delimited token of it,
    /// occurs inside the product line (case-insensitive)
    pub fn is_matching(&self, product: &Product) -> bool {
        let line = product.product_line.to_lowercase();
        line.contains(&self.term) || self.tokens.iter().any(|token| line.contains(token))
    }

    pub fn tier(&self, product: &Product) -> Tier {
        if self.is_same_company(product) {
            Tier::SameCompany
        } else if self.is_matching(product) {
            Tier::Matching
        } else {
            Tier::Other
        }
    }

    /// Splits a catalog into its three tiers, preserving catalog order
    /// inside each tier
    pub fn partition<'a>(&self, catalog: &'a [Product]) -> Tiers<'a> {
        let mut tiers = Tiers::default();
        for product in catalog {
            match self.tier(product) {
                Tier::SameCompany => tiers.same_company.push(product),
                Tier::Matching => tiers.matching.push(product),
                Tier::Other => tiers.other.push(product),
            }
        }
        tiers
    }
}

/// A catalog split into relevance tiers
#[derive(Debug, Default)]
pub struct Tiers<'a> {
    pub same_company: Vec<&'a Product>,
    pub matching: Vec<&'a Product>,
    pub other: Vec<&'a Product>,
}

impl<'a> Tiers<'a> {
    /// Tiers in precedence order, paired with their products
    pub fn in_order(&self) -> [(Tier, &[&'a Product]); 3] {
        [
            (Tier::SameCompany, self.same_company.as_slice()),
            (Tier::Matching, self.matching.as_slice()),
            (Tier::Other, self.other.as_slice()),
        ]
    }
}
