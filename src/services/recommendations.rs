use std::collections::HashMap;
use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{Product, RecommendationRequest, RecommendationResult},
    services::{
        ai_recommender::AiRecommender,
        fallback, merger,
        selector::{select_candidates, CandidateCaps},
        tiers::TierMatcher,
    },
};

/// Recommends catalog products for a company and a desired product
///
/// Stateless across requests: the only shared piece is the AI recommender's
/// provider, which is read-only. Every request runs the same pipeline:
/// candidate selection, at most one AI call, then validation and padding
/// against the fallback ranking of the full catalog.
pub struct RecommendationEngine {
    ai: Option<AiRecommender>,
    caps: CandidateCaps,
}

impl RecommendationEngine {
    pub fn new(ai: Option<AiRecommender>, caps: CandidateCaps) -> Self {
        Self { ai, caps }
    }

    /// Engine that never calls out and always uses the fallback ranker
    pub fn fallback_only(caps: CandidateCaps) -> Self {
        Self::new(None, caps)
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Produces up to `request.count` distinct catalog ids, most relevant first
    ///
    /// The result has `min(count, distinct ids in catalog)` entries. An empty
    /// catalog is `NotFound`. AI failures never surface as errors; they only
    /// show as `ai_used == false`.
    #[tracing::instrument(
        skip_all,
        fields(
            company = %request.company_name,
            product = %request.product_name,
            count = request.count,
        )
    )]
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
        catalog: &[Product],
    ) -> AppResult<RecommendationResult> {
        request.validate()?;

        if catalog.is_empty() {
            return Err(AppError::NotFound("No products found".to_string()));
        }

        let start = Instant::now();
        let matcher = TierMatcher::new(request);
        let candidates = select_candidates(&matcher, catalog, &self.caps);
        let fallback_ids = fallback::rank(&matcher, catalog, request.count);

        let ranking = match &self.ai {
            Some(ai) => Some(ai.recommend(request, &candidates).await),
            None => None,
        };

        let result = match ranking {
            Some(ranking) if ranking.success => RecommendationResult {
                ordered_ids: merger::merge(ranking.ids, &fallback_ids, request.count),
                ai_used: true,
            },
            _ => RecommendationResult {
                ordered_ids: fallback_ids,
                ai_used: false,
            },
        };

        tracing::info!(
            catalog_size = catalog.len(),
            candidates = candidates.bounded.len(),
            returned = result.ordered_ids.len(),
            ai_used = result.ai_used,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations generated"
        );

        Ok(result)
    }
}

/// Looks up the products behind `ids`, keeping the order of `ids`
///
/// When the catalog repeats an id, the first occurrence wins.
pub fn resolve_products(ids: &[String], catalog: &[Product]) -> Vec<Product> {
    let mut by_id: HashMap<&str, &Product> = HashMap::with_capacity(catalog.len());
    for product in catalog {
        by_id.entry(product.id.as_str()).or_insert(product);
    }

    ids.iter()
        .filter_map(|id| by_id.get(id.as_str()).map(|p| (*p).clone()))
        .collect()
}
