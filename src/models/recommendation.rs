use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::Product;

pub const MIN_RECOMMENDATIONS: usize = 1;
pub const MAX_RECOMMENDATIONS: usize = 10;
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

fn default_count() -> usize {
    DEFAULT_RECOMMENDATIONS
}

/// What the requester is looking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Company the requester represents
    pub company_name: String,
    /// Free-text description of the desired product
    pub product_name: String,
    /// How many product ids to return
    #[serde(rename = "num_recommendations", default = "default_count")]
    pub count: usize,
}

impl RecommendationRequest {
    pub fn new(
        company_name: impl Into<String>,
        product_name: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            product_name: product_name.into(),
            count,
        }
    }

    /// Rejects requests the engine cannot answer meaningfully
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_RECOMMENDATIONS..=MAX_RECOMMENDATIONS).contains(&self.count) {
            return Err(AppError::InvalidInput(format!(
                "num_recommendations must be between {} and {}, got {}",
                MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS, self.count
            )));
        }
        if self.company_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "company_name cannot be empty".to_string(),
            ));
        }
        if self.product_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "product_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Engine output: product ids, most relevant first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationResult {
    pub ordered_ids: Vec<String>,
    /// Whether the AI ranking contributed to `ordered_ids`
    pub ai_used: bool,
}

/// How a response was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMethod {
    Ai,
    Fallback,
}

impl From<bool> for RecommendationMethod {
    fn from(ai_used: bool) -> Self {
        if ai_used {
            RecommendationMethod::Ai
        } else {
            RecommendationMethod::Fallback
        }
    }
}

/// Response body of the recommend endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub request: RecommendationRequest,
    pub recommendations: Vec<Product>,
    pub total_recommendations: usize,
    pub ai_used: bool,
    pub method: RecommendationMethod,
}
