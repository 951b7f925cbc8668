pub mod ai_recommender;
pub mod catalog;
pub mod fallback;
pub mod merger;
pub mod providers;
pub mod recommendations;
pub mod selector;
pub mod tiers;

pub use ai_recommender::{AiRecommender, AiSettings};
pub use catalog::CatalogProvider;
pub use providers::TextGenerationProvider;
pub use recommendations::RecommendationEngine;
