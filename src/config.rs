use serde::Deserialize;
use std::time::Duration;

use crate::services::selector::CandidateCaps;

/// Where the product catalog is read from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Postgres,
    Demo,
}

/// Size profile of the candidate subset sent to the AI service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CandidateProfile {
    Standard,
    Light,
}

impl CandidateProfile {
    pub fn caps(self) -> CandidateCaps {
        match self {
            CandidateProfile::Standard => CandidateCaps::STANDARD,
            CandidateProfile::Light => CandidateCaps::LIGHT,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Catalog backend
    #[serde(default = "default_catalog_source")]
    pub catalog_source: CatalogSource,

    /// PostgreSQL database connection URL, required for the postgres catalog
    pub database_url: Option<String>,

    /// Redis connection URL. Catalog reads are cached only when set.
    pub redis_url: Option<String>,

    #[serde(default = "default_catalog_cache_ttl")]
    pub catalog_cache_ttl_secs: u64,

    /// Groq API key. Without it the engine only uses the fallback ranker.
    pub groq_api_key: Option<String>,

    #[serde(default = "default_groq_api_url")]
    pub groq_api_url: String,

    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    #[serde(default = "default_ai_timeout")]
    pub ai_timeout_secs: u64,

    #[serde(default = "default_ai_max_tokens")]
    pub ai_max_tokens: u32,

    #[serde(default = "default_ai_temperature")]
    pub ai_temperature: f32,

    #[serde(default = "default_candidate_profile")]
    pub candidate_profile: CandidateProfile,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_catalog_source() -> CatalogSource {
    CatalogSource::Demo
}

fn default_catalog_cache_ttl() -> u64 {
    300
}

fn default_groq_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_ai_timeout() -> u64 {
    10
}

fn default_ai_max_tokens() -> u32 {
    150
}

fn default_ai_temperature() -> f32 {
    0.7
}

fn default_candidate_profile() -> CandidateProfile {
    CandidateProfile::Standard
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.catalog_source == CatalogSource::Postgres && config.database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when CATALOG_SOURCE=postgres");
        }

        Ok(config)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
