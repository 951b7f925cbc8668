use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::models::{Product, RecommendationRequest};
use crate::services::providers::{CompletionRequest, TextGenerationProvider};
use crate::services::selector::CandidateSet;

/// Sampling and time limits for one AI ranking call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            temperature: 0.7,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of an AI ranking attempt
///
/// When `success` is false, `ids` is empty and must not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiRanking {
    pub ids: Vec<String>,
    pub success: bool,
}

impl AiRanking {
    fn failed() -> Self {
        Self {
            ids: Vec::new(),
            success: false,
        }
    }
}

/// Ranks a bounded candidate subset with an external text generation service
pub struct AiRecommender {
    provider: Arc<dyn TextGenerationProvider>,
    settings: AiSettings,
}

impl AiRecommender {
    pub fn new(provider: Arc<dyn TextGenerationProvider>, settings: AiSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Asks the provider for a ranking and validates the reply
    ///
    /// Exactly one call is made, bounded by `settings.timeout`. Transport
    /// errors, timeouts and replies without a single catalog id all yield a
    /// failed ranking; nothing partial is returned as a success.
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
        candidates: &CandidateSet<'_>,
    ) -> AiRanking {
        if candidates.is_empty() {
            return AiRanking::failed();
        }

        let completion = build_completion(request, &candidates.bounded, &self.settings);
        let start = Instant::now();

        let outcome = tokio::time::timeout(self.settings.timeout, self.provider.complete(completion))
            .await
            .unwrap_or_else(|_| Err(AppError::Timeout(self.settings.timeout)));

        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "AI recommendation call failed"
                );
                return AiRanking::failed();
            }
        };

        let index = IdIndex::new(candidates.catalog);
        let ids = parse_reply(&reply, &index);

        tracing::info!(
            provider = self.provider.name(),
            candidates = candidates.bounded.len(),
            extracted = ids.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "AI reply parsed"
        );

        if ids.is_empty() {
            tracing::warn!(reply = %reply, "AI reply contained no catalog ids");
            return AiRanking::failed();
        }

        AiRanking { ids, success: true }
    }
}

/// Builds the instruction payload for ranking `candidates`
pub fn build_completion(
    request: &RecommendationRequest,
    candidates: &[&Product],
    settings: &AiSettings,
) -> CompletionRequest {
    let count = request.count;
    let company = request.company_name.trim();
    let term = request.product_name.trim();

    let listing = candidates
        .iter()
        .map(|p| {
            format!(
                "ID: {}, Company: {}, Product: {}",
                p.id, p.company_name, p.product_line
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "You are a product recommendation expert. Recommend the {count} most relevant product IDs for this request.\n\
         \n\
         Customer request:\n\
         - Company name: {company}\n\
         - Looking for product: {term}\n\
         - Number of recommendations needed: {count}\n\
         \n\
         Available products:\n\
         {listing}\n\
         \n\
         Ranking rules:\n\
         1. Prioritize products from the same company ({company}) when available.\n\
         2. If {company} products are missing or insufficient, recommend products from other companies that match \"{term}\".\n\
         3. Prefer exact keyword matches on the product, then closely related products.\n\
         4. Return exactly {count} product IDs, most relevant first.\n\
         \n\
         Respond with ONLY the {count} product IDs, one per line, no additional text."
    );

    CompletionRequest {
        system: format!(
            "You are a helpful product recommendation assistant. Always respond with exactly {count} product IDs, one per line."
        ),
        prompt,
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    }
}

/// Set of catalog ids with a lookup order for substring scans
///
/// Longer ids are scanned first so that `demo_10` wins over `demo_1` on a
/// line mentioning the former; equal lengths keep catalog order.
pub struct IdIndex<'a> {
    ids: HashSet<&'a str>,
    scan_order: Vec<&'a str>,
}

impl<'a> IdIndex<'a> {
    pub fn new(catalog: &'a [Product]) -> Self {
        let mut ids = HashSet::with_capacity(catalog.len());
        let mut scan_order = Vec::with_capacity(catalog.len());

        for product in catalog {
            let id = product.id.as_str();
            if !id.is_empty() && ids.insert(id) {
                scan_order.push(id);
            }
        }
        scan_order.sort_by_key(|id| std::cmp::Reverse(id.len()));

        Self { ids, scan_order }
    }

    pub fn exact(&self, line: &str) -> Option<&'a str> {
        self.ids.get(line).copied()
    }

    pub fn find_in(&self, line: &str) -> Option<&'a str> {
        self.scan_order.iter().copied().find(|id| line.contains(id))
    }
}

fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '-' | '*')
}

/// Drops a leading list enumerator such as `1.` or `2)`
fn strip_enumerator(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix(|c: char| c == '.' || c == ')') {
        Some(after) if after.starts_with(char::is_whitespace) => after.trim_start(),
        _ => line,
    }
}

/// Extracts catalog ids from a free-form reply, in reply order
///
/// Every accepted id is a member of `index`; repeats are dropped.
pub fn parse_reply(reply: &str, index: &IdIndex<'_>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids = Vec::new();

    for raw in reply.lines() {
        let line = raw.trim_matches(is_decoration);
        if line.is_empty() {
            continue;
        }

        let found = index.exact(raw.trim()).or_else(|| index.exact(line)).or_else(|| {
            let stripped = strip_enumerator(line).trim_matches(is_decoration);
            index.exact(stripped).or_else(|| index.find_in(stripped))
        });

        if let Some(id) = found {
            if seen.insert(id) {
                ids.push(id.to_string());
            }
        }
    }

    ids
}
