//! Collaborator services behind the enrichment pipeline.
//!
//! The orchestrator only sees the `ScrapeService` and `LlmService` traits;
//! failures are encoded in the response shapes, never thrown, so per-lead
//! isolation stays a pipeline concern.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::{Config, Tone};
use crate::models::{Confidence, Result};

mod anthropic;
mod firecrawl;

pub use anthropic::AnthropicClient;
pub use firecrawl::FirecrawlClient;

#[derive(Debug, Clone)]
pub struct ScrapeResponse {
    pub success: bool,
    pub url: String,
    pub markdown: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub error: Option<String>,
}

impl ScrapeResponse {
    pub fn failure(url: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            markdown: None,
            title: None,
            description: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractEmailsResponse {
    pub success: bool,
    pub emails: Vec<String>,
    pub primary_email: Option<String>,
    pub confidence: Confidence,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub error: Option<String>,
}

impl ExtractEmailsResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            emails: Vec::new(),
            primary_email: None,
            confidence: Confidence::Low,
            input_tokens: 0,
            output_tokens: 0,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IcebreakerResponse {
    pub success: bool,
    pub icebreaker: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub error: Option<String>,
}

impl IcebreakerResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            icebreaker: String::new(),
            input_tokens: 0,
            output_tokens: 0,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait ScrapeService: Send + Sync {
    async fn scrape(&self, url: &str) -> ScrapeResponse;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn extract_emails(&self, content: &str, domain: &str) -> ExtractEmailsResponse;

    async fn generate_icebreaker(
        &self,
        content: &str,
        company_name: Option<&str>,
        domain: &str,
        tone: Tone,
    ) -> IcebreakerResponse;
}

/// Whether a service call succeeded, for the retry wrapper.
pub trait ServiceOutcome {
    fn is_success(&self) -> bool;
}

impl ServiceOutcome for ScrapeResponse {
    fn is_success(&self) -> bool {
        self.success
    }
}

impl ServiceOutcome for ExtractEmailsResponse {
    fn is_success(&self) -> bool {
        self.success
    }
}

impl ServiceOutcome for IcebreakerResponse {
    fn is_success(&self) -> bool {
        self.success
    }
}

/// Bounded retry with doubling backoff. `retry_attempts` is the number of
/// *additional* tries after the first call; 0 means call once.
pub async fn with_retries<T, F, Fut>(retry_attempts: u32, label: &str, op: F) -> T
where
    T: ServiceOutcome,
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let mut delay = Duration::from_millis(500);
    let mut result = op().await;
    for attempt in 1..=retry_attempts {
        if result.is_success() {
            break;
        }
        warn!(
            "{} failed, retrying ({}/{}) after {:?}",
            label, attempt, retry_attempts, delay
        );
        tokio::time::sleep(delay).await;
        delay *= 2;
        result = op().await;
    }
    result
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceHealth {
    pub has_anthropic_key: bool,
    pub has_firecrawl_key: bool,
}

impl ServiceHealth {
    /// Both providers configured; orchestration must not run otherwise.
    pub fn ready(&self) -> bool {
        self.has_anthropic_key && self.has_firecrawl_key
    }
}

/// Explicit credential/client context, built once in `main` and injected
/// everywhere; there are no process-wide singletons.
pub struct ServiceContext {
    anthropic_api_key: Option<String>,
    firecrawl_api_key: Option<String>,
    http: Client,
    config: Config,
}

impl ServiceContext {
    pub fn from_env(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&config.scraping.user_agent)
            .timeout(Duration::from_secs(config.scraping.request_timeout_seconds))
            .build()?;

        Ok(Self {
            anthropic_api_key: read_key("ANTHROPIC_API_KEY"),
            firecrawl_api_key: read_key("FIRECRAWL_API_KEY"),
            http,
            config: config.clone(),
        })
    }

    pub fn health_check(&self) -> ServiceHealth {
        ServiceHealth {
            has_anthropic_key: self.anthropic_api_key.is_some(),
            has_firecrawl_key: self.firecrawl_api_key.is_some(),
        }
    }

    pub fn scraper(&self) -> Arc<dyn ScrapeService> {
        Arc::new(FirecrawlClient::new(
            self.http.clone(),
            self.firecrawl_api_key.clone(),
        ))
    }

    pub fn llm(&self) -> Arc<dyn LlmService> {
        Arc::new(AnthropicClient::new(
            self.http.clone(),
            self.anthropic_api_key.clone(),
            self.config.llm.clone(),
        ))
    }
}

fn read_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries(3, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    ScrapeResponse::failure("https://acme.com", "boom")
                } else {
                    ScrapeResponse {
                        success: true,
                        url: "https://acme.com".to_string(),
                        markdown: Some("ok".to_string()),
                        title: None,
                        description: None,
                        error: None,
                    }
                }
            }
        })
        .await;

        assert!(result.success);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_calls_once() {
        let calls = AtomicU32::new(0);
        let result = with_retries(0, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ScrapeResponse::failure("https://acme.com", "boom") }
        })
        .await;

        assert!(!result.success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
