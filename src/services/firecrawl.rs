//! Firecrawl scrape client. The provider renders the page and returns
//! markdown, so no local HTML handling happens on this side.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ScrapeResponse, ScrapeService};

const FIRECRAWL_SCRAPE_URL: &str = "https://api.firecrawl.dev/v1/scrape";

pub struct FirecrawlClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct FirecrawlEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<FirecrawlData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlData {
    markdown: Option<String>,
    metadata: Option<FirecrawlMetadata>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlMetadata {
    title: Option<String>,
    description: Option<String>,
}

impl FirecrawlClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: FIRECRAWL_SCRAPE_URL.to_string(),
        }
    }
}

#[async_trait]
impl ScrapeService for FirecrawlClient {
    async fn scrape(&self, url: &str) -> ScrapeResponse {
        let Some(api_key) = &self.api_key else {
            return ScrapeResponse::failure(url, "FIRECRAWL_API_KEY is not configured");
        };

        debug!("Scraping {}", url);
        let body = json!({
            "url": url,
            "formats": ["markdown"],
            "onlyMainContent": false,
        });

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ScrapeResponse::failure(url, format!("scrape request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return ScrapeResponse::failure(
                url,
                format!("scrape returned HTTP {}: {}", status, truncate(&detail, 200)),
            );
        }

        let envelope: FirecrawlEnvelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                return ScrapeResponse::failure(url, format!("malformed scrape response: {}", e))
            }
        };

        if !envelope.success {
            let reason = envelope
                .error
                .unwrap_or_else(|| "scrape reported failure".to_string());
            return ScrapeResponse::failure(url, reason);
        }

        let data = envelope.data.unwrap_or(FirecrawlData {
            markdown: None,
            metadata: None,
        });
        let (title, description) = data
            .metadata
            .map(|m| (m.title, m.description))
            .unwrap_or((None, None));

        debug!(
            "Scraped {} ({} bytes of markdown)",
            url,
            data.markdown.as_deref().map_or(0, str::len)
        );

        ScrapeResponse {
            success: true,
            url: url.to_string(),
            markdown: data.markdown,
            title,
            description,
            error: None,
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
