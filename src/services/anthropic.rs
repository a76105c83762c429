//! Anthropic Messages client: picks the best contact email from scraped
//! content and writes icebreakers.
//!
//! The heuristic extractor runs first and its ranked candidates anchor the
//! model; a reply that is not a plausible address falls back to the top
//! ranked candidate, so the LLM can only improve on the heuristic, never
//! degrade it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{ExtractEmailsResponse, IcebreakerResponse, LlmService};
use crate::config::{LlmConfig, Tone};
use crate::extractor::{domains_match, EmailExtractor};
use crate::icebreaker;
use crate::models::Confidence;

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Page content budget for the extraction prompt.
const MAX_EXTRACTION_CONTENT_CHARS: usize = 6000;

pub struct AnthropicClient {
    client: Client,
    api_key: Option<String>,
    config: LlmConfig,
    extractor: EmailExtractor,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

struct Completion {
    text: String,
    input_tokens: u64,
    output_tokens: u64,
}

impl AnthropicClient {
    pub fn new(client: Client, api_key: Option<String>, config: LlmConfig) -> Self {
        Self {
            client,
            api_key,
            config,
            extractor: EmailExtractor::new(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| "ANTHROPIC_API_KEY is not configured".to_string())?;

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("LLM request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!(
                "LLM returned HTTP {}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed LLM response: {}", e))?;

        let text = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Completion {
            text,
            input_tokens: parsed.usage.input_tokens,
            output_tokens: parsed.usage.output_tokens,
        })
    }

    fn extraction_prompt(&self, content: &str, domain: &str, candidates: &[String]) -> String {
        let trimmed: String = content.chars().take(MAX_EXTRACTION_CONTENT_CHARS).collect();
        let candidate_block = if candidates.is_empty() {
            "No addresses were pre-extracted; look for one in the content.".to_string()
        } else {
            format!(
                "Addresses found on the page, best-guess first:\n{}",
                candidates.join("\n")
            )
        };

        format!(
            "You are selecting the single best email address for cold outreach to \
             the company at {domain}.\n\n\
             {candidate_block}\n\n\
             Prefer a real person on the company's own domain, then a monitored \
             team inbox (hello@, sales@). Never pick an unsubscribe, example, or \
             third-party address.\n\
             Reply with the email address only, or NONE if there is no usable one.\n\n\
             Page content:\n{content}",
            domain = domain,
            candidate_block = candidate_block,
            content = trimmed,
        )
    }
}

/// Reconciles the model's reply with the heuristic ranking.
fn resolve_primary(
    reply: &str,
    candidates: &[String],
    extractor: &EmailExtractor,
) -> Option<String> {
    let reply = reply
        .trim()
        .trim_matches(&['"', '`', '\''][..])
        .to_lowercase();
    if !reply.is_empty() && reply != "none" && extractor.is_plausible_email(&reply) {
        return Some(reply);
    }
    candidates.first().cloned()
}

#[async_trait]
impl LlmService for AnthropicClient {
    async fn extract_emails(&self, content: &str, domain: &str) -> ExtractEmailsResponse {
        let analysis = self.extractor.analyze_and_extract(content, domain);
        let candidates = analysis.emails;

        let prompt = self.extraction_prompt(content, domain, &candidates);
        let completion = match self.complete(&prompt).await {
            Ok(completion) => completion,
            Err(e) => return ExtractEmailsResponse::failure(e),
        };

        let primary_email = resolve_primary(&completion.text, &candidates, &self.extractor);

        let mut emails = candidates;
        if let Some(primary) = &primary_email {
            if !emails.contains(primary) {
                emails.insert(0, primary.clone());
            }
        }

        let confidence = match &primary_email {
            None => Confidence::Low,
            Some(email) => {
                let matched = email
                    .split_once('@')
                    .is_some_and(|(_, email_domain)| domains_match(email_domain, domain));
                if matched {
                    Confidence::High
                } else {
                    Confidence::Medium
                }
            }
        };

        debug!(
            "Email extraction for {}: {:?} ({} candidates)",
            domain,
            primary_email,
            emails.len()
        );

        ExtractEmailsResponse {
            success: true,
            emails,
            primary_email,
            confidence,
            input_tokens: completion.input_tokens,
            output_tokens: completion.output_tokens,
            error: None,
        }
    }

    async fn generate_icebreaker(
        &self,
        content: &str,
        company_name: Option<&str>,
        domain: &str,
        tone: Tone,
    ) -> IcebreakerResponse {
        let insights = icebreaker::extract_company_insights(content);
        if insights.is_empty() {
            return IcebreakerResponse::failure("no usable page content for icebreaker");
        }

        let company_info = match company_name {
            Some(name) => format!("Company: {}\n\n{}", name, insights),
            None => insights,
        };
        let prompt = icebreaker::build_icebreaker_prompt(&company_info, domain, tone);

        let completion = match self.complete(&prompt).await {
            Ok(completion) => completion,
            Err(e) => return IcebreakerResponse::failure(e),
        };

        let text = icebreaker::parse_icebreaker_response(&completion.text);
        if !icebreaker::validate_icebreaker(&text) {
            // Quality gate is advisory; callers see the icebreaker regardless.
            warn!("Generated icebreaker failed the quality gate: {:?}", text);
        }

        IcebreakerResponse {
            success: true,
            icebreaker: text,
            input_tokens: completion.input_tokens,
            output_tokens: completion.output_tokens,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_primary_prefers_valid_reply() {
        let extractor = EmailExtractor::new();
        let candidates = vec!["info@acme.com".to_string()];
        assert_eq!(
            resolve_primary("jane.doe@acme.com", &candidates, &extractor).as_deref(),
            Some("jane.doe@acme.com")
        );
        assert_eq!(
            resolve_primary("\"Jane.Doe@acme.com\"", &candidates, &extractor).as_deref(),
            Some("jane.doe@acme.com")
        );
    }

    #[test]
    fn resolve_primary_falls_back_to_top_candidate() {
        let extractor = EmailExtractor::new();
        let candidates = vec!["info@acme.com".to_string()];
        assert_eq!(
            resolve_primary("NONE", &candidates, &extractor).as_deref(),
            Some("info@acme.com")
        );
        assert_eq!(
            resolve_primary("sorry, I cannot tell", &candidates, &extractor).as_deref(),
            Some("info@acme.com")
        );
        assert_eq!(resolve_primary("NONE", &[], &extractor), None);
    }
}
