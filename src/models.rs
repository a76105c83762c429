use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, enrichment::EnrichmentOrchestrator, services::ServiceContext};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One input row: a prospective company/contact to enrich.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub website: String,
    pub company: Option<String>,
    pub name: Option<String>,
    /// Pre-supplied address from the input CSV, if an email column existed.
    pub email: Option<String>,
    /// Unrecognized CSV columns, in input order, keyed by original header.
    pub extra_fields: Vec<(String, String)>,
}

impl Lead {
    /// Label shown in selection menus and progress lines.
    pub fn display_label(&self) -> &str {
        self.company.as_deref().unwrap_or(&self.website)
    }
}

/// Outcome of the heuristic domain classification, computed once at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainValidation {
    pub is_valid: bool,
    pub domain: String,
    pub tld: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Skipped,
}

impl std::fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnrichmentStatus::Pending => "pending",
            EnrichmentStatus::Processing => "processing",
            EnrichmentStatus::Completed => "completed",
            EnrichmentStatus::Failed => "failed",
            EnrichmentStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// A lead plus its mutable enrichment state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedLead {
    pub lead: Lead,
    pub email: Option<String>,
    pub email_confidence: Option<Confidence>,
    pub icebreaker: Option<String>,
    pub status: EnrichmentStatus,
    pub error_message: Option<String>,
    pub domain_validation: DomainValidation,
}

impl EnrichedLead {
    pub fn display_label(&self) -> &str {
        self.lead.display_label()
    }
}

/// Ephemeral result of one email-extraction call; populates the lead and dies.
#[derive(Debug, Clone)]
pub struct EmailExtractionResult {
    pub emails: Vec<String>,
    pub primary_email: Option<String>,
    pub source: String,
    pub confidence: Confidence,
}

/// Running token/page accumulator carried by progress callbacks.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UsageTotals {
    pub pages_scraped: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl UsageTotals {
    pub fn add_tokens(&mut self, input: u64, output: u64) {
        self.input_tokens += input;
        self.output_tokens += output;
    }

    pub fn add_page(&mut self) {
        self.pages_scraped += 1;
    }
}

pub struct CliApp {
    pub config: Config,
    pub services: ServiceContext,
    pub orchestrator: EnrichmentOrchestrator,
    pub leads: Vec<EnrichedLead>,
}
