use serde::Serialize;
use tracing::debug;

use crate::domain::validate_domain;
use crate::extractor::EmailExtractor;
use crate::models::{EnrichedLead, EnrichmentStatus, Lead};

/// Runs domain validation over freshly parsed leads and seeds their
/// enrichment state.
///
/// Valid domains start `pending`. Invalid domains are terminal `skipped` with
/// the validation reason. Rows that already carry a well-formed email are
/// pre-seeded `completed` and never enter the discovery phase.
pub fn initialize_leads(leads: Vec<Lead>) -> Vec<EnrichedLead> {
    let extractor = EmailExtractor::new();

    leads
        .into_iter()
        .map(|lead| {
            let validation = validate_domain(&lead.website);

            let pre_supplied = lead
                .email
                .as_deref()
                .filter(|email| extractor.is_plausible_email(email))
                .map(str::to_string);

            let (status, email, error_message) = if let Some(email) = pre_supplied {
                (EnrichmentStatus::Completed, Some(email), None)
            } else if validation.is_valid {
                (EnrichmentStatus::Pending, None, None)
            } else {
                let reason = validation
                    .error
                    .clone()
                    .unwrap_or_else(|| "invalid domain".to_string());
                (
                    EnrichmentStatus::Skipped,
                    None,
                    Some(format!("invalid domain: {}", reason)),
                )
            };

            EnrichedLead {
                lead,
                email,
                email_confidence: None,
                icebreaker: None,
                status,
                error_message,
                domain_validation: validation,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValidationStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

pub fn validation_stats(leads: &[EnrichedLead]) -> ValidationStats {
    let valid = leads
        .iter()
        .filter(|l| l.domain_validation.is_valid)
        .count();
    ValidationStats {
        total: leads.len(),
        valid,
        invalid: leads.len() - valid,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnrichmentStats {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub with_email: usize,
    pub without_email: usize,
    pub with_icebreaker: usize,
    pub without_icebreaker: usize,
}

/// Pure aggregation over the lead list; safe to call at any pipeline stage.
pub fn enrichment_stats(leads: &[EnrichedLead]) -> EnrichmentStats {
    let mut stats = EnrichmentStats {
        total: leads.len(),
        pending: 0,
        processing: 0,
        completed: 0,
        failed: 0,
        skipped: 0,
        with_email: 0,
        without_email: 0,
        with_icebreaker: 0,
        without_icebreaker: 0,
    };

    for lead in leads {
        match lead.status {
            EnrichmentStatus::Pending => stats.pending += 1,
            EnrichmentStatus::Processing => stats.processing += 1,
            EnrichmentStatus::Completed => stats.completed += 1,
            EnrichmentStatus::Failed => stats.failed += 1,
            EnrichmentStatus::Skipped => stats.skipped += 1,
        }
        if lead.email.is_some() {
            stats.with_email += 1;
        } else {
            stats.without_email += 1;
        }
        if lead.icebreaker.is_some() {
            stats.with_icebreaker += 1;
        } else {
            stats.without_icebreaker += 1;
        }
    }

    debug!(
        "Enrichment stats: {}/{} completed, {} with email",
        stats.completed, stats.total, stats.with_email
    );
    stats
}
