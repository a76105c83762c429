//! Email extraction and heuristic ranking over scraped page text.
//!
//! Page content is noisy (marketing copy, legal boilerplate, third-party
//! addresses), so candidates are scored rather than trusted: a match against
//! the lead's own domain is the strongest signal that an address is the real
//! contact and not a quoted partner or vendor.

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::extract_domain;
use crate::models::{Confidence, EmailExtractionResult};

/// Role-ish local parts that are never a usable outreach contact.
const GENERIC_LOCAL_PARTS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "mailer-daemon",
    "postmaster",
    "webmaster",
    "example",
    "test",
    "demo",
    "sample",
];

/// Local-part tokens that suggest a monitored inbox.
const ROLE_TOKENS: &[&str] = &["hello", "hi", "info", "contact", "sales", "team"];

const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 254;

pub struct EmailExtractor {
    email_regex: Regex,
    full_match_regex: Regex,
    name_shape_regex: Regex,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .unwrap(),
            full_match_regex: Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
                .unwrap(),
            name_shape_regex: Regex::new(r"^(?:[a-z]+\.[a-z]+|[a-z]{4,12})$").unwrap(),
        }
    }

    /// Extracts deduplicated, plausible candidate emails from raw page text.
    pub fn extract_emails_from_content(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut emails = Vec::new();

        for m in self.email_regex.find_iter(text) {
            let email = m.as_str().to_lowercase();
            if self.is_plausible_email(&email) && seen.insert(email.clone()) {
                emails.push(email);
            }
        }

        debug!("Extracted {} candidate emails", emails.len());
        emails
    }

    /// Stricter per-address check than the extraction scan: length bounds,
    /// anchored shape, and no generic role local part.
    pub fn is_plausible_email(&self, email: &str) -> bool {
        if email.len() > MAX_EMAIL_LEN || !self.full_match_regex.is_match(email) {
            return false;
        }
        let Some((local, _)) = email.split_once('@') else {
            return false;
        };
        if local.len() > MAX_LOCAL_PART_LEN {
            return false;
        }
        let local_lower = local.to_lowercase();
        !GENERIC_LOCAL_PARTS
            .iter()
            .any(|generic| local_lower.contains(generic))
    }

    /// Additive score; higher is a better outreach contact for `domain`.
    fn score_email(&self, email: &str, domain: &str) -> i32 {
        let Some((local, email_domain)) = email.split_once('@') else {
            return 0;
        };

        let mut score = 0;
        if domains_match(email_domain, domain) {
            score += 50;
        }
        if ROLE_TOKENS.iter().any(|token| local.contains(token)) {
            score += 20;
        }
        if local.len() < 15 {
            score += 10;
        }
        if self.name_shape_regex.is_match(local) {
            score += 15;
        }
        score
    }

    /// Sorts candidates best-first. Ties keep insertion order.
    pub fn rank_emails(&self, emails: &[String], domain: &str) -> Vec<String> {
        let mut scored: Vec<(i32, &String)> = emails
            .iter()
            .map(|email| (self.score_email(email, domain), email))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, email)| email.clone()).collect()
    }

    /// Extraction + ranking in one pass, with a domain-match confidence grade.
    pub fn analyze_and_extract(&self, content: &str, url: &str) -> EmailExtractionResult {
        let target = extract_domain(url).unwrap_or_default();
        let emails = self.rank_emails(&self.extract_emails_from_content(content), &target);
        let primary_email = emails.first().cloned();

        let confidence = match &primary_email {
            None => Confidence::Low,
            Some(email) => {
                let matches = email
                    .split_once('@')
                    .is_some_and(|(_, d)| domains_match(d, &target));
                if matches {
                    Confidence::High
                } else {
                    Confidence::Medium
                }
            }
        };

        EmailExtractionResult {
            emails,
            primary_email,
            source: url.to_string(),
            confidence,
        }
    }

    /// True when the text contains anything email-shaped at all.
    pub fn has_email_shaped_content(&self, text: &str) -> bool {
        self.email_regex.is_match(text)
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Substring match in either direction; the reverse direction strips the
/// email domain's own TLD so `acme.io` still matches a target of `acme.com`.
pub(crate) fn domains_match(email_domain: &str, target: &str) -> bool {
    if email_domain.is_empty() || target.is_empty() {
        return false;
    }
    if target.contains(email_domain) || email_domain.contains(target) {
        return true;
    }
    match email_domain.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => target.contains(stem) || stem.contains(target),
        _ => false,
    }
}
