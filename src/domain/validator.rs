//! Heuristic domain validation for ingested website strings.
//!
//! A DNS lookup is too slow and too chatty for thousands of rows at ingestion
//! time, so classification is an allow-list plus a permissive fallback for
//! unlisted new TLDs. Downstream scraping fails naturally on bogus domains.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use super::tld::{is_known_tld, is_multi_part_tld};
use crate::models::{DomainValidation, Result};

static STRICT_SHAPE: OnceLock<Regex> = OnceLock::new();
static LENIENT_SHAPE: OnceLock<Regex> = OnceLock::new();

fn strict_shape() -> &'static Regex {
    STRICT_SHAPE.get_or_init(|| {
        Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$")
            .unwrap()
    })
}

fn lenient_shape() -> &'static Regex {
    LENIENT_SHAPE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9.-]*\.[a-z0-9-]{2,}$").unwrap())
}

/// Strips scheme, `www.`, path/query/fragment/port and lowercases the rest.
fn normalize_host(input: &str) -> String {
    let mut host = input.trim().to_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = host.strip_prefix(scheme) {
            host = rest.to_string();
            break;
        }
    }
    if let Some(rest) = host.strip_prefix("www.") {
        host = rest.to_string();
    }
    if let Some(idx) = host.find(['/', '?', '#', ':']) {
        host.truncate(idx);
    }
    host
}

fn invalid(domain: String, reason: &str) -> DomainValidation {
    DomainValidation {
        is_valid: false,
        domain,
        tld: String::new(),
        error: Some(reason.to_string()),
    }
}

fn valid(domain: String, tld: String) -> DomainValidation {
    DomainValidation {
        is_valid: true,
        domain,
        tld,
        error: None,
    }
}

/// Classifies a raw website string as a plausible registrable domain.
///
/// Idempotent: re-validating the returned `domain` yields the same result.
pub fn validate_domain(input: &str) -> DomainValidation {
    let domain = normalize_host(input);

    if domain.len() < 3 {
        return invalid(domain, "domain is too short");
    }
    if domain.contains("..") || domain.contains("--") {
        return invalid(domain, "domain contains consecutive dots or hyphens");
    }
    if domain.starts_with('-') || domain.ends_with('-') {
        return invalid(domain, "domain cannot start or end with a hyphen");
    }
    if !strict_shape().is_match(&domain) && !lenient_shape().is_match(&domain) {
        return invalid(domain, "domain has an invalid format");
    }

    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() >= 3 {
        let suffix = format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1]);
        if is_multi_part_tld(&suffix) {
            return valid(domain, suffix);
        }
    }

    let last = labels[labels.len() - 1];
    if is_known_tld(last) {
        let tld = last.to_string();
        return valid(domain, tld);
    }

    // Unlisted new TLDs keep appearing; accept anything TLD-shaped rather
    // than false-reject real leads.
    if (2..=10).contains(&last.len()) && last.chars().all(|c| c.is_ascii_lowercase()) {
        let tld = last.to_string();
        return valid(domain, tld);
    }

    let reason = format!("unrecognized top-level domain '{}'", last);
    invalid(domain, &reason)
}

/// Projection of the same normalization: the bare host for a raw website string.
pub fn extract_domain(input: &str) -> Option<String> {
    let host = normalize_host(input);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Parses a website string into a scrape-ready URL, adding `https://` when the
/// scheme is missing.
pub fn normalize_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("website URL input is empty".into());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme)?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("no host in URL '{}'", input).into());
    }
    Ok(url)
}
