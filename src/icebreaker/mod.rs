//! Prompt assembly and response handling for icebreaker generation.
//!
//! The LLM gets a tight, tone-specific instruction block plus a trimmed slice
//! of the scraped page; its free-text reply is normalized back into a single
//! usable opening line.

use tracing::warn;

use crate::config::Tone;

/// Character budget for page content fed into the prompt.
const MAX_INSIGHT_CHARS: usize = 3000;

/// Icebreaker length bounds enforced by the quality gate.
const MIN_ICEBREAKER_CHARS: usize = 20;
const MAX_ICEBREAKER_CHARS: usize = 300;

/// Stock cold-email openers that defeat the point of personalization.
const GENERIC_OPENERS: &[&str] = &[
    "i hope this email finds you well",
    "i hope this message finds you well",
    "i came across your website",
    "i wanted to reach out",
    "i am reaching out",
    "to whom it may concern",
    "dear sir or madam",
    "my name is",
    "hope you are doing well",
];

fn tone_instructions(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => {
            "Write in a polished, professional voice. No slang, no exclamation marks."
        }
        Tone::Casual => {
            "Write in a relaxed, conversational voice, like a note to an industry peer."
        }
        Tone::Friendly => {
            "Write in a warm, upbeat voice that sounds genuinely pleased to connect."
        }
    }
}

/// Assembles the generation prompt from scraped company info.
pub fn build_icebreaker_prompt(company_info: &str, url: &str, tone: Tone) -> String {
    format!(
        "You are writing the opening line of a cold outreach email to the company \
         behind {url}.\n\n\
         Using only the website content below, write ONE personalized icebreaker \
         sentence that proves we actually read their site. Mention something \
         specific: a product, a recent launch, a customer story, their mission.\n\
         {tone_line}\n\
         Do not use generic openers like \"I hope this email finds you well\" or \
         \"I came across your website\". Do not include a greeting or a signature. \
         Reply with the sentence only.\n\n\
         Website content:\n{company_info}",
        url = url,
        tone_line = tone_instructions(tone),
        company_info = company_info,
    )
}

/// Trims page text to the prompt budget, preferring whole paragraphs.
///
/// Paragraphs are accumulated greedily until the next one would overflow the
/// budget; hard truncation only happens when the very first paragraph is
/// already over budget.
pub fn extract_company_insights(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= MAX_INSIGHT_CHARS {
        return trimmed.to_string();
    }

    let mut out = String::new();
    let mut used = 0usize;
    for paragraph in trimmed.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let cost = paragraph.chars().count() + if out.is_empty() { 0 } else { 2 };
        if used + cost > MAX_INSIGHT_CHARS {
            break;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(paragraph);
        used += cost;
    }

    if out.is_empty() {
        // First paragraph alone overflows; cut mid-paragraph as a last resort.
        return trimmed.chars().take(MAX_INSIGHT_CHARS).collect();
    }
    out
}

/// Normalizes the LLM's free-text reply: strips a leading
/// `Icebreaker:`-style prefix and wrapping quotes.
pub fn parse_icebreaker_response(raw: &str) -> String {
    let mut text = raw.trim();

    let lower = text.to_lowercase();
    if lower.starts_with("icebreaker") {
        if let Some(idx) = text.find(':') {
            text = text[idx + 1..].trim();
        }
    }

    for (open, close) in [('"', '"'), ('\'', '\''), ('\u{201C}', '\u{201D}')] {
        if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
            break;
        }
    }

    text.to_string()
}

/// Quality gate: length bounds plus a generic-opener blocklist.
///
/// Callers decide what to do with a failing icebreaker; generation does not
/// regenerate on its own.
pub fn validate_icebreaker(text: &str) -> bool {
    let len = text.chars().count();
    if !(MIN_ICEBREAKER_CHARS..=MAX_ICEBREAKER_CHARS).contains(&len) {
        return false;
    }
    let lower = text.to_lowercase();
    if GENERIC_OPENERS.iter().any(|opener| lower.contains(opener)) {
        warn!("Icebreaker rejected by quality gate: generic opener");
        return false;
    }
    true
}
