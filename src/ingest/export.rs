use chrono::Utc;

use crate::models::{EnrichedLead, Result};

/// Fixed enrichment columns appended after the original input columns, in
/// this order, filtered to those actually populated.
const ENRICHMENT_COLUMNS: &[&str] = &["email", "icebreaker", "enrichmentStatus", "errorMessage"];

fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Flattens enriched leads back to CSV.
///
/// Column order is deterministic: recognized input columns first, then extra
/// fields in first-seen order, then the enrichment suffix. `domain_validation`
/// is dropped. Enrichment columns take precedence over colliding extra-field
/// headers.
pub fn to_csv(leads: &[EnrichedLead]) -> String {
    let has_company = leads.iter().any(|l| l.lead.company.is_some());
    let has_name = leads.iter().any(|l| l.lead.name.is_some());
    let has_email = leads.iter().any(|l| l.email.is_some());
    let has_icebreaker = leads.iter().any(|l| l.icebreaker.is_some());
    let has_error = leads.iter().any(|l| l.error_message.is_some());

    let mut base_columns = vec!["website".to_string()];
    if has_company {
        base_columns.push("company".to_string());
    }
    if has_name {
        base_columns.push("name".to_string());
    }

    let mut extra_columns: Vec<String> = Vec::new();
    for lead in leads {
        for (key, _) in &lead.lead.extra_fields {
            if base_columns.iter().any(|c| c == key)
                || ENRICHMENT_COLUMNS.contains(&key.as_str())
                || extra_columns.iter().any(|c| c == key)
            {
                continue;
            }
            extra_columns.push(key.clone());
        }
    }

    let mut suffix_columns: Vec<&str> = Vec::new();
    if has_email {
        suffix_columns.push("email");
    }
    if has_icebreaker {
        suffix_columns.push("icebreaker");
    }
    suffix_columns.push("enrichmentStatus");
    if has_error {
        suffix_columns.push("errorMessage");
    }

    let mut out = String::new();
    let header: Vec<String> = base_columns
        .iter()
        .cloned()
        .chain(extra_columns.iter().cloned())
        .chain(suffix_columns.iter().map(|s| s.to_string()))
        .collect();
    out.push_str(
        &header
            .iter()
            .map(|h| escape_csv_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for lead in leads {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        row.push(lead.lead.website.clone());
        if has_company {
            row.push(lead.lead.company.clone().unwrap_or_default());
        }
        if has_name {
            row.push(lead.lead.name.clone().unwrap_or_default());
        }
        for column in &extra_columns {
            let value = lead
                .lead
                .extra_fields
                .iter()
                .find(|(key, _)| key == column)
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            row.push(value);
        }
        for column in &suffix_columns {
            let value = match *column {
                "email" => lead.email.clone().unwrap_or_default(),
                "icebreaker" => lead.icebreaker.clone().unwrap_or_default(),
                "enrichmentStatus" => lead.status.to_string(),
                "errorMessage" => lead.error_message.clone().unwrap_or_default(),
                _ => String::new(),
            };
            row.push(value);
        }

        out.push_str(
            &row.iter()
                .map(|v| escape_csv_field(v))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
    }

    out
}

/// Direct structural dump of the enriched lead list.
pub fn to_json(leads: &[EnrichedLead], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(leads)?
    } else {
        serde_json::to_string(leads)?
    };
    Ok(json)
}

/// Timestamped export path inside the output directory.
pub fn export_filename(directory: &str, extension: &str) -> String {
    format!(
        "{}/leads_export_{}.{}",
        directory.trim_end_matches('/'),
        Utc::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}
