//! CSV ingestion: arbitrary spreadsheets in, typed `Lead` records out.
//!
//! Column roles are detected by name heuristics so users never have to rename
//! headers. Unrecognized columns ride along in `extra_fields` and come back
//! out at export time.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Lead, Result};

/// Header aliases accepted for the website column, compared after
/// normalization (lowercased, separators stripped).
const WEBSITE_ALIASES: &[&str] = &[
    "website",
    "url",
    "domain",
    "site",
    "companyurl",
    "companywebsite",
    "web",
    "homepage",
];

const COMPANY_ALIASES: &[&str] = &[
    "company",
    "companyname",
    "organization",
    "organisation",
    "business",
];

const NAME_ALIASES: &[&str] = &["name", "fullname", "contactname", "person"];

const EMAIL_ALIASES: &[&str] = &["email", "emailaddress", "contactemail", "mail"];

/// Case/separator-insensitive form used for alias matching.
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Splits raw CSV text into records, honoring quoted fields (embedded commas,
/// newlines, and `""` escapes) and CRLF line endings.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // Blank lines parse as single empty fields; they are not rows.
    records
        .into_iter()
        .filter(|r| !(r.len() == 1 && r[0].trim().is_empty()))
        .collect()
}

fn find_column(
    headers: &[String],
    aliases: &[&str],
    claimed: &[usize],
) -> Option<usize> {
    headers.iter().enumerate().position(|(idx, header)| {
        !claimed.contains(&idx) && aliases.contains(&normalize_header(header).as_str())
    })
}

/// Parses CSV text into `Lead` records.
///
/// Fails when no column matches the website aliases and no email column is
/// present either; every other malformation degrades per-row (an empty
/// website simply fails domain validation later).
pub fn parse_csv(text: &str) -> Result<Vec<Lead>> {
    let records = parse_records(text);
    if records.is_empty() {
        return Err("CSV is empty".into());
    }

    let headers: Vec<String> = records[0].iter().map(|h| h.trim().to_string()).collect();

    let mut claimed: Vec<usize> = Vec::new();
    let website_col = find_column(&headers, WEBSITE_ALIASES, &claimed);
    if let Some(idx) = website_col {
        claimed.push(idx);
    }
    let email_col = find_column(&headers, EMAIL_ALIASES, &claimed);
    if let Some(idx) = email_col {
        claimed.push(idx);
    }
    let company_col = find_column(&headers, COMPANY_ALIASES, &claimed);
    if let Some(idx) = company_col {
        claimed.push(idx);
    }
    let name_col = find_column(&headers, NAME_ALIASES, &claimed);
    if let Some(idx) = name_col {
        claimed.push(idx);
    }

    if website_col.is_none() && email_col.is_none() {
        return Err(format!(
            "CSV is missing a website column (expected one of: {})",
            WEBSITE_ALIASES.join(", ")
        )
        .into());
    }
    if website_col.is_none() {
        warn!("No website column found; relying on the email column alone");
    }

    let get = |row: &[String], col: Option<usize>| -> Option<String> {
        col.and_then(|idx| row.get(idx))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut leads = Vec::with_capacity(records.len().saturating_sub(1));
    for row in &records[1..] {
        let website = get(row, website_col).unwrap_or_default();

        let mut extra_fields = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if claimed.contains(&idx) {
                continue;
            }
            if let Some(value) = row.get(idx).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                extra_fields.push((header.clone(), value.to_string()));
            }
        }

        leads.push(Lead {
            id: Uuid::new_v4(),
            website,
            company: get(row, company_col),
            name: get(row, name_col),
            email: get(row, email_col),
            extra_fields,
        });
    }

    debug!("Parsed {} leads from CSV", leads.len());
    Ok(leads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_csv() {
        let csv = "website,company\nacme.com,Acme Inc\nexample.io,Example\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].website, "acme.com");
        assert_eq!(leads[0].company.as_deref(), Some("Acme Inc"));
        assert_eq!(leads[1].website, "example.io");
    }

    #[test]
    fn detects_aliased_website_column() {
        for header in ["Company URL", "company_website", "Homepage", "Web"] {
            let csv = format!("{},other\nacme.com,x\n", header);
            let leads = parse_csv(&csv).unwrap();
            assert_eq!(leads[0].website, "acme.com", "header: {}", header);
        }
    }

    #[test]
    fn fails_without_website_or_email_column() {
        let err = parse_csv("foo,bar\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("missing a website column"));
    }

    #[test]
    fn accepts_email_only_csv() {
        let csv = "Email,notes\njane@acme.com,warm intro\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(leads[0].email.as_deref(), Some("jane@acme.com"));
        assert!(leads[0].website.is_empty());
    }

    #[test]
    fn preserves_unrecognized_columns_in_order() {
        let csv = "website,industry,employees\nacme.com,robotics,50\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(
            leads[0].extra_fields,
            vec![
                ("industry".to_string(), "robotics".to_string()),
                ("employees".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn handles_quoted_fields() {
        let csv = "website,company\nacme.com,\"Acme, Inc.\"\nexample.io,\"Say \"\"hi\"\"\"\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(leads[0].company.as_deref(), Some("Acme, Inc."));
        assert_eq!(leads[1].company.as_deref(), Some("Say \"hi\""));
    }

    #[test]
    fn handles_newlines_inside_quotes_and_crlf() {
        let csv = "website,notes\r\nacme.com,\"line one\nline two\"\r\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(
            leads[0].extra_fields[0].1,
            "line one\nline two".to_string()
        );
    }

    #[test]
    fn skips_blank_lines() {
        let csv = "website\nacme.com\n\n\nexample.io\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(leads.len(), 2);
    }

    #[test]
    fn first_matching_column_wins() {
        let csv = "url,website\nfrom-url.com,from-website.com\n";
        let leads = parse_csv(csv).unwrap();
        assert_eq!(leads[0].website, "from-url.com");
        // the unclaimed website column rides along as an extra field
        assert_eq!(leads[0].extra_fields[0].0, "website");
    }
}
