use dialoguer::{theme::ColorfulTheme, Input};
use tracing::info;

use crate::ingest::{initialize_leads, parse_csv, validation_stats};
use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn run_load_csv(&mut self) -> Result<()> {
        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Path to leads CSV")
            .default("leads.csv".to_string())
            .interact_text()?;

        let text = tokio::fs::read_to_string(&path).await?;
        let leads = parse_csv(&text)?;
        let enriched = initialize_leads(leads);
        let stats = validation_stats(&enriched);

        info!("Ingested {} leads from {}", stats.total, path);

        println!("\n📥 Loaded {} leads from {}", stats.total, path);
        println!("  ✅ Valid domains: {}", stats.valid);
        println!("  ⏭️  Invalid domains (skipped): {}", stats.invalid);

        let invalid: Vec<_> = enriched
            .iter()
            .filter(|l| !l.domain_validation.is_valid)
            .collect();
        if !invalid.is_empty() {
            println!("\n  Skipped rows:");
            for lead in invalid.iter().take(5) {
                println!(
                    "   • {} — {}",
                    lead.lead.website,
                    lead.error_message.as_deref().unwrap_or("invalid domain")
                );
            }
            if invalid.len() > 5 {
                println!("   ... and {} more", invalid.len() - 5);
            }
        }

        self.leads = enriched;
        Ok(())
    }
}
