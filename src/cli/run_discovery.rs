use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;

use crate::enrichment::{ProgressCallback, ProgressStage};
use crate::ingest::enrichment_stats;
use crate::models::{CliApp, EnrichmentStatus, Result};

impl CliApp {
    pub async fn run_discovery(&mut self) -> Result<()> {
        if self.leads.is_empty() {
            println!("\n🤷 No leads loaded yet — load a CSV first.");
            return Ok(());
        }
        if !self.services.health_check().ready() {
            println!("\n❌ Cannot run discovery: API keys are missing (see configuration check).");
            return Ok(());
        }

        let pending = self
            .leads
            .iter()
            .filter(|l| l.status == EnrichmentStatus::Pending)
            .count();
        if pending == 0 {
            println!("\n🎉 Nothing to discover — no leads are pending.");
            return Ok(());
        }

        println!(
            "\n🔍 Discovering emails for {} leads (batches of {})",
            pending, self.config.enrichment.max_concurrency
        );
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let bar = ProgressBar::new(pending as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} leads {msg}",
            )?
            .progress_chars("#>-"),
        );

        let progress_bar = bar.clone();
        let callback: ProgressCallback = Arc::new(move |update| {
            if update.stage == ProgressStage::DiscoveryFinished {
                progress_bar.inc(1);
                progress_bar.set_message(format!(
                    "({} pages, {}k tokens)",
                    update.usage.pages_scraped,
                    (update.usage.input_tokens + update.usage.output_tokens) / 1000
                ));
            }
        });

        let results = self
            .orchestrator
            .run_discovery(self.leads.clone(), Some(callback))
            .await?;
        bar.finish_and_clear();
        self.leads = results;

        let stats = enrichment_stats(&self.leads);
        let usage = self.orchestrator.usage().await;
        info!(
            "Discovery run complete: {} completed, {} failed",
            stats.completed, stats.failed
        );

        println!("\n🎉 Email discovery complete!");
        println!("  ✅ Completed: {}", stats.completed);
        println!("  📧 With email: {}", stats.with_email);
        println!("  ❌ Failed: {}", stats.failed);
        println!("  ⏭️  Skipped: {}", stats.skipped);
        println!(
            "  📊 Usage: {} pages scraped, {} input / {} output tokens",
            usage.pages_scraped, usage.input_tokens, usage.output_tokens
        );

        Ok(())
    }
}
