use dialoguer::{theme::ColorfulTheme, MultiSelect};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;

use crate::enrichment::{ProgressCallback, ProgressStage};
use crate::models::{CliApp, EnrichedLead, EnrichmentStatus, Result};

impl CliApp {
    pub async fn run_icebreakers(&mut self) -> Result<()> {
        if !self.config.enrichment.include_icebreaker {
            println!("\n⏭️  Icebreaker generation is disabled in config.yml.");
            return Ok(());
        }
        if !self.services.health_check().ready() {
            println!("\n❌ Cannot generate icebreakers: API keys are missing.");
            return Ok(());
        }

        // Only leads that finished discovery with an email are worth opening.
        let candidates: Vec<&EnrichedLead> = self
            .leads
            .iter()
            .filter(|l| l.status == EnrichmentStatus::Completed && l.email.is_some())
            .collect();
        if candidates.is_empty() {
            println!("\n🤷 No completed leads with an email — run discovery first.");
            return Ok(());
        }

        let labels: Vec<String> = candidates
            .iter()
            .map(|l| {
                format!(
                    "{} <{}>",
                    l.display_label(),
                    l.email.as_deref().unwrap_or("")
                )
            })
            .collect();
        let defaults = vec![true; labels.len()];

        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select leads to write icebreakers for")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;
        if picked.is_empty() {
            println!("👍 Nothing selected");
            return Ok(());
        }

        let selected: Vec<EnrichedLead> = picked
            .iter()
            .map(|&idx| (*candidates[idx]).clone())
            .collect();

        println!(
            "\n✍️  Generating {} icebreakers ({} tone)",
            selected.len(),
            self.config.enrichment.icebreaker_tone.as_str()
        );

        let bar = ProgressBar::new(selected.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} icebreakers",
            )?
            .progress_chars("#>-"),
        );
        let progress_bar = bar.clone();
        let callback: ProgressCallback = Arc::new(move |update| {
            if update.stage == ProgressStage::IcebreakerFinished {
                progress_bar.inc(1);
            }
        });

        let enriched = self
            .orchestrator
            .run_icebreakers(selected, Some(callback))
            .await?;
        bar.finish_and_clear();

        let mut written = 0usize;
        for updated in enriched {
            if updated.icebreaker.is_some() {
                written += 1;
            }
            if let Some(slot) = self
                .leads
                .iter_mut()
                .find(|l| l.lead.id == updated.lead.id)
            {
                *slot = updated;
            }
        }

        info!("Icebreaker run complete: {} written", written);
        println!("\n🎉 Icebreakers written: {}", written);
        for lead in self.leads.iter().filter(|l| l.icebreaker.is_some()).take(3) {
            println!(
                "  • {}: {}",
                lead.display_label(),
                lead.icebreaker.as_deref().unwrap_or("")
            );
        }

        Ok(())
    }
}
