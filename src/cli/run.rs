use dialoguer::{theme::ColorfulTheme, Select};

use crate::{
    cli::cli::MenuAction,
    models::{CliApp, Result},
};
use tracing::error;

impl CliApp {
    pub async fn run(&mut self) -> Result<()> {
        println!("\n🚀 Welcome to Lead Enricher!");
        println!("═══════════════════════════════════════");

        let health = self.services.health_check();
        if !health.ready() {
            println!("⚠️  Missing API keys; enrichment phases are disabled until configured.");
            println!("   Run the configuration check below for details.");
        }

        loop {
            let actions = vec![
                MenuAction::LoadCsv,
                MenuAction::RunDiscovery,
                MenuAction::GenerateIcebreakers,
                MenuAction::ShowStats,
                MenuAction::ExportCsv,
                MenuAction::ExportJson,
                MenuAction::HealthCheck,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("\nSelect an action")
                .default(0)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::LoadCsv => {
                    if let Err(e) = self.run_load_csv().await {
                        error!("CSV ingestion failed: {}", e);
                        println!("❌ Could not load CSV: {}", e);
                    }
                }
                MenuAction::RunDiscovery => {
                    if let Err(e) = self.run_discovery().await {
                        error!("Email discovery failed: {}", e);
                        println!("❌ Email discovery aborted: {}", e);
                    }
                }
                MenuAction::GenerateIcebreakers => {
                    if let Err(e) = self.run_icebreakers().await {
                        error!("Icebreaker generation failed: {}", e);
                        println!("❌ Icebreaker generation aborted: {}", e);
                    }
                }
                MenuAction::ShowStats => {
                    if let Err(e) = self.show_stats().await {
                        error!("Failed to show stats: {}", e);
                    }
                }
                MenuAction::ExportCsv => {
                    if let Err(e) = self.run_export_csv().await {
                        error!("CSV export failed: {}", e);
                    }
                }
                MenuAction::ExportJson => {
                    if let Err(e) = self.run_export_json().await {
                        error!("JSON export failed: {}", e);
                    }
                }
                MenuAction::HealthCheck => {
                    if let Err(e) = self.health_check().await {
                        error!("Configuration check failed: {}", e);
                    }
                }
                MenuAction::Exit => {
                    println!("\n👋 Thanks for using Lead Enricher!");
                    break;
                }
            }
        }

        Ok(())
    }
}
