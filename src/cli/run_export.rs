use tracing::info;

use crate::ingest::{export_filename, to_csv, to_json};
use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn run_export_csv(&self) -> Result<()> {
        if self.leads.is_empty() {
            println!("\n🤷 Nothing to export — load a CSV first.");
            return Ok(());
        }

        let path = export_filename(&self.config.output.directory, "csv");
        tokio::fs::create_dir_all(&self.config.output.directory).await?;
        tokio::fs::write(&path, to_csv(&self.leads)).await?;

        info!("Exported {} leads to {}", self.leads.len(), path);
        println!("\n📤 Exported {} leads to {}", self.leads.len(), path);
        Ok(())
    }

    pub async fn run_export_json(&self) -> Result<()> {
        if self.leads.is_empty() {
            println!("\n🤷 Nothing to export — load a CSV first.");
            return Ok(());
        }

        let path = export_filename(&self.config.output.directory, "json");
        tokio::fs::create_dir_all(&self.config.output.directory).await?;
        let json = to_json(&self.leads, self.config.output.pretty_json)?;
        tokio::fs::write(&path, json).await?;

        info!("Exported {} leads to {}", self.leads.len(), path);
        println!("\n📤 Exported {} leads to {}", self.leads.len(), path);
        Ok(())
    }
}
