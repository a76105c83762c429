use crate::ingest::{enrichment_stats, validation_stats};
use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn show_stats(&self) -> Result<()> {
        println!("\n📊 Enrichment Statistics");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if self.leads.is_empty() {
            println!("🤷 No leads loaded yet");
            return Ok(());
        }

        let validation = validation_stats(&self.leads);
        println!("📦 Total leads: {}", validation.total);
        println!("✅ Valid domains: {}", validation.valid);
        println!("🚫 Invalid domains: {}", validation.invalid);

        let stats = enrichment_stats(&self.leads);
        println!("\n📈 By status:");
        println!("  ⏳ Pending: {}", stats.pending);
        println!("  🔄 Processing: {}", stats.processing);
        println!("  ✅ Completed: {}", stats.completed);
        println!("  ❌ Failed: {}", stats.failed);
        println!("  ⏭️  Skipped: {}", stats.skipped);

        println!("\n📧 With email: {}", stats.with_email);
        println!("✍️  With icebreaker: {}", stats.with_icebreaker);

        if validation.total > 0 {
            let completion = (stats.completed * 100) / validation.total;
            println!("\n📈 Completion rate: {}%", completion);
        }

        Ok(())
    }
}
