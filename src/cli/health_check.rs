use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn health_check(&self) -> Result<()> {
        println!("\n🔍 API Configuration Check");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let health = self.services.health_check();
        println!(
            "🤖 ANTHROPIC_API_KEY: {}",
            if health.has_anthropic_key {
                "✅ set"
            } else {
                "❌ missing"
            }
        );
        println!(
            "🕷️  FIRECRAWL_API_KEY: {}",
            if health.has_firecrawl_key {
                "✅ set"
            } else {
                "❌ missing"
            }
        );

        if health.ready() {
            println!("\n🎉 All services configured — enrichment is ready to run.");
        } else {
            println!("\n⚠️  Add the missing keys to .env (or the environment) and restart.");
        }

        println!(
            "\n⚙️  Model: {} | max concurrency: {} | retries: {} | tone: {}",
            self.config.llm.model,
            self.config.enrichment.max_concurrency,
            self.config.enrichment.retry_attempts,
            self.config.enrichment.icebreaker_tone.as_str()
        );

        Ok(())
    }
}
