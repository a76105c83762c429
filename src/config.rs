use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub enrichment: EnrichmentConfig,
    pub scraping: ScrapingConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Process-wide tunables for one enrichment run. Immutable while a run is active.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(deserialize_with = "deserialize_concurrency")]
    pub max_concurrency: usize,
    /// Additional tries per external call. 0 disables retries.
    pub retry_attempts: u32,
    pub include_icebreaker: bool,
    pub icebreaker_tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Friendly,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

// Batch width must stay positive or phase 1 would never dispatch anything.
fn deserialize_concurrency<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = usize::deserialize(deserializer)?;
    if value == 0 {
        return Err(serde::de::Error::custom(
            "enrichment.max_concurrency must be at least 1",
        ));
    }
    Ok(value)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enrichment: EnrichmentConfig {
                max_concurrency: 5,
                retry_attempts: 0,
                include_icebreaker: true,
                icebreaker_tone: Tone::Professional,
            },
            scraping: ScrapingConfig {
                request_timeout_seconds: 30,
                user_agent: "Mozilla/5.0 (compatible; LeadEnricher/1.0)".to_string(),
            },
            llm: LlmConfig {
                model: "claude-3-5-haiku-latest".to_string(),
                max_tokens: 1024,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                pretty_json: true,
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_positive_concurrency() {
        let config = Config::default();
        assert!(config.enrichment.max_concurrency >= 1);
        assert_eq!(config.enrichment.retry_attempts, 0);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let yaml = r#"
enrichment:
  max_concurrency: 0
  retry_attempts: 0
  include_icebreaker: true
  icebreaker_tone: professional
scraping:
  request_timeout_seconds: 30
  user_agent: test
llm:
  model: claude-3-5-haiku-latest
  max_tokens: 1024
logging:
  level: info
output:
  directory: out
  pretty_json: true
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn parses_tone_values() {
        for (raw, expected) in [
            ("professional", Tone::Professional),
            ("casual", Tone::Casual),
            ("friendly", Tone::Friendly),
        ] {
            let tone: Tone = serde_yaml::from_str(raw).unwrap();
            assert_eq!(tone, expected);
        }
    }
}
