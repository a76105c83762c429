use crate::config::Config;
use crate::enrichment::EnrichmentOrchestrator;
use crate::models::CliApp;
use crate::services::ServiceContext;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone)]
pub enum MenuAction {
    LoadCsv,
    RunDiscovery,
    GenerateIcebreakers,
    ShowStats,
    ExportCsv,
    ExportJson,
    HealthCheck,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::LoadCsv => write!(f, "📥 Load leads from CSV"),
            MenuAction::RunDiscovery => {
                write!(f, "🔍 Phase 1: Discover contact emails (batched)")
            }
            MenuAction::GenerateIcebreakers => {
                write!(f, "✍️  Phase 2: Generate icebreakers for selected leads")
            }
            MenuAction::ShowStats => write!(f, "📊 Show enrichment statistics"),
            MenuAction::ExportCsv => write!(f, "📤 Export enriched leads to CSV"),
            MenuAction::ExportJson => write!(f, "📤 Export enriched leads to JSON"),
            MenuAction::HealthCheck => write!(f, "🔍 Check API configuration"),
            MenuAction::Exit => write!(f, "🚪 Exit"),
        }
    }
}

impl CliApp {
    pub fn new(config: Config) -> Result<Self> {
        let services = ServiceContext::from_env(&config)?;
        let orchestrator = EnrichmentOrchestrator::new(
            config.enrichment.clone(),
            services.scraper(),
            services.llm(),
            services.health_check(),
        );

        Ok(Self {
            config,
            services,
            orchestrator,
            leads: Vec::new(),
        })
    }
}
