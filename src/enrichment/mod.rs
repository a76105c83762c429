mod orchestrator;

pub use orchestrator::{
    EnrichmentOrchestrator, ProgressCallback, ProgressStage, ProgressUpdate,
};
