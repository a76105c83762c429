mod csv_parser;
mod export;
mod leads;

pub use csv_parser::parse_csv;
pub use export::{export_filename, to_csv, to_json};
pub use leads::{enrichment_stats, initialize_leads, validation_stats, EnrichmentStats, ValidationStats};
