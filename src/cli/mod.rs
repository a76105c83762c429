pub mod cli;
pub mod health_check;
pub mod run;
pub mod run_discovery;
pub mod run_export;
pub mod run_icebreakers;
pub mod run_load_csv;
pub mod show_stats;
