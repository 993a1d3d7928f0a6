//! TrendScreen Runner — configuration, bar loading, pipeline orchestration, reports.
//!
//! This crate builds on `trendscreen-core` to provide:
//! - TOML config loading with validation and a config fingerprint
//! - CSV bar loading (daily plus optional weekly files)
//! - Deterministic synthetic universes for demos and tests
//! - The parallel screening pipeline
//! - Run reports with JSON, CSV and table export

pub mod config;
pub mod data_loader;
pub mod pipeline;
pub mod report;
pub mod synthetic;

pub use config::{default_config_toml, fingerprint, load_config, parse_config, ConfigHash};
pub use data_loader::{dataset_hash, load_bars_dir, read_bars, LoadError, LoadedBars};
pub use pipeline::Pipeline;
pub use report::{
    export_json, export_ranked_csv, import_json, render_table, ScreenReport, SCHEMA_VERSION,
};
pub use synthetic::{generate_bars, synthetic_universe};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn pipeline_is_send_sync() {
        assert_send::<Pipeline>();
        assert_sync::<Pipeline>();
    }

    #[test]
    fn report_is_send_sync() {
        assert_send::<ScreenReport>();
        assert_sync::<ScreenReport>();
    }

    #[test]
    fn loader_types_are_send_sync() {
        assert_send::<LoadedBars>();
        assert_sync::<LoadedBars>();
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
    }
}
