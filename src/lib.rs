pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemorySiteStore, JsonFileSiteStore};
pub use config::toml_config::TomlConfig;
pub use core::{
    checker::SiteChecker,
    probe::{HttpProber, ProbeSettings},
    scheduler::{SweepScheduler, SweepSummary},
    ticker::IntervalTicker,
};
pub use domain::model::{Classification, SiteId, SiteRecord};
pub use utils::error::{MonitorError, ProbeFailure, Result};
