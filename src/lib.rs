pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::GooglePlacesClient;
pub use config::{cli::LocalStorage, CollectorConfig};

#[cfg(feature = "cli")]
pub use config::{Cli, Command};

pub use core::{
    collector::BusinessCollector,
    engine::{CollectionEngine, RunSummary},
    BusinessRecord, ResultSet, SearchRegion,
};
pub use utils::error::{CollectorError, Result};
