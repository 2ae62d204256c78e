pub mod cli;
pub mod toml_config;

use crate::adapters::google_places::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::core::collector::{default_queries, DEFAULT_PLACE_TYPE, PAGE_TOKEN_DELAY};
use crate::core::{ConfigProvider, SearchRegion};
use crate::utils::error::{CollectorError, Result};
use crate::utils::validation::{self, Validate};
use std::path::Path;
use std::time::Duration;
use toml_config::TomlConfig;

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const DEFAULT_OUTPUT_PATH: &str = "miami_businesses.json";
pub const DEFAULT_MERGE_OUTPUT_PATH: &str = "merged_businesses.json";

/// Record limit used by a plain command-line run.
pub const RUN_MAX_RESULTS: usize = 10_000;

/// Nearby search rejects larger radii.
const MAX_RADIUS_METERS: u32 = 50_000;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub region: SearchRegion,
    pub queries: Vec<String>,
    pub max_results: usize,
    pub place_type: String,
    pub page_delay: Duration,
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub output_path: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            region: SearchRegion::default(),
            queries: default_queries(),
            max_results: RUN_MAX_RESULTS,
            place_type: DEFAULT_PLACE_TYPE.to_string(),
            page_delay: PAGE_TOKEN_DELAY,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: DEFAULT_TIMEOUT,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

impl CollectorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_toml(TomlConfig::from_file(path)?))
    }

    /// Defaults overlaid with whatever the file sets.
    pub fn from_toml(file: TomlConfig) -> Self {
        let mut config = Self::default();

        if let Some(region) = file.region {
            config.region = SearchRegion::new(
                region.latitude.unwrap_or(config.region.latitude),
                region.longitude.unwrap_or(config.region.longitude),
                region.radius_meters.unwrap_or(config.region.radius_meters),
            );
        }

        if let Some(search) = file.search {
            if let Some(queries) = search.queries.filter(|q| !q.is_empty()) {
                config.queries = queries;
            }
            if let Some(max_results) = search.max_results {
                config.max_results = max_results;
            }
            if let Some(place_type) = search.place_type {
                config.place_type = place_type;
            }
            if let Some(delay_ms) = search.page_delay_ms {
                config.page_delay = Duration::from_millis(delay_ms);
            }
        }

        if let Some(api) = file.api {
            if let Some(base_url) = api.base_url {
                config.api_base_url = base_url;
            }
            config.api_key = api.api_key.or(config.api_key);
            if let Some(timeout) = api.timeout_seconds {
                config.request_timeout = Duration::from_secs(timeout);
            }
        }

        if let Some(path) = file.output.and_then(|o| o.path) {
            config.output_path = path;
        }

        config
    }

    /// Key from the config file, else from the environment (`.env` must
    /// already be loaded).
    pub fn require_api_key(&self) -> Result<String> {
        self.resolve_api_key(std::env::var(API_KEY_VAR).ok())
    }

    fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        // An unsubstituted `${VAR}` counts as unset
        let usable = |key: &String| !key.trim().is_empty() && !key.contains("${");

        self.api_key
            .clone()
            .filter(usable)
            .or_else(|| env_value.filter(usable))
            .ok_or_else(|| CollectorError::MissingCredential {
                var: API_KEY_VAR.to_string(),
            })
    }
}

impl Validate for CollectorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range("region.latitude", self.region.latitude, -90.0, 90.0)?;
        validation::validate_range("region.longitude", self.region.longitude, -180.0, 180.0)?;
        validation::validate_range(
            "region.radius_meters",
            self.region.radius_meters,
            1,
            MAX_RADIUS_METERS,
        )?;
        validation::validate_non_empty_string("search.place_type", &self.place_type)?;
        for query in &self.queries {
            validation::validate_non_empty_string("search.queries", query)?;
        }
        validation::validate_url("api.base_url", &self.api_base_url)?;
        validation::validate_positive_number(
            "api.timeout_seconds",
            self.request_timeout.as_secs(),
            1,
        )?;
        validation::validate_path("output.path", &self.output_path)?;
        Ok(())
    }
}

impl ConfigProvider for CollectorConfig {
    fn region(&self) -> SearchRegion {
        self.region
    }

    fn queries(&self) -> &[String] {
        &self.queries
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    fn place_type(&self) -> &str {
        &self.place_type
    }

    fn page_delay(&self) -> Duration {
        self.page_delay
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

#[cfg(feature = "cli")]
pub use args::{Cli, Command};

#[cfg(feature = "cli")]
mod args {
    use super::{CollectorConfig, DEFAULT_MERGE_OUTPUT_PATH};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "places-collector")]
    #[command(about = "Collect business names and phone numbers from the Places API")]
    pub struct Cli {
        /// Optional TOML file with region, search, api and output sections
        #[arg(short, long)]
        pub config: Option<String>,

        /// Output JSON file
        #[arg(short, long)]
        pub output: Option<String>,

        #[arg(long)]
        pub max_results: Option<usize>,

        /// Search keyword; repeat for several. Defaults to the built-in list
        #[arg(short, long = "query")]
        pub queries: Vec<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Option<Command>,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Merge result files, dropping duplicates by normalized name and phone
        Merge {
            #[arg(required = true)]
            files: Vec<String>,

            #[arg(short, long, default_value = DEFAULT_MERGE_OUTPUT_PATH)]
            output: String,
        },
        /// List records whose name or phone contains a term
        Find { file: String, term: String },
    }

    impl Cli {
        /// Flags win over file and defaults.
        pub fn apply_overrides(&self, config: &mut CollectorConfig) {
            if let Some(output) = &self.output {
                config.output_path = output.clone();
            }
            if let Some(max_results) = self.max_results {
                config.max_results = max_results;
            }
            if !self.queries.is_empty() {
                config.queries = self.queries.clone();
            }
        }
    }

}
