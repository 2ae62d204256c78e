use crate::core::collector::BusinessCollector;
use crate::core::{ConfigProvider, PlacesApi, RunStats, Storage};
use crate::utils::error::ErrorCategory;

const PREVIEW_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    /// `None` when nothing was found or the write failed.
    pub output_path: Option<String>,
    pub stats: RunStats,
}

/// One full collection run: search, preview, save.
pub struct CollectionEngine<A: PlacesApi, S: Storage, C: ConfigProvider> {
    collector: BusinessCollector<A, S>,
    config: C,
}

impl<A: PlacesApi, S: Storage, C: ConfigProvider> CollectionEngine<A, S, C> {
    pub fn new(api: A, storage: S, config: C) -> Self {
        let collector = BusinessCollector::from_config(api, storage, &config);
        Self { collector, config }
    }

    pub async fn run(&self) -> RunSummary {
        let region = self.collector.region();
        println!(
            "Searching for {} businesses around ({}, {})...",
            self.config.max_results(),
            region.latitude,
            region.longitude
        );
        println!("This will take several minutes due to API rate limits...");

        let (results, stats) = self
            .collector
            .search_with_stats(self.config.queries(), self.config.max_results())
            .await;

        tracing::debug!("Run stats: {:?}", stats);

        if results.is_empty() {
            println!("No businesses found");
            return RunSummary {
                records: 0,
                output_path: None,
                stats,
            };
        }

        println!("Found {} businesses with phone numbers", results.len());
        for (i, record) in results.iter().take(PREVIEW_COUNT).enumerate() {
            println!("{}. {} - {}", i + 1, record.name, record.phone);
        }
        if results.len() > PREVIEW_COUNT {
            println!("... and {} more", results.len() - PREVIEW_COUNT);
        }

        let path = self.config.output_path();
        let output_path = match self.collector.save(results.records(), path).await {
            Ok(()) => {
                println!("Successfully saved {} businesses to {}", results.len(), path);
                Some(path.to_string())
            }
            Err(e) => {
                tracing::error!(
                    category = ?ErrorCategory::Persistence,
                    "Error saving to JSON: {}",
                    e
                );
                eprintln!("Error saving to JSON: {}", e);
                eprintln!("💡 {}", e.recovery_suggestion());
                None
            }
        };

        if stats.queries_failed + stats.pages_failed + stats.details_failed > 0 {
            tracing::warn!(
                "Completed with failures: {} queries, {} pages, {} details",
                stats.queries_failed,
                stats.pages_failed,
                stats.details_failed
            );
        }

        RunSummary {
            records: results.len(),
            output_path,
            stats,
        }
    }
}
