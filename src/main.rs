use anyhow::Context;
use clap::Parser;
use places_collector::core::merge::{self, find_records, merge_records};
use places_collector::utils::{logger, validation::Validate};
use places_collector::{
    Cli, CollectionEngine, CollectorConfig, CollectorError, Command, GooglePlacesClient,
    LocalStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    match &cli.command {
        Some(Command::Merge { files, output }) => run_merge(files, output).await,
        Some(Command::Find { file, term }) => run_find(file, term).await,
        None => {
            run_collection(&cli).await;
            Ok(())
        }
    }
}

/// Configuration problems end the run before any request is made; the
/// process still exits normally.
fn report_config_error(e: &CollectorError) {
    tracing::error!("❌ Configuration error: {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

async fn run_collection(cli: &Cli) {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match CollectorConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => return report_config_error(&e),
            }
        }
        None => CollectorConfig::default(),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        return report_config_error(&e);
    }

    let api_key = match config.require_api_key() {
        Ok(key) => key,
        Err(e) => return report_config_error(&e),
    };

    let client = match GooglePlacesClient::with_base_url(
        api_key,
        config.api_base_url.clone(),
        config.request_timeout,
    ) {
        Ok(client) => client,
        Err(e) => return report_config_error(&e),
    };

    let engine = CollectionEngine::new(client, LocalStorage::current_dir(), config);
    let summary = engine.run().await;

    tracing::info!(
        "✅ Run finished: {} records, {} duplicates dropped, {} places skipped",
        summary.records,
        summary.stats.duplicates_dropped,
        summary.stats.places_skipped
    );
}

async fn run_merge(files: &[String], output: &str) -> anyhow::Result<()> {
    let storage = LocalStorage::current_dir();

    let mut datasets = Vec::with_capacity(files.len());
    for file in files {
        let records = merge::load_records(&storage, file)
            .await
            .with_context(|| format!("Failed to load {}", file))?;
        println!("{}: {} businesses", file, records.len());
        datasets.push(records);
    }

    let combined: usize = datasets.iter().map(Vec::len).sum();
    println!("Combined dataset: {} businesses", combined);

    let report = merge_records(datasets);
    println!("After deduplication: {} businesses", report.unique.len());
    println!("Duplicates removed: {}", report.duplicates.len());
    for duplicate in &report.duplicates {
        tracing::debug!("Duplicate: {} - {}", duplicate.name, duplicate.phone);
    }

    merge::save_records(&storage, &report.unique, output)
        .await
        .with_context(|| format!("Failed to write {}", output))?;
    println!("Successfully saved {} businesses to {}", report.unique.len(), output);
    Ok(())
}

async fn run_find(file: &str, term: &str) -> anyhow::Result<()> {
    let storage = LocalStorage::current_dir();
    let records = merge::load_records(&storage, file)
        .await
        .with_context(|| format!("Failed to load {}", file))?;

    let matches = find_records(&records, term);
    for record in &matches {
        println!("{} - {}", record.name, record.phone);
    }
    println!("{} businesses found", matches.len());
    Ok(())
}
