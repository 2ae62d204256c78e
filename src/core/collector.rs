use crate::core::{
    BusinessRecord, ConfigProvider, NearbyPage, PlacesApi, RawPlace, ResultSet, RunStats,
    SearchRegion, Storage,
};
use crate::domain::ports::DETAIL_FIELDS;
use crate::utils::error::{ErrorCategory, Result};
use std::time::Duration;

/// Continuation tokens are not valid until a short while after they are
/// issued; requesting the next page earlier fails with INVALID_REQUEST.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

pub const DEFAULT_MAX_RESULTS: usize = 100;

pub const DEFAULT_PLACE_TYPE: &str = "establishment";

pub const DEFAULT_QUERIES: [&str; 10] = [
    "restaurant",
    "store",
    "service",
    "office",
    "shop",
    "clinic",
    "salon",
    "gym",
    "hotel",
    "market",
];

pub fn default_queries() -> Vec<String> {
    DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
}

/// Runs keyword searches around one region and accumulates deduplicated
/// businesses that have both a name and a phone number.
pub struct BusinessCollector<A: PlacesApi, S: Storage> {
    api: A,
    storage: S,
    region: SearchRegion,
    place_type: String,
    page_delay: Duration,
}

impl<A: PlacesApi, S: Storage> BusinessCollector<A, S> {
    pub fn new(api: A, storage: S, region: SearchRegion) -> Self {
        Self {
            api,
            storage,
            region,
            place_type: DEFAULT_PLACE_TYPE.to_string(),
            page_delay: PAGE_TOKEN_DELAY,
        }
    }

    pub fn from_config<C: ConfigProvider>(api: A, storage: S, config: &C) -> Self {
        Self::new(api, storage, config.region())
            .with_place_type(config.place_type())
            .with_page_delay(config.page_delay())
    }

    pub fn with_place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = place_type.into();
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn region(&self) -> &SearchRegion {
        &self.region
    }

    /// Empty `queries` means [`DEFAULT_QUERIES`]. Per-query failures are
    /// logged and never reach the caller.
    pub async fn search(&self, queries: &[String], max_results: usize) -> ResultSet {
        self.search_with_stats(queries, max_results).await.0
    }

    /// [`search`](Self::search) capped at [`DEFAULT_MAX_RESULTS`].
    pub async fn search_default(&self, queries: &[String]) -> ResultSet {
        self.search(queries, DEFAULT_MAX_RESULTS).await
    }

    pub async fn search_with_stats(
        &self,
        queries: &[String],
        max_results: usize,
    ) -> (ResultSet, RunStats) {
        let queries: Vec<&str> = if queries.is_empty() {
            DEFAULT_QUERIES.to_vec()
        } else {
            queries.iter().map(String::as_str).collect()
        };

        let mut results = ResultSet::new();
        let mut stats = RunStats::default();

        for (i, query) in queries.iter().enumerate() {
            let remaining = max_results.saturating_sub(results.len());
            if remaining == 0 {
                break;
            }

            tracing::info!(
                "Searching with query '{}' ({}/{})...",
                query,
                i + 1,
                queries.len()
            );
            stats.queries_run += 1;

            match self.collect_query(query, remaining, &mut stats).await {
                Ok(records) => {
                    for record in records {
                        if !results.insert(record) {
                            stats.duplicates_dropped += 1;
                        }
                    }
                }
                Err(e) => {
                    stats.queries_failed += 1;
                    tracing::warn!(
                        category = ?ErrorCategory::Query,
                        "Error searching businesses with query '{}': {}",
                        query,
                        e
                    );
                }
            }

            tracing::info!("Total unique businesses found: {}", results.len());
        }

        results.truncate(max_results);
        (results, stats)
    }

    /// Collects up to `max_results` records for one keyword, following
    /// continuation tokens. Only a failed first page is an error.
    pub async fn search_one(&self, query: &str, max_results: usize) -> Result<Vec<BusinessRecord>> {
        let mut stats = RunStats::default();
        self.collect_query(query, max_results, &mut stats).await
    }

    async fn collect_query(
        &self,
        query: &str,
        max_results: usize,
        stats: &mut RunStats,
    ) -> Result<Vec<BusinessRecord>> {
        let mut records = Vec::new();
        if max_results == 0 {
            return Ok(records);
        }

        let first_page = self
            .api
            .nearby_search(&self.region, query, &self.place_type)
            .await?;
        let mut next_token = self
            .collect_page(first_page, max_results, &mut records, stats)
            .await;

        let mut page_number = 1;
        while let Some(token) = next_token.take() {
            if records.len() >= max_results {
                break;
            }

            tokio::time::sleep(self.page_delay).await;
            page_number += 1;
            tracing::debug!("Fetching page {} for query '{}'", page_number, query);

            match self.api.next_page(&token).await {
                Ok(page) => {
                    next_token = self
                        .collect_page(page, max_results, &mut records, stats)
                        .await;
                }
                Err(e) => {
                    stats.pages_failed += 1;
                    tracing::warn!(
                        category = ?ErrorCategory::Page,
                        "Error fetching next page for query '{}': {}",
                        query,
                        e
                    );
                    break;
                }
            }
        }

        Ok(records)
    }

    /// Returns the page's continuation token.
    async fn collect_page(
        &self,
        page: NearbyPage,
        max_results: usize,
        records: &mut Vec<BusinessRecord>,
        stats: &mut RunStats,
    ) -> Option<String> {
        for place in &page.results {
            if records.len() >= max_results {
                break;
            }

            match self.extract_info(place).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => stats.places_skipped += 1,
                Err(e) => {
                    stats.details_failed += 1;
                    tracing::warn!(
                        category = ?ErrorCategory::Detail,
                        "Error extracting business info for {:?}: {}",
                        place.place_id,
                        e
                    );
                }
            }
        }

        page.next_page_token
    }

    /// `Ok(None)` when the place has no id or lacks a name or phone.
    pub async fn extract_info(&self, place: &RawPlace) -> Result<Option<BusinessRecord>> {
        let Some(place_id) = place.place_id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let detail = self.api.place_detail(place_id, &DETAIL_FIELDS).await?;
        Ok(detail.into_record())
    }

    /// Writes `records` as an indented JSON array, replacing any existing file.
    pub async fn save(&self, records: &[BusinessRecord], path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        self.storage.write_file(path, json.as_bytes()).await?;
        tracing::debug!("Wrote {} businesses to {}", records.len(), path);
        Ok(())
    }
}
