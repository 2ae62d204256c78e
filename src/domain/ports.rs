use crate::domain::model::{NearbyPage, PlaceDetail, SearchRegion};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Fields requested for every detail lookup.
pub const DETAIL_FIELDS: [&str; 3] = [
    "name",
    "formatted_phone_number",
    "international_phone_number",
];

/// Remote places service. Implementations only translate; retry and skip
/// policy belongs to the caller.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn nearby_search(
        &self,
        region: &SearchRegion,
        keyword: &str,
        place_type: &str,
    ) -> Result<NearbyPage>;

    /// Continuation request. The API accepts no other parameters here.
    async fn next_page(&self, page_token: &str) -> Result<NearbyPage>;

    async fn place_detail(&self, place_id: &str, fields: &[&str]) -> Result<PlaceDetail>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn region(&self) -> SearchRegion;
    fn queries(&self) -> &[String];
    fn max_results(&self) -> usize;
    fn place_type(&self) -> &str;
    fn page_delay(&self) -> Duration;
    fn output_path(&self) -> &str;
}
