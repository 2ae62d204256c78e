use crate::domain::model::{NearbyPage, PlaceDetail, RawPlace, SearchRegion};
use crate::domain::ports::PlacesApi;
use crate::utils::error::{CollectorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<RawPlace>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: PlaceDetail,
}

/// HTTP client for the Places web service (nearby search + details).
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {} ({} params)", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}

/// `OK` and `ZERO_RESULTS` are successes; everything else is surfaced.
fn check_status(status: &str, error_message: Option<String>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(CollectorError::ApiStatus {
            status: other.to_string(),
            message: error_message.unwrap_or_default(),
        }),
    }
}

impl NearbySearchResponse {
    fn into_page(self) -> Result<NearbyPage> {
        check_status(&self.status, self.error_message)?;
        Ok(NearbyPage {
            results: self.results,
            next_page_token: self.next_page_token.filter(|token| !token.is_empty()),
        })
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn nearby_search(
        &self,
        region: &SearchRegion,
        keyword: &str,
        place_type: &str,
    ) -> Result<NearbyPage> {
        let location = region.location_param();
        let radius = region.radius_meters.to_string();
        let response: NearbySearchResponse = self
            .get_json(
                "nearbysearch/json",
                &[
                    ("location", location.as_str()),
                    ("radius", radius.as_str()),
                    ("keyword", keyword),
                    ("type", place_type),
                ],
            )
            .await?;

        response.into_page()
    }

    async fn next_page(&self, page_token: &str) -> Result<NearbyPage> {
        let response: NearbySearchResponse = self
            .get_json("nearbysearch/json", &[("pagetoken", page_token)])
            .await?;

        response.into_page()
    }

    async fn place_detail(&self, place_id: &str, fields: &[&str]) -> Result<PlaceDetail> {
        let fields = fields.join(",");
        let response: PlaceDetailResponse = self
            .get_json(
                "details/json",
                &[("place_id", place_id), ("fields", fields.as_str())],
            )
            .await?;

        check_status(&response.status, response.error_message)?;
        Ok(response.result)
    }
}
