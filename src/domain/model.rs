use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Value the lookup falls back to when a field cannot be resolved.
pub const UNRESOLVED: &str = "N/A";

/// Circular search area around a fixed origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: u32,
}

impl SearchRegion {
    pub const fn new(latitude: f64, longitude: f64, radius_meters: u32) -> Self {
        Self {
            latitude,
            longitude,
            radius_meters,
        }
    }

    /// `lat,lng` as the nearby-search `location` parameter expects it.
    pub fn location_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl Default for SearchRegion {
    fn default() -> Self {
        // Miami, 50km
        Self::new(25.7617, -80.1918, 50_000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(rename = "business_name")]
    pub name: String,
    #[serde(rename = "phone_number")]
    pub phone: String,
}

impl BusinessRecord {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        is_resolved(&self.name) && is_resolved(&self.phone)
    }

    /// Exact, case-sensitive identity within a single run.
    pub fn dedup_key(&self) -> String {
        format!("{}_{}", self.name, self.phone)
    }
}

pub(crate) fn is_resolved(value: &str) -> bool {
    !value.is_empty() && value != UNRESOLVED
}

/// Append-only, insertion-ordered accumulator deduplicated on
/// [`BusinessRecord::dedup_key`].
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    records: Vec<BusinessRecord>,
    seen: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the record was already present.
    pub fn insert(&mut self, record: BusinessRecord) -> bool {
        if !self.seen.insert(record.dedup_key()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BusinessRecord> {
        self.records.iter()
    }

    /// Keeps at most `max` records. Dropped keys stay marked as seen.
    pub fn truncate(&mut self, max: usize) {
        self.records.truncate(max);
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BusinessRecord;
    type IntoIter = std::slice::Iter<'a, BusinessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One hit from a nearby search. Everything but the id is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyPage {
    pub results: Vec<RawPlace>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
}

impl PlaceDetail {
    /// Formatted number first, then international. Which one was used is not
    /// recorded.
    pub fn resolved_phone(&self) -> Option<&str> {
        [
            self.formatted_phone_number.as_deref(),
            self.international_phone_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|phone| !phone.is_empty())
    }

    pub fn into_record(self) -> Option<BusinessRecord> {
        let phone = self.resolved_phone()?.to_string();
        let name = self.name.filter(|name| is_resolved(name))?;
        let record = BusinessRecord { name, phone };
        record.is_valid().then_some(record)
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub queries_run: usize,
    pub queries_failed: usize,
    pub pages_failed: usize,
    pub details_failed: usize,
    pub places_skipped: usize,
    pub duplicates_dropped: usize,
}
