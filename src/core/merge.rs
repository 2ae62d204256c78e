use crate::core::{BusinessRecord, Storage};
use crate::utils::error::Result;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub unique: Vec<BusinessRecord>,
    pub duplicates: Vec<BusinessRecord>,
}

/// Looser than the in-run key: names compare trimmed and lowercased, phones
/// trimmed.
pub fn merge_key(record: &BusinessRecord) -> String {
    format!(
        "{}|{}",
        record.name.trim().to_lowercase(),
        record.phone.trim()
    )
}

/// Concatenates datasets in order; the first occurrence of a key wins.
pub fn merge_records<I>(datasets: I) -> MergeReport
where
    I: IntoIterator<Item = Vec<BusinessRecord>>,
{
    let mut seen = HashSet::new();
    let mut report = MergeReport::default();

    for record in datasets.into_iter().flatten() {
        if seen.insert(merge_key(&record)) {
            report.unique.push(record);
        } else {
            report.duplicates.push(record);
        }
    }

    report
}

/// Blank term matches everything. Both fields are matched against the
/// lowercased term.
pub fn find_records<'a>(records: &'a [BusinessRecord], term: &str) -> Vec<&'a BusinessRecord> {
    if term.trim().is_empty() {
        return records.iter().collect();
    }

    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle) || r.phone.contains(&needle))
        .collect()
}

pub async fn load_records<S: Storage>(storage: &S, path: &str) -> Result<Vec<BusinessRecord>> {
    let data = storage.read_file(path).await?;
    let records: Vec<BusinessRecord> = serde_json::from_slice(&data)?;
    tracing::debug!("Loaded {} records from {}", records.len(), path);
    Ok(records)
}

pub async fn save_records<S: Storage>(
    storage: &S,
    records: &[BusinessRecord],
    path: &str,
) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    storage.write_file(path, json.as_bytes()).await
}
