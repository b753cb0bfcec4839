use super::{CaseRecord, CaseStore, Result, ScanOutcome, StoreError};
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Case table held in memory.
///
/// Backs local development (seeded from a JSON file) and the test suite.
/// A store built with [`InMemoryStore::failing`] answers every call with the
/// given error.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<CaseRecord>,
    failure: Option<StoreError>,
}

impl InMemoryStore {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(error),
        }
    }

    /// Load records from a JSON array file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
        let records: Vec<CaseRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;
        info!(records = records.len(), path = %path.display(), "Loaded seed records");
        Ok(Self::new(records))
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CaseStore for InMemoryStore {
    async fn scan(&self) -> Result<ScanOutcome> {
        self.check()?;
        Ok(ScanOutcome {
            count: Some(self.records.len() as i64),
            records: self.records.clone(),
        })
    }

    async fn scan_filtered(&self, substring: &str) -> Result<Vec<CaseRecord>> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .filter(|record| {
                record
                    .country_region
                    .as_deref()
                    .is_some_and(|country| country.contains(substring))
            })
            .cloned()
            .collect())
    }
}
