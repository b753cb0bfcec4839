pub mod dynamo;
pub mod memory;
pub mod record;

pub use dynamo::DynamoStore;
pub use memory::InMemoryStore;
pub use record::CaseRecord;

use async_trait::async_trait;
use thiserror::Error;

/// Attribute the country search filters on.
pub const COUNTRY_ATTRIBUTE: &str = "Country_Region";

/// Result of a full table scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Item count as reported by the store, if it reported one.
    pub count: Option<i64>,
    pub records: Vec<CaseRecord>,
}

/// Failure talking to the backing store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an error.
    #[error("scan failed: {0}")]
    Scan(String),

    /// An item could not be turned into a [`CaseRecord`].
    #[error("failed to decode item: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read-only scan surface of the case table.
///
/// Implementations are built once at startup and shared across requests.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Read every item in the table.
    async fn scan(&self) -> Result<ScanOutcome>;

    /// Read the items whose country attribute contains `substring`.
    /// Matching is case-sensitive.
    async fn scan_filtered(&self, substring: &str) -> Result<Vec<CaseRecord>>;
}
