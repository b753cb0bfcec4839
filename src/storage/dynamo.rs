//! DynamoDB-backed case store.
//!
//! The client is built once from the store configuration and cloned into
//! every request; the SDK pools connections underneath.

use super::{COUNTRY_ATTRIBUTE, CaseRecord, CaseStore, Result, ScanOutcome, StoreError};
use crate::config::StoreConfig;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    Client,
    config::{retry::RetryConfig, timeout::TimeoutConfig},
    error::{DisplayErrorContext, SdkError},
    types::AttributeValue,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

type Item = HashMap<String, AttributeValue>;

/// Placeholder bound to the search value in the filter expression.
const COUNTRY_VALUE: &str = ":country";

#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the ambient AWS credentials and the store settings.
    pub async fn connect(config: &StoreConfig) -> Self {
        info!(
            region = %config.region,
            table = %config.table_name,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "Connecting to DynamoDB"
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared)
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(config.operation_timeout_secs))
                    .build(),
            );
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Client::from_conf(builder.build()), config.table_name.clone())
    }
}

#[async_trait]
impl CaseStore for DynamoStore {
    async fn scan(&self) -> Result<ScanOutcome> {
        let mut count = 0i64;
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(store_error)?;

            count += i64::from(page.count());
            records.extend(decode_items(page.items())?);
            debug!(page_count = page.count(), total = count, "Scanned page");

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        info!(table = %self.table_name, count, "Full scan complete");
        Ok(ScanOutcome {
            count: Some(count),
            records,
        })
    }

    async fn scan_filtered(&self, substring: &str) -> Result<Vec<CaseRecord>> {
        let expression = CountryFilter::new(substring);
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(&expression.filter)
                .projection_expression(&expression.projection)
                .set_expression_attribute_names(Some(expression.names.clone()))
                .set_expression_attribute_values(Some(expression.values.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(store_error)?;

            records.extend(decode_items(page.items())?);

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        info!(table = %self.table_name, country = substring, matches = records.len(), "Filtered scan complete");
        Ok(records)
    }
}

/// Filter and projection for "country contains substring".
///
/// Every attribute goes through a `#aN` name placeholder so reserved words
/// in the dataset's column names never reach the expression parser.
#[derive(Debug, Clone)]
struct CountryFilter {
    filter: String,
    projection: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl CountryFilter {
    fn new(substring: &str) -> Self {
        let mut names = HashMap::new();
        let mut placeholders = Vec::with_capacity(CaseRecord::ATTRIBUTES.len());
        let mut country = String::new();

        for (i, attribute) in CaseRecord::ATTRIBUTES.iter().enumerate() {
            let placeholder = format!("#a{i}");
            if *attribute == COUNTRY_ATTRIBUTE {
                country = placeholder.clone();
            }
            names.insert(placeholder.clone(), (*attribute).to_string());
            placeholders.push(placeholder);
        }

        Self {
            filter: format!("contains({country}, {COUNTRY_VALUE})"),
            projection: placeholders.join(", "),
            names,
            values: HashMap::from([(
                COUNTRY_VALUE.to_string(),
                AttributeValue::S(substring.to_string()),
            )]),
        }
    }
}

fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => StoreError::Unavailable(message),
        _ => StoreError::Scan(message),
    }
}

fn decode_items(items: &[Item]) -> Result<Vec<CaseRecord>> {
    items.iter().map(decode_item).collect()
}

/// Strings and numbers are both kept as text, `NULL` reads as absent,
/// unknown attributes are skipped.
fn decode_item(item: &Item) -> Result<CaseRecord> {
    let mut record = CaseRecord::default();
    for (name, value) in item {
        let Some(slot) = record.field_mut(name) else {
            continue;
        };
        *slot = match value {
            AttributeValue::S(text) | AttributeValue::N(text) => Some(text.clone()),
            AttributeValue::Null(_) => None,
            other => {
                return Err(StoreError::Decode(format!(
                    "attribute {name} holds {}, expected text",
                    kind(other)
                )));
            }
        };
    }
    Ok(record)
}

fn kind(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::B(_) => "binary",
        AttributeValue::Bool(_) => "a boolean",
        AttributeValue::L(_) => "a list",
        AttributeValue::M(_) => "a map",
        AttributeValue::Ss(_) | AttributeValue::Ns(_) | AttributeValue::Bs(_) => "a set",
        _ => "an unknown type",
    }
}
