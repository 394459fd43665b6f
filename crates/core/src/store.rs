use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::quote::{QuotationId, QuotationRecord};
use crate::errors::PersistenceError;
use crate::ids::MAX_RECORD_ID;

/// Storage key holding the whole quotation list.
pub const QUOTATIONS_KEY: &str = "quotations";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded: {needed} bytes requested, {quota} allowed")]
    QuotaExceeded { needed: u64, quota: u64 },
    #[error("storage io failure: {0}")]
    Io(String),
}

/// Durable string key-value storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuotationSummary {
    pub id: QuotationId,
    pub company: String,
    pub created_on: NaiveDate,
    pub total: Decimal,
}

/// Saved quotations, newest first. Every change rewrites the whole list.
pub struct QuotationStore {
    records: Vec<QuotationRecord>,
    storage: Arc<dyn KeyValueStorage>,
}

impl fmt::Debug for QuotationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuotationStore").field("records", &self.records.len()).finish()
    }
}

impl QuotationStore {
    pub fn empty(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { records: Vec::new(), storage }
    }

    /// Reads the stored list. Missing, unreadable or inconsistent data yields an empty store.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let records = match storage.get(QUOTATIONS_KEY) {
            Ok(Some(raw)) => decode_records(&raw).unwrap_or_else(|reason| {
                warn!(
                    event_name = "quote.store.discarded",
                    reason = %reason,
                    "stored quotations are corrupted; starting with an empty list"
                );
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(
                    event_name = "quote.store.unreadable",
                    error = %error,
                    "stored quotations could not be read; starting with an empty list"
                );
                Vec::new()
            }
        };

        info!(event_name = "quote.store.loaded", record_count = records.len(), "quotations loaded");
        Self { records, storage }
    }

    /// Puts `record` first and rewrites storage. On a write failure the record stays listed.
    pub fn append(&mut self, record: QuotationRecord) -> Result<(), PersistenceError> {
        self.records.insert(0, record);
        self.persist()
    }

    pub fn persist(&self) -> Result<(), PersistenceError> {
        let payload = serde_json::to_string(&self.records)
            .map_err(|error| PersistenceError::Serialize(error.to_string()))?;

        match self.storage.set(QUOTATIONS_KEY, &payload) {
            Ok(()) => {
                info!(
                    event_name = "quote.store.persisted",
                    record_count = self.records.len(),
                    bytes = payload.len(),
                    "quotations persisted"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    event_name = "quote.store.persist_failed",
                    record_count = self.records.len(),
                    error = %error,
                    "quotations could not be persisted"
                );
                Err(error.into())
            }
        }
    }

    pub fn find_by_id(&self, id: QuotationId) -> Option<&QuotationRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn records(&self) -> &[QuotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest_id(&self) -> Option<QuotationId> {
        self.records.iter().map(QuotationRecord::id).max()
    }

    pub fn summaries(&self) -> Vec<QuotationSummary> {
        self.records
            .iter()
            .map(|record| QuotationSummary {
                id: record.id(),
                company: record
                    .client()
                    .company
                    .clone()
                    .unwrap_or_else(|| "No company".to_string()),
                created_on: record.created_at().date_naive(),
                total: record.total(),
            })
            .collect()
    }
}

fn decode_records(raw: &str) -> Result<Vec<QuotationRecord>, String> {
    let records =
        serde_json::from_str::<Vec<QuotationRecord>>(raw).map_err(|error| error.to_string())?;

    let mut seen = HashSet::new();
    for record in &records {
        let id = record.id();
        if !(1..=MAX_RECORD_ID).contains(&id.0) {
            return Err(format!("quotation id {id} is out of range"));
        }
        if !seen.insert(id) {
            return Err(format!("quotation id {id} appears twice"));
        }
        if !record.reconciles() {
            return Err(format!("quotation {id} totals do not match its items"));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::domain::cart::Cart;
    use crate::domain::client::ClientProfile;
    use crate::domain::quote::{create_record, QuotationId, QuotationRecord};
    use crate::domain::service::{Service, ServiceId};
    use crate::errors::PersistenceError;

    use super::{KeyValueStorage, QuotationStore, StorageError, QUOTATIONS_KEY};

    #[derive(Default)]
    struct MapStorage {
        values: Mutex<HashMap<String, String>>,
        reject_writes: bool,
    }

    impl MapStorage {
        fn rejecting() -> Self {
            Self { reject_writes: true, ..Self::default() }
        }

        fn with_value(value: &str) -> Self {
            let storage = Self::default();
            storage
                .values
                .lock()
                .expect("lock")
                .insert(QUOTATIONS_KEY.to_string(), value.to_string());
            storage
        }
    }

    impl KeyValueStorage for MapStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.lock().expect("lock").get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.reject_writes {
                return Err(StorageError::QuotaExceeded { needed: value.len() as u64, quota: 0 });
            }
            self.values.lock().expect("lock").insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn record(id: i64, company: Option<&str>) -> QuotationRecord {
        let mut cart = Cart::new();
        cart.add(&Service {
            id: ServiceId(1),
            name: "Audit".to_string(),
            category: "ISO 9001".to_string(),
            price: Decimal::new(10_000, 2),
            description: Some("Stage 1 audit".to_string()),
        });
        let mut client = ClientProfile::new("Ana", "ana@b.com").with_observations("priority");
        if let Some(company) = company {
            client = client.with_company(company);
        }
        let created_at = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).single().expect("valid date")
            + Duration::milliseconds(id);
        create_record(&client, &cart, QuotationId(id), created_at).expect("record")
    }

    #[test]
    fn append_puts_newest_first_and_persist_round_trips() {
        let storage = Arc::new(MapStorage::default());
        let mut store = QuotationStore::load(storage.clone());
        store.append(record(1, Some("Acme"))).expect("first append");
        store.append(record(2, None)).expect("second append");

        let reloaded = QuotationStore::load(storage);

        assert_eq!(reloaded.records(), store.records());
        assert_eq!(reloaded.records()[0].id(), QuotationId(2));
        assert_eq!(reloaded.latest_id(), Some(QuotationId(2)));
    }

    #[test]
    fn missing_data_loads_as_empty_store() {
        let store = QuotationStore::load(Arc::new(MapStorage::default()));

        assert!(store.is_empty());
    }

    #[test]
    fn malformed_data_degrades_to_empty_store() {
        let store = QuotationStore::load(Arc::new(MapStorage::with_value("{not json")));

        assert!(store.is_empty());
    }

    #[test]
    fn records_with_tampered_totals_are_treated_as_corrupted() {
        let mut payload =
            serde_json::to_value(vec![record(1, Some("Acme"))]).expect("serialize record");
        payload[0]["total"] = serde_json::Value::String("1.00".to_string());

        let store = QuotationStore::load(Arc::new(MapStorage::with_value(&payload.to_string())));

        assert!(store.is_empty());
    }

    #[test]
    fn failed_write_keeps_record_in_memory() {
        let mut store = QuotationStore::load(Arc::new(MapStorage::rejecting()));

        let error = store.append(record(1, None)).expect_err("write should fail");

        assert!(matches!(error, PersistenceError::Storage(StorageError::QuotaExceeded { .. })));
        assert_eq!(store.len(), 1);
        assert!(store.find_by_id(QuotationId(1)).is_some());
    }

    #[test]
    fn summaries_fall_back_to_placeholder_company() {
        let storage = Arc::new(MapStorage::default());
        let mut store = QuotationStore::empty(storage);
        store.append(record(1, Some("Acme"))).expect("append");
        store.append(record(2, None)).expect("append");

        let summaries = store.summaries();

        assert_eq!(summaries[0].company, "No company");
        assert_eq!(summaries[1].company, "Acme");
        assert_eq!(summaries[1].total, Decimal::new(12_100, 2));
    }

    #[test]
    fn find_by_id_misses_unknown_records() {
        let mut store = QuotationStore::empty(Arc::new(MapStorage::default()));
        store.append(record(1, None)).expect("append");

        assert!(store.find_by_id(QuotationId(99)).is_none());
    }

    #[test]
    fn out_of_range_ids_are_treated_as_corrupted() {
        for id in [i64::MAX, 0, -5] {
            let mut payload =
                serde_json::to_value(vec![record(1, None)]).expect("serialize record");
            payload[0]["id"] = serde_json::Value::from(id);

            let store =
                QuotationStore::load(Arc::new(MapStorage::with_value(&payload.to_string())));

            assert!(store.is_empty(), "id {id} should be rejected");
            assert_eq!(store.latest_id(), None);
        }
    }

    #[test]
    fn duplicate_ids_are_treated_as_corrupted() {
        let payload =
            serde_json::to_string(&vec![record(3, None), record(3, Some("Acme"))]).expect("json");

        let store = QuotationStore::load(Arc::new(MapStorage::with_value(&payload)));

        assert!(store.is_empty());
    }
}
