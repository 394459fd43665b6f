use std::collections::HashMap;
use std::sync::Mutex;

use quotekit_core::{KeyValueStorage, StorageError};

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl InMemoryStorage {
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = match self.values.lock() {
            Ok(values) => values,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = match self.values.lock() {
            Ok(values) => values,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(quota) = self.quota_bytes {
            let others: u64 = values
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| (existing.len() + stored.len()) as u64)
                .sum();
            let needed = others + (key.len() + value.len()) as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quotekit_core::{KeyValueStorage, StorageError};

    use super::InMemoryStorage;

    #[test]
    fn in_memory_storage_round_trip() {
        let storage = InMemoryStorage::default();

        storage.set("quotations", "[]").expect("set value");

        assert_eq!(storage.get("quotations").expect("get value"), Some("[]".to_string()));
        assert_eq!(storage.get("other").expect("get value"), None);
    }

    #[test]
    fn quota_counts_every_key_but_the_one_being_replaced() {
        let storage = InMemoryStorage::default().with_quota(Some(20));
        storage.set("a", "123456789").expect("fits");
        storage.set("a", "1234567890123").expect("replacement fits");

        let error = storage.set("b", "123456").expect_err("over quota");

        assert_eq!(error, StorageError::QuotaExceeded { needed: 21, quota: 20 });
        assert_eq!(storage.get("b").expect("get value"), None);
    }
}
