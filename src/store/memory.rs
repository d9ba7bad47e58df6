use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Backend, Result};
use crate::types::{ConsentRecord, Employee};

/// In-process consent store.
///
/// Records live as long as the process does. Useful for local runs and
/// tests where a Postgres server is not around.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ConsentRecord>>,
}

#[async_trait]
impl Backend for MemoryStore {
    async fn get(&self, phone_no: &str) -> Result<Option<ConsentRecord>> {
        Ok(self.records.read().await.get(phone_no).cloned())
    }

    async fn insert(&self, record: &ConsentRecord) -> Result<bool> {
        let mut records = self.records.write().await;
        match records.entry(record.phone_no().to_owned()) {
            Entry::Occupied(..) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(record.clone());
                Ok(true)
            }
        }
    }

    async fn put(&self, record: &ConsentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.phone_no().to_owned(), record.clone());
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<bool> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.get_mut(&employee.phone_no) {
            existing.employee = employee.clone();
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
