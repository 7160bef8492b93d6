use crate::errors::StorageError;
use crate::spi::health::HealthProbe;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-process JSON record store. Records per table keep insertion order,
/// which downstream pagination relies on for stable tie-breaking.
#[derive(Clone, Default)]
pub struct MemoryDatastore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    records: RwLock<HashMap<String, Vec<Record>>>,
}

#[derive(Clone, Debug)]
struct Record {
    id: String,
    value: serde_json::Value,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, table: &str, id: &str, value: serde_json::Value) {
        let mut map = self.inner.records.write();
        let rows = map.entry(table.to_string()).or_default();
        match rows.iter_mut().find(|r| r.id == id) {
            Some(existing) => existing.value = value,
            None => rows.push(Record {
                id: id.to_string(),
                value,
            }),
        }
    }

    pub fn fetch(&self, table: &str, id: &str) -> Option<serde_json::Value> {
        self.inner
            .records
            .read()
            .get(table)
            .and_then(|rows| rows.iter().find(|r| r.id == id))
            .map(|r| r.value.clone())
    }

    pub fn remove(&self, table: &str, id: &str) -> Option<serde_json::Value> {
        let mut map = self.inner.records.write();
        let rows = map.get_mut(table)?;
        let pos = rows.iter().position(|r| r.id == id)?;
        Some(rows.remove(pos).value)
    }

    /// Records in insertion order.
    pub fn list(&self, table: &str) -> Vec<serde_json::Value> {
        self.inner
            .records
            .read()
            .get(table)
            .map(|rows| rows.iter().map(|r| r.value.clone()).collect())
            .unwrap_or_default()
    }

    /// Removes a parent record and every child whose `fk_field` references
    /// it, under a single write guard so the pair is one atomic unit.
    pub fn remove_cascade(
        &self,
        parent_table: &str,
        parent_id: &str,
        child_table: &str,
        fk_field: &str,
    ) -> bool {
        let mut map = self.inner.records.write();
        let removed = match map.get_mut(parent_table) {
            Some(rows) => match rows.iter().position(|r| r.id == parent_id) {
                Some(pos) => {
                    rows.remove(pos);
                    true
                }
                None => return false,
            },
            None => return false,
        };
        if let Some(children) = map.get_mut(child_table) {
            children.retain(|r| {
                r.value
                    .get(fk_field)
                    .and_then(|v| v.as_str())
                    .map(|fk| fk != parent_id)
                    .unwrap_or(true)
            });
        }
        removed
    }
}

#[async_trait]
impl HealthProbe for MemoryDatastore {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
