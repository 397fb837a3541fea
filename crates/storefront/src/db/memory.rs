//! In-process document store.
//!
//! Used for local runs with `STOREFRONT_STORE=memory` and by tests. Reads and
//! writes can be switched to fail to simulate an unreachable store.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Document, DocumentStore, RepositoryError};

type Collection = BTreeMap<String, Value>;

/// Read a counter, accepting whole numbers stored as floats.
#[allow(clippy::cast_possible_truncation)]
fn counter_value(value: Option<&Value>) -> i64 {
    value
        .and_then(|value| {
            value
                .as_i64()
                .or_else(|| value.as_f64().map(|count| count.trunc() as i64))
        })
        .unwrap_or(0)
}

/// Document store held in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError> {
        self.check_read()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str) -> Result<u64, RepositoryError> {
        self.check_read()?;
        let collections = self.collections.read().await;
        let count = collections.get(collection).map_or(0, BTreeMap::len);
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        self.check_read()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), RepositoryError> {
        self.check_write()?;
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn replace_all(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<(), RepositoryError> {
        self.check_write()?;
        let replacement: Collection = documents
            .into_iter()
            .map(|doc| (doc.id, doc.data))
            .collect();
        self.collections
            .write()
            .await
            .insert(collection.to_string(), replacement);
        Ok(())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<(), RepositoryError> {
        self.check_write()?;
        let mut collections = self.collections.write().await;
        let doc = collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !doc.is_object() {
            *doc = Value::Object(Map::new());
        }
        if let Some(fields) = doc.as_object_mut() {
            let current = counter_value(fields.get(field));
            fields.insert(field.to_string(), Value::from(current.saturating_add(by)));
        }
        Ok(())
    }

    async fn delete_all(&self, collection: &str) -> Result<u64, RepositoryError> {
        self.check_write()?;
        let removed = self
            .collections
            .write()
            .await
            .remove(collection)
            .map_or(0, |docs| docs.len());
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_read()
    }
}
