//! In-process document store
//!
//! Backs multiplayer tests and the headless demo. All writes go through one `RwLock`, which
//! serializes them and makes every precondition check plus field write a single atomic step.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::store::{assign, lookup, Document, DocumentStore, Precondition, StoreError};

const SNAPSHOT_BUFFER: usize = 64;

struct Entry {
    seq: u64,
    data: Value,
    tx: broadcast::Sender<Value>,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    docs: HashMap<String, Entry>,
}

/// Shared in-memory store; clones point at the same documents
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`StoreError::Unavailable`] until turned back on
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create(&self, data: Value) -> Result<String, StoreError> {
        self.check_online()?;
        let id = Uuid::new_v4().simple().to_string();
        let (tx, _) = broadcast::channel(SNAPSHOT_BUFFER);

        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.docs.insert(id.clone(), Entry { seq, data, tx });
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Value>, StoreError> {
        self.check_online()?;
        let inner = self.inner.read().await;
        Ok(inner.docs.get(id).map(|entry| entry.data.clone()))
    }

    async fn update(
        &self,
        id: &str,
        fields: Map<String, Value>,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        let entry = inner
            .docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(pre) = precondition {
            let actual = lookup(&entry.data, &pre.field)
                .cloned()
                .unwrap_or(Value::Null);
            if actual != pre.equals {
                return Err(StoreError::PreconditionFailed {
                    field: pre.field,
                    expected: pre.equals,
                    actual,
                });
            }
        }

        let mut next = entry.data.clone();
        for (path, value) in fields {
            assign(&mut next, &path, value)?;
        }
        entry.data = next;

        // No subscribers is fine.
        let _ = entry.tx.send(entry.data.clone());
        Ok(())
    }

    async fn query_eq(
        &self,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let inner = self.inner.read().await;
        let mut hits: Vec<(&String, &Entry)> = inner
            .docs
            .iter()
            .filter(|(_, entry)| lookup(&entry.data, field) == Some(value))
            .collect();
        hits.sort_by_key(|(_, entry)| entry.seq);

        Ok(hits
            .into_iter()
            .take(limit)
            .map(|(id, entry)| Document {
                id: id.clone(),
                data: entry.data.clone(),
            })
            .collect())
    }

    async fn subscribe(&self, id: &str) -> Result<broadcast::Receiver<Value>, StoreError> {
        self.check_online()?;
        let inner = self.inner.read().await;
        inner
            .docs
            .get(id)
            .map(|entry| entry.tx.subscribe())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
