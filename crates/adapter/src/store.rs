//! Document store contract
//!
//! The store holds one JSON document per match and supports create, point read, partial
//! dotted-path updates, equality queries and snapshot push. A partial update may carry a
//! single-field equality precondition; the store checks it and applies every field of the
//! update in one atomic step, or rejects the whole update.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(String),
    #[error("precondition on {field} failed: expected {expected}, found {actual}")]
    PreconditionFailed {
        field: String,
        expected: Value,
        actual: Value,
    },
    #[error("invalid field path {0:?}")]
    InvalidPath(String),
    #[error("store unavailable")]
    Unavailable,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// The write lost a compare-and-set race
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, StoreError::PreconditionFailed { .. })
    }
}

/// Equality guard on one dotted field path
#[derive(Debug, Clone, PartialEq)]
pub struct Precondition {
    pub field: String,
    pub equals: Value,
}

impl Precondition {
    pub fn new(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its id
    async fn create(&self, data: Value) -> Result<String, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Value>, StoreError>;

    /// Write `fields` (dotted path -> value) if `precondition` holds
    async fn update(
        &self,
        id: &str,
        fields: Map<String, Value>,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError>;

    /// Documents whose `field` equals `value`, oldest first, at most `limit`
    async fn query_eq(
        &self,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Full-document snapshots pushed after every committed write
    async fn subscribe(&self, id: &str) -> Result<broadcast::Receiver<Value>, StoreError>;
}

/// Read a dotted path out of a JSON document
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |node, key| node.get(key))
}

/// Write a dotted path into a JSON document, creating intermediate objects
pub fn assign(doc: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let mut keys = path.split('.').peekable();
    let mut node = doc;
    while let Some(key) = keys.next() {
        if key.is_empty() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        let object = match node {
            Value::Object(object) => object,
            _ => return Err(StoreError::InvalidPath(path.to_string())),
        };
        if keys.peek().is_none() {
            object.insert(key.to_string(), value);
            return Ok(());
        }
        node = object
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Err(StoreError::InvalidPath(path.to_string()))
}
