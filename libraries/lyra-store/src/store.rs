//! Document store contract
//!
//! Abstracts the hosted document database behind an async trait so that
//! read-models and tests run against the same surface. Implementations map
//! these calls onto whatever backend hosts the `songs`, `playlists`, and
//! `users` collections.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

/// A raw document: its id plus undecoded JSON fields
///
/// Decoding into domain types goes through `lyra_core::normalize` so field
/// handling lives in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id within its collection
    pub id: String,
    /// Raw field data
    pub data: Value,
}

impl Document {
    /// Create a document
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Field-level update verb
///
/// Mirrors the verbs the hosted store supports natively so updates stay
/// single round-trips instead of read-modify-write cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldOp {
    /// Overwrite the field
    Set(Value),
    /// Add to a numeric field (missing or non-numeric counts as 0)
    Increment(i64),
    /// Append to an array field unless the value is already present
    ArrayUnion(Value),
    /// Remove all occurrences of the value from an array field
    ArrayRemove(Value),
    /// Set the field to the store's current time
    ServerTimestamp,
}

/// A named field update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Field name
    pub field: String,
    /// Update verb
    pub op: FieldOp,
}

impl FieldUpdate {
    /// Create a field update
    pub fn new(field: impl Into<String>, op: FieldOp) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }
}

/// Query filter predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Field equals value
    Eq(String, Value),
    /// Array field contains value
    ArrayContains(String, Value),
    /// Document id is one of the given ids
    IdIn(Vec<String>),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// A collection query: filters, optional ordering, optional limit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Filter predicates (conjunctive)
    pub filters: Vec<Filter>,
    /// Ordering field and direction
    pub order_by: Option<(String, Direction)>,
    /// Maximum number of documents to return
    pub limit: Option<usize>,
}

impl Query {
    /// Query returning every document in a collection
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a filter
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Set the result limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Live subscription to a single document
///
/// Wraps a watch channel: the current value is available immediately and
/// changes arrive as the store applies writes. Dropping the watch
/// unsubscribes.
#[derive(Debug)]
pub struct DocumentWatch {
    rx: watch::Receiver<Option<Value>>,
}

impl DocumentWatch {
    /// Create a watch from a receiver (used by store implementations)
    pub fn new(rx: watch::Receiver<Option<Value>>) -> Self {
        Self { rx }
    }

    /// Current document data (`None` when the document does not exist)
    pub fn current(&self) -> Option<Value> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change and return the new data
    ///
    /// Returns `None` when the store side has shut down.
    pub async fn changed(&mut self) -> Option<Option<Value>> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow().clone()),
            Err(_) => None,
        }
    }
}

/// Generic document store API
///
/// The client treats the hosted database as collections of JSON documents
/// with field-level update verbs and per-document live subscriptions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Run a query against a collection
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// Apply field updates to an existing document
    ///
    /// Updating a missing document is an error.
    async fn update(&self, collection: &str, id: &str, updates: Vec<FieldUpdate>) -> Result<()>;

    /// Delete a document (deleting a missing document is a no-op)
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Subscribe to live changes of a single document
    async fn watch(&self, collection: &str, id: &str) -> Result<DocumentWatch>;
}
