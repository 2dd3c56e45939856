//! In-memory document store
//!
//! Reference [`DocumentStore`] implementation backed by nested maps.
//! Used by the test suites and local development; the field-verb semantics
//! here are the contract other backends must match.

use crate::error::{Result, StoreError};
use crate::store::{
    Direction, Document, DocumentStore, DocumentWatch, FieldOp, FieldUpdate, Filter, Query,
};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::{watch, RwLock};

type Collection = HashMap<String, Value>;

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    watchers: RwLock<HashMap<(String, String), watch::Sender<Option<Value>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    async fn notify(&self, collection: &str, id: &str, data: Option<Value>) {
        let watchers = self.watchers.read().await;
        if let Some(tx) = watchers.get(&(collection.to_string(), id.to_string())) {
            // Receivers may all be gone; that just means nobody is looking.
            let _ = tx.send(data);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<Document> = docs
            .iter()
            .filter(|(id, data)| query.filters.iter().all(|f| matches_filter(id, data, f)))
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect();

        if let Some((field, direction)) = &query.order_by {
            matches.sort_by(|a, b| {
                let ord = compare_fields(a.data.get(field), b.data.get(field));
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        } else {
            // Deterministic order for tests
            matches.sort_by(|a, b| a.id.cmp(&b.id));
        }

        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), data.clone());
        }
        self.notify(collection, id, Some(data)).await;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, updates: Vec<FieldUpdate>) -> Result<()> {
        let updated = {
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::not_found(collection, id))?;

            let fields = doc
                .as_object_mut()
                .ok_or_else(|| StoreError::backend("document is not an object"))?;

            for update in updates {
                apply_field_op(fields, &update.field, update.op);
            }

            doc.clone()
        };
        self.notify(collection, id, Some(updated)).await;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
        };
        if removed.is_some() {
            self.notify(collection, id, None).await;
        }
        Ok(())
    }

    async fn watch(&self, collection: &str, id: &str) -> Result<DocumentWatch> {
        let current = self
            .get(collection, id)
            .await?
            .map(|doc| doc.data);

        let mut watchers = self.watchers.write().await;
        let tx = watchers
            .entry((collection.to_string(), id.to_string()))
            .or_insert_with(|| watch::channel(current.clone()).0);
        Ok(DocumentWatch::new(tx.subscribe()))
    }
}

fn matches_filter(id: &str, data: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, value) => data.get(field) == Some(value),
        Filter::ArrayContains(field, value) => data
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|items| items.contains(value)),
        Filter::IdIn(ids) => ids.iter().any(|candidate| candidate == id),
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn apply_field_op(fields: &mut Map<String, Value>, field: &str, op: FieldOp) {
    match op {
        FieldOp::Set(value) => {
            fields.insert(field.to_string(), value);
        }
        FieldOp::Increment(delta) => {
            let prior = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
            fields.insert(field.to_string(), json!(prior + delta));
        }
        FieldOp::ArrayUnion(value) => {
            let entry = fields
                .entry(field.to_string())
                .or_insert_with(|| json!([]));
            if let Some(items) = entry.as_array_mut() {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
        }
        FieldOp::ArrayRemove(value) => {
            if let Some(items) = fields.get_mut(field).and_then(Value::as_array_mut) {
                items.retain(|item| item != &value);
            }
        }
        FieldOp::ServerTimestamp => {
            let now = Utc::now();
            fields.insert(
                field.to_string(),
                json!({
                    "seconds": now.timestamp(),
                    "nanoseconds": now.timestamp_subsec_nanos(),
                }),
            );
        }
    }
}
