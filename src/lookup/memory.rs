use super::{ModelInstance, ModelLookup};
use crate::error::{BindError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::any::type_name;
use std::sync::Arc;

type Decoder = Arc<dyn Fn(Value) -> Result<ModelInstance> + Send + Sync>;

struct Table {
    rows: Vec<Value>,
    decode: Decoder,
}

/// In-process model store.
///
/// Rows are kept as JSON documents per model type and decoded on lookup.
/// Useful for tests and for hosts that keep their models in memory.
///
/// # Example
/// ```rust,ignore
/// let lookup = MemoryLookup::new();
/// lookup.insert(&User { id: 1, email: "a@example.com".into() })?;
/// let binder = Binder::new(Arc::new(lookup));
/// ```
#[derive(Default)]
pub struct MemoryLookup {
    tables: DashMap<&'static str, Table>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `M` resolvable without adding rows.
    pub fn register<M>(&self) -> &Self
    where
        M: DeserializeOwned + Send + Sync + 'static,
    {
        self.tables.entry(type_name::<M>()).or_insert_with(|| Table {
            rows: Vec::new(),
            decode: Arc::new(|row| {
                serde_json::from_value::<M>(row)
                    .map(|model| Arc::new(model) as ModelInstance)
                    .map_err(|e| BindError::Database(e.to_string()))
            }),
        });
        self
    }

    /// Store a row, registering `M` on first use.
    ///
    /// # Errors
    /// Returns `Database` if the row does not serialize to a JSON document.
    pub fn insert<M>(&self, model: &M) -> Result<&Self>
    where
        M: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let row = serde_json::to_value(model).map_err(|e| BindError::Database(e.to_string()))?;
        self.register::<M>();
        if let Some(mut table) = self.tables.get_mut(type_name::<M>()) {
            table.rows.push(row);
        }
        Ok(self)
    }

    /// Number of rows stored for `M`.
    pub fn count<M: 'static>(&self) -> usize {
        self.tables
            .get(type_name::<M>())
            .map_or(0, |table| table.rows.len())
    }
}

fn cell_matches(cell: &Value, raw: &str) -> bool {
    match cell {
        Value::String(s) => s == raw,
        Value::Number(n) => n.to_string() == raw,
        Value::Bool(b) => b.to_string() == raw,
        _ => false,
    }
}

#[async_trait]
impl ModelLookup for MemoryLookup {
    fn resolves(&self, model: &str) -> bool {
        self.tables.contains_key(model)
    }

    async fn find_one_where(
        &self,
        model: &str,
        column: &str,
        value: &str,
    ) -> Result<ModelInstance> {
        let (row, decode) = {
            let table = self
                .tables
                .get(model)
                .ok_or_else(|| BindError::not_found(model, column, value))?;
            let row = table
                .rows
                .iter()
                .find(|row| row.get(column).is_some_and(|cell| cell_matches(cell, value)))
                .cloned();
            (row, Arc::clone(&table.decode))
        };

        match row {
            Some(row) => decode(row),
            None => Err(BindError::not_found(model, column, value)),
        }
    }
}
