//! Object schema

use indexmap::IndexMap;
use serde_json::Value;

use super::{type_mismatch, Common, Schema};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub(crate) common: Common,
    shape: IndexMap<String, Schema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyed field schemas, validated in declaration order. Input keys
    /// outside the shape pass through untouched.
    pub fn shape(mut self, shape: IndexMap<String, Schema>) -> Self {
        self.shape = shape;
        self
    }

    /// Add a single field schema
    pub fn field(mut self, key: impl Into<String>, schema: Schema) -> Self {
        self.shape.insert(key.into(), schema);
        self
    }

    pub fn fields(&self) -> &IndexMap<String, Schema> {
        &self.shape
    }

    pub(crate) fn check(&self, value: &Value, label: &str) -> Result<Value, ValidationError> {
        let map = value
            .as_object()
            .ok_or_else(|| type_mismatch(label, "an object"))?;

        let mut out = map.clone();
        for (key, field_schema) in &self.shape {
            let resolved = field_schema
                .validate(map.get(key))
                .map_err(|e| e.in_field(key.clone()))?;
            if let Some(v) = resolved {
                out.insert(key.clone(), v);
            }
        }

        Ok(Value::Object(out))
    }
}
