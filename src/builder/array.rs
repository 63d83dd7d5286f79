//! Array schema

use serde_json::Value;

use super::{constraint, type_mismatch, Common, Schema};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct ArraySchema {
    pub(crate) common: Common,
    of: Option<Box<Schema>>,
    min: Option<usize>,
    max: Option<usize>,
    length: Option<usize>,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element schema; without one, elements are unconstrained
    pub fn of(mut self, item: Schema) -> Self {
        self.of = Some(Box::new(item));
        self
    }

    /// Minimum number of items
    pub fn min(mut self, limit: usize) -> Self {
        self.min = Some(limit);
        self
    }

    /// Maximum number of items
    pub fn max(mut self, limit: usize) -> Self {
        self.max = Some(limit);
        self
    }

    /// Exact number of items
    pub fn length(mut self, limit: usize) -> Self {
        self.length = Some(limit);
        self
    }

    pub(crate) fn check(&self, value: &Value, label: &str) -> Result<Value, ValidationError> {
        let items = value
            .as_array()
            .ok_or_else(|| type_mismatch(label, "an array"))?;

        if let Some(limit) = self.min {
            if items.len() < limit {
                return Err(constraint(label, format!("must have at least {} items", limit)));
            }
        }
        if let Some(limit) = self.max {
            if items.len() > limit {
                return Err(constraint(label, format!("must have at most {} items", limit)));
            }
        }
        if let Some(limit) = self.length {
            if items.len() != limit {
                return Err(constraint(label, format!("must have exactly {} items", limit)));
            }
        }

        let resolved = match &self.of {
            Some(item_schema) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let resolved_item = item_schema
                        .validate(Some(item))
                        .map_err(|e| e.in_field(index.to_string()))?;
                    out.push(resolved_item.unwrap_or(Value::Null));
                }
                Value::Array(out)
            }
            None => value.clone(),
        };

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{number, string};
    use serde_json::json;

    #[test]
    fn test_minimal_schema_accepts_any_array() {
        let schema = Schema::from(ArraySchema::new());
        assert!(schema.is_valid(&json!([])));
        assert!(schema.is_valid(&json!([1, "two", null])));
        assert!(!schema.is_valid(&json!({})));
    }

    #[test]
    fn test_item_schema_applies_per_element() {
        let schema = Schema::from(ArraySchema::new().of(string().into()));
        assert!(schema.is_valid(&json!(["a", "b"])));
        assert!(!schema.is_valid(&json!(["a", 2])));
    }

    #[test]
    fn test_item_failure_names_the_index() {
        let schema = Schema::from(ArraySchema::new().of(number().into()));
        let err = schema.validate(Some(&json!([1, "x"]))).unwrap_err();
        assert!(err.to_string().contains("\"1\""));
    }

    #[test]
    fn test_count_bounds() {
        let schema = Schema::from(ArraySchema::new().min(1).max(3));
        assert!(!schema.is_valid(&json!([])));
        assert!(schema.is_valid(&json!([1])));
        assert!(!schema.is_valid(&json!([1, 2, 3, 4])));

        let exact = Schema::from(ArraySchema::new().length(2));
        assert!(exact.is_valid(&json!([1, 2])));
        assert!(!exact.is_valid(&json!([1])));
    }
}
