//! Generic schema
//!
//! Accepts any non-null value; carries only the shared constraint set. This
//! is the base for alternatives/union nodes, whose candidate schemas attach
//! as a named test.

use serde_json::Value;

use super::Common;
use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct MixedSchema {
    pub(crate) common: Common,
}

impl MixedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn check(&self, value: &Value, _label: &str) -> Result<Value, ValidationError> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Schema;
    use serde_json::json;

    #[test]
    fn test_accepts_every_shape_except_bare_null() {
        let schema = Schema::from(MixedSchema::new());
        assert!(schema.is_valid(&json!("s")));
        assert!(schema.is_valid(&json!(1)));
        assert!(schema.is_valid(&json!([1, 2])));
        assert!(schema.is_valid(&json!({ "k": true })));
        assert!(!schema.is_valid(&json!(null)));

        let nullable = Schema::from(MixedSchema::new()).nullable();
        assert!(nullable.is_valid(&json!(null)));
    }
}
