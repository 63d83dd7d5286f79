//! Fluent schema builders
//!
//! The compile target: typed, chainable schema values with a terminal
//! validate operation over JSON values. Each schema kind carries the shared
//! constraint set (`Common`) plus its own checks; builder methods consume
//! `self` and return it, so configuration reads as a chain:
//!
//! ```ignore
//! let schema: Schema = string().min(3).matches(re).into();
//! let schema = schema.required().label("Nickname");
//! schema.validate(Some(&value))?;
//! ```
//!
//! Validation resolves a value: absent input yields the default (when set),
//! object fields fill in their children's defaults, and the caller gets the
//! resolved value back.

pub mod array;
pub mod date;
pub mod mixed;
pub mod number;
pub mod object;
pub mod string;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;

pub use array::ArraySchema;
pub use date::DateSchema;
pub use mixed::MixedSchema;
pub use number::NumberSchema;
pub use object::ObjectSchema;
pub use string::StringSchema;

// =============================================================================
// Kinds and constructors
// =============================================================================

/// The primitive kinds of the builder surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Mixed,
    String,
    Number,
    Array,
    Object,
    Date,
}

impl SchemaKind {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Mixed => "mixed",
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Array => "array",
            SchemaKind::Object => "object",
            SchemaKind::Date => "date",
        }
    }

    /// Phrase used in type-mismatch messages
    fn expected(&self) -> &'static str {
        match self {
            SchemaKind::Mixed => "a non-null value",
            SchemaKind::String => "a string",
            SchemaKind::Number => "a number",
            SchemaKind::Array => "an array",
            SchemaKind::Object => "an object",
            SchemaKind::Date => "a date",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn mixed() -> MixedSchema {
    MixedSchema::new()
}

pub fn string() -> StringSchema {
    StringSchema::new()
}

pub fn number() -> NumberSchema {
    NumberSchema::new()
}

pub fn array() -> ArraySchema {
    ArraySchema::new()
}

pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

pub fn date() -> DateSchema {
    DateSchema::new()
}

// =============================================================================
// Named tests
// =============================================================================

/// A named predicate attached to a schema, run against the resolved value
/// after the kind-specific checks
#[derive(Clone)]
pub struct Test {
    name: String,
    message: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Test {
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passes(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test").field("name", &self.name).finish()
    }
}

// =============================================================================
// Shared constraints
// =============================================================================

/// Constraints every schema kind carries
#[derive(Debug, Clone, Default)]
pub struct Common {
    pub(crate) required: bool,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
    pub(crate) label: Option<String>,
    pub(crate) one_of: Option<Vec<Value>>,
    pub(crate) tests: Vec<Test>,
}

impl Common {
    fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| "value".to_string())
    }
}

// =============================================================================
// Schema
// =============================================================================

/// A fully-configured schema of any kind
#[derive(Debug, Clone)]
pub enum Schema {
    Mixed(MixedSchema),
    String(StringSchema),
    Number(NumberSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Date(DateSchema),
}

impl Schema {
    pub fn kind(&self) -> SchemaKind {
        match self {
            Schema::Mixed(_) => SchemaKind::Mixed,
            Schema::String(_) => SchemaKind::String,
            Schema::Number(_) => SchemaKind::Number,
            Schema::Array(_) => SchemaKind::Array,
            Schema::Object(_) => SchemaKind::Object,
            Schema::Date(_) => SchemaKind::Date,
        }
    }

    pub fn common(&self) -> &Common {
        match self {
            Schema::Mixed(s) => &s.common,
            Schema::String(s) => &s.common,
            Schema::Number(s) => &s.common,
            Schema::Array(s) => &s.common,
            Schema::Object(s) => &s.common,
            Schema::Date(s) => &s.common,
        }
    }

    fn common_mut(&mut self) -> &mut Common {
        match self {
            Schema::Mixed(s) => &mut s.common,
            Schema::String(s) => &mut s.common,
            Schema::Number(s) => &mut s.common,
            Schema::Array(s) => &mut s.common,
            Schema::Object(s) => &mut s.common,
            Schema::Date(s) => &mut s.common,
        }
    }

    /// Reject absent input
    pub fn required(mut self) -> Self {
        self.common_mut().required = true;
        self
    }

    /// Accept `null` in addition to the base type
    pub fn nullable(mut self) -> Self {
        self.common_mut().nullable = true;
        self
    }

    /// Value substituted for absent input
    pub fn default_value(mut self, value: Value) -> Self {
        self.common_mut().default = Some(value);
        self
    }

    /// Display label used in violation messages
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.common_mut().label = Some(label.into());
        self
    }

    /// Restrict to exactly these values
    pub fn one_of(mut self, values: Vec<Value>) -> Self {
        self.common_mut().one_of = Some(values);
        self
    }

    /// Attach a named predicate
    pub fn test(mut self, test: Test) -> Self {
        self.common_mut().tests.push(test);
        self
    }

    /// Validate a possibly-absent value, resolving defaults. `Ok(None)`
    /// means "absent and acceptably so".
    pub fn validate(&self, value: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        let common = self.common();
        let label = common.display_label();

        let value = match value {
            None => {
                if let Some(default) = &common.default {
                    return Ok(Some(default.clone()));
                }
                if common.required {
                    return Err(ValidationError::Required { label });
                }
                return Ok(None);
            }
            Some(v) => v,
        };

        if value.is_null() {
            let null_allowed = common.nullable
                || common
                    .one_of
                    .as_ref()
                    .is_some_and(|vals| vals.iter().any(Value::is_null));
            if null_allowed {
                return Ok(Some(Value::Null));
            }
            return Err(ValidationError::TypeMismatch {
                label,
                expected: self.kind().expected(),
            });
        }

        if let Some(allowed) = &common.one_of {
            if !allowed.contains(value) {
                return Err(ValidationError::NotOneOf { label });
            }
        }

        let resolved = match self {
            Schema::Mixed(s) => s.check(value, &label)?,
            Schema::String(s) => s.check(value, &label)?,
            Schema::Number(s) => s.check(value, &label)?,
            Schema::Array(s) => s.check(value, &label)?,
            Schema::Object(s) => s.check(value, &label)?,
            Schema::Date(s) => s.check(value, &label)?,
        };

        for test in &common.tests {
            if !test.passes(&resolved) {
                return Err(ValidationError::Test {
                    label,
                    name: test.name.clone(),
                    message: test.message.clone(),
                });
            }
        }

        Ok(Some(resolved))
    }

    /// Convenience boolean form of `validate` for present values
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(Some(value)).is_ok()
    }
}

impl From<MixedSchema> for Schema {
    fn from(s: MixedSchema) -> Self {
        Schema::Mixed(s)
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::String(s)
    }
}

impl From<NumberSchema> for Schema {
    fn from(s: NumberSchema) -> Self {
        Schema::Number(s)
    }
}

impl From<ArraySchema> for Schema {
    fn from(s: ArraySchema) -> Self {
        Schema::Array(s)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(s: ObjectSchema) -> Self {
        Schema::Object(s)
    }
}

impl From<DateSchema> for Schema {
    fn from(s: DateSchema) -> Self {
        Schema::Date(s)
    }
}

pub(crate) fn type_mismatch(label: &str, expected: &'static str) -> ValidationError {
    ValidationError::TypeMismatch {
        label: label.to_string(),
        expected,
    }
}

pub(crate) fn constraint(label: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::Constraint {
        label: label.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_resolves_default_before_required() {
        let schema: Schema = string().into();
        let schema = schema.required().default_value(json!("fallback"));
        assert_eq!(schema.validate(None).unwrap(), Some(json!("fallback")));
    }

    #[test]
    fn test_required_rejects_absent() {
        let schema = Schema::from(string()).required();
        assert!(matches!(
            schema.validate(None),
            Err(ValidationError::Required { .. })
        ));

        let optional = Schema::from(string());
        assert_eq!(optional.validate(None).unwrap(), None);
    }

    #[test]
    fn test_null_needs_nullability() {
        let plain = Schema::from(string());
        assert!(!plain.is_valid(&Value::Null));

        let nullable = Schema::from(string()).nullable();
        assert_eq!(
            nullable.validate(Some(&Value::Null)).unwrap(),
            Some(Value::Null)
        );
    }

    #[test]
    fn test_one_of_membership() {
        let schema = Schema::from(string()).one_of(vec![json!("A"), json!("B")]);
        assert!(schema.is_valid(&json!("A")));
        assert!(schema.is_valid(&json!("B")));
        assert!(!schema.is_valid(&json!("C")));
    }

    #[test]
    fn test_one_of_containing_null_admits_null() {
        let schema = Schema::from(mixed()).one_of(vec![json!("A"), Value::Null]);
        assert!(schema.is_valid(&Value::Null));
    }

    #[test]
    fn test_named_test_failure_carries_name() {
        let schema = Schema::from(number()).test(Test::new("even", "must be even", |v| {
            v.as_i64().map(|n| n % 2 == 0).unwrap_or(false)
        }));
        assert!(schema.is_valid(&json!(4)));
        match schema.validate(Some(&json!(3))) {
            Err(ValidationError::Test { name, .. }) => assert_eq!(name, "even"),
            other => panic!("expected test failure, got {:?}", other),
        }
    }

    #[test]
    fn test_label_appears_in_message() {
        let schema = Schema::from(string()).label("Nickname").required();
        let err = schema.validate(None).unwrap_err();
        assert_eq!(err.to_string(), "Nickname is required");
    }
}
