//! Name translation between the source descriptor vocabulary and the
//! builder surface
//!
//! The source format uses one flat namespace for two unrelated things: node
//! kind tags and rule names. They are translated here through two separate
//! enumerations (`BuilderKind` for kinds, `MappedRule`/`BuilderMethod` for
//! rules) that happen to share entries (`date-time` is both a kind tag and a
//! format argument). Callers must not assume a name plays the same role in
//! both tables.

use serde_json::Value;

use crate::descriptor::Kind;

/// The six universal JSON types. A node whose kind is a tag list covering
/// all of these is a fully generic value.
const UNIVERSAL_TYPES: [&str; 6] = ["object", "array", "string", "number", "boolean", "null"];

// =============================================================================
// Node kinds
// =============================================================================

/// Normalized node kind, naming the builder primitive to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Object,
    String,
    Number,
    Integer,
    Array,
    Date,
    Alternatives,
    Binary,
    Mixed,
}

/// Normalize a descriptor kind tag. Returns `None` for tags the compiler
/// cannot classify; the caller reports those as unhandled nodes.
pub fn map_kind(kind: &Kind) -> Option<BuilderKind> {
    match kind {
        Kind::One(tag) => match tag.as_str() {
            "object" => Some(BuilderKind::Object),
            "string" => Some(BuilderKind::String),
            "number" => Some(BuilderKind::Number),
            "integer" => Some(BuilderKind::Integer),
            "array" => Some(BuilderKind::Array),
            "date" | "date-time" => Some(BuilderKind::Date),
            "alternatives" => Some(BuilderKind::Alternatives),
            "binary" => Some(BuilderKind::Binary),
            "any" => Some(BuilderKind::Mixed),
            _ => None,
        },
        Kind::Many(tags) => {
            let covers_all = UNIVERSAL_TYPES
                .iter()
                .all(|t| tags.iter().any(|tag| tag == t));
            if covers_all {
                Some(BuilderKind::Mixed)
            } else {
                None
            }
        }
    }
}

// =============================================================================
// Rule names
// =============================================================================

/// A builder method the generic rule path can call directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderMethod {
    Of,
    OneOf,
    Label,
    Min,
    Max,
    Length,
    MoreThan,
    LessThan,
    Matches,
    Url,
    Email,
    Integer,
    Positive,
    Negative,
    Lowercase,
    Uppercase,
}

impl BuilderMethod {
    /// The method's target-surface name, used in diagnostics and for
    /// argument extraction
    pub fn name(&self) -> &'static str {
        match self {
            BuilderMethod::Of => "of",
            BuilderMethod::OneOf => "oneOf",
            BuilderMethod::Label => "label",
            BuilderMethod::Min => "min",
            BuilderMethod::Max => "max",
            BuilderMethod::Length => "length",
            BuilderMethod::MoreThan => "moreThan",
            BuilderMethod::LessThan => "lessThan",
            BuilderMethod::Matches => "matches",
            BuilderMethod::Url => "url",
            BuilderMethod::Email => "email",
            BuilderMethod::Integer => "integer",
            BuilderMethod::Positive => "positive",
            BuilderMethod::Negative => "negative",
            BuilderMethod::Lowercase => "lowercase",
            BuilderMethod::Uppercase => "uppercase",
        }
    }

    /// Resolve a target-surface name back to a method. Covers the names the
    /// pass-through and format re-dispatch paths can produce.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "of" => Some(BuilderMethod::Of),
            "oneOf" => Some(BuilderMethod::OneOf),
            "label" => Some(BuilderMethod::Label),
            "min" => Some(BuilderMethod::Min),
            "max" => Some(BuilderMethod::Max),
            "length" => Some(BuilderMethod::Length),
            "moreThan" => Some(BuilderMethod::MoreThan),
            "lessThan" => Some(BuilderMethod::LessThan),
            "matches" => Some(BuilderMethod::Matches),
            "url" => Some(BuilderMethod::Url),
            "email" => Some(BuilderMethod::Email),
            "integer" => Some(BuilderMethod::Integer),
            "positive" => Some(BuilderMethod::Positive),
            "negative" => Some(BuilderMethod::Negative),
            "lowercase" => Some(BuilderMethod::Lowercase),
            "uppercase" => Some(BuilderMethod::Uppercase),
            _ => None,
        }
    }
}

/// Outcome of translating a source rule name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedRule {
    /// Maps onto a builder method; argument extraction applies
    Method(BuilderMethod),
    /// `case` rule: the argument's `direction` picks lowercase/uppercase
    Case,
    /// `sign` rule: the argument names the constraint itself
    Sign,
    /// `format`/`contentEncoding`: the argument value is re-dispatched
    /// through the name table as a method name
    Format,
    /// Recognized and deliberately without target effect
    Dropped,
    /// Not in the table; resolved later against the builder surface or the
    /// extension registry
    Passthrough(String),
}

/// Translate a source rule name into its target role
pub fn map_rule(name: &str) -> MappedRule {
    match name {
        "items" => MappedRule::Method(BuilderMethod::Of),
        "enum" => MappedRule::Method(BuilderMethod::OneOf),
        "description" => MappedRule::Method(BuilderMethod::Label),
        "minimum" | "minLength" | "minItems" | "exclusiveMinimum" | "min" => {
            MappedRule::Method(BuilderMethod::Min)
        }
        "maximum" | "maxLength" | "maxItems" | "exclusiveMaximum" | "max" => {
            MappedRule::Method(BuilderMethod::Max)
        }
        "length" => MappedRule::Method(BuilderMethod::Length),
        "greater" => MappedRule::Method(BuilderMethod::MoreThan),
        "less" => MappedRule::Method(BuilderMethod::LessThan),
        "pattern" | "matches" => MappedRule::Method(BuilderMethod::Matches),
        "uri" | "url" => MappedRule::Method(BuilderMethod::Url),
        "case" => MappedRule::Case,
        "sign" => MappedRule::Sign,
        "format" | "contentEncoding" => MappedRule::Format,
        "examples" => MappedRule::Dropped,
        other => MappedRule::Passthrough(other.to_string()),
    }
}

/// Raw name translation for rule *argument values* re-dispatched as method
/// names by the `format`/`contentEncoding` path
pub fn map_value_name(name: &str) -> &str {
    match name {
        "date-time" => "date",
        "uri" => "url",
        "any" => "mixed",
        other => other,
    }
}

// =============================================================================
// Argument extraction
// =============================================================================

/// The payload shape a target method expects; the source wraps the single
/// value a method takes under a shape-specific field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgShape {
    /// `{ "limit": X }`
    Limit,
    /// `{ "base": X }`
    Base,
    /// `{ "direction": X }`
    Direction,
    /// The payload itself is the value
    Raw,
}

fn arg_shape(target_name: &str) -> ArgShape {
    match target_name {
        "min" | "max" | "length" | "moreThan" | "lessThan" => ArgShape::Limit,
        "multiple" | "multipleOf" => ArgShape::Base,
        "uppercase" | "lowercase" => ArgShape::Direction,
        _ => ArgShape::Raw,
    }
}

/// Extract the single value a target method expects from a source rule's
/// argument payload. Keyed by the *target* name: the payload shape follows
/// the target operation's arity, not the source rule name. A payload that is
/// already a bare value passes through unwrapped.
pub fn extract_arg(target_name: &str, args: Option<&Value>) -> Option<Value> {
    let args = args?;
    let field = match arg_shape(target_name) {
        ArgShape::Limit => "limit",
        ArgShape::Base => "base",
        ArgShape::Direction => "direction",
        ArgShape::Raw => return Some(args.clone()),
    };
    match args {
        Value::Object(map) => map.get(field).cloned(),
        bare => Some(bare.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_normalization() {
        assert_eq!(map_kind(&Kind::one("any")), Some(BuilderKind::Mixed));
        assert_eq!(map_kind(&Kind::one("date-time")), Some(BuilderKind::Date));
        assert_eq!(map_kind(&Kind::one("integer")), Some(BuilderKind::Integer));
        assert_eq!(map_kind(&Kind::one("unknown-exotic-type")), None);
    }

    #[test]
    fn test_universal_union_is_mixed() {
        let all_six = Kind::Many(
            ["object", "array", "string", "number", "boolean", "null"]
                .map(String::from)
                .to_vec(),
        );
        assert_eq!(map_kind(&all_six), Some(BuilderKind::Mixed));

        let partial = Kind::Many(vec!["string".into(), "number".into()]);
        assert_eq!(map_kind(&partial), None);
    }

    #[test]
    fn test_rule_translation() {
        assert_eq!(map_rule("minimum"), MappedRule::Method(BuilderMethod::Min));
        assert_eq!(
            map_rule("exclusiveMinimum"),
            MappedRule::Method(BuilderMethod::Min)
        );
        assert_eq!(map_rule("greater"), MappedRule::Method(BuilderMethod::MoreThan));
        assert_eq!(map_rule("pattern"), MappedRule::Method(BuilderMethod::Matches));
        assert_eq!(map_rule("uri"), MappedRule::Method(BuilderMethod::Url));
        assert_eq!(map_rule("examples"), MappedRule::Dropped);
        assert_eq!(
            map_rule("hostname"),
            MappedRule::Passthrough("hostname".to_string())
        );
    }

    #[test]
    fn test_extract_limit_shapes() {
        assert_eq!(
            extract_arg("min", Some(&json!({ "limit": 5 }))),
            Some(json!(5))
        );
        assert_eq!(
            extract_arg("multiple", Some(&json!({ "base": 20 }))),
            Some(json!(20))
        );
        assert_eq!(
            extract_arg("lowercase", Some(&json!({ "direction": "lower" }))),
            Some(json!("lower"))
        );
        // bare value payloads pass through unwrapped
        assert_eq!(extract_arg("min", Some(&json!(5))), Some(json!(5)));
        // opaque payloads are handed over whole
        let ip_args = json!({ "options": { "version": ["ipv4"] } });
        assert_eq!(extract_arg("ip", Some(&ip_args)), Some(ip_args.clone()));
        assert_eq!(extract_arg("min", None), None);
    }
}
