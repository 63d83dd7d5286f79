//! Source descriptor model
//!
//! The serialized, introspectable form of a validation schema: a recursive
//! tree of typed nodes. Field names follow the neutral vocabulary used by the
//! compiler (`kind`, `children`, ...), with serde aliases for the names the
//! source library's own describe output uses (`type`, `keys`), so raw
//! introspection JSON deserializes directly.
//!
//! A node's `kind` fully determines which of `children`/`items`/`rules` are
//! meaningful. Absent fields mean "no constraint of that category", never an
//! error.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One node of the descriptor tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Descriptor {
    /// Schema type tag, or a list of tags for union-typed nodes
    #[serde(alias = "type")]
    pub kind: Kind,

    /// Keyed child nodes, in declaration order (object kind only)
    #[serde(default, alias = "keys", skip_serializing_if = "Option::is_none")]
    pub children: Option<IndexMap<String, Descriptor>>,

    /// Element type (array kind) or candidate list (alternatives kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    /// Cross-cutting metadata applied outside the rules loop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,

    /// Permitted literal values; a null entry signals nullability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<Value>>,

    /// Ordered constraint entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,

    /// Alternative-match candidates (conditional/union semantics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<MatchArm>>,
}

/// Node kind: a single tag, or an ordered tag list for union-typed nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Kind {
    One(String),
    Many(Vec<String>),
}

impl Kind {
    pub fn one(tag: impl Into<String>) -> Self {
        Kind::One(tag.into())
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::One(tag) => f.write_str(tag),
            Kind::Many(tags) => write!(f, "[{}]", tags.join(", ")),
        }
    }
}

/// Array element schema or alternatives candidate list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    One(Box<Descriptor>),
    Many(Vec<Descriptor>),
}

/// Recognized descriptor flags; unrecognized ones are retained so the
/// allow-list handling can tell "only a default is set" from richer records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flags {
    /// Presence requirement; only `"required"` has a mapped effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<String>,

    /// Default value. A present-but-null default is meaningful and must be
    /// distinguishable from an absent one.
    #[serde(
        default,
        deserialize_with = "null_preserving",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Date encoding (`iso` / `unix`); recognized but not applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Binary content encoding (e.g. `base64`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Marks the allow-list as an exclusive enumeration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only: Option<bool>,

    /// Any further flags the source library emitted
    #[serde(flatten)]
    pub other: serde_json::Map<String, Value>,
}

impl Flags {
    /// Number of flags carried by this record, recognized or not
    pub fn set_count(&self) -> usize {
        [
            self.presence.is_some(),
            self.default.is_some(),
            self.label.is_some(),
            self.format.is_some(),
            self.encoding.is_some(),
            self.only.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
            + self.other.len()
    }
}

/// A single named constraint with its argument payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// One candidate of an alternatives node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchArm {
    pub schema: Descriptor,
}

/// Deserializes a JSON `null` to `Some(Value::Null)` instead of `None`,
/// so `"default": null` survives the round trip.
fn null_preserving<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
