//! Schema Bridge
//!
//! Compiles the serialized, introspected description of a validation schema
//! (a recursive tree of typed descriptor nodes) into an equivalent schema in
//! a fluent-builder validation API.
//!
//! ## Pipeline
//!
//! ```text
//! descriptor JSON
//!   └─ descriptor::Descriptor        (typed source model)
//!        └─ compiler::compile        (recursive descent)
//!             ├─ mapping             (kind + rule name translation)
//!             ├─ pattern             (regex literal parsing)
//!             ├─ extensions          (named custom predicates)
//!             └─ builder::Schema     (fluent compile target + validate)
//! ```
//!
//! The compiler is a pure tree transform: no I/O, no shared mutable state
//! beyond the one-time extension registry. Nodes it cannot classify produce
//! no schema and an advisory diagnostic on the logging sink; unsupported
//! rules abort compilation with a typed error.
//!
//! ```ignore
//! let node: Descriptor = serde_json::from_str(raw)?;
//! if let Some(schema) = create_schema(&node)? {
//!     schema.validate(Some(&value))?;
//! }
//! ```

pub mod builder;
pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod extensions;
pub mod mapping;
pub mod pattern;

pub use builder::{Schema, SchemaKind, Test};
pub use compiler::{compile, create_schema};
pub use descriptor::{Descriptor, Flags, Items, Kind, MatchArm, Rule};
pub use error::{CompileError, Result, ValidationError};
