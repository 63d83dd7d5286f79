//! Recursive descriptor compiler
//!
//! Walks a descriptor tree and produces the equivalent builder schema:
//! object nodes recurse per child key, array nodes recurse into their item
//! descriptor, alternatives nodes compile their candidates into an any-of
//! test. Nodes the compiler cannot classify yield no schema and an
//! error-level diagnostic; compilation of sibling nodes continues, so an
//! object schema may come back with that key missing from its shape.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{error, warn};

use crate::builder::{self, date::parse_date_value, Schema, SchemaKind, Test};
use crate::descriptor::{Descriptor, Flags, Items, MatchArm, Rule};
use crate::error::{CompileError, Result};
use crate::extensions;
use crate::mapping::{extract_arg, map_kind, map_rule, map_value_name, BuilderKind, BuilderMethod, MappedRule};
use crate::pattern::parse_pattern;

/// Compile a descriptor tree into a schema. `Ok(None)` means the node's
/// kind could not be classified; a diagnostic has been emitted and the
/// caller should treat the surrounding schema tree as incomplete.
pub fn compile(node: &Descriptor) -> Result<Option<Schema>> {
    extensions::install();
    compile_node(node, None)
}

/// Entry-point alias matching the source library's exported name
pub fn create_schema(node: &Descriptor) -> Result<Option<Schema>> {
    compile(node)
}

fn compile_node(node: &Descriptor, parent_key: Option<&str>) -> Result<Option<Schema>> {
    let Some(kind) = map_kind(&node.kind) else {
        error!(
            parent_key = parent_key.unwrap_or("<root>"),
            kind = %node.kind,
            node = ?node,
            "unhandled node kind"
        );
        return Ok(None);
    };

    let schema = match kind {
        BuilderKind::Object => compile_object(node.children.as_ref())?,
        BuilderKind::Alternatives => apply_flags(node, builder::mixed().into())?,
        BuilderKind::Binary => return compile_binary(node, parent_key),
        primitive => apply_flags(node, base_schema(primitive, node)?)?,
    };

    Ok(Some(schema))
}

/// Build the keyed shape of an object node, compiling each child in
/// declaration order. Children that fail to classify are left out of the
/// shape (their diagnostic names the key).
fn compile_object(children: Option<&IndexMap<String, Descriptor>>) -> Result<Schema> {
    let mut shape = IndexMap::new();
    if let Some(children) = children {
        for (key, child) in children {
            if let Some(schema) = compile_node(child, Some(key))? {
                shape.insert(key.clone(), schema);
            }
        }
    }
    Ok(builder::object().shape(shape).into())
}

/// A binary node is representable only when it names a content encoding;
/// the encoding is injected as one extra rule over a string base schema.
fn compile_binary(node: &Descriptor, parent_key: Option<&str>) -> Result<Option<Schema>> {
    let encoding = node.flags.as_ref().and_then(|f| f.encoding.clone());
    let Some(encoding) = encoding else {
        error!(
            parent_key = parent_key.unwrap_or("<root>"),
            node = ?node,
            "binary node without a content encoding"
        );
        return Ok(None);
    };

    let mut synthesized = node.clone();
    synthesized
        .rules
        .get_or_insert_with(Vec::new)
        .push(Rule {
            name: "contentEncoding".to_string(),
            args: Some(Value::String(encoding)),
        });
    apply_flags(&synthesized, builder::string().into()).map(Some)
}

/// Instantiate the builder primitive for a normalized node kind
fn base_schema(kind: BuilderKind, node: &Descriptor) -> Result<Schema> {
    let schema = match kind {
        BuilderKind::Integer => builder::number().integer().into(),
        BuilderKind::Array => array_base(node)?,
        BuilderKind::String => builder::string().into(),
        BuilderKind::Number => builder::number().into(),
        BuilderKind::Date => builder::date().into(),
        _ => builder::mixed().into(),
    };
    Ok(schema)
}

fn array_base(node: &Descriptor) -> Result<Schema> {
    let array = builder::array();
    let schema = match &node.items {
        Some(Items::Many(candidates)) => {
            // heterogeneous item alternatives collapse to the first
            // candidate; the rest carry no effect on the compiled schema
            if candidates.len() > 1 {
                warn!(
                    discarded = candidates.len() - 1,
                    "array item alternatives beyond the first are discarded"
                );
            }
            match candidates.first() {
                Some(first) => match compile_node(first, None)? {
                    Some(item) => array.of(item),
                    None => array,
                },
                None => array,
            }
        }
        Some(Items::One(child)) => match compile_node(child, None)? {
            Some(item) => array.of(item),
            None => array,
        },
        None => array,
    };
    Ok(schema.into())
}

// =============================================================================
// Flag & rule application
// =============================================================================

/// Apply a node's flags, allow-list, rules, and alternative matches to a
/// base schema, in that order. Later steps observe earlier ones through the
/// fluent chain.
pub(crate) fn apply_flags(node: &Descriptor, mut schema: Schema) -> Result<Schema> {
    let flags = node.flags.clone().unwrap_or_default();

    match flags.presence.as_deref() {
        Some("required") => schema = schema.required(),
        Some(other) => warn!(presence = other, "unhandled presence flag"),
        None => {}
    }

    if let Some(default) = &flags.default {
        schema = schema.default_value(default.clone());
    }

    if let Some(label) = &flags.label {
        schema = schema.label(label.clone());
    }

    // flags.format distinguishes iso/unix date encodings; the compiled date
    // schema accepts both, so the flag is recognized without further effect

    if let Some(allow) = node.allow.as_ref().filter(|a| !a.is_empty()) {
        schema = apply_allow(allow, &flags, schema);
    }

    if let Some(rules) = &node.rules {
        for rule in rules {
            schema = apply_rule(rule, schema)?;
        }
    }

    if let Some(matches) = &node.matches {
        schema = attach_alternatives(matches, schema)?;
    }

    Ok(schema)
}

/// The allow-list plays three roles: exclusive enumeration, nullability
/// marker, or echo of an already-applied default.
fn apply_allow(allow: &[Value], flags: &Flags, schema: Schema) -> Schema {
    if flags.only == Some(true) {
        schema.one_of(allow.to_vec())
    } else if allow.iter().any(Value::is_null) {
        schema.nullable()
    } else if flags.set_count() == 1 && flags.default.is_some() {
        // the list merely restates the default applied above
        schema
    } else {
        warn!(allow = ?allow, flags = ?flags, "unhandled allow/flags combination");
        schema
    }
}

fn apply_rule(rule: &Rule, schema: Schema) -> Result<Schema> {
    match map_rule(&rule.name) {
        MappedRule::Dropped => Ok(schema),
        MappedRule::Method(method) => {
            let arg = extract_arg(method.name(), rule.args.as_ref());
            apply_method(schema, method, arg)
        }
        MappedRule::Case => {
            let direction = rule
                .args
                .as_ref()
                .and_then(|a| a.get("direction"))
                .and_then(Value::as_str);
            match direction {
                Some("lower") => apply_method(schema, BuilderMethod::Lowercase, None),
                Some("upper") => apply_method(schema, BuilderMethod::Uppercase, None),
                other => {
                    warn!(direction = ?other, "unhandled case direction");
                    Ok(schema)
                }
            }
        }
        MappedRule::Sign => {
            let sign = rule
                .args
                .as_ref()
                .and_then(|a| a.get("sign"))
                .and_then(Value::as_str);
            match (sign, &schema) {
                (Some("positive"), Schema::Number(_)) => {
                    apply_method(schema, BuilderMethod::Positive, None)
                }
                (Some("negative"), Schema::Number(_)) => {
                    apply_method(schema, BuilderMethod::Negative, None)
                }
                (other, _) => {
                    warn!(sign = ?other, kind = %schema.kind(), "unsupported sign constraint");
                    Ok(schema)
                }
            }
        }
        MappedRule::Format => apply_format(rule, schema),
        MappedRule::Passthrough(name) => apply_by_name(schema, &name, rule.args.as_ref()),
    }
}

/// `format`/`contentEncoding` rules re-dispatch their argument value as a
/// method name: date formats replace the schema outright, the `binary`
/// marker is inert, anything else becomes a zero-arg call.
fn apply_format(rule: &Rule, schema: Schema) -> Result<Schema> {
    let Some(raw) = rule.args.as_ref().and_then(Value::as_str) else {
        return Err(CompileError::InvalidArgument {
            rule: rule.name.clone(),
            expected: "a format name",
        });
    };

    let mapped = map_value_name(raw);
    if mapped == "date" {
        return Ok(builder::date().into());
    }
    if raw == "binary" {
        return Ok(schema);
    }
    apply_by_name(schema, mapped, None)
}

/// Resolve a target-surface name against the builder methods, then the
/// extension registry. `precision` and `sign` are known-unrepresentable and
/// dropped with a warning; any other unresolved name aborts compilation.
fn apply_by_name(schema: Schema, name: &str, raw_args: Option<&Value>) -> Result<Schema> {
    if let Some(method) = BuilderMethod::from_name(name) {
        let arg = extract_arg(name, raw_args);
        return apply_method(schema, method, arg);
    }

    let arg = extract_arg(name, raw_args);
    if let Some(test) = extensions::predicate(schema.kind(), name, arg.as_ref()) {
        return Ok(schema.test(test));
    }

    if matches!(name, "precision" | "sign") {
        warn!(rule = name, kind = %schema.kind(), "unsupported rule skipped");
        return Ok(schema);
    }

    Err(CompileError::UnsupportedRule {
        rule: name.to_string(),
        kind: schema.kind().name(),
    })
}

/// Exhaustive dispatch of a builder method over the schema kinds. Pairings
/// the target surface does not offer are unsupported-rule failures.
fn apply_method(schema: Schema, method: BuilderMethod, arg: Option<Value>) -> Result<Schema> {
    use BuilderMethod::*;

    let unsupported = |kind: SchemaKind| CompileError::UnsupportedRule {
        rule: method.name().to_string(),
        kind: kind.name(),
    };
    let invalid = |expected: &'static str| CompileError::InvalidArgument {
        rule: method.name().to_string(),
        expected,
    };

    let schema = match (method, schema) {
        (Min, Schema::String(s)) => s.min(count_arg(arg).ok_or_else(|| invalid("a length"))?).into(),
        (Min, Schema::Number(s)) => s.min(number_arg(arg).ok_or_else(|| invalid("a number"))?).into(),
        (Min, Schema::Array(s)) => s.min(count_arg(arg).ok_or_else(|| invalid("a count"))?).into(),
        (Min, Schema::Date(s)) => s.min(date_arg(arg).ok_or_else(|| invalid("a date"))?).into(),

        (Max, Schema::String(s)) => s.max(count_arg(arg).ok_or_else(|| invalid("a length"))?).into(),
        (Max, Schema::Number(s)) => s.max(number_arg(arg).ok_or_else(|| invalid("a number"))?).into(),
        (Max, Schema::Array(s)) => s.max(count_arg(arg).ok_or_else(|| invalid("a count"))?).into(),
        (Max, Schema::Date(s)) => s.max(date_arg(arg).ok_or_else(|| invalid("a date"))?).into(),

        (Length, Schema::String(s)) => s.length(count_arg(arg).ok_or_else(|| invalid("a length"))?).into(),
        (Length, Schema::Array(s)) => s.length(count_arg(arg).ok_or_else(|| invalid("a count"))?).into(),

        (MoreThan, Schema::Number(s)) => s.more_than(number_arg(arg).ok_or_else(|| invalid("a number"))?).into(),
        (LessThan, Schema::Number(s)) => s.less_than(number_arg(arg).ok_or_else(|| invalid("a number"))?).into(),

        (Matches, Schema::String(s)) => {
            let raw = arg.ok_or_else(|| invalid("a pattern"))?;
            let source = raw
                .get("regex")
                .and_then(Value::as_str)
                .or_else(|| raw.as_str())
                .ok_or_else(|| invalid("a pattern"))?;
            s.matches(parse_pattern(source)?).into()
        }

        (Url, Schema::String(s)) => s.url().into(),
        (Email, Schema::String(s)) => s.email().into(),
        (Lowercase, Schema::String(s)) => s.lowercase().into(),
        (Uppercase, Schema::String(s)) => s.uppercase().into(),

        (Integer, Schema::Number(s)) => s.integer().into(),
        (Positive, Schema::Number(s)) => s.positive().into(),
        (Negative, Schema::Number(s)) => s.negative().into(),

        (Of, Schema::Array(s)) => {
            let raw = arg.ok_or_else(|| invalid("an item descriptor"))?;
            let item: Descriptor = serde_json::from_value(raw)?;
            match compile_node(&item, None)? {
                Some(item_schema) => s.of(item_schema).into(),
                None => s.into(),
            }
        }

        (OneOf, schema) => {
            let values = arg
                .and_then(|v| v.as_array().cloned())
                .ok_or_else(|| invalid("a value list"))?;
            schema.one_of(values)
        }

        (Label, schema) => {
            let label = arg
                .and_then(|v| v.as_str().map(str::to_string))
                .ok_or_else(|| invalid("a label string"))?;
            schema.label(label)
        }

        (_, schema) => return Err(unsupported(schema.kind())),
    };

    Ok(schema)
}

fn number_arg(arg: Option<Value>) -> Option<f64> {
    arg.as_ref().and_then(Value::as_f64)
}

fn count_arg(arg: Option<Value>) -> Option<usize> {
    arg.as_ref().and_then(Value::as_u64).map(|n| n as usize)
}

fn date_arg(arg: Option<Value>) -> Option<chrono::DateTime<chrono::Utc>> {
    arg.as_ref().and_then(parse_date_value)
}

// =============================================================================
// Alternatives
// =============================================================================

/// Compile an alternatives candidate list into a single any-of test on the
/// parent schema: the value passes if at least one candidate validates it.
fn attach_alternatives(matches: &[MatchArm], schema: Schema) -> Result<Schema> {
    let mut candidates = Vec::with_capacity(matches.len());
    for arm in matches {
        match compile_node(&arm.schema, None)? {
            Some(candidate) => candidates.push(candidate),
            None => warn!("alternatives candidate did not compile; skipped"),
        }
    }

    let test = Test::new(
        "alternatives",
        "must match at least one of the alternatives",
        move |value| {
            candidates
                .iter()
                .any(|candidate| candidate.validate(Some(value)).is_ok())
        },
    );
    Ok(schema.test(test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(raw: Value) -> Descriptor {
        serde_json::from_value(raw).unwrap()
    }

    fn compiled(raw: Value) -> Schema {
        compile(&descriptor(raw)).unwrap().unwrap()
    }

    #[test]
    fn test_minimal_primitives_accept_their_type() {
        assert!(compiled(json!({ "kind": "string" })).is_valid(&json!("x")));
        assert!(compiled(json!({ "kind": "number" })).is_valid(&json!(1.5)));
        assert!(compiled(json!({ "kind": "integer" })).is_valid(&json!(3)));
        assert!(!compiled(json!({ "kind": "integer" })).is_valid(&json!(3.5)));
        assert!(compiled(json!({ "kind": "array" })).is_valid(&json!([1, "a"])));
        assert!(compiled(json!({ "kind": "any" })).is_valid(&json!({ "free": true })));
    }

    #[test]
    fn test_unknown_kind_compiles_to_none() {
        let result = compile(&descriptor(json!({ "kind": "unknown-exotic-type" }))).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_object_with_unknown_child_omits_the_key() {
        let schema = compiled(json!({
            "kind": "object",
            "children": {
                "ok": { "kind": "string" },
                "odd": { "kind": "unknown-exotic-type" }
            }
        }));
        match schema {
            Schema::Object(obj) => {
                assert!(obj.fields().contains_key("ok"));
                assert!(!obj.fields().contains_key("odd"));
            }
            other => panic!("expected object schema, got {:?}", other),
        }
    }

    #[test]
    fn test_rule_name_translation_minimum() {
        let schema = compiled(json!({
            "kind": "number",
            "rules": [{ "name": "minimum", "args": { "limit": 5 } }]
        }));
        assert!(!schema.is_valid(&json!(4)));
        assert!(schema.is_valid(&json!(5)));
    }

    #[test]
    fn test_exclusive_minimum_maps_to_min() {
        let schema = compiled(json!({
            "kind": "number",
            "rules": [{ "name": "exclusiveMinimum", "args": { "limit": 5 } }]
        }));
        assert!(schema.is_valid(&json!(5)));
        assert!(!schema.is_valid(&json!(4)));
    }

    #[test]
    fn test_case_rule() {
        let schema = compiled(json!({
            "kind": "string",
            "rules": [{ "name": "case", "args": { "direction": "lower" } }]
        }));
        assert!(schema.is_valid(&json!("abc")));
        assert!(!schema.is_valid(&json!("Abc")));
    }

    #[test]
    fn test_sign_rule_on_number() {
        let schema = compiled(json!({
            "kind": "number",
            "rules": [{ "name": "sign", "args": { "sign": "positive" } }]
        }));
        assert!(schema.is_valid(&json!(2)));
        assert!(!schema.is_valid(&json!(-2)));
    }

    #[test]
    fn test_sign_rule_elsewhere_is_dropped() {
        let schema = compiled(json!({
            "kind": "string",
            "rules": [{ "name": "sign", "args": { "sign": "positive" } }]
        }));
        assert!(schema.is_valid(&json!("still a plain string")));
    }

    #[test]
    fn test_format_rule_promotes_to_date() {
        let schema = compiled(json!({
            "kind": "string",
            "rules": [{ "name": "format", "args": "date-time" }]
        }));
        assert_eq!(schema.kind(), SchemaKind::Date);
        assert!(schema.is_valid(&json!("2024-03-01T12:00:00Z")));
    }

    #[test]
    fn test_format_rule_uri_becomes_url() {
        let schema = compiled(json!({
            "kind": "string",
            "rules": [{ "name": "format", "args": "uri" }]
        }));
        assert!(schema.is_valid(&json!("https://example.com")));
        assert!(!schema.is_valid(&json!("no scheme")));
    }

    #[test]
    fn test_unsupported_rule_fails_fast() {
        let err = compile(&descriptor(json!({
            "kind": "string",
            "rules": [{ "name": "guid" }]
        })))
        .unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedRule { .. }));
    }

    #[test]
    fn test_precision_is_skipped_not_fatal() {
        let schema = compiled(json!({
            "kind": "number",
            "rules": [{ "name": "precision", "args": { "limit": 2 } }]
        }));
        assert!(schema.is_valid(&json!(1.234)));
    }

    #[test]
    fn test_extension_rules_attach_as_tests() {
        let schema = compiled(json!({
            "kind": "array",
            "rules": [{ "name": "unique" }]
        }));
        assert!(schema.is_valid(&json!([1, 2])));
        assert!(!schema.is_valid(&json!([1, 1])));

        let schema = compiled(json!({
            "kind": "number",
            "rules": [{ "name": "multiple", "args": { "base": 20 } }]
        }));
        assert!(schema.is_valid(&json!(40)));
        assert!(!schema.is_valid(&json!(30)));
    }

    #[test]
    fn test_array_of_single_item_descriptor() {
        let schema = compiled(json!({
            "kind": "array",
            "items": { "kind": "string" }
        }));
        assert!(schema.is_valid(&json!(["a"])));
        assert!(!schema.is_valid(&json!([1])));
    }

    #[test]
    fn test_array_candidates_collapse_to_first() {
        let schema = compiled(json!({
            "kind": "array",
            "items": [{ "kind": "string" }, { "kind": "number" }]
        }));
        assert!(schema.is_valid(&json!(["a"])));
        assert!(!schema.is_valid(&json!([1])));
    }

    #[test]
    fn test_alternatives_any_of() {
        let schema = compiled(json!({
            "kind": "alternatives",
            "matches": [
                { "schema": { "kind": "string" } },
                { "schema": { "kind": "number" } }
            ]
        }));
        assert!(schema.is_valid(&json!("text")));
        assert!(schema.is_valid(&json!(7)));
        assert!(!schema.is_valid(&json!([])));
    }

    #[test]
    fn test_binary_with_encoding_checks_base64() {
        let schema = compiled(json!({
            "kind": "binary",
            "flags": { "encoding": "base64" }
        }));
        assert_eq!(schema.kind(), SchemaKind::String);
        assert!(schema.is_valid(&json!("aGVsbG8=")));
        assert!(!schema.is_valid(&json!("not base64!")));
    }

    #[test]
    fn test_binary_without_encoding_is_unhandled() {
        let result = compile(&descriptor(json!({ "kind": "binary" }))).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_universal_union_kind_is_generic() {
        let schema = compiled(json!({
            "kind": ["object", "array", "string", "number", "boolean", "null"]
        }));
        assert_eq!(schema.kind(), SchemaKind::Mixed);
        assert!(schema.is_valid(&json!("anything")));
        assert!(schema.is_valid(&json!([1])));
    }

    #[test]
    fn test_allow_list_roles() {
        // exclusive enumeration
        let schema = compiled(json!({
            "kind": "string",
            "flags": { "only": true },
            "allow": ["A", "B"]
        }));
        assert!(schema.is_valid(&json!("A")));
        assert!(!schema.is_valid(&json!("C")));

        // nullability marker
        let schema = compiled(json!({
            "kind": "string",
            "allow": [null]
        }));
        assert!(schema.is_valid(&json!(null)));
        assert!(schema.is_valid(&json!("s")));
    }

    #[test]
    fn test_default_flag_resolves_absent_input() {
        let schema = compiled(json!({
            "kind": "object",
            "children": {
                "gender": {
                    "kind": "string",
                    "flags": { "default": "Female", "only": true },
                    "allow": ["Male", "Female", ""]
                }
            }
        }));
        let resolved = schema.validate(Some(&json!({}))).unwrap().unwrap();
        assert_eq!(resolved["gender"], json!("Female"));
    }
}
