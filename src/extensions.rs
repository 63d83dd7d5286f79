//! Custom predicate extensions
//!
//! A fixed set of validators the builder surface does not carry natively,
//! registered against the primitive schema kinds so the compiler can
//! reference them by rule name. Registration happens once per process and is
//! idempotent to repeat; after `install` the registry is immutable.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::builder::{SchemaKind, Test};

/// Builds a `Test` from the rule's extracted argument; `None` when the
/// argument renders the predicate meaningless (reported by the caller)
type Factory = fn(Option<&Value>) -> Test;

static HOSTNAME_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        // plain ASCII domain
        Regex::new(r"^(?:[a-zA-Z0-9-_]+\.)*[a-zA-Z0-9][a-zA-Z0-9-_]+\.[a-zA-Z]{2,11}$").unwrap(),
        // punycode label form
        Regex::new(
            r"^(?:[A-Za-z0-9](?:[-A-Za-z0-9]{0,61}[A-Za-z0-9])?)(?:\.[A-Za-z0-9](?:[-A-Za-z0-9]{0,61}[A-Za-z0-9])?)*\.?$",
        )
        .unwrap(),
        // cyrillic domains, optionally with scheme, port, and path
        Regex::new(
            r"(?i)^(?:(?:http|https)://)?[a-zа-я0-9]+(?:[-.][a-zа-я0-9]+)*\.[a-zа-я]{2,5}(?::[0-9]{1,5})?(?:/.*)?$",
        )
        .unwrap(),
    ]
});

static ALPHANUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z]+$").unwrap());
static IPV4: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d{1,3}\.){3}\d{1,3}$").unwrap());

static REGISTRY: Lazy<HashMap<(SchemaKind, &'static str), Factory>> = Lazy::new(|| {
    let mut map: HashMap<(SchemaKind, &'static str), Factory> = HashMap::new();
    map.insert((SchemaKind::String, "hostname"), hostname);
    map.insert((SchemaKind::String, "alphanum"), alphanum);
    map.insert((SchemaKind::String, "ip"), ip);
    map.insert((SchemaKind::String, "base64"), base64_check);
    map.insert((SchemaKind::Array, "unique"), unique);
    map.insert((SchemaKind::Number, "multiple"), multiple);
    map.insert((SchemaKind::Number, "multipleOf"), multiple);
    map
});

/// Force registration. Safe to call any number of times; `compile` calls it
/// before the first lookup.
pub fn install() {
    Lazy::force(&REGISTRY);
}

/// Look up a predicate registered for this schema kind under this name
pub fn predicate(kind: SchemaKind, name: &str, arg: Option<&Value>) -> Option<Test> {
    REGISTRY.get(&(kind, name)).map(|factory| factory(arg))
}

fn hostname(_arg: Option<&Value>) -> Test {
    Test::new("hostname", "Invalid Hostname", |value| {
        let s = match value.as_str() {
            Some(s) => s,
            None => return false,
        };
        s.is_empty() || HOSTNAME_PATTERNS.iter().any(|re| re.is_match(s))
    })
}

fn alphanum(_arg: Option<&Value>) -> Test {
    Test::new("alphanum", "Must be Alpha-Numerical", |value| {
        let s = match value.as_str() {
            Some(s) => s,
            None => return false,
        };
        s.is_empty() || ALPHANUM.is_match(s)
    })
}

fn ip(_arg: Option<&Value>) -> Test {
    Test::new("ip", "Invalid IP address", |value| {
        let s = match value.as_str() {
            Some(s) => s,
            None => return false,
        };
        if s.trim().is_empty() {
            return true;
        }
        IPV4.is_match(s)
            && s.split('.')
                .all(|octet| octet.parse::<u32>().map(|n| n <= 255).unwrap_or(false))
    })
}

fn base64_check(_arg: Option<&Value>) -> Test {
    Test::new("base64", "Base64 Invalid", |value| {
        let s = match value.as_str() {
            Some(s) => s,
            None => return false,
        };
        if s.trim().is_empty() {
            return false;
        }
        match BASE64.decode(s) {
            Ok(bytes) => BASE64.encode(bytes) == s,
            Err(_) => false,
        }
    })
}

/// Uniqueness across items. With a string argument, items are compared by
/// that key's value instead of whole.
fn unique(arg: Option<&Value>) -> Test {
    let key = arg
        .and_then(|a| a.as_str().or_else(|| a.get("path").and_then(Value::as_str)))
        .map(str::to_string);
    Test::new("unique", "Must be Unique", move |value| {
        let items = match value.as_array() {
            Some(items) => items,
            None => return false,
        };
        let mut seen: Vec<&Value> = Vec::with_capacity(items.len());
        for item in items {
            let probe = match &key {
                Some(k) => item.get(k).unwrap_or(item),
                None => item,
            };
            if seen.contains(&probe) {
                return false;
            }
            seen.push(probe);
        }
        true
    })
}

fn multiple(arg: Option<&Value>) -> Test {
    let base = arg.and_then(Value::as_f64);
    Test::new("multiple", "Must be a multiple", move |value| {
        match (value.as_f64(), base) {
            (Some(n), Some(base)) if base != 0.0 => n % base == 0.0,
            _ => false,
        }
    })
}
