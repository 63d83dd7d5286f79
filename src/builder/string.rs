//! String schema

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{constraint, type_mismatch, Common};
use crate::error::ValidationError;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?|ftp)://[^\s/$.?#][^\s]*$").unwrap());

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub(crate) common: Common,
    min: Option<usize>,
    max: Option<usize>,
    length: Option<usize>,
    pattern: Option<Regex>,
    email: bool,
    url: bool,
    lowercase: bool,
    uppercase: bool,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum length in characters
    pub fn min(mut self, limit: usize) -> Self {
        self.min = Some(limit);
        self
    }

    /// Maximum length in characters
    pub fn max(mut self, limit: usize) -> Self {
        self.max = Some(limit);
        self
    }

    /// Exact length in characters
    pub fn length(mut self, limit: usize) -> Self {
        self.length = Some(limit);
        self
    }

    /// Must match the pattern
    pub fn matches(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }

    /// Must already be in lower case
    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Must already be in upper case
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub(crate) fn check(&self, value: &Value, label: &str) -> Result<Value, ValidationError> {
        let s = value
            .as_str()
            .ok_or_else(|| type_mismatch(label, "a string"))?;
        let chars = s.chars().count();

        if let Some(limit) = self.min {
            if chars < limit {
                return Err(constraint(
                    label,
                    format!("must be at least {} characters", limit),
                ));
            }
        }
        if let Some(limit) = self.max {
            if chars > limit {
                return Err(constraint(
                    label,
                    format!("must be at most {} characters", limit),
                ));
            }
        }
        if let Some(limit) = self.length {
            if chars != limit {
                return Err(constraint(
                    label,
                    format!("must be exactly {} characters", limit),
                ));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(s) {
                return Err(constraint(
                    label,
                    format!("must match the pattern {}", pattern.as_str()),
                ));
            }
        }
        if self.email && !EMAIL.is_match(s) {
            return Err(constraint(label, "must be a valid email address"));
        }
        if self.url && !URL.is_match(s) {
            return Err(constraint(label, "must be a valid URL"));
        }
        if self.lowercase && s != s.to_lowercase() {
            return Err(constraint(label, "must be a lowercase string"));
        }
        if self.uppercase && s != s.to_uppercase() {
            return Err(constraint(label, "must be an uppercase string"));
        }

        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Schema;
    use serde_json::json;

    #[test]
    fn test_minimal_schema_accepts_any_string() {
        let schema = Schema::from(StringSchema::new());
        assert!(schema.is_valid(&json!("")));
        assert!(schema.is_valid(&json!("anything at all")));
        assert!(!schema.is_valid(&json!(42)));
    }

    #[test]
    fn test_length_bounds_count_characters() {
        let schema = Schema::from(StringSchema::new().min(3).max(5));
        assert!(!schema.is_valid(&json!("ab")));
        assert!(schema.is_valid(&json!("abc")));
        // multi-byte characters count once
        assert!(schema.is_valid(&json!("鹄思乱想")));
        assert!(!schema.is_valid(&json!("abcdef")));
    }

    #[test]
    fn test_pattern() {
        let schema = Schema::from(StringSchema::new().matches(Regex::new("^[a-z]+$").unwrap()));
        assert!(schema.is_valid(&json!("abc")));
        assert!(!schema.is_valid(&json!("ABC")));
    }

    #[test]
    fn test_email_and_url() {
        let email = Schema::from(StringSchema::new().email());
        assert!(email.is_valid(&json!("hero@example.com")));
        assert!(!email.is_valid(&json!("not-an-email")));

        let url = Schema::from(StringSchema::new().url());
        assert!(url.is_valid(&json!("http://example.com?a=b")));
        assert!(!url.is_valid(&json!("example com")));
    }

    #[test]
    fn test_case_conformance() {
        let lower = Schema::from(StringSchema::new().lowercase());
        assert!(lower.is_valid(&json!("teleport")));
        assert!(!lower.is_valid(&json!("Teleport")));

        let upper = Schema::from(StringSchema::new().uppercase());
        assert!(upper.is_valid(&json!("LOUD")));
        assert!(!upper.is_valid(&json!("quiet")));
    }
}
