//! Number schema

use serde_json::Value;

use super::{constraint, type_mismatch, Common};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub(crate) common: Common,
    min: Option<f64>,
    max: Option<f64>,
    more_than: Option<f64>,
    less_than: Option<f64>,
    integer: bool,
    positive: bool,
    negative: bool,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound
    pub fn min(mut self, limit: f64) -> Self {
        self.min = Some(limit);
        self
    }

    /// Inclusive upper bound
    pub fn max(mut self, limit: f64) -> Self {
        self.max = Some(limit);
        self
    }

    /// Exclusive lower bound
    pub fn more_than(mut self, limit: f64) -> Self {
        self.more_than = Some(limit);
        self
    }

    /// Exclusive upper bound
    pub fn less_than(mut self, limit: f64) -> Self {
        self.less_than = Some(limit);
        self
    }

    /// Restrict to whole values
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    pub fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    pub(crate) fn check(&self, value: &Value, label: &str) -> Result<Value, ValidationError> {
        let n = value
            .as_f64()
            .ok_or_else(|| type_mismatch(label, "a number"))?;

        if self.integer && n.fract() != 0.0 {
            return Err(constraint(label, "must be an integer"));
        }
        if let Some(limit) = self.min {
            if n < limit {
                return Err(constraint(label, format!("must be at least {}", limit)));
            }
        }
        if let Some(limit) = self.max {
            if n > limit {
                return Err(constraint(label, format!("must be at most {}", limit)));
            }
        }
        if let Some(limit) = self.more_than {
            if n <= limit {
                return Err(constraint(label, format!("must be greater than {}", limit)));
            }
        }
        if let Some(limit) = self.less_than {
            if n >= limit {
                return Err(constraint(label, format!("must be less than {}", limit)));
            }
        }
        if self.positive && n <= 0.0 {
            return Err(constraint(label, "must be a positive number"));
        }
        if self.negative && n >= 0.0 {
            return Err(constraint(label, "must be a negative number"));
        }

        Ok(value.clone())
    }
}
