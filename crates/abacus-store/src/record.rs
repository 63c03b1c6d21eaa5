use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A computed result.
///
/// Records are immutable once built; the store hands out clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    value: f64,
    expression: String,
    created_at: DateTime<Utc>,
}

impl Record {
    /// Creates a record.
    #[must_use]
    pub fn new(value: f64, expression: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            value,
            expression: expression.into(),
            created_at,
        }
    }

    /// The rounded numeric result.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The display form, e.g. `1.50 + 2.30 = 3.80`.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// When the result was computed.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression)
    }
}
