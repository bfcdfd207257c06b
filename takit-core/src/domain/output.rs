//! Indicator output: one or more named series aligned with the input table.

use serde::{Deserialize, Serialize};

/// A named series. `values.len()` always equals the source table's row count.
///
/// Equality treats undefined (NaN) rows as equal to each other, so outputs
/// with warm-up rows compare equal to themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of leading undefined values.
    pub fn warmup(&self) -> usize {
        self.values.iter().take_while(|v| v.is_nan()).count()
    }
}

/// Result of one indicator call.
///
/// `composite` marks categorical composite outputs (pi-cycle-top, BMSB,
/// Larsson line) whose partially defined rows carry no meaning; the pipeline
/// drops those rows instead of propagating NaN.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorOutput {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub composite: bool,
}

impl IndicatorOutput {
    pub fn single(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            columns: vec![Column::new(name, values)],
            composite: false,
        }
    }

    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            composite: false,
        }
    }

    pub fn into_composite(mut self) -> Self {
        self.composite = true;
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The last column, which holds the signal for composite outputs.
    pub fn last(&self) -> Option<&Column> {
        self.columns.last()
    }
}
