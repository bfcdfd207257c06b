//! Indicator request: name, optional length, and typed options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::EngineError;

/// A single option value. Untagged so specs read naturally from TOML/JSON:
/// `std = 2.5`, `include_width = true`, `ma = "ema"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag(b) => write!(f, "{b}"),
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Flag(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Number(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

/// What to compute: `(name, length, options)`.
///
/// `length = None` means "use the indicator's default". Specs are values;
/// the builder methods consume and return `self`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub name: String,
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

impl IndicatorSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            options: BTreeMap::new(),
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// `spec.length` if given, otherwise `default`. Zero is rejected.
    pub fn effective_length(&self, default: usize) -> Result<usize, EngineError> {
        let length = self.length.unwrap_or(default);
        if length == 0 {
            return Err(EngineError::invalid("length", "must be >= 1"));
        }
        Ok(length)
    }

    pub fn number(&self, key: &str, default: f64) -> Result<f64, EngineError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(OptionValue::Number(n)) if n.is_finite() => Ok(*n),
            Some(other) => Err(EngineError::invalid(
                key,
                format!("expected a finite number, got `{other}`"),
            )),
        }
    }

    /// Positive integer option (window sizes such as `fast`/`slow`).
    pub fn window(&self, key: &str, default: usize) -> Result<usize, EngineError> {
        let value = self.number(key, default as f64)?;
        if value < 1.0 || value.fract() != 0.0 || value >= usize::MAX as f64 {
            return Err(EngineError::invalid(
                key,
                format!("expected a positive integer, got `{value}`"),
            ));
        }
        Ok(value as usize)
    }

    pub fn flag(&self, key: &str, default: bool) -> Result<bool, EngineError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(OptionValue::Flag(b)) => Ok(*b),
            Some(other) => Err(EngineError::invalid(
                key,
                format!("expected true or false, got `{other}`"),
            )),
        }
    }

    pub fn text(&self, key: &str) -> Result<Option<&str>, EngineError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(OptionValue::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(EngineError::invalid(
                key,
                format!("expected text, got `{other}`"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_length_prefers_spec() {
        let spec = IndicatorSpec::new("rsi").with_length(21);
        assert_eq!(spec.effective_length(14), Ok(21));
        assert_eq!(IndicatorSpec::new("rsi").effective_length(14), Ok(14));
    }

    #[test]
    fn zero_length_is_invalid() {
        let spec = IndicatorSpec::new("sma").with_length(0);
        assert!(matches!(
            spec.effective_length(20),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn typed_option_access() {
        let spec = IndicatorSpec::new("bb")
            .with_option("std", 2.5)
            .with_option("include_width", true)
            .with_option("ma", "ema");
        assert_eq!(spec.number("std", 2.0), Ok(2.5));
        assert_eq!(spec.number("missing", 1.0), Ok(1.0));
        assert_eq!(spec.flag("include_width", false), Ok(true));
        assert_eq!(spec.text("ma"), Ok(Some("ema")));
        assert!(spec.number("ma", 0.0).is_err());
        assert!(spec.flag("std", false).is_err());
    }

    #[test]
    fn window_option_rejects_fractions_and_zero() {
        let spec = IndicatorSpec::new("ma_cross")
            .with_option("fast", 2.5)
            .with_option("slow", 0.0);
        assert!(spec.window("fast", 20).is_err());
        assert!(spec.window("slow", 50).is_err());
        assert_eq!(spec.window("other", 7), Ok(7));
    }

    #[test]
    fn spec_deserializes_from_toml() {
        let spec: IndicatorSpec = toml::from_str(
            r#"
            name = "bb"
            length = 30
            [options]
            std = 2.5
            include_width = true
            "#,
        )
        .unwrap();
        assert_eq!(spec.length, Some(30));
        assert_eq!(spec.options["std"], OptionValue::Number(2.5));
        assert_eq!(spec.options["include_width"], OptionValue::Flag(true));
    }

    #[test]
    fn window_rejects_values_beyond_usize() {
        let spec = IndicatorSpec::new("ma_cross").with_option("slow", 1e30);
        assert!(matches!(
            spec.window("slow", 50),
            Err(EngineError::InvalidParameter { ref name, .. }) if name == "slow"
        ));
        let spec = IndicatorSpec::new("ma_cross").with_option("slow", 1e15);
        assert_eq!(spec.window("slow", 50), Ok(1_000_000_000_000_000));
    }
}
