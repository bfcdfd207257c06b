//! Indicator registry — resolves an indicator name (or alias) to one
//! implementation.
//!
//! Names come from the command line and config files, so lookup is
//! case-insensitive and an unknown name is always a reportable
//! [`EngineError::UnknownIndicator`].

use std::collections::HashMap;

use crate::error::EngineError;
use crate::indicators::{
    Atr, BollingerBands, Bmsb, Ema, Indicator, LarssonLine, MaCross, MaStreak, Mad, PiCycleTop,
    Rsi, Sma, WilliamsR, Wvf,
};

pub struct IndicatorRegistry {
    indicators: Vec<Box<dyn Indicator>>,
    by_name: HashMap<String, usize>,
}

impl IndicatorRegistry {
    /// Registry with no indicators.
    pub fn empty() -> Self {
        Self {
            indicators: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register an indicator under its name and aliases. A later
    /// registration takes over any name it shares with an earlier one.
    pub fn register(&mut self, indicator: Box<dyn Indicator>) {
        let slot = self.indicators.len();
        self.by_name
            .insert(indicator.name().to_ascii_lowercase(), slot);
        for alias in indicator.aliases() {
            self.by_name.insert(alias.to_ascii_lowercase(), slot);
        }
        self.indicators.push(indicator);
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn Indicator, EngineError> {
        self.by_name
            .get(&name.trim().to_ascii_lowercase())
            .map(|&slot| self.indicators[slot].as_ref())
            .ok_or_else(|| EngineError::UnknownIndicator(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Canonical names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.indicators.iter().map(|i| i.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Indicator> {
        self.indicators.iter().map(|i| i.as_ref())
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Sma));
        registry.register(Box::new(Ema));
        registry.register(Box::new(Rsi));
        registry.register(Box::new(Mad));
        registry.register(Box::new(Atr));
        registry.register(Box::new(BollingerBands));
        registry.register(Box::new(WilliamsR));
        registry.register(Box::new(MaStreak));
        registry.register(Box::new(Wvf));
        registry.register(Box::new(MaCross));
        registry.register(Box::new(PiCycleTop));
        registry.register(Box::new(Bmsb));
        registry.register(Box::new(LarssonLine));
        registry
    }
}

impl std::fmt::Debug for IndicatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorRegistry")
            .field("indicators", &self.names())
            .finish()
    }
}

/// Resolve a name against the built-in registry.
pub fn registry_lookup(name: &str) -> Result<&'static dyn Indicator, EngineError> {
    crate::engine::default_engine().registry().lookup(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_canonical_and_alias() {
        let registry = IndicatorRegistry::default();
        assert_eq!(registry.lookup("rsi").unwrap().name(), "rsi");
        assert_eq!(
            registry.lookup("relative_strength_index").unwrap().name(),
            "rsi"
        );
        assert_eq!(registry.lookup("BB").unwrap().name(), "bb");
    }

    #[test]
    fn unknown_name_is_reported_verbatim() {
        let registry = IndicatorRegistry::default();
        assert_eq!(
            registry.lookup("Foo").err(),
            Some(EngineError::UnknownIndicator("Foo".into()))
        );
    }

    #[test]
    fn every_indicator_registered_once() {
        let registry = IndicatorRegistry::default();
        let mut names = registry.names();
        assert_eq!(names.len(), 13);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = IndicatorRegistry::empty();
        assert!(!registry.contains("sma"));
        registry.register(Box::new(Sma));
        assert!(registry.contains("simple_moving_average"));
        assert_eq!(registry.len(), 1);
    }
}
