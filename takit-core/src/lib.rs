//! takit core — technical-analysis indicator engine.
//!
//! This crate contains:
//! - Domain types (bars, OHLCV table, indicator specs and outputs)
//! - Window kernels (rolling, exponential and Wilder means, true range, streaks)
//! - The indicator set and its name registry
//! - Signal derivation (crossovers, edges, trigger-row filtering)
//! - The batch engine assembling one output frame
//! - Side-channel comparison against reference implementations
//! - Offline data sources and the `takit.toml` config

pub mod comparison;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod registry;
pub mod signals;
pub mod window;

pub use domain::{Bar, Column, IndicatorOutput, IndicatorSpec, OhlcvTable, OptionValue};
pub use engine::{analyze, compute, derive_crossover, filter_trigger_rows, AnalyzeOptions, Engine};
pub use error::EngineError;
pub use frame::Frame;
pub use registry::{registry_lookup, IndicatorRegistry};
