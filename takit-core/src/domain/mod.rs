//! Core domain types: bars, the OHLCV table, indicator specs and outputs.

pub mod bar;
pub mod output;
pub mod spec;
pub mod table;

pub use bar::Bar;
pub use output::{Column, IndicatorOutput};
pub use spec::{IndicatorSpec, OptionValue};
pub use table::OhlcvTable;
