//! Signal derivation — turning indicator series into categorical signals.
//!
//! - [`crossover`]: cross events and the persisted regime between two series.
//! - [`trigger`]: state-change edges and trigger-row selection.
//!
//! Signals are `f64` series holding small integers (`+1`, `-1`, `0`) so they
//! share the frame representation with numeric indicators; `NaN` marks rows
//! where the signal is undefined.

pub mod crossover;
pub mod trigger;

pub use crossover::{derive_crossover, Crossover};
pub use trigger::{edges, filter_trigger_rows, trigger_rows};
