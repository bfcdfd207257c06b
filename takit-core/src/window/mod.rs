//! Window kernels — primitive reducers over a single numeric series.
//!
//! Every kernel is pure and stateless, and returns a `Vec<f64>` of the same
//! length as its input so outputs line up row-for-row with the source table.
//! Undefined values are `f64::NAN`:
//! - leading entries are NaN until the window has enough history (warm-up);
//! - a window containing NaN produces NaN;
//! - recursive smoothers stay NaN for the rest of the series once they meet
//!   NaN after their seed.
//!
//! A zero `length` yields an all-NaN series. Indicators reject zero lengths
//! with `EngineError::InvalidParameter` before reaching a kernel.

pub mod range;
pub mod rolling;
pub mod smoothing;
pub mod streak;

pub use range::true_range;
pub use rolling::{rolling_deviation, rolling_max, rolling_mean, rolling_min, rolling_std};
pub use smoothing::{exponential_mean, wilder_mean, MaKind};
pub use streak::{diff, streak};
