//! Engine entry points.
//!
//! [`compute`] runs one indicator by name, [`Engine::analyze`] runs a batch
//! of specs over one table and assembles a single output [`Frame`]:
//!
//! 1. every spec is computed independently (in parallel with rayon)
//! 2. plain outputs are appended column-wise in request order
//! 3. composite outputs are reduced to fully defined rows (and, for trigger
//!    rows, to non-zero cross events or to state changes) and joined back by
//!    timestamp
//! 4. optional trigger-row filtering on a named column, then tail

use std::sync::OnceLock;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable, OptionValue};
use crate::error::{ensure_aligned, EngineError};
use crate::frame::Frame;
use crate::indicators::Indicator;
use crate::registry::IndicatorRegistry;

pub use crate::signals::{derive_crossover, filter_trigger_rows};

/// How [`Engine::analyze`] reduces the assembled frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeOptions {
    /// Composite indicators report only their state changes.
    pub only_trigger_rows: bool,
    /// Keep only the rows where this column changed value.
    pub trigger_column: Option<String>,
    /// Keep only the last `n` rows.
    pub tail: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Engine {
    registry: IndicatorRegistry,
}

impl Engine {
    pub fn new(registry: IndicatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    /// Compute the indicator registered under `name`.
    ///
    /// Options the indicator does not accept are rejected before anything is
    /// computed, so a misspelled option never silently falls back to a default.
    pub fn compute(
        &self,
        name: &str,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        let indicator = self.registry.lookup(name)?;
        check_options(indicator, spec)?;

        let output = indicator.compute(table, spec)?;
        for column in &output.columns {
            ensure_aligned(table.len(), column.len())?;
        }
        debug!(
            indicator = indicator.name(),
            length = ?spec.length,
            rows = table.len(),
            columns = output.columns.len(),
            "computed indicator"
        );
        Ok(output)
    }

    /// Warm-up of the indicator a spec resolves to.
    pub fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        let indicator = self.registry.lookup(&spec.name)?;
        check_options(indicator, spec)?;
        indicator.lookback(spec)
    }

    /// Compute every spec and assemble one frame.
    ///
    /// Fails on the first spec (in request order) that fails; no partial
    /// frame is returned.
    pub fn analyze(
        &self,
        table: &OhlcvTable,
        specs: &[IndicatorSpec],
        options: &AnalyzeOptions,
    ) -> Result<Frame, EngineError> {
        let prepared: Vec<IndicatorSpec> = specs
            .iter()
            .map(|spec| self.prepare(spec, options))
            .collect::<Result<_, _>>()?;

        for spec in &prepared {
            let lookback = self.lookback(spec)?;
            if table.len() <= lookback {
                warn!(
                    indicator = %spec.name,
                    rows = table.len(),
                    lookback,
                    "too few rows for a single defined value"
                );
            }
        }

        let outputs: Vec<IndicatorOutput> = prepared
            .par_iter()
            .map(|spec| self.compute(&spec.name, table, spec))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<_, _>>()?;

        let mut frame = Frame::from_table(table);
        for (spec, output) in prepared.iter().zip(outputs) {
            if output.composite {
                let crosses = spec.flag("only_crosses", false)?;
                let reduced =
                    reduce_composite(table, output, options.only_trigger_rows, crosses)?;
                frame.join(&reduced)?;
            } else {
                frame.push_output(output)?;
            }
        }

        if let Some(column) = &options.trigger_column {
            frame = filter_trigger_rows(&frame, column)?;
        }
        if let Some(n) = options.tail {
            frame = frame.tail(n);
        }
        debug!(
            indicators = specs.len(),
            rows = frame.len(),
            columns = frame.columns().len(),
            "analysis assembled"
        );
        Ok(frame)
    }

    /// Composite indicators follow the trigger-row request unless the spec
    /// already says otherwise.
    fn prepare(
        &self,
        spec: &IndicatorSpec,
        options: &AnalyzeOptions,
    ) -> Result<IndicatorSpec, EngineError> {
        let indicator = self.registry.lookup(&spec.name)?;
        let mut spec = spec.clone();
        if options.only_trigger_rows
            && indicator.options().contains(&"only_crosses")
            && !spec.options.contains_key("only_crosses")
        {
            spec.options
                .insert("only_crosses".to_string(), OptionValue::Flag(true));
        }
        Ok(spec)
    }
}

fn check_options(indicator: &dyn Indicator, spec: &IndicatorSpec) -> Result<(), EngineError> {
    let accepted = indicator.options();
    match spec.options.keys().find(|key| !accepted.contains(&key.as_str())) {
        Some(key) => Err(EngineError::invalid(
            key.clone(),
            format!("not an option of {}", indicator.name()),
        )),
        None => Ok(()),
    }
}

/// Rows where every composite column is defined. For trigger rows, a cross
/// signal keeps its non-zero events and a state signal keeps its changes.
fn reduce_composite(
    table: &OhlcvTable,
    output: IndicatorOutput,
    only_trigger_rows: bool,
    crosses: bool,
) -> Result<Frame, EngineError> {
    let signal = output.last().map(|c| c.name.clone());
    let frame = Frame::from_output(table, output)?;
    let mut reduced = frame.drop_undefined(&[])?;
    if only_trigger_rows {
        if let Some(signal) = signal {
            reduced = if crosses {
                reduced.drop_zero(&signal)?
            } else {
                filter_trigger_rows(&reduced, &signal)?
            };
        }
    }
    debug!(
        kept = reduced.len(),
        total = frame.len(),
        "reduced composite output"
    );
    Ok(reduced)
}

/// The engine over the built-in registry.
pub fn default_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(Engine::default)
}

/// Compute the built-in indicator registered under `name`.
pub fn compute(
    name: &str,
    table: &OhlcvTable,
    spec: &IndicatorSpec,
) -> Result<IndicatorOutput, EngineError> {
    default_engine().compute(name, table, spec)
}

/// [`Engine::analyze`] over the built-in registry.
pub fn analyze(
    table: &OhlcvTable,
    specs: &[IndicatorSpec],
    options: &AnalyzeOptions,
) -> Result<Frame, EngineError> {
    default_engine().analyze(table, specs, options)
}
