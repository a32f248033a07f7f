//! PERT/CPM network analysis.
//!
//! Builds an event network from a flat table of jobs with precedence lists
//! and three-point duration estimates, then derives event times, job floats,
//! the critical path and completion-time probabilities. The same functions
//! are exposed to Python as the `pert_network` extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod analysis;
mod config;
pub mod critical_path;
pub mod estimate;
pub mod interner;
pub mod layout;
pub mod logging;
mod models;
pub mod network;
pub mod probability;
pub mod propagation;

pub use analysis::{analyze, AnalysisError, AnalysisWarning, NetworkAnalysis};
pub use config::{AnalysisConfig, VarianceScope};
pub use critical_path::{critical_events, trace_critical_chain, CriticalPathError};
pub use estimate::{estimate_duration, DurationEstimate};
pub use layout::layout_events;
pub use models::{
    parse_precedence_spec, DummyEdge, EventPosition, EventRow, Job, JobRow, TimeDirective,
    TimeInterval,
};
pub use probability::{normal_cdf, CompletionModel};
pub use propagation::{job_reserves, propagate, JobReserve, Schedule};

/// Analyse a job table.
///
/// # Arguments
/// * `jobs` - List of jobs with predecessors and a/m/b estimates
/// * `config` - Analysis configuration (defaults when omitted)
///
/// # Returns
/// * NetworkAnalysis with the events, jobs and probability tables
///
/// # Raises
/// * ValueError on cyclic precedence, unknown or duplicate jobs, or invalid config
#[pyfunction]
#[pyo3(signature = (jobs, config=None))]
fn analyze_network(jobs: Vec<Job>, config: Option<AnalysisConfig>) -> PyResult<NetworkAnalysis> {
    let config = config.unwrap_or_default();
    analyze(&jobs, &config).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Re-derive the critical path from an events table.
#[pyfunction]
#[pyo3(name = "critical_path", signature = (events, tolerance=1e-9))]
fn py_critical_path(events: Vec<EventRow>, tolerance: f64) -> Vec<usize> {
    critical_events(&events, tolerance)
}

/// Grid positions for drawing the events on a `width` x `height` canvas.
#[pyfunction]
#[pyo3(name = "layout_events")]
fn py_layout_events(events: Vec<EventRow>, width: u32, height: u32) -> Vec<EventPosition> {
    layout_events(&events, width, height)
}

/// Standard normal CDF.
#[pyfunction]
#[pyo3(name = "normal_cdf")]
fn py_normal_cdf(z: f64) -> f64 {
    normal_cdf(z)
}

/// Send the module's log output to stderr. Returns False if logging was
/// already initialised.
#[pyfunction]
#[pyo3(name = "init_logging", signature = (verbosity=0))]
fn py_init_logging(verbosity: u8) -> bool {
    logging::init_logging(verbosity)
}

/// The pert_network Python module.
#[pymodule]
fn pert_network(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Table types
    m.add_class::<Job>()?;
    m.add_class::<EventRow>()?;
    m.add_class::<JobRow>()?;
    m.add_class::<DummyEdge>()?;
    m.add_class::<TimeInterval>()?;
    m.add_class::<TimeDirective>()?;
    m.add_class::<EventPosition>()?;
    m.add_class::<NetworkAnalysis>()?;

    // Config types
    m.add_class::<AnalysisConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(analyze_network, m)?)?;
    m.add_function(wrap_pyfunction!(py_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_layout_events, m)?)?;
    m.add_function(wrap_pyfunction!(py_normal_cdf, m)?)?;
    m.add_function(wrap_pyfunction!(py_init_logging, m)?)?;

    Ok(())
}
