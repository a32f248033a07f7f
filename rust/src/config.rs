//! Configuration types for the network analysis.

use chrono::NaiveDate;
use pyo3::prelude::*;

use crate::models::parse_precedence_spec;

/// Which jobs contribute variance to the completion-time model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarianceScope {
    /// Sum the variance of every job in the network.
    AllJobs,
    /// Sum only the variance of jobs with zero full reserve.
    CriticalPath,
}

impl VarianceScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all_jobs" => Some(VarianceScope::AllJobs),
            "critical_path" => Some(VarianceScope::CriticalPath),
            _ => None,
        }
    }
}

/// Configuration for building and analysing a PERT network.
#[pyclass]
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Precedence spec meaning "no predecessors".
    #[pyo3(get, set)]
    pub no_predecessor_marker: String,
    /// Separator between predecessor ids in a precedence spec.
    #[pyo3(get, set)]
    pub precedence_delimiter: String,
    /// Completion variance scope: "all_jobs" or "critical_path"
    #[pyo3(get, set)]
    pub variance_scope: String,
    /// Absolute tolerance for zero-float and negative-reserve checks.
    #[pyo3(get, set)]
    pub reserve_tolerance: f64,
    /// Fail the analysis when zero-float events do not form a single chain.
    #[pyo3(get, set)]
    pub strict_critical_path: bool,
    /// Calendar start of the project; adds dates to time directives.
    #[pyo3(get, set)]
    pub project_start: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            no_predecessor_marker: "-".to_string(),
            precedence_delimiter: ",".to_string(),
            variance_scope: "all_jobs".to_string(),
            reserve_tolerance: 1e-9,
            strict_critical_path: false,
            project_start: None,
        }
    }
}

impl AnalysisConfig {
    /// Parsed variance scope, or an error message for an unknown value.
    pub fn variance_scope(&self) -> Result<VarianceScope, String> {
        VarianceScope::parse(&self.variance_scope)
            .ok_or_else(|| format!("unknown variance_scope {:?}", self.variance_scope))
    }

    /// Split a precedence spec with this config's marker and delimiter.
    pub fn parse_precedence(&self, spec: &str) -> Result<Vec<String>, String> {
        parse_precedence_spec(spec, &self.no_predecessor_marker, &self.precedence_delimiter)
    }

    /// Check the settings the pipeline depends on.
    pub fn validate(&self) -> Result<(), String> {
        self.variance_scope()?;
        if self.precedence_delimiter.is_empty() {
            return Err("precedence_delimiter must not be empty".to_string());
        }
        if !(self.reserve_tolerance >= 0.0 && self.reserve_tolerance.is_finite()) {
            return Err(format!(
                "reserve_tolerance must be a finite non-negative number, got {}",
                self.reserve_tolerance
            ));
        }
        Ok(())
    }
}

#[pymethods]
impl AnalysisConfig {
    #[new]
    #[pyo3(signature = (
        verbosity=None,
        no_predecessor_marker=None,
        precedence_delimiter=None,
        variance_scope=None,
        reserve_tolerance=None,
        strict_critical_path=None,
        project_start=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        verbosity: Option<u8>,
        no_predecessor_marker: Option<String>,
        precedence_delimiter: Option<String>,
        variance_scope: Option<String>,
        reserve_tolerance: Option<f64>,
        strict_critical_path: Option<bool>,
        project_start: Option<NaiveDate>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            no_predecessor_marker: no_predecessor_marker
                .unwrap_or(defaults.no_predecessor_marker),
            precedence_delimiter: precedence_delimiter.unwrap_or(defaults.precedence_delimiter),
            variance_scope: variance_scope.unwrap_or(defaults.variance_scope),
            reserve_tolerance: reserve_tolerance.unwrap_or(defaults.reserve_tolerance),
            strict_critical_path: strict_critical_path
                .unwrap_or(defaults.strict_critical_path),
            project_start,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "AnalysisConfig(variance_scope={:?}, reserve_tolerance={}, strict_critical_path={}, project_start={:?})",
            self.variance_scope, self.reserve_tolerance, self.strict_critical_path, self.project_start
        )
    }
}
