//! Core data types: the input job table and the exported output tables.

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::AnalysisConfig;

/// Split a precedence spec such as `"A,B"` into predecessor ids.
///
/// A blank spec or one equal to `marker` means no predecessors. Entries are
/// trimmed and empty entries dropped; order and duplicates are kept as given.
/// An empty `delimiter` is rejected.
pub fn parse_precedence_spec(
    spec: &str,
    marker: &str,
    delimiter: &str,
) -> Result<Vec<String>, String> {
    if delimiter.is_empty() {
        return Err("precedence_delimiter must not be empty".to_string());
    }
    let spec = spec.trim();
    if spec.is_empty() || spec == marker.trim() {
        return Ok(Vec::new());
    }
    Ok(spec
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

/// A job with its predecessors and three-point duration estimate.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Job {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    /// Optimistic duration (a).
    #[pyo3(get, set)]
    pub optimistic: f64,
    /// Most likely duration (m).
    #[pyo3(get, set)]
    pub most_likely: f64,
    /// Pessimistic duration (b).
    #[pyo3(get, set)]
    pub pessimistic: f64,
}

impl Job {
    pub fn new(
        id: impl Into<String>,
        predecessors: Vec<String>,
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    ) -> Self {
        Self {
            id: id.into(),
            predecessors,
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    /// Build a job from a table row whose precedence column is a delimited
    /// spec, split with the config's marker and delimiter.
    pub fn from_row(
        id: impl Into<String>,
        precedence_spec: &str,
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
        config: &AnalysisConfig,
    ) -> Result<Self, String> {
        Ok(Self::new(
            id,
            config.parse_precedence(precedence_spec)?,
            optimistic,
            most_likely,
            pessimistic,
        ))
    }
}

#[pymethods]
impl Job {
    #[new]
    #[pyo3(signature = (id, predecessors, a, m, b))]
    fn py_new(id: String, predecessors: Vec<String>, a: f64, m: f64, b: f64) -> Self {
        Self::new(id, predecessors, a, m, b)
    }

    #[staticmethod]
    #[pyo3(name = "from_row", signature = (id, precedence_spec, a, m, b, config=None))]
    fn py_from_row(
        id: String,
        precedence_spec: &str,
        a: f64,
        m: f64,
        b: f64,
        config: Option<AnalysisConfig>,
    ) -> PyResult<Self> {
        let config = config.unwrap_or_default();
        Self::from_row(id, precedence_spec, a, m, b, &config).map_err(PyValueError::new_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "Job(id={:?}, predecessors={:?}, a={}, m={}, b={})",
            self.id, self.predecessors, self.optimistic, self.most_likely, self.pessimistic
        )
    }
}

/// One row of the exported events table.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct EventRow {
    #[pyo3(get, set)]
    pub index: usize,
    #[pyo3(get, set)]
    pub event_rank: usize,
    #[pyo3(get, set)]
    pub time_early: f64,
    #[pyo3(get, set)]
    pub time_late: f64,
    #[pyo3(get, set)]
    pub event_reserve: f64,
}

#[pymethods]
impl EventRow {
    #[new]
    fn new(
        index: usize,
        event_rank: usize,
        time_early: f64,
        time_late: f64,
        event_reserve: f64,
    ) -> Self {
        Self {
            index,
            event_rank,
            time_early,
            time_late,
            event_reserve,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "EventRow(index={}, rank={}, early={}, late={}, reserve={})",
            self.index, self.event_rank, self.time_early, self.time_late, self.event_reserve
        )
    }
}

/// One row of the exported jobs table.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct JobRow {
    #[pyo3(get)]
    pub job_id: String,
    #[pyo3(get)]
    pub from_event: usize,
    #[pyo3(get)]
    pub to_event: usize,
    /// Mean duration.
    #[pyo3(get)]
    pub length: f64,
    /// Duration variance.
    #[pyo3(get)]
    pub dispersion: f64,
    #[pyo3(get)]
    pub full_reserve: f64,
    #[pyo3(get)]
    pub free_reserve: f64,
}

#[pymethods]
impl JobRow {
    fn __repr__(&self) -> String {
        format!(
            "JobRow(job_id={:?}, from={}, to={}, length={}, full_reserve={}, free_reserve={})",
            self.job_id,
            self.from_event,
            self.to_event,
            self.length,
            self.full_reserve,
            self.free_reserve
        )
    }
}

/// A zero-duration edge linking the completion of `after_job` to a later event.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct DummyEdge {
    #[pyo3(get)]
    pub from_event: usize,
    #[pyo3(get)]
    pub to_event: usize,
    #[pyo3(get)]
    pub after_job: String,
}

#[pymethods]
impl DummyEdge {
    fn __repr__(&self) -> String {
        format!(
            "DummyEdge(from={}, to={}, after_job={:?})",
            self.from_event, self.to_event, self.after_job
        )
    }
}

/// Probability that the project completes within `[start, end]`.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct TimeInterval {
    #[pyo3(get)]
    pub start: f64,
    #[pyo3(get)]
    pub end: f64,
    #[pyo3(get)]
    pub probability: f64,
}

#[pymethods]
impl TimeInterval {
    fn __repr__(&self) -> String {
        format!(
            "TimeInterval(start={}, end={}, probability={})",
            self.start, self.end, self.probability
        )
    }
}

/// A candidate target completion time with its probability.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct TimeDirective {
    #[pyo3(get)]
    pub time_directive: f64,
    #[pyo3(get)]
    pub probability: f64,
    /// Calendar date of the directive when the project start is known.
    #[pyo3(get)]
    pub date: Option<NaiveDate>,
}

#[pymethods]
impl TimeDirective {
    fn __repr__(&self) -> String {
        format!(
            "TimeDirective(time={}, probability={}, date={:?})",
            self.time_directive, self.probability, self.date
        )
    }
}

/// Screen position of an event for rendering.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPosition {
    #[pyo3(get)]
    pub index: usize,
    #[pyo3(get)]
    pub event_rank: usize,
    #[pyo3(get)]
    pub x: u32,
    #[pyo3(get)]
    pub y: u32,
}

#[pymethods]
impl EventPosition {
    fn __repr__(&self) -> String {
        format!(
            "EventPosition(index={}, rank={}, x={}, y={})",
            self.index, self.event_rank, self.x, self.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_predecessors() {
        assert!(parse_precedence_spec("-", "-", ",").unwrap().is_empty());
        assert!(parse_precedence_spec("  - ", "-", ",").unwrap().is_empty());
        assert!(parse_precedence_spec("", "-", ",").unwrap().is_empty());
    }

    #[test]
    fn test_parse_delimited_list() {
        assert_eq!(
            parse_precedence_spec("A, B ,C", "-", ",").unwrap(),
            vec!["A", "B", "C"]
        );
        assert_eq!(
            parse_precedence_spec("A;;B", "none", ";").unwrap(),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_parse_rejects_empty_delimiter() {
        assert!(parse_precedence_spec("AB", "-", "").is_err());
    }

    #[test]
    fn test_from_row() {
        let job = Job::from_row("C", "A,B", 1.0, 2.0, 3.0, &AnalysisConfig::default()).unwrap();
        assert_eq!(job.id, "C");
        assert_eq!(job.predecessors, vec!["A", "B"]);
        assert!((job.most_likely - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_row_uses_config_marker_and_delimiter() {
        let config = AnalysisConfig {
            no_predecessor_marker: "none".to_string(),
            precedence_delimiter: ";".to_string(),
            ..AnalysisConfig::default()
        };

        let job = Job::from_row("C", "A;B", 1.0, 1.0, 1.0, &config).unwrap();
        assert_eq!(job.predecessors, vec!["A", "B"]);

        // "," is no longer a separator
        let job = Job::from_row("D", "A,B", 1.0, 1.0, 1.0, &config).unwrap();
        assert_eq!(job.predecessors, vec!["A,B"]);

        let job = Job::from_row("E", "none", 1.0, 1.0, 1.0, &config).unwrap();
        assert!(job.predecessors.is_empty());

        // "-" is now an ordinary id
        let job = Job::from_row("F", "-", 1.0, 1.0, 1.0, &config).unwrap();
        assert_eq!(job.predecessors, vec!["-"]);
    }

    #[test]
    fn test_from_row_rejects_empty_delimiter() {
        let config = AnalysisConfig {
            precedence_delimiter: String::new(),
            ..AnalysisConfig::default()
        };
        assert!(Job::from_row("C", "AB", 1.0, 1.0, 1.0, &config).is_err());
    }
}
