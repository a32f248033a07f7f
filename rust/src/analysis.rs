//! End-to-end network analysis: from the job table to the exported tables.

use std::fmt;

use pyo3::prelude::*;
use thiserror::Error;
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::critical_path::{critical_events, trace_critical_chain, CriticalPathError};
use crate::estimate::{is_finite, is_well_ordered};
use crate::log_changes;
use crate::models::{DummyEdge, EventRow, Job, JobRow, TimeDirective, TimeInterval};
use crate::network::{
    rank_events, resolve_edges, synthesize_events, ActivityKind, EdgeError, EventNetwork,
    RankingError, SynthesisError,
};
use crate::probability::{completion_variance, CompletionModel};
use crate::propagation::{job_reserves, propagate, JobReserve};

/// Fatal errors that abort an analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No jobs to analyse")]
    NoJobs,
    #[error("Duplicate job id: {0}")]
    DuplicateJob(String),
    #[error("Job {job} references unknown predecessor {predecessor}")]
    UnknownPredecessor { job: String, predecessor: String },
    #[error("Job {job} has a non-finite duration estimate")]
    NonFiniteEstimate { job: String },
    #[error("Cyclic precedence among jobs: {}", .jobs.join(", "))]
    CyclicPrecedence { jobs: Vec<String> },
    #[error("Dangling edge: {0}")]
    DanglingEdge(EdgeError),
    #[error("Critical path is not a single chain: {0}")]
    DisconnectedCriticalPath(CriticalPathError),
}

impl From<SynthesisError> for AnalysisError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::NoJobs => AnalysisError::NoJobs,
            SynthesisError::DuplicateJob(id) => AnalysisError::DuplicateJob(id),
            SynthesisError::UnknownPredecessor { job, predecessor } => {
                AnalysisError::UnknownPredecessor { job, predecessor }
            }
        }
    }
}

impl From<RankingError> for AnalysisError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NoConvergence { pending } => {
                AnalysisError::CyclicPrecedence { jobs: pending }
            }
        }
    }
}

impl From<EdgeError> for AnalysisError {
    fn from(err: EdgeError) -> Self {
        AnalysisError::DanglingEdge(err)
    }
}

/// Problems that are reported but do not stop the analysis.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisWarning {
    /// Estimates violate `0 <= a <= m <= b`; the raw formula was used.
    InvalidEstimate { job: String, a: f64, m: f64, b: f64 },
    /// A job has negative float, so the critical path may be suspect.
    InconsistentFloat {
        job: String,
        full_reserve: f64,
        free_reserve: f64,
    },
    /// Zero-float events do not form a single chain.
    DisconnectedCriticalPath(CriticalPathError),
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::InvalidEstimate { job, a, m, b } => {
                write!(f, "Job {job} estimates are not ordered a <= m <= b: a={a}, m={m}, b={b}")
            }
            AnalysisWarning::InconsistentFloat {
                job,
                full_reserve,
                free_reserve,
            } => write!(
                f,
                "Job {job} has negative float: full={full_reserve}, free={free_reserve}"
            ),
            AnalysisWarning::DisconnectedCriticalPath(err) => {
                write!(f, "Critical path is not a single chain: {err}")
            }
        }
    }
}

/// Everything the analysis produces for export and rendering.
#[pyclass]
#[derive(Clone, Debug)]
pub struct NetworkAnalysis {
    #[pyo3(get)]
    pub events: Vec<EventRow>,
    #[pyo3(get)]
    pub jobs: Vec<JobRow>,
    #[pyo3(get)]
    pub dummy_edges: Vec<DummyEdge>,
    /// Zero-float events in ascending rank order.
    #[pyo3(get)]
    pub critical_path: Vec<usize>,
    /// The source-to-sink chain of zero-float events, when there is exactly one.
    #[pyo3(get)]
    pub critical_chain: Option<Vec<usize>>,
    #[pyo3(get)]
    pub project_duration: f64,
    #[pyo3(get)]
    pub completion_variance: f64,
    #[pyo3(get)]
    pub completion_std_dev: f64,
    #[pyo3(get)]
    pub time_intervals: Vec<TimeInterval>,
    #[pyo3(get)]
    pub confidence_intervals: Vec<TimeInterval>,
    #[pyo3(get)]
    pub time_directives: Vec<TimeDirective>,
    pub warnings: Vec<AnalysisWarning>,
}

#[pymethods]
impl NetworkAnalysis {
    #[getter]
    fn warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "NetworkAnalysis(events={}, jobs={}, project_duration={}, critical_path={:?})",
            self.events.len(),
            self.jobs.len(),
            self.project_duration,
            self.critical_path
        )
    }
}

/// Warn about every activity whose full or free reserve is negative beyond
/// `tolerance`.
fn reserve_warnings(
    network: &EventNetwork,
    reserves: &[JobReserve],
    tolerance: f64,
) -> Vec<AnalysisWarning> {
    reserves
        .iter()
        .filter(|r| r.full_reserve < -tolerance || r.free_reserve < -tolerance)
        .map(|r| {
            let warning = AnalysisWarning::InconsistentFloat {
                job: network.activity(r.activity).name.clone(),
                full_reserve: r.full_reserve,
                free_reserve: r.free_reserve,
            };
            warn!("{}", warning);
            warning
        })
        .collect()
}

/// Build the event network for `jobs` and derive timings, floats, the
/// critical path and the completion-time tables.
pub fn analyze(jobs: &[Job], config: &AnalysisConfig) -> Result<NetworkAnalysis, AnalysisError> {
    config.validate().map_err(AnalysisError::InvalidConfig)?;
    let scope = config
        .variance_scope()
        .map_err(AnalysisError::InvalidConfig)?;
    let verbosity = config.verbosity;
    let tolerance = config.reserve_tolerance;
    let mut warnings = Vec::new();

    for job in jobs {
        let (a, m, b) = (job.optimistic, job.most_likely, job.pessimistic);
        if !is_finite(a, m, b) {
            return Err(AnalysisError::NonFiniteEstimate {
                job: job.id.clone(),
            });
        }
        if !is_well_ordered(a, m, b) {
            let warning = AnalysisWarning::InvalidEstimate {
                job: job.id.clone(),
                a,
                m,
                b,
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    let synthesized = synthesize_events(jobs, verbosity)?;
    let ranked = rank_events(synthesized, verbosity)?;
    let network = resolve_edges(ranked, verbosity)?;
    let schedule = propagate(&network, verbosity);
    let reserves = job_reserves(&network, &schedule);

    let events: Vec<EventRow> = network
        .events
        .iter()
        .zip(schedule.event_reserves())
        .map(|(event, event_reserve)| EventRow {
            index: event.index,
            event_rank: event.rank,
            time_early: schedule.time_early[event.index],
            time_late: schedule.time_late[event.index],
            event_reserve,
        })
        .collect();

    warnings.extend(reserve_warnings(&network, &reserves, tolerance));

    let mut job_rows = Vec::with_capacity(jobs.len());
    let mut dummy_edges = Vec::new();
    for (edge, reserve) in network.edges.iter().zip(&reserves) {
        let activity = network.activity(edge.activity);
        match activity.kind {
            ActivityKind::Job => job_rows.push(JobRow {
                job_id: activity.name.clone(),
                from_event: edge.from,
                to_event: edge.to,
                length: activity.length,
                dispersion: activity.variance,
                full_reserve: reserve.full_reserve,
                free_reserve: reserve.free_reserve,
            }),
            ActivityKind::Dummy { after } => dummy_edges.push(DummyEdge {
                from_event: edge.from,
                to_event: edge.to,
                after_job: network.activity(after).name.clone(),
            }),
        }
    }

    let critical_path = critical_events(&events, tolerance);
    let critical_chain = match trace_critical_chain(&network, &schedule, &reserves, tolerance) {
        Ok(chain) => Some(chain),
        Err(err) if config.strict_critical_path => {
            return Err(AnalysisError::DisconnectedCriticalPath(err));
        }
        Err(err) => {
            let warning = AnalysisWarning::DisconnectedCriticalPath(err);
            warn!("{}", warning);
            warnings.push(warning);
            None
        }
    };

    let variance = completion_variance(&network.activities, &reserves, scope, tolerance);
    let model = CompletionModel::new(schedule.project_duration(), variance);

    log_changes!(
        verbosity,
        "Critical path {:?}, duration {} +- {}",
        critical_path,
        model.mean,
        model.std_dev()
    );

    Ok(NetworkAnalysis {
        events,
        jobs: job_rows,
        dummy_edges,
        critical_path,
        critical_chain,
        project_duration: model.mean,
        completion_variance: model.variance,
        completion_std_dev: model.std_dev(),
        time_intervals: model.time_intervals(),
        confidence_intervals: model.confidence_intervals(),
        time_directives: model.time_directives(config.project_start),
        warnings,
    })
}
