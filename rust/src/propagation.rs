//! Earliest/latest event times by forward and backward propagation.

use crate::network::{ActivityId, EventNetwork};
use crate::{log_changes, log_debug};

/// Event times produced by the two passes, indexed by event index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    pub time_early: Vec<f64>,
    pub time_late: Vec<f64>,
}

impl Schedule {
    /// Project duration: the latest of all event times.
    pub fn project_duration(&self) -> f64 {
        self.time_late.iter().copied().fold(0.0, f64::max)
    }

    /// Total float of every event (`time_late - time_early`).
    pub fn event_reserves(&self) -> Vec<f64> {
        self.time_late
            .iter()
            .zip(&self.time_early)
            .map(|(late, early)| late - early)
            .collect()
    }
}

/// Float of one activity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JobReserve {
    pub activity: ActivityId,
    /// Delay possible without delaying the project.
    pub full_reserve: f64,
    /// Delay possible without delaying any successor's earliest start.
    pub free_reserve: f64,
}

/// Earliest event times.
///
/// Edges are relaxed in order of their originating event. Events are indexed
/// in rank order and every edge points to a higher index, so an event's time
/// is final before any of its outgoing edges is relaxed.
pub fn forward_pass(network: &EventNetwork, verbosity: u8) -> Vec<f64> {
    let mut time_early = vec![0.0; network.events.len()];
    for edge in network.edges_by_origin() {
        let length = network.activity(edge.activity).length;
        let candidate = time_early[edge.from] + length;
        if candidate > time_early[edge.to] {
            log_debug!(
                verbosity,
                "forward {} -> {}: early {} -> {}",
                edge.from,
                edge.to,
                time_early[edge.to],
                candidate
            );
            time_early[edge.to] = candidate;
        }
    }
    time_early
}

/// Latest event times given the earliest ones.
///
/// Every event starts at the project duration; edges are relaxed in
/// descending order of their originating event.
pub fn backward_pass(network: &EventNetwork, time_early: &[f64], verbosity: u8) -> Vec<f64> {
    let project_duration = time_early.iter().copied().fold(0.0, f64::max);
    let mut time_late = vec![project_duration; network.events.len()];
    for edge in network.edges_by_origin().into_iter().rev() {
        let length = network.activity(edge.activity).length;
        let candidate = time_late[edge.to] - length;
        if candidate < time_late[edge.from] {
            log_debug!(
                verbosity,
                "backward {} -> {}: late {} -> {}",
                edge.from,
                edge.to,
                time_late[edge.from],
                candidate
            );
            time_late[edge.from] = candidate;
        }
    }
    time_late
}

/// Run both passes over the network.
pub fn propagate(network: &EventNetwork, verbosity: u8) -> Schedule {
    let time_early = forward_pass(network, verbosity);
    let time_late = backward_pass(network, &time_early, verbosity);
    let schedule = Schedule {
        time_early,
        time_late,
    };
    log_changes!(
        verbosity,
        "Project duration {} over {} events",
        schedule.project_duration(),
        network.events.len()
    );
    schedule
}

/// Full and free float of every activity, indexed by activity id.
pub fn job_reserves(network: &EventNetwork, schedule: &Schedule) -> Vec<JobReserve> {
    network
        .edges
        .iter()
        .map(|edge| {
            let length = network.activity(edge.activity).length;
            let early_from = schedule.time_early[edge.from];
            JobReserve {
                activity: edge.activity,
                full_reserve: schedule.time_late[edge.to] - early_from - length,
                free_reserve: schedule.time_early[edge.to] - early_from - length,
            }
        })
        .collect()
}
