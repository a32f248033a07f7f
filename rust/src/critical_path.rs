//! Critical path extraction from event and job floats.

use thiserror::Error;

use crate::models::EventRow;
use crate::network::{EventIndex, EventNetwork};
use crate::propagation::{JobReserve, Schedule};

/// Reasons the zero-float events do not form a single source-to-sink chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriticalPathError {
    #[error("Critical chain breaks off at event {0}")]
    Broken(EventIndex),
    #[error("Critical chain branches at event {at} into events {targets:?}")]
    Branching {
        at: EventIndex,
        targets: Vec<EventIndex>,
    },
    #[error("Zero-float events {0:?} are not on the critical chain")]
    Disjoint(Vec<EventIndex>),
}

/// Indices of zero-float events in ascending rank order.
///
/// Connectivity is not checked; use [`trace_critical_chain`] when a single
/// chain is required. Works on the exported events table, so feeding a
/// table back in reproduces the same path.
pub fn critical_events(events: &[EventRow], tolerance: f64) -> Vec<usize> {
    let mut critical: Vec<&EventRow> = events
        .iter()
        .filter(|e| e.event_reserve.abs() <= tolerance)
        .collect();
    critical.sort_by_key(|e| (e.event_rank, e.index));
    critical.into_iter().map(|e| e.index).collect()
}

/// Walk zero-float activities from the source event to the sink.
///
/// Each step follows the activities leaving the current event whose full
/// reserve is zero and whose terminating event has zero float. The walk
/// fails if it stops short of the sink, if it can continue to more than one
/// event, or if some zero-float event is left off the chain.
pub fn trace_critical_chain(
    network: &EventNetwork,
    schedule: &Schedule,
    reserves: &[JobReserve],
    tolerance: f64,
) -> Result<Vec<EventIndex>, CriticalPathError> {
    let event_reserves = schedule.event_reserves();
    let is_zero = |x: f64| x.abs() <= tolerance;

    let sink = network.sink();
    let mut chain = vec![network.source()];
    let mut current = network.source();

    while current != sink {
        if chain.len() > network.events.len() {
            return Err(CriticalPathError::Broken(current));
        }
        let mut targets: Vec<EventIndex> = network
            .edges
            .iter()
            .zip(reserves)
            .filter(|(edge, reserve)| {
                edge.from == current
                    && is_zero(reserve.full_reserve)
                    && is_zero(event_reserves[edge.to])
            })
            .map(|(edge, _)| edge.to)
            .collect();
        targets.sort_unstable();
        targets.dedup();

        match targets.as_slice() {
            [] => return Err(CriticalPathError::Broken(current)),
            [next] => {
                current = *next;
                chain.push(current);
            }
            _ => {
                return Err(CriticalPathError::Branching {
                    at: current,
                    targets,
                })
            }
        }
    }

    let extra: Vec<EventIndex> = (0..network.events.len())
        .filter(|&i| is_zero(event_reserves[i]) && !chain.contains(&i))
        .collect();
    if !extra.is_empty() {
        return Err(CriticalPathError::Disjoint(extra));
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;
    use crate::network::{rank_events, resolve_edges, synthesize_events};
    use crate::propagation::{job_reserves, propagate};

    fn make_job(id: &str, preds: &[&str], length: f64) -> Job {
        Job::new(
            id,
            preds.iter().map(|p| p.to_string()).collect(),
            length,
            length,
            length,
        )
    }

    fn trace(jobs: &[Job]) -> Result<Vec<EventIndex>, CriticalPathError> {
        let ranked = rank_events(synthesize_events(jobs, 0).unwrap(), 0).unwrap();
        let network = resolve_edges(ranked, 0).unwrap();
        let schedule = propagate(&network, 0);
        let reserves = job_reserves(&network, &schedule);
        trace_critical_chain(&network, &schedule, &reserves, 1e-9)
    }

    fn row(index: usize, event_rank: usize, event_reserve: f64) -> EventRow {
        EventRow {
            index,
            event_rank,
            time_early: 0.0,
            time_late: event_reserve,
            event_reserve,
        }
    }

    #[test]
    fn test_critical_events_filters_and_orders() {
        let events = vec![
            row(3, 2, 0.0),
            row(0, 0, 0.0),
            row(2, 1, 1.5),
            row(1, 1, 0.0),
        ];
        assert_eq!(critical_events(&events, 1e-9), vec![0, 1, 3]);
    }

    #[test]
    fn test_critical_events_tolerance() {
        let events = vec![row(0, 0, 1e-12), row(1, 1, 1e-3)];
        assert_eq!(critical_events(&events, 1e-9), vec![0]);
    }

    #[test]
    fn test_chain_through_diamond() {
        let chain = trace(&[
            make_job("A", &[], 3.0),
            make_job("B", &[], 1.0),
            make_job("C", &["A"], 2.0),
            make_job("D", &["B"], 1.0),
            make_job("E", &["C", "D"], 4.0),
        ])
        .unwrap();
        // start, {A}, {C, D}, sink
        assert_eq!(chain, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_parallel_jobs_between_same_events() {
        // B and C both run start-of-{A} to sink with equal length
        let chain = trace(&[
            make_job("A", &[], 2.0),
            make_job("B", &["A"], 4.0),
            make_job("C", &["A"], 4.0),
        ])
        .unwrap();
        assert_eq!(chain, vec![0, 1, 2]);
    }

    #[test]
    fn test_tied_branches_rejected() {
        // Two equally long branches through different events
        let err = trace(&[
            make_job("A", &[], 2.0),
            make_job("B", &[], 2.0),
            make_job("C", &["A"], 3.0),
            make_job("D", &["B"], 3.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CriticalPathError::Branching {
                at: 0,
                targets: vec![1, 2]
            }
        );
    }
}
