//! Binding activities to their originating and terminating events.

use std::fmt;

use thiserror::Error;

use crate::{log_changes, log_debug};

use super::ranking::RankedNetwork;
use super::types::{ActivityId, Edge, EventIndex, EventNetwork};

/// Which end of an edge is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => write!(f, "originating"),
            Endpoint::To => write!(f, "terminating"),
        }
    }
}

/// Errors raised while binding activities to events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeError {
    #[error("Job {activity} has no {endpoint} event")]
    MissingEndpoint { activity: String, endpoint: Endpoint },
    #[error("Job {activity} has more than one {endpoint} event ({first} and {second})")]
    DuplicateEndpoint {
        activity: String,
        endpoint: Endpoint,
        first: EventIndex,
        second: EventIndex,
    },
}

fn bind(
    slot: &mut Option<EventIndex>,
    event: EventIndex,
    endpoint: Endpoint,
    name: &str,
) -> Result<(), EdgeError> {
    if let Some(first) = *slot {
        return Err(EdgeError::DuplicateEndpoint {
            activity: name.to_string(),
            endpoint,
            first,
            second: event,
        });
    }
    *slot = Some(event);
    Ok(())
}

/// Record `from` for every outgoing activity and `to` for every incoming one.
///
/// Every activity must end up with exactly one of each.
pub fn resolve_edges(ranked: RankedNetwork, verbosity: u8) -> Result<EventNetwork, EdgeError> {
    let RankedNetwork {
        activities,
        events,
        ..
    } = ranked;

    let n = activities.len();
    let mut from: Vec<Option<EventIndex>> = vec![None; n];
    let mut to: Vec<Option<EventIndex>> = vec![None; n];

    for event in &events {
        for &id in &event.outgoing {
            let name = &activities[id as usize].name;
            bind(&mut from[id as usize], event.index, Endpoint::From, name)?;
        }
        for &id in &event.incoming {
            let name = &activities[id as usize].name;
            bind(&mut to[id as usize], event.index, Endpoint::To, name)?;
        }
    }

    let mut edges = Vec::with_capacity(n);
    for (idx, activity) in activities.iter().enumerate() {
        let missing = |endpoint| EdgeError::MissingEndpoint {
            activity: activity.name.clone(),
            endpoint,
        };
        let from = from[idx].ok_or_else(|| missing(Endpoint::From))?;
        let to = to[idx].ok_or_else(|| missing(Endpoint::To))?;
        log_debug!(verbosity, "Job {}: {} -> {}", activity.name, from, to);
        edges.push(Edge {
            activity: idx as ActivityId,
            from,
            to,
        });
    }

    log_changes!(verbosity, "Resolved {} edges", edges.len());

    Ok(EventNetwork {
        activities,
        events,
        edges,
    })
}
