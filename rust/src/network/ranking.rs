//! Topological ranking of synthesized events by frontier reduction.

use thiserror::Error;

use crate::{log_changes, log_checks};

use super::synthesis::SynthesizedNetwork;
use super::types::{Activity, ActivityId, ActivityKind, Event, SynthesizedEvent};

/// Errors raised while ranking events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankingError {
    /// Some events never had all their predecessors resolved.
    #[error("Precedence graph does not converge (cyclic precedence) among jobs: {}", .pending.join(", "))]
    NoConvergence { pending: Vec<String> },
}

/// Events with final ranks, ordered by rank then discovery order.
#[derive(Clone, Debug)]
pub struct RankedNetwork {
    pub activities: Vec<Activity>,
    pub events: Vec<Event>,
    pub job_count: usize,
}

/// Name to report for a pending activity; dummies report the job they follow.
fn report_name(activities: &[Activity], id: ActivityId) -> String {
    match activities[id as usize].kind {
        ActivityKind::Dummy { after } => activities[after as usize].name.clone(),
        ActivityKind::Job => activities[id as usize].name.clone(),
    }
}

/// Assign every event its topological rank and append the project-end event.
///
/// At each rank, all unranked events whose pending predecessor set is empty
/// receive the rank, and their outgoing activities are crossed out of every
/// other event's pending set. The loop is capped at the event count; events
/// still unranked after that (or after an iteration that ranks nothing) mean
/// the precedence graph has a cycle.
///
/// Activities that finish into no event are gathered into a synthetic sink
/// one rank above the last. Events are then re-indexed by ascending rank,
/// keeping discovery order within a rank.
pub fn rank_events(
    network: SynthesizedNetwork,
    verbosity: u8,
) -> Result<RankedNetwork, RankingError> {
    let SynthesizedNetwork {
        activities,
        mut events,
        job_count,
    } = network;

    let event_count = events.len();
    let mut pending: Vec<Vec<ActivityId>> = events.iter().map(|e| e.incoming.clone()).collect();
    let mut ranks: Vec<Option<usize>> = vec![None; event_count];
    let mut resolved = vec![false; activities.len()];
    let mut unranked = event_count;
    let mut rank = 0;

    while unranked > 0 && rank < event_count {
        let frontier: Vec<usize> = (0..event_count)
            .filter(|&i| ranks[i].is_none() && pending[i].is_empty())
            .collect();
        if frontier.is_empty() {
            break;
        }

        for &i in &frontier {
            ranks[i] = Some(rank);
            unranked -= 1;
            for &id in &events[i].outgoing {
                resolved[id as usize] = true;
            }
        }
        log_checks!(verbosity, "Rank {}: events {:?}", rank, frontier);

        for (i, set) in pending.iter_mut().enumerate() {
            if ranks[i].is_none() {
                set.retain(|&id| !resolved[id as usize]);
            }
        }
        rank += 1;
    }

    if unranked > 0 {
        let mut stuck: Vec<String> = (0..event_count)
            .filter(|&i| ranks[i].is_none())
            .flat_map(|i| pending[i].iter().map(|&id| report_name(&activities, id)))
            .collect();
        stuck.sort();
        stuck.dedup();
        return Err(RankingError::NoConvergence { pending: stuck });
    }

    // Activities that no event waits for end at the project sink
    let mut consumed = vec![false; activities.len()];
    for event in &events {
        for &id in &event.incoming {
            consumed[id as usize] = true;
        }
    }
    let dangling: Vec<ActivityId> = events
        .iter()
        .flat_map(|e| e.outgoing.iter().copied())
        .filter(|&id| !consumed[id as usize])
        .collect();
    if !dangling.is_empty() {
        log_checks!(
            verbosity,
            "Sink event at rank {} collects {} terminal activities",
            rank,
            dangling.len()
        );
        events.push(SynthesizedEvent {
            incoming: dangling,
            outgoing: Vec::new(),
        });
        ranks.push(Some(rank));
    }

    // Stable sort keeps discovery order within a rank
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| ranks[i]);

    let mut slots: Vec<Option<SynthesizedEvent>> = events.into_iter().map(Some).collect();
    let ranked: Vec<Event> = order
        .iter()
        .enumerate()
        .filter_map(|(index, &i)| {
            let event = slots[i].take()?;
            Some(Event {
                index,
                rank: ranks[i]?,
                incoming: event.incoming,
                outgoing: event.outgoing,
            })
        })
        .collect();

    log_changes!(
        verbosity,
        "Ranked {} events across {} ranks",
        ranked.len(),
        ranked.last().map(|e| e.rank + 1).unwrap_or(0)
    );

    Ok(RankedNetwork {
        activities,
        events: ranked,
        job_count,
    })
}
