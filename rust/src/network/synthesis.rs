//! Event synthesis: grouping jobs by precedence set.
//!
//! Every distinct canonical precedence set becomes one event whose incoming
//! activities are the set and whose outgoing activities are the jobs sharing
//! it. A job that appears in several distinct sets is routed through
//! zero-duration dummy activities so that it terminates at exactly one event.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::estimate::estimate_duration;
use crate::interner::JobIdInterner;
use crate::models::Job;
use crate::{log_changes, log_checks};

use super::types::{Activity, ActivityId, ActivityKind, SynthesizedEvent};

/// Errors raised while grouping jobs into events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("No jobs to analyse")]
    NoJobs,
    #[error("Duplicate job id: {0}")]
    DuplicateJob(String),
    #[error("Job {job} references unknown predecessor {predecessor}")]
    UnknownPredecessor { job: String, predecessor: String },
}

/// Activities and unranked events, in discovery order.
#[derive(Clone, Debug)]
pub struct SynthesizedNetwork {
    /// Jobs occupy ids `0..job_count` in input order; dummies follow.
    pub activities: Vec<Activity>,
    pub events: Vec<SynthesizedEvent>,
    pub job_count: usize,
}

impl SynthesizedNetwork {
    pub fn dummy_count(&self) -> usize {
        self.activities.len() - self.job_count
    }
}

/// Distinct precedence sets in first-seen order.
#[derive(Default)]
struct PrecedenceSets {
    sets: Vec<Vec<ActivityId>>,
    index: FxHashMap<Vec<ActivityId>, usize>,
}

impl PrecedenceSets {
    fn get_or_insert(&mut self, set: Vec<ActivityId>) -> usize {
        if let Some(&idx) = self.index.get(&set) {
            return idx;
        }
        let idx = self.sets.len();
        self.index.insert(set.clone(), idx);
        self.sets.push(set);
        idx
    }
}

/// Group jobs by their canonical precedence set into unranked events.
pub fn synthesize_events(
    jobs: &[Job],
    verbosity: u8,
) -> Result<SynthesizedNetwork, SynthesisError> {
    if jobs.is_empty() {
        return Err(SynthesisError::NoJobs);
    }

    let mut interner = JobIdInterner::with_capacity(jobs.len());
    for job in jobs {
        if interner.insert(&job.id).is_none() {
            return Err(SynthesisError::DuplicateJob(job.id.clone()));
        }
    }

    let mut activities: Vec<Activity> = jobs
        .iter()
        .map(|job| {
            let est = estimate_duration(job.optimistic, job.most_likely, job.pessimistic);
            Activity {
                name: job.id.clone(),
                kind: ActivityKind::Job,
                length: est.length,
                variance: est.variance,
            }
        })
        .collect();

    // Canonicalize: sorted, deduplicated predecessor ids
    let mut sets = PrecedenceSets::default();
    let mut job_set: Vec<usize> = Vec::with_capacity(jobs.len());
    for job in jobs {
        let mut set: Vec<ActivityId> = Vec::with_capacity(job.predecessors.len());
        for pred in &job.predecessors {
            let id = interner
                .get(pred)
                .ok_or_else(|| SynthesisError::UnknownPredecessor {
                    job: job.id.clone(),
                    predecessor: pred.clone(),
                })?;
            set.push(id);
        }
        set.sort_unstable();
        set.dedup();
        job_set.push(sets.get_or_insert(set));
    }

    // How many distinct sets each job finishes into
    let mut uses = vec![0usize; jobs.len()];
    for set in &sets.sets {
        for &id in set {
            uses[id as usize] += 1;
        }
    }

    // Route shared predecessors through dummies; outgoing dummies per set
    let original_set_count = sets.sets.len();
    let mut dummy_out: FxHashMap<usize, Vec<ActivityId>> = FxHashMap::default();
    for set_idx in 0..original_set_count {
        let set = sets.sets[set_idx].clone();
        if set.len() == 1 {
            continue;
        }
        let mut rewritten = Vec::with_capacity(set.len());
        for id in set {
            if uses[id as usize] < 2 {
                rewritten.push(id);
                continue;
            }
            let job_name = interner.resolve(id).unwrap_or_default();
            let dummy = activities.len() as ActivityId;
            let name = format!("{}~{}", job_name, set_idx);
            log_checks!(
                verbosity,
                "Job {} is shared by several precedence sets; adding dummy {}",
                job_name,
                name
            );
            activities.push(Activity {
                name,
                kind: ActivityKind::Dummy { after: id },
                length: 0.0,
                variance: 0.0,
            });
            let origin = sets.get_or_insert(vec![id]);
            dummy_out.entry(origin).or_default().push(dummy);
            rewritten.push(dummy);
        }
        rewritten.sort_unstable();
        sets.sets[set_idx] = rewritten;
    }

    let mut events: Vec<SynthesizedEvent> = sets
        .sets
        .into_iter()
        .map(|incoming| SynthesizedEvent {
            incoming,
            outgoing: Vec::new(),
        })
        .collect();
    for (job_idx, &set_idx) in job_set.iter().enumerate() {
        events[set_idx].outgoing.push(job_idx as ActivityId);
    }
    for (set_idx, dummies) in dummy_out {
        events[set_idx].outgoing.extend(dummies);
    }
    for event in &mut events {
        // Jobs first in input order, then dummies in creation order
        event.outgoing.sort_unstable();
    }

    let network = SynthesizedNetwork {
        activities,
        events,
        job_count: interner.len(),
    };
    log_changes!(
        verbosity,
        "Synthesized {} events from {} jobs ({} dummies)",
        network.events.len(),
        network.job_count,
        network.dummy_count()
    );
    Ok(network)
}
