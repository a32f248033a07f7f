//! Types shared by the network construction stages.

use crate::interner::JobIdInt;

/// Dense id of an activity (a job or a dummy). Jobs keep their interned id.
pub type ActivityId = JobIdInt;

/// Position of an event in rank order.
pub type EventIndex = usize;

/// What an activity stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum ActivityKind {
    /// A job from the input table.
    Job,
    /// Zero-duration link carrying the completion of `after` to a later event.
    Dummy { after: ActivityId },
}

/// A directed edge of the event network before it is bound to events.
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    pub name: String,
    pub kind: ActivityKind,
    pub length: f64,
    pub variance: f64,
}

impl Activity {
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, ActivityKind::Dummy { .. })
    }
}

/// An event produced by grouping activities on their precedence set.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesizedEvent {
    /// Canonical (sorted, deduplicated) activities that finish here.
    pub incoming: Vec<ActivityId>,
    /// Activities that start here, in input order.
    pub outgoing: Vec<ActivityId>,
}

/// A ranked event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub index: EventIndex,
    pub rank: usize,
    /// Activities that finish at this event (the unmodified precedence set).
    pub incoming: Vec<ActivityId>,
    pub outgoing: Vec<ActivityId>,
}

/// Binding of an activity to its originating and terminating events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub activity: ActivityId,
    pub from: EventIndex,
    pub to: EventIndex,
}

/// The complete event network: events in rank order plus one edge per activity.
#[derive(Clone, Debug)]
pub struct EventNetwork {
    pub activities: Vec<Activity>,
    pub events: Vec<Event>,
    /// Indexed by activity id.
    pub edges: Vec<Edge>,
}

impl EventNetwork {
    /// The project-start event (rank 0).
    pub fn source(&self) -> EventIndex {
        0
    }

    /// The project-end event (highest rank).
    pub fn sink(&self) -> EventIndex {
        self.events.len().saturating_sub(1)
    }

    /// Edges ordered by originating event, the order both passes rely on.
    pub fn edges_by_origin(&self) -> Vec<Edge> {
        let mut edges = self.edges.clone();
        edges.sort_by_key(|e| (e.from, e.to, e.activity));
        edges
    }

    pub fn activity(&self, id: ActivityId) -> &Activity {
        &self.activities[id as usize]
    }
}
