//! Event network construction.
//!
//! Turns a flat job table into a ranked event graph in three stages:
//! grouping jobs into events by precedence set, ranking the events
//! topologically, and binding every job to its two events.

mod edges;
mod ranking;
mod synthesis;
mod types;

pub use edges::{resolve_edges, EdgeError, Endpoint};
pub use ranking::{rank_events, RankedNetwork, RankingError};
pub use synthesis::{synthesize_events, SynthesisError, SynthesizedNetwork};
pub use types::{
    Activity, ActivityId, ActivityKind, Edge, Event, EventIndex, EventNetwork, SynthesizedEvent,
};
