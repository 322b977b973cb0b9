//! Editorial session domain.
//!
//! - [`entities::Session`]: one run of the editorial protocol and its lifecycle
//! - [`entities::TranscriptMessage`]: an append-only transcript line
//! - [`deliverable::Deliverable`]: an approvable synthesis output
//! - [`synthesis::SynthesisDraft`]: coordinator output before persistence

pub mod deliverable;
pub mod entities;
pub mod synthesis;
