//! Static scripted material: topic pools, persona lines and the
//! deterministic fallbacks used whenever an AI call cannot be used.

pub mod contributions;
pub mod templates;
pub mod topics;

pub use contributions::{contribution_pool, pick_contribution};
pub use topics::{pick_topic, topic_pool};
