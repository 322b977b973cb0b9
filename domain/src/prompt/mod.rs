//! Prompt domain
//!
//! Templates for the coordinator's synthesis, planning and merge calls and
//! for each persona's analysis call.

mod template;

pub use template::PromptTemplate;
