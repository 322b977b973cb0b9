//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod autopilot;
pub mod call_ai;
pub mod compile_analysis;
pub mod manage_config;
pub mod moderation;
pub mod notify;
pub mod plan_tasks;
pub mod run_session;
