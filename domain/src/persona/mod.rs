//! Persona domain.
//!
//! - [`entities::Persona`]: a broadcast team member
//! - [`entities::AgentConfig`]: per-persona provider settings and call statistics
//! - [`defaults`]: compiled-in configs and the standard team

pub mod defaults;
pub mod entities;
