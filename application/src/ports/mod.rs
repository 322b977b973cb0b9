//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod credentials;
pub mod kv_store;
pub mod notifier;
pub mod provider;
pub mod roster;
