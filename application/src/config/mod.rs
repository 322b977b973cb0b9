//! Application-level configuration.
//!
//! - [`RouterParams`]: call timeouts and cross-provider fallback order

pub mod router_params;

pub use router_params::RouterParams;
