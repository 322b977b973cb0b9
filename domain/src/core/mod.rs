//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: text helpers shared by prompts and parsers

pub mod error;
pub mod string;
