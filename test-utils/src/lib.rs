//! Shared test utilities for the key vault expiry checker.
//!
//! This crate provides:
//! - Proptest generators for secret records and reference instants
//! - An in-memory, paginated secret source
//! - Fixtures for the documented scenarios

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{InMemorySecretSource, MockSourceError};
