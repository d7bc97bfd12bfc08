//! Shared library for cross-cutting concerns of the key vault expiry checker.
//!
//! This crate provides centralized implementations for:
//! - HTTP client configuration and building
//! - Tracing subscriber initialisation
//! - GitHub Actions host integration (inputs and workflow annotations)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
pub mod http;
pub mod tracing_config;

pub use actions::{ActionInputs, HostEnvironment};
pub use http::{HttpConfig, build_http_client};
pub use tracing_config::{TracingConfig, init_tracing};
