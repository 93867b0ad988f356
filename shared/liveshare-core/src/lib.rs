//! Liveshare Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait every liveshare microservice implements
//! - Runtime bootstrap with signal-driven graceful shutdown
//! - Common domain types (RecordId)
//! - Error handling utilities
//! - Runtime configuration

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{LiveshareError, Result};
pub use service::{LiveshareService, MicroserviceRuntime};
