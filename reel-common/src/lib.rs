//! Reel Common - Shared configuration, errors, and logging for Reel Check.
//!
//! This crate provides:
//! - Configuration types, file loading, and environment overrides
//! - Configuration validation
//! - The unified error type with HTTP status mapping
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{Config, EngineKind, LimitsConfig, LlmConfig, ObservabilityConfig, ServerConfig};
pub use error::Error;
pub use logging::{init_logging, LogFormat};
pub use validation::{Validate, ValidationError, ValidationResult};
