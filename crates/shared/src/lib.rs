//! Shared types, errors, and configuration for divvy.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for participants, expenses and groups
//! - Currency codes and money values with decimal precision
//! - Application-wide error types
//! - Engine configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, EngineConfigError, RateCacheConfig};
pub use error::{AppError, AppResult};
