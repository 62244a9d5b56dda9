//! Core types for arcrs.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (RunId, ToolboxAlias)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Toolbox and observability configuration

mod config;
mod errors;
mod ids;

pub use config::{Config, ObservabilityConfig, ToolboxSpec};
pub use errors::{Error, Result};
pub use ids::{RunId, ToolboxAlias};
