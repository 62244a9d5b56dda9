//! # arcrs - Geoprocessing tools in Rust
//!
//! Implements geoprocessing tools natively and publishes them to a
//! geoprocessing host:
//! - A typed tool API (`gp`): parameter descriptors, parameter values,
//!   messages, feature classes
//! - Toolboxes created on demand by an injected provider (`toolbox`)
//! - A registry listing every tool and finding tools by label (`registry`)
//! - The "Rust Copy Tools" toolbox (`copy_tools`)
//! - Python host bindings behind the `py-bindings` feature
//!
//! ## Architecture
//!
//! ```text
//!   Config.toolboxes ──► ToolboxProvider ──► Toolbox ──► ToolHandle ...
//!                                                            │
//!                               ToolRegistry ◄───────────────┘
//!                          list_tools() / find_tool(label)
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod copy_tools;
pub mod gp;
pub mod registry;
pub mod toolbox;
pub mod types;

#[cfg(feature = "py-bindings")]
pub mod python;

// Internal utilities
pub mod observability;

pub use registry::{ToolRecord, ToolRegistry};
pub use toolbox::{default_factory, ToolHandle, Toolbox, ToolboxFactory, ToolboxProvider};
pub use types::{Config, Error, Result, ToolboxSpec};
