//! "Rust Copy Tools" - the toolbox shipped with the crate.
//!
//! - `Copy`: copies a dataset file byte for byte.
//! - `CopyWithSchema`: recreates a feature class with its schema and rows.

mod copy;
mod copy_with_schema;

pub use copy::CopyTool;
pub use copy_with_schema::CopyWithSchemaTool;

use crate::gp::GpTool;
use std::sync::Arc;

/// Display label of the toolbox.
pub const LABEL: &str = "Rust Copy Tools";
/// Alias the toolbox is registered under.
pub const ALIAS: &str = "rust_copy_tools";

/// The toolbox's tools, in presentation order.
pub fn tools() -> Vec<Arc<dyn GpTool>> {
    vec![Arc::new(CopyTool) as Arc<dyn GpTool>, Arc::new(CopyWithSchemaTool)]
}
