//! Toolboxes - ordered tool sets, their handles, and the providers that create them.

pub mod factory;
#[allow(clippy::module_inception)]
pub mod toolbox;

pub use factory::{default_factory, ToolboxFactory, ToolboxProvider};
pub use toolbox::{ToolHandle, Toolbox};
