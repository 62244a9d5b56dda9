//! The tool contract every geoprocessing tool implements.

use super::messages::MessageSink;
use super::parameter::{GpParameter, ParameterMap};
use crate::types::Result;

/// A geoprocessing tool.
///
/// Implementations are shared between threads through their toolbox, hence
/// `Send + Sync`. Any error returned from [`GpTool::execute`] reaches the
/// caller unchanged.
pub trait GpTool: Send + Sync {
    /// Label the host shows and looks the tool up by.
    fn label(&self) -> &str;

    fn description(&self) -> &str;

    /// Parameter descriptors, in the order the host should present them.
    fn parameters(&self) -> Vec<GpParameter>;

    fn execute(&self, parameters: &ParameterMap, messages: &mut dyn MessageSink) -> Result<()>;
}

impl std::fmt::Debug for dyn GpTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpTool").field("label", &self.label()).finish()
    }
}
