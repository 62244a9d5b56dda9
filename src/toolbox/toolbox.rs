//! Toolboxes and tool handles.

use crate::gp::{validate_parameters, GpParameter, GpTool, MessageSink, ParameterMap};
use crate::types::{Error, Result, RunId, ToolboxAlias};
use std::sync::Arc;

/// An ordered set of tools published under one label and alias.
#[derive(Debug)]
pub struct Toolbox {
    label: String,
    alias: ToolboxAlias,
    tools: Vec<Arc<dyn GpTool>>,
}

impl Toolbox {
    /// Create a toolbox. Label and alias must not be blank.
    pub fn new(
        label: impl Into<String>,
        alias: impl Into<String>,
        tools: Vec<Arc<dyn GpTool>>,
    ) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(Error::provider_init("toolbox label cannot be empty"));
        }
        let alias = ToolboxAlias::from_string(alias.into()).map_err(Error::provider_init)?;
        Ok(Self { label, alias, tools })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn alias(&self) -> &ToolboxAlias {
        &self.alias
    }

    /// Handles to every tool, in the order the toolbox was built with.
    pub fn list_tools(self: &Arc<Self>) -> Vec<ToolHandle> {
        (0..self.tools.len())
            .map(|index| ToolHandle {
                toolbox: Arc::clone(self),
                index,
            })
            .collect()
    }

    /// Labels of every tool, in order.
    pub fn tool_labels(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.label().to_string()).collect()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn tool_label(&self, index: usize) -> Result<&str> {
        Ok(self.tool(index)?.label())
    }

    pub fn tool_description(&self, index: usize) -> Result<&str> {
        Ok(self.tool(index)?.description())
    }

    pub fn tool_parameter_info(&self, index: usize) -> Result<Vec<GpParameter>> {
        Ok(self.tool(index)?.parameters())
    }

    /// Execute the tool at `index`. The tool's own error is returned as is.
    pub fn tool_execute(
        &self,
        index: usize,
        parameters: &ParameterMap,
        messages: &mut dyn MessageSink,
    ) -> Result<()> {
        let tool = self.tool(index)?;
        let run_id = RunId::new();
        let span = tracing::info_span!(
            "tool_execute",
            toolbox = %self.alias,
            tool = tool.label(),
            run_id = %run_id
        );
        let _enter = span.enter();

        tracing::debug!("executing with {} parameter(s)", parameters.len());
        let result = tool.execute(parameters, messages);
        match &result {
            Ok(()) => tracing::debug!("execution finished"),
            Err(e) => tracing::warn!("execution failed: {}", e),
        }
        result
    }

    fn tool(&self, index: usize) -> Result<&dyn GpTool> {
        self.tools.get(index).map(|t| t.as_ref()).ok_or_else(|| {
            Error::not_found(format!(
                "tool index {} in toolbox '{}' ({} tools)",
                index,
                self.alias,
                self.tools.len()
            ))
        })
    }
}

/// Lightweight reference to one tool of a toolbox.
///
/// Every accessor delegates to the underlying tool without transformation.
#[derive(Debug, Clone)]
pub struct ToolHandle {
    toolbox: Arc<Toolbox>,
    index: usize,
}

impl ToolHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    pub fn label(&self) -> &str {
        self.tool().label()
    }

    pub fn description(&self) -> &str {
        self.tool().description()
    }

    pub fn parameter_info(&self) -> Vec<GpParameter> {
        self.tool().parameters()
    }

    /// Check `parameters` against this tool's descriptors without running it.
    pub fn validate(&self, parameters: &ParameterMap) -> Vec<String> {
        validate_parameters(&self.parameter_info(), parameters)
    }

    pub fn execute(&self, parameters: &ParameterMap, messages: &mut dyn MessageSink) -> Result<()> {
        self.toolbox.tool_execute(self.index, parameters, messages)
    }

    // Handles are only built by `Toolbox::list_tools`, so the index is in range.
    fn tool(&self) -> &dyn GpTool {
        self.toolbox.tools[self.index].as_ref()
    }
}
