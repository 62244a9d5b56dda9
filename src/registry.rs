//! Tool registry - every tool of every configured toolbox, in one ordered table.
//!
//! The table is filled once at construction and never changes afterwards.
//! Lookups scan it front to back, so when two tools share a label the one
//! registered first is returned.

use crate::toolbox::{ToolHandle, ToolboxProvider};
use crate::types::{Config, Result, ToolboxSpec};
use std::collections::HashSet;
use std::sync::Arc;

/// A registered tool: its label captured at construction, plus its handle.
#[derive(Debug, Clone)]
pub struct ToolRecord {
    pub label: String,
    pub handle: ToolHandle,
}

/// Ordered, immutable set of tools gathered from one or more toolboxes.
#[derive(Debug)]
pub struct ToolRegistry {
    records: Vec<ToolRecord>,
}

impl ToolRegistry {
    /// Create a toolbox for every spec, in order, and register all of its tools.
    ///
    /// The first provider failure aborts construction and is returned as is.
    pub fn new(provider: &dyn ToolboxProvider, specs: &[ToolboxSpec]) -> Result<Self> {
        let mut records = Vec::new();

        for spec in specs {
            let toolbox = Arc::new(provider.create_toolbox(&spec.label, &spec.alias)?);
            let handles = toolbox.list_tools();
            tracing::debug!(
                "Registering {} tool(s) from toolbox {} ({})",
                handles.len(),
                spec.label,
                spec.alias
            );
            records.extend(handles.into_iter().map(|handle| ToolRecord {
                label: handle.label().to_string(),
                handle,
            }));
        }

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.label.as_str()) {
                tracing::warn!(
                    "Duplicate tool label '{}' (toolbox {}); lookups return the first registration",
                    record.label,
                    record.handle.toolbox().alias()
                );
            }
        }

        tracing::info!(
            "Tool registry ready: {} tool(s) from {} toolbox(es)",
            records.len(),
            specs.len()
        );
        Ok(Self { records })
    }

    /// Build from the toolboxes listed in `config`.
    pub fn from_config(config: &Config, provider: &dyn ToolboxProvider) -> Result<Self> {
        Self::new(provider, &config.toolboxes)
    }

    /// All labels, in registration order.
    pub fn list_tools(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.label.as_str()).collect()
    }

    /// First tool whose label equals `label` exactly.
    pub fn find_tool(&self, label: &str) -> Option<&ToolHandle> {
        self.records
            .iter()
            .find(|r| r.label == label)
            .map(|r| &r.handle)
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::{GpParameter, GpTool, MessageSink, ParameterMap};
    use crate::toolbox::{default_factory, Toolbox, ToolboxFactory};
    use crate::types::Error;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    struct Labelled {
        label: &'static str,
        description: &'static str,
    }

    impl GpTool for Labelled {
        fn label(&self) -> &str {
            self.label
        }

        fn description(&self) -> &str {
            self.description
        }

        fn parameters(&self) -> Vec<GpParameter> {
            Vec::new()
        }

        fn execute(&self, _: &ParameterMap, messages: &mut dyn MessageSink) -> Result<()> {
            messages.add_message(self.description);
            Ok(())
        }
    }

    fn tool(label: &'static str, description: &'static str) -> Arc<dyn GpTool> {
        Arc::new(Labelled { label, description })
    }

    fn factory() -> ToolboxFactory {
        ToolboxFactory::new()
            .with("first", || vec![tool("Buffer", "first buffer"), tool("Clip", "clip")])
            .with("second", || vec![tool("Dissolve", "dissolve"), tool("Buffer", "second buffer")])
    }

    fn specs() -> Vec<ToolboxSpec> {
        vec![
            ToolboxSpec::new("First Tools", "first"),
            ToolboxSpec::new("Second Tools", "second"),
        ]
    }

    #[test]
    fn test_copy_tools_example() {
        let registry = ToolRegistry::from_config(&Config::default(), &default_factory()).unwrap();

        assert_eq!(registry.list_tools(), vec!["Copy", "CopyWithSchema"]);
        assert_eq!(
            registry.find_tool("CopyWithSchema").unwrap().label(),
            "CopyWithSchema"
        );
        assert!(registry.find_tool("Missing").is_none());
    }

    #[test]
    fn test_provider_then_tool_order() {
        let registry = ToolRegistry::new(&factory(), &specs()).unwrap();
        assert_eq!(
            registry.list_tools(),
            vec!["Buffer", "Clip", "Dissolve", "Buffer"]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ToolRegistry::new(&factory(), &specs()).unwrap();
        assert!(registry.find_tool("clip").is_none());
        assert!(registry.find_tool("Clip").is_some());
    }

    #[test]
    #[traced_test]
    fn test_duplicate_label_first_match_wins() {
        let registry = ToolRegistry::new(&factory(), &specs()).unwrap();

        for _ in 0..3 {
            let handle = registry.find_tool("Buffer").unwrap();
            assert_eq!(handle.description(), "first buffer");
            assert_eq!(handle.toolbox().alias().as_str(), "first");
        }
        assert!(logs_contain("Duplicate tool label 'Buffer'"));
    }

    #[test]
    fn test_provider_failure_aborts() {
        let mut specs = specs();
        specs.insert(1, ToolboxSpec::new("Missing Tools", "missing"));

        let err = ToolRegistry::new(&factory(), &specs).unwrap_err();
        assert!(matches!(err, Error::ProviderInit(_)));
    }

    #[test]
    fn test_closure_provider_errors_propagate() {
        let provider = |_: &str, alias: &str| -> Result<Toolbox> {
            Err(Error::provider_init(format!("native resource for {} missing", alias)))
        };
        let err = ToolRegistry::new(&provider, &specs()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "toolbox provider failed: native resource for first missing"
        );
    }

    #[test]
    fn test_no_specs_gives_empty_registry() {
        let registry = ToolRegistry::new(&factory(), &[]).unwrap();
        assert!(registry.is_empty());
        assert!(registry.list_tools().is_empty());
        assert!(registry.find_tool("Buffer").is_none());
    }

    #[test]
    fn test_records_match_handles() {
        let registry = ToolRegistry::new(&factory(), &specs()).unwrap();
        for record in registry.tools() {
            assert_eq!(record.label, record.handle.label());
        }
    }
}
