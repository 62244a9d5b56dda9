//! Toolbox providers.
//!
//! The registry never reaches for a global module: it is handed a
//! [`ToolboxProvider`] and asks it for each configured `(label, alias)`.

use super::toolbox::Toolbox;
use crate::gp::GpTool;
use crate::types::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Creates toolboxes by label and alias.
pub trait ToolboxProvider {
    fn create_toolbox(&self, label: &str, alias: &str) -> Result<Toolbox>;
}

impl<F> ToolboxProvider for F
where
    F: Fn(&str, &str) -> Result<Toolbox>,
{
    fn create_toolbox(&self, label: &str, alias: &str) -> Result<Toolbox> {
        self(label, alias)
    }
}

type ToolSetFn = Box<dyn Fn() -> Vec<Arc<dyn GpTool>> + Send + Sync>;

/// Provider backed by a table of alias → tool set constructors.
#[derive(Default)]
pub struct ToolboxFactory {
    tool_sets: HashMap<String, ToolSetFn>,
}

impl fmt::Debug for ToolboxFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases: Vec<&String> = self.tool_sets.keys().collect();
        aliases.sort();
        f.debug_struct("ToolboxFactory")
            .field("aliases", &aliases)
            .finish()
    }
}

impl ToolboxFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tool set created for `alias`. A later registration for
    /// the same alias replaces the earlier one.
    pub fn register<F>(&mut self, alias: impl Into<String>, tool_set: F)
    where
        F: Fn() -> Vec<Arc<dyn GpTool>> + Send + Sync + 'static,
    {
        let alias = alias.into();
        if self.tool_sets.insert(alias.clone(), Box::new(tool_set)).is_some() {
            tracing::debug!("Replaced tool set for alias {}", alias);
        }
    }

    pub fn with<F>(mut self, alias: impl Into<String>, tool_set: F) -> Self
    where
        F: Fn() -> Vec<Arc<dyn GpTool>> + Send + Sync + 'static,
    {
        self.register(alias, tool_set);
        self
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.tool_sets.contains_key(alias)
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.tool_sets.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

impl ToolboxProvider for ToolboxFactory {
    fn create_toolbox(&self, label: &str, alias: &str) -> Result<Toolbox> {
        let tool_set = self.tool_sets.get(alias).ok_or_else(|| {
            Error::provider_init(format!(
                "no toolbox registered under alias '{}' (known: {})",
                alias,
                self.aliases().join(", ")
            ))
        })?;
        let toolbox = Toolbox::new(label, alias, tool_set())?;
        tracing::debug!(
            "Created toolbox label={} alias={} tools={}",
            label,
            alias,
            toolbox.tool_count()
        );
        Ok(toolbox)
    }
}

/// Factory with every toolbox shipped in this crate.
pub fn default_factory() -> ToolboxFactory {
    ToolboxFactory::new().with(crate::copy_tools::ALIAS, crate::copy_tools::tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::{GpParameter, MessageSink, ParameterMap};

    struct Named(&'static str);

    impl GpTool for Named {
        fn label(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            ""
        }

        fn parameters(&self) -> Vec<GpParameter> {
            Vec::new()
        }

        fn execute(&self, _: &ParameterMap, _: &mut dyn MessageSink) -> Result<()> {
            Ok(())
        }
    }

    fn factory() -> ToolboxFactory {
        ToolboxFactory::new().with("demo", || {
            vec![Arc::new(Named("One")) as Arc<dyn GpTool>, Arc::new(Named("Two"))]
        })
    }

    #[test]
    fn test_create_known_alias() {
        let toolbox = factory().create_toolbox("Demo Tools", "demo").unwrap();
        assert_eq!(toolbox.label(), "Demo Tools");
        assert_eq!(toolbox.tool_labels(), vec!["One", "Two"]);
    }

    #[test]
    fn test_unknown_alias_is_provider_error() {
        let err = factory().create_toolbox("Other", "other").unwrap_err();
        match err {
            Error::ProviderInit(msg) => assert!(msg.contains("'other'") && msg.contains("demo")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_blank_label_is_provider_error() {
        assert!(matches!(
            factory().create_toolbox("", "demo"),
            Err(Error::ProviderInit(_))
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut factory = factory();
        factory.register("demo", || vec![Arc::new(Named("Only")) as Arc<dyn GpTool>]);
        let toolbox = factory.create_toolbox("Demo", "demo").unwrap();
        assert_eq!(toolbox.tool_labels(), vec!["Only"]);
        assert_eq!(factory.aliases(), vec!["demo"]);
    }

    #[test]
    fn test_closure_provider() {
        let provider = |label: &str, alias: &str| -> Result<Toolbox> {
            Toolbox::new(label, alias, vec![Arc::new(Named("Inline")) as Arc<dyn GpTool>])
        };
        let toolbox = provider.create_toolbox("Inline Tools", "inline").unwrap();
        assert_eq!(toolbox.tool_labels(), vec!["Inline"]);
    }

    #[test]
    fn test_default_factory_has_copy_tools() {
        let factory = default_factory();
        assert!(factory.has_alias("rust_copy_tools"));
        let toolbox = factory
            .create_toolbox("Rust Copy Tools", "rust_copy_tools")
            .unwrap();
        assert_eq!(toolbox.tool_labels(), vec!["Copy", "CopyWithSchema"]);
    }
}
