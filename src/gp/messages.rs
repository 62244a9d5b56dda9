//! Execution messages.
//!
//! Tools report progress through a [`MessageSink`]. [`GpMessages`] is the
//! append-only log used by the registry, the CLI and the host bindings.

use crate::types::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message severity, mirroring the host's message / warning / error channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Destination for messages emitted during tool execution.
pub trait MessageSink {
    fn add(&mut self, severity: Severity, text: &str);

    fn add_message(&mut self, text: &str) {
        self.add(Severity::Info, text);
    }

    fn add_warning(&mut self, text: &str) {
        self.add(Severity::Warning, text);
    }

    fn add_error(&mut self, text: &str) {
        self.add(Severity::Error, text);
    }
}

/// A single recorded message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpMessage {
    pub severity: Severity,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for GpMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Info => write!(f, "{}", self.text),
            Severity::Warning => write!(f, "WARNING: {}", self.text),
            Severity::Error => write!(f, "ERROR: {}", self.text),
        }
    }
}

/// Append-only message log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpMessages {
    messages: Vec<GpMessage>,
}

impl GpMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GpMessage> {
        self.messages.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSink for GpMessages {
    fn add(&mut self, severity: Severity, text: &str) {
        self.messages.push(GpMessage {
            severity,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }
}

impl<'a> IntoIterator for &'a GpMessages {
    type Item = &'a GpMessage;
    type IntoIter = std::slice::Iter<'a, GpMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Combine a tool run with the forwarding of its messages to another sink.
///
/// The tool's own error wins over a forwarding failure.
pub fn forwarded_outcome<E: From<Error>>(
    run: crate::types::Result<()>,
    forwarded: std::result::Result<(), E>,
) -> std::result::Result<(), E> {
    run?;
    forwarded
}
