//! Parameter descriptors, parameter values, and validation.
//!
//! Descriptors use the host's spellings (`GPFeatureLayer`, `Required`,
//! `Input`, ...) so they can be handed to the host unchanged.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// Descriptor enums
// =============================================================================

/// Geoprocessing data types a parameter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    GPFeatureLayer,
    GPFeatureRecordSetLayer,
    DEFeatureClass,
    DEFile,
    DEFolder,
    GPString,
    GPLong,
    GPDouble,
    GPBoolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::GPFeatureLayer => "GPFeatureLayer",
            DataType::GPFeatureRecordSetLayer => "GPFeatureRecordSetLayer",
            DataType::DEFeatureClass => "DEFeatureClass",
            DataType::DEFile => "DEFile",
            DataType::DEFolder => "DEFolder",
            DataType::GPString => "GPString",
            DataType::GPLong => "GPLong",
            DataType::GPDouble => "GPDouble",
            DataType::GPBoolean => "GPBoolean",
        }
    }

    /// True for types whose value is a path to a dataset, file or folder.
    pub fn is_dataset(&self) -> bool {
        matches!(
            self,
            DataType::GPFeatureLayer
                | DataType::GPFeatureRecordSetLayer
                | DataType::DEFeatureClass
                | DataType::DEFile
                | DataType::DEFolder
        )
    }

    fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (_, ParamValue::Null) => true,
            (DataType::GPLong, ParamValue::Integer(_)) => true,
            (DataType::GPDouble, ParamValue::Integer(_) | ParamValue::Double(_)) => true,
            (DataType::GPBoolean, ParamValue::Bool(_)) => true,
            (DataType::GPString, ParamValue::Text(_)) => true,
            (dt, ParamValue::Text(_)) if dt.is_dataset() => true,
            _ => false,
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GPFeatureLayer" => Ok(DataType::GPFeatureLayer),
            "GPFeatureRecordSetLayer" | "Feature-Set" => Ok(DataType::GPFeatureRecordSetLayer),
            "DEFeatureClass" => Ok(DataType::DEFeatureClass),
            "DEFile" => Ok(DataType::DEFile),
            "DEFolder" => Ok(DataType::DEFolder),
            "GPString" => Ok(DataType::GPString),
            "GPLong" => Ok(DataType::GPLong),
            "GPDouble" => Ok(DataType::GPDouble),
            "GPBoolean" => Ok(DataType::GPBoolean),
            other => Err(Error::validation(format!("unknown data type '{}'", other))),
        }
    }
}

/// Whether a parameter must, may, or cannot be supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    Required,
    Optional,
    Derived,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Required => "Required",
            ParameterType::Optional => "Optional",
            ParameterType::Derived => "Derived",
        }
    }
}

impl FromStr for ParameterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Required" => Ok(ParameterType::Required),
            "Optional" => Ok(ParameterType::Optional),
            "Derived" => Ok(ParameterType::Derived),
            other => Err(Error::validation(format!("unknown parameter type '{}'", other))),
        }
    }
}

/// Parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "Input",
            Direction::Output => "Output",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Input" => Ok(Direction::Input),
            "Output" => Ok(Direction::Output),
            other => Err(Error::validation(format!("unknown direction '{}'", other))),
        }
    }
}

// =============================================================================
// Parameter descriptor
// =============================================================================

/// Describes one parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpParameter {
    pub display_name: String,
    pub name: String,
    pub data_type: DataType,
    pub parameter_type: ParameterType,
    pub direction: Direction,
}

impl GpParameter {
    pub fn builder() -> GpParameterBuilder {
        GpParameterBuilder::new()
    }

    /// Must the caller supply a value?
    pub fn is_required(&self) -> bool {
        self.parameter_type == ParameterType::Required
    }
}

/// Builder for [`GpParameter`]. Defaults to an optional feature-layer input.
#[derive(Debug, Clone)]
pub struct GpParameterBuilder {
    display_name: String,
    name: String,
    data_type: DataType,
    parameter_type: ParameterType,
    direction: Direction,
}

impl Default for GpParameterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GpParameterBuilder {
    pub fn new() -> Self {
        Self {
            display_name: String::new(),
            name: String::new(),
            data_type: DataType::GPFeatureLayer,
            parameter_type: ParameterType::Optional,
            direction: Direction::Input,
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn parameter_type(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = parameter_type;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Finish the descriptor. The name is mandatory; the display name falls
    /// back to the name.
    pub fn build(self) -> Result<GpParameter> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("parameter name cannot be empty"));
        }
        let display_name = if self.display_name.is_empty() {
            self.name.clone()
        } else {
            self.display_name
        };
        Ok(GpParameter {
            display_name,
            name: self.name,
            data_type: self.data_type,
            parameter_type: self.parameter_type,
            direction: self.direction,
        })
    }
}

// =============================================================================
// Parameter values
// =============================================================================

/// Value supplied for a parameter at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    List(Vec<ParamValue>),
}

/// Parameter name → value, as passed to `execute`.
pub type ParameterMap = BTreeMap<String, ParamValue>;

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret a text value as a filesystem or catalog path.
    pub fn as_path(&self) -> Option<&Path> {
        self.as_str().map(Path::new)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(i) => Some(*i as f64),
            ParamValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Integer(_) => "integer",
            ParamValue::Double(_) => "double",
            ParamValue::Text(_) => "text",
            ParamValue::List(_) => "list",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Double(d) => write!(f, "{}", d),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::List(items) => {
                // The host joins multivalues with ';'
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(";"))
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&Path> for ParamValue {
    fn from(p: &Path) -> Self {
        ParamValue::Text(p.to_string_lossy().into_owned())
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Integer(i)
    }
}

impl From<f64> for ParamValue {
    fn from(d: f64) -> Self {
        ParamValue::Double(d)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// Fetch a required text parameter, e.g. a dataset path.
pub fn required_text<'a>(params: &'a ParameterMap, name: &str) -> Result<&'a str> {
    match params.get(name) {
        Some(ParamValue::Text(s)) if !s.is_empty() => Ok(s),
        Some(ParamValue::Text(_)) | Some(ParamValue::Null) | None => {
            Err(Error::validation(format!("missing required parameter: {}", name)))
        }
        Some(other) => Err(Error::validation(format!(
            "parameter '{}': expected text, got {}",
            name,
            other.kind()
        ))),
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Check supplied values against a tool's descriptors.
///
/// Returns a list of validation errors (empty = valid).
pub fn validate_parameters(defs: &[GpParameter], params: &ParameterMap) -> Vec<String> {
    let mut errors = Vec::new();

    for def in defs {
        let supplied = params.get(&def.name).filter(|v| !v.is_null());
        match (def.parameter_type, supplied) {
            (ParameterType::Required, None) => {
                errors.push(format!("Missing required parameter: {}", def.name));
            }
            (ParameterType::Derived, Some(_)) => {
                errors.push(format!("Parameter '{}' is derived and cannot be set", def.name));
            }
            _ => {}
        }
    }

    for (name, value) in params {
        match defs.iter().find(|d| &d.name == name) {
            Some(def) => {
                if !def.data_type.accepts(value) {
                    errors.push(format!(
                        "Parameter '{}': {} does not accept {}",
                        name,
                        def.data_type.as_str(),
                        value.kind()
                    ));
                }
            }
            None => errors.push(format!("Unknown parameter: {}", name)),
        }
    }

    errors
}
