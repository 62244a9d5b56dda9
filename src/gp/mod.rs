//! Geoprocessing API - the vocabulary tools are written against.
//!
//! Tools describe their parameters with [`GpParameter`], receive values as a
//! [`ParameterMap`] of closed [`ParamValue`] variants, and report progress
//! through a [`MessageSink`].

pub mod features;
pub mod messages;
pub mod parameter;
pub mod tool;

pub use features::{FeatureClass, FieldType, GpField, Row, ShapeType, SpatialReference};
pub use messages::{forwarded_outcome, GpMessage, GpMessages, MessageSink, Severity};
pub use parameter::{
    required_text, validate_parameters, DataType, Direction, GpParameter, GpParameterBuilder,
    ParamValue, ParameterMap, ParameterType,
};
pub use tool::GpTool;
