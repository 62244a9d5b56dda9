//! Feature data: fields, shape types, spatial references and feature classes.
//!
//! A [`FeatureClass`] is stored as a JSON document:
//!
//! ```json
//! {
//!   "shape_type": "POINT",
//!   "spatial_reference": { "wkid": 4326 },
//!   "oid_field_name": "OBJECTID",
//!   "shape_field_name": "SHAPE",
//!   "fields": [{ "name": "OBJECTID", "field_type": "OID" }, ...],
//!   "rows": [{ "OBJECTID": 1, "SHAPE": { "x": 12.2, "y": 51.8 }, ... }]
//! }
//! ```
//!
//! Geometries are kept as opaque JSON values.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// One attribute row, keyed by field name.
pub type Row = Map<String, Value>;

/// Field types known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "OID")]
    Oid,
    Geometry,
    Date,
    Double,
    Integer,
    String,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Oid => "OID",
            FieldType::Geometry => "Geometry",
            FieldType::Date => "Date",
            FieldType::Double => "Double",
            FieldType::Integer => "Integer",
            FieldType::String => "String",
        }
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OID" => Ok(FieldType::Oid),
            "Geometry" => Ok(FieldType::Geometry),
            "Date" => Ok(FieldType::Date),
            "Double" => Ok(FieldType::Double),
            "Integer" => Ok(FieldType::Integer),
            "String" => Ok(FieldType::String),
            other => Err(Error::validation(format!("unknown field type '{}'", other))),
        }
    }
}

/// Geometry types of a feature class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeType {
    #[serde(alias = "Point")]
    Point,
    #[serde(alias = "Polyline")]
    Polyline,
    #[serde(alias = "Polygon")]
    Polygon,
    #[serde(alias = "Multipoint")]
    Multipoint,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Point => "POINT",
            ShapeType::Polyline => "POLYLINE",
            ShapeType::Polygon => "POLYGON",
            ShapeType::Multipoint => "MULTIPOINT",
        }
    }
}

impl FromStr for ShapeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Point" | "POINT" => Ok(ShapeType::Point),
            "Polyline" | "POLYLINE" => Ok(ShapeType::Polyline),
            "Polygon" | "POLYGON" => Ok(ShapeType::Polygon),
            "Multipoint" | "MULTIPOINT" => Ok(ShapeType::Multipoint),
            other => Err(Error::validation(format!("unknown shape type '{}'", other))),
        }
    }
}

/// A field of a table or feature class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpField {
    pub name: String,
    pub field_type: FieldType,
}

impl GpField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Spatial reference identified by its well-known id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: i32,
}

fn default_oid_field_name() -> String {
    "OBJECTID".to_string()
}

fn default_shape_field_name() -> String {
    "SHAPE".to_string()
}

/// A JSON-backed feature class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureClass {
    pub shape_type: ShapeType,
    pub spatial_reference: SpatialReference,
    #[serde(default = "default_oid_field_name")]
    pub oid_field_name: String,
    #[serde(default = "default_shape_field_name")]
    pub shape_field_name: String,
    #[serde(default)]
    pub fields: Vec<GpField>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl FeatureClass {
    /// Empty feature class with an `OBJECTID` and a `SHAPE` field.
    pub fn new(shape_type: ShapeType, spatial_reference: SpatialReference) -> Self {
        Self::with_system_fields(
            shape_type,
            spatial_reference,
            default_oid_field_name(),
            default_shape_field_name(),
        )
    }

    /// Empty feature class whose OID and shape fields have the given names.
    pub fn with_system_fields(
        shape_type: ShapeType,
        spatial_reference: SpatialReference,
        oid_field_name: impl Into<String>,
        shape_field_name: impl Into<String>,
    ) -> Self {
        let oid_field_name = oid_field_name.into();
        let shape_field_name = shape_field_name.into();
        Self {
            shape_type,
            spatial_reference,
            fields: vec![
                GpField::new(oid_field_name.clone(), FieldType::Oid),
                GpField::new(shape_field_name.clone(), FieldType::Geometry),
            ],
            oid_field_name,
            shape_field_name,
            rows: Vec::new(),
        }
    }

    /// Read and validate a feature class document.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::not_found(format!("dataset {}", path.display())));
        }
        let contents = std::fs::read_to_string(path)?;
        let feature_class: FeatureClass = serde_json::from_str(&contents)?;
        feature_class.validate()?;
        Ok(feature_class)
    }

    /// Write to a new file; an existing dataset is never overwritten.
    ///
    /// A failed write removes the partial file again.
    pub fn create(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    Error::validation(format!("dataset {} already exists", path.display()))
                }
                _ => Error::Io(e),
            })?;
        write_or_remove(file, path, json.as_bytes())
    }

    /// Fields other than the OID and shape fields.
    pub fn attribute_fields(&self) -> impl Iterator<Item = &GpField> {
        self.fields
            .iter()
            .filter(move |f| f.name != self.oid_field_name && f.name != self.shape_field_name)
    }

    pub fn field(&self, name: &str) -> Option<&GpField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Add an attribute field. Names must be unique.
    pub fn add_field(&mut self, field: GpField) -> Result<()> {
        if field.name.trim().is_empty() {
            return Err(Error::validation("field name cannot be empty"));
        }
        if self.field(&field.name).is_some() {
            return Err(Error::validation(format!("field '{}' already exists", field.name)));
        }
        if matches!(field.field_type, FieldType::Oid | FieldType::Geometry) {
            return Err(Error::validation(format!(
                "field '{}': a feature class has exactly one {} field",
                field.name,
                field.field_type.as_str()
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Append a row, assigning the next object id. Returns the new id.
    ///
    /// Attributes naming unknown fields are rejected.
    pub fn insert_row(&mut self, shape: Value, attributes: Row) -> Result<i64> {
        let mut row = Row::new();
        for (name, value) in attributes {
            match self.field(&name) {
                Some(f) if f.field_type == FieldType::Oid || f.field_type == FieldType::Geometry => {
                    return Err(Error::validation(format!("field '{}' is not writable", name)));
                }
                Some(_) => {
                    row.insert(name, value);
                }
                None => return Err(Error::not_found(format!("field '{}'", name))),
            }
        }

        let oid = self.rows.len() as i64 + 1;
        row.insert(self.oid_field_name.clone(), Value::from(oid));
        row.insert(self.shape_field_name.clone(), shape);
        self.rows.push(row);
        Ok(oid)
    }

    pub fn shape(&self, row: &Row) -> Value {
        row.get(&self.shape_field_name).cloned().unwrap_or(Value::Null)
    }

    fn validate(&self) -> Result<()> {
        match self.field(&self.oid_field_name) {
            Some(f) if f.field_type == FieldType::Oid => {}
            _ => {
                return Err(Error::validation(format!(
                    "missing OID field '{}'",
                    self.oid_field_name
                )))
            }
        }
        match self.field(&self.shape_field_name) {
            Some(f) if f.field_type == FieldType::Geometry => {}
            _ => {
                return Err(Error::validation(format!(
                    "missing shape field '{}'",
                    self.shape_field_name
                )))
            }
        }
        Ok(())
    }
}

fn write_or_remove(mut writer: impl Write, path: &Path, contents: &[u8]) -> Result<()> {
    let written = writer.write_all(contents).and_then(|()| writer.flush());
    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = std::fs::remove_file(path) {
            tracing::warn!("could not remove partial dataset {}: {}", path.display(), remove_err);
        }
        return Err(Error::Io(e));
    }
    Ok(())
}
