use crate::gp::{
    required_text, DataType, Direction, FeatureClass, GpField, GpParameter, GpTool, MessageSink,
    ParameterMap, ParameterType, Row,
};
use crate::types::Result;

/// Copies features into a new feature class with the same schema.
///
/// The output gets the input's shape type and spatial reference, a fresh OID
/// field, and every attribute field. Object ids are renumbered from 1. The
/// output's OID and shape fields are `OBJECTID` and `SHAPE` unless an
/// attribute field already uses that name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyWithSchemaTool;

impl CopyWithSchemaTool {
    pub const IN_FEATURES: &'static str = "in_features";
    pub const OUT_FEATURES: &'static str = "out_features";
}

impl GpTool for CopyWithSchemaTool {
    fn label(&self) -> &str {
        "CopyWithSchema"
    }

    fn description(&self) -> &str {
        "Copies features from one feature class into another."
    }

    fn parameters(&self) -> Vec<GpParameter> {
        vec![
            GpParameter {
                display_name: "Input Features".to_string(),
                name: Self::IN_FEATURES.to_string(),
                data_type: DataType::GPFeatureRecordSetLayer,
                parameter_type: ParameterType::Required,
                direction: Direction::Input,
            },
            GpParameter {
                display_name: "Output Features".to_string(),
                name: Self::OUT_FEATURES.to_string(),
                data_type: DataType::DEFeatureClass,
                parameter_type: ParameterType::Required,
                direction: Direction::Output,
            },
        ]
    }

    fn execute(&self, parameters: &ParameterMap, messages: &mut dyn MessageSink) -> Result<()> {
        let in_path = required_text(parameters, Self::IN_FEATURES)?;
        let out_path = required_text(parameters, Self::OUT_FEATURES)?;
        messages.add_message("Copy features...");

        let input = FeatureClass::read(in_path)?;
        messages.add_message(&format!(
            "{} {} feature(s), wkid {}",
            input.rows.len(),
            input.shape_type.as_str(),
            input.spatial_reference.wkid
        ));

        let attribute_fields: Vec<GpField> = input.attribute_fields().cloned().collect();
        let mut taken: Vec<&str> = attribute_fields.iter().map(|f| f.name.as_str()).collect();
        let oid_field_name = system_field_name("OBJECTID", &taken);
        taken.push(&oid_field_name);
        let shape_field_name = system_field_name("SHAPE", &taken);
        let mut output = FeatureClass::with_system_fields(
            input.shape_type,
            input.spatial_reference,
            oid_field_name,
            shape_field_name,
        );
        for field in &attribute_fields {
            messages.add_message(&format!("Field {} ({})", field.name, field.field_type.as_str()));
            output.add_field(field.clone())?;
        }

        for row in &input.rows {
            let mut attributes = Row::new();
            for field in &attribute_fields {
                if let Some(value) = row.get(&field.name) {
                    attributes.insert(field.name.clone(), value.clone());
                }
            }
            output.insert_row(input.shape(row), attributes)?;
        }

        output.create(out_path)?;
        messages.add_message(&format!("{} feature(s) written to {}", output.rows.len(), out_path));
        messages.add_message("Copy features done.");

        Ok(())
    }
}

/// `base`, or `base_1`, `base_2`, ... if an attribute field already has that name.
fn system_field_name(base: &str, taken: &[&str]) -> String {
    let mut name = base.to_string();
    let mut suffix = 0;
    while taken.contains(&name.as_str()) {
        suffix += 1;
        name = format!("{}_{}", base, suffix);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::{FieldType, GpMessages, ShapeType, SpatialReference};
    use crate::types::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::Path;

    fn write_input(path: &Path) {
        // Non-default OID/shape names, so the copy must translate them.
        let doc = json!({
            "shape_type": "Point",
            "spatial_reference": { "wkid": 25832 },
            "oid_field_name": "FID",
            "shape_field_name": "Shape",
            "fields": [
                { "name": "FID", "field_type": "OID" },
                { "name": "Shape", "field_type": "Geometry" },
                { "name": "Name", "field_type": "String" },
                { "name": "Population", "field_type": "Integer" }
            ],
            "rows": [
                { "FID": 10, "Shape": { "x": 1.0, "y": 2.0 }, "Name": "Dessau", "Population": 74000 },
                { "FID": 20, "Shape": { "x": 3.0, "y": 4.0 }, "Name": "Halle" }
            ]
        });
        std::fs::write(path, serde_json::to_string(&doc).unwrap()).unwrap();
    }

    fn params(input: &Path, output: &Path) -> ParameterMap {
        let mut params = ParameterMap::new();
        params.insert(CopyWithSchemaTool::IN_FEATURES.into(), input.into());
        params.insert(CopyWithSchemaTool::OUT_FEATURES.into(), output.into());
        params
    }

    #[test]
    fn test_copies_schema_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cities.json");
        let output = dir.path().join("cities_copy.json");
        write_input(&input);

        let mut messages = GpMessages::new();
        CopyWithSchemaTool
            .execute(&params(&input, &output), &mut messages)
            .unwrap();

        let copy = FeatureClass::read(&output).unwrap();
        assert_eq!(copy.shape_type, ShapeType::Point);
        assert_eq!(copy.spatial_reference, SpatialReference { wkid: 25832 });
        assert_eq!(
            copy.fields,
            vec![
                GpField::new("OBJECTID", FieldType::Oid),
                GpField::new("SHAPE", FieldType::Geometry),
                GpField::new("Name", FieldType::String),
                GpField::new("Population", FieldType::Integer),
            ]
        );
        assert_eq!(copy.rows.len(), 2);
        assert_eq!(copy.rows[0]["OBJECTID"], json!(1));
        assert_eq!(copy.rows[0]["SHAPE"], json!({ "x": 1.0, "y": 2.0 }));
        assert_eq!(copy.rows[0]["Population"], json!(74000));
        assert_eq!(copy.rows[1]["OBJECTID"], json!(2));
        assert_eq!(copy.rows[1]["Name"], json!("Halle"));
        assert!(copy.rows[1].get("Population").is_none());

        let texts = messages.texts();
        assert_eq!(texts.first(), Some(&"Copy features..."));
        assert_eq!(texts.last(), Some(&"Copy features done."));
        assert!(texts.contains(&"Field Name (String)"));
    }

    #[test]
    fn test_attribute_named_like_output_system_fields() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("parcels.json");
        let output = dir.path().join("parcels_copy.json");
        let doc = json!({
            "shape_type": "POLYGON",
            "spatial_reference": { "wkid": 4326 },
            "oid_field_name": "FID",
            "shape_field_name": "Geom",
            "fields": [
                { "name": "FID", "field_type": "OID" },
                { "name": "Geom", "field_type": "Geometry" },
                { "name": "OBJECTID", "field_type": "Integer" },
                { "name": "SHAPE", "field_type": "String" },
                { "name": "SHAPE_1", "field_type": "String" }
            ],
            "rows": [
                { "FID": 5, "Geom": { "rings": [] }, "OBJECTID": 900, "SHAPE": "square", "SHAPE_1": "x" }
            ]
        });
        std::fs::write(&input, serde_json::to_string(&doc).unwrap()).unwrap();

        CopyWithSchemaTool
            .execute(&params(&input, &output), &mut GpMessages::new())
            .unwrap();

        let copy = FeatureClass::read(&output).unwrap();
        assert_eq!(copy.oid_field_name, "OBJECTID_1");
        assert_eq!(copy.shape_field_name, "SHAPE_2");
        let names: Vec<&str> = copy.attribute_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["OBJECTID", "SHAPE", "SHAPE_1"]);
        assert_eq!(copy.rows[0]["OBJECTID_1"], json!(1));
        assert_eq!(copy.rows[0]["OBJECTID"], json!(900));
        assert_eq!(copy.rows[0]["SHAPE"], json!("square"));
        assert_eq!(copy.rows[0]["SHAPE_2"], json!({ "rings": [] }));
    }

    #[test]
    fn test_system_field_name_skips_taken() {
        assert_eq!(system_field_name("SHAPE", &["Name"]), "SHAPE");
        assert_eq!(system_field_name("SHAPE", &["SHAPE", "SHAPE_1"]), "SHAPE_2");
    }

    #[test]
    fn test_missing_input_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = CopyWithSchemaTool
            .execute(
                &params(&dir.path().join("missing.json"), &dir.path().join("out.json")),
                &mut GpMessages::new(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_existing_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cities.json");
        let output = dir.path().join("taken.json");
        write_input(&input);
        std::fs::write(&output, "keep").unwrap();

        let err = CopyWithSchemaTool
            .execute(&params(&input, &output), &mut GpMessages::new())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep");
    }

    #[test]
    fn test_missing_parameter() {
        let mut params = ParameterMap::new();
        params.insert(CopyWithSchemaTool::IN_FEATURES.into(), "in.json".into());
        let mut messages = GpMessages::new();
        let err = CopyWithSchemaTool.execute(&params, &mut messages).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(messages.is_empty());
    }
}
