//! End-to-end: default config → registry → copy tools on real files.

use arcrs::gp::{FeatureClass, GpMessages, ParameterMap};
use arcrs::{default_factory, Config, Error, ToolRegistry, ToolboxSpec};
use pretty_assertions::assert_eq;
use serde_json::json;

fn registry() -> ToolRegistry {
    ToolRegistry::from_config(&Config::default(), &default_factory()).unwrap()
}

#[test]
fn default_registry_lists_copy_tools() {
    let registry = registry();
    assert_eq!(registry.list_tools(), vec!["Copy", "CopyWithSchema"]);
    assert_eq!(
        registry.find_tool("CopyWithSchema").unwrap().label(),
        "CopyWithSchema"
    );
    assert!(registry.find_tool("Missing").is_none());
    assert!(registry.find_tool("copy").is_none());
}

#[test]
fn unknown_alias_fails_construction() {
    let err = ToolRegistry::new(
        &default_factory(),
        &[
            ToolboxSpec::new("Rust Copy Tools", "rust_copy_tools"),
            ToolboxSpec::new("Raster Tools", "rust_raster_tools"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, Error::ProviderInit(_)));
}

#[test]
fn copy_with_schema_through_registry() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stations.json");
    let output = dir.path().join("stations_copy.json");
    let doc = json!({
        "shape_type": "POINT",
        "spatial_reference": { "wkid": 4326 },
        "fields": [
            { "name": "OBJECTID", "field_type": "OID" },
            { "name": "SHAPE", "field_type": "Geometry" },
            { "name": "Elevation", "field_type": "Double" }
        ],
        "rows": [
            { "OBJECTID": 5, "SHAPE": { "x": 12.24555, "y": 51.83864 }, "Elevation": 61.5 }
        ]
    });
    std::fs::write(&input, doc.to_string()).unwrap();

    let tool = registry().find_tool("CopyWithSchema").unwrap().clone();
    let mut params = ParameterMap::new();
    params.insert("in_features".into(), input.as_path().into());
    params.insert("out_features".into(), output.as_path().into());
    assert!(tool.validate(&params).is_empty());

    let mut messages = GpMessages::new();
    tool.execute(&params, &mut messages).unwrap();

    let copy = FeatureClass::read(&output).unwrap();
    assert_eq!(copy.rows.len(), 1);
    assert_eq!(copy.rows[0]["OBJECTID"], json!(1));
    assert_eq!(copy.rows[0]["Elevation"], json!(61.5));
    assert_eq!(messages.texts().last(), Some(&"Copy features done."));
}

#[test]
fn copy_through_registry_reports_validation() {
    let tool = registry().find_tool("Copy").unwrap().clone();
    let errors = tool.validate(&ParameterMap::new());
    assert_eq!(
        errors,
        vec![
            "Missing required parameter: in_dataset",
            "Missing required parameter: out_dataset"
        ]
    );

    let err = tool
        .execute(&ParameterMap::new(), &mut GpMessages::new())
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
