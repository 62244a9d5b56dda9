use crate::gp::{
    required_text, DataType, Direction, GpParameter, GpTool, MessageSink, ParameterMap,
    ParameterType,
};
use crate::types::{Error, Result};
use std::path::Path;

/// Copies a dataset file to a new location.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyTool;

impl CopyTool {
    pub const IN_DATASET: &'static str = "in_dataset";
    pub const OUT_DATASET: &'static str = "out_dataset";
}

impl GpTool for CopyTool {
    fn label(&self) -> &str {
        "Copy"
    }

    fn description(&self) -> &str {
        "Copies a dataset to a new location."
    }

    fn parameters(&self) -> Vec<GpParameter> {
        vec![
            GpParameter {
                display_name: "Input Dataset".to_string(),
                name: Self::IN_DATASET.to_string(),
                data_type: DataType::DEFile,
                parameter_type: ParameterType::Required,
                direction: Direction::Input,
            },
            GpParameter {
                display_name: "Output Dataset".to_string(),
                name: Self::OUT_DATASET.to_string(),
                data_type: DataType::DEFile,
                parameter_type: ParameterType::Required,
                direction: Direction::Output,
            },
        ]
    }

    fn execute(&self, parameters: &ParameterMap, messages: &mut dyn MessageSink) -> Result<()> {
        let input = Path::new(required_text(parameters, Self::IN_DATASET)?);
        let output = Path::new(required_text(parameters, Self::OUT_DATASET)?);

        if !input.is_file() {
            return Err(Error::not_found(format!("dataset {}", input.display())));
        }
        if output.exists() {
            return Err(Error::validation(format!(
                "dataset {} already exists",
                output.display()
            )));
        }

        messages.add_message(&format!("Copying {} to {}...", input.display(), output.display()));
        let bytes = std::fs::copy(input, output)?;
        messages.add_message(&format!("Copy done ({} bytes).", bytes));

        Ok(())
    }
}
