//! arcrs command line - list, describe and run registered geoprocessing tools.
//!
//! ```text
//! arcrs list
//! arcrs describe CopyWithSchema
//! arcrs run CopyWithSchema --params '{"in_features": "a.json", "out_features": "b.json"}'
//! ```

use arcrs::gp::{GpMessages, ParameterMap};
use arcrs::{default_factory, Config, ToolRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "arcrs", version, about = "Run geoprocessing tools implemented in Rust")]
struct Cli {
    /// JSON config file listing the toolboxes to load.
    #[arg(long, env = "ARCRS_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the label of every registered tool.
    List,
    /// Print a tool's description and parameters as JSON.
    Describe { label: String },
    /// Execute a tool.
    Run {
        label: String,
        /// Parameter values as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
        /// Validate the parameters before running.
        #[arg(long)]
        check: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Initialize observability
    arcrs::observability::init_tracing_with(&config.observability);

    let registry = ToolRegistry::from_config(&config, &default_factory())?;

    match cli.command {
        Command::List => {
            for label in registry.list_tools() {
                println!("{}", label);
            }
        }
        Command::Describe { label } => {
            let Some(tool) = registry.find_tool(&label) else {
                eprintln!("unknown tool: {}", label);
                return Ok(ExitCode::from(2));
            };
            let description = serde_json::json!({
                "label": tool.label(),
                "description": tool.description(),
                "toolbox": tool.toolbox().label(),
                "parameters": tool.parameter_info(),
            });
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Command::Run {
            label,
            params,
            check,
        } => {
            let Some(tool) = registry.find_tool(&label) else {
                eprintln!("unknown tool: {}", label);
                return Ok(ExitCode::from(2));
            };
            let parameters: ParameterMap = serde_json::from_str(&params)?;

            if check {
                let errors = tool.validate(&parameters);
                if !errors.is_empty() {
                    for error in errors {
                        eprintln!("{}", error);
                    }
                    return Ok(ExitCode::from(2));
                }
            }

            let mut messages = GpMessages::new();
            let result = tool.execute(&parameters, &mut messages);
            for message in &messages {
                println!("{}", message);
            }
            result?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
