//! Python host bindings (feature `py-bindings`).
//!
//! Builds the `arcrs` extension module. A Python toolbox (`.pyt`) only has to
//! forward to these objects:
//!
//! ```python
//! import arcrs
//!
//! registry = arcrs.ToolRegistry()
//! tool = registry.find_tool("CopyWithSchema")
//! if tool is not None:
//!     tool.execute(parameters, messages)
//! ```
//!
//! Parameters may be a dict or a sequence of host parameter objects (`name`
//! plus `valueAsText`). Messages are replayed onto the host sink after the
//! tool returns, including when it fails.

// pyo3's macros expand to unsafe FFI glue.
#![allow(unsafe_code)]

use crate::gp::{
    forwarded_outcome, GpMessages, GpParameter, ParamValue, ParameterMap, Severity,
};
use crate::registry::ToolRegistry;
use crate::toolbox::{default_factory, ToolHandle, Toolbox, ToolboxProvider};
use crate::types::{Config, Error};
use pyo3::exceptions::{PyLookupError, PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyList, PyString};
use std::path::PathBuf;
use std::sync::Arc;

impl From<Error> for PyErr {
    fn from(err: Error) -> Self {
        let msg = err.to_string();
        match err {
            Error::Validation(_) | Error::Serialization(_) => PyValueError::new_err(msg),
            Error::NotFound(_) => PyLookupError::new_err(msg),
            Error::Io(_) => PyOSError::new_err(msg),
            Error::ProviderInit(_) | Error::Execution(_) => PyRuntimeError::new_err(msg),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

fn value_from_py(value: &Bound<'_, PyAny>) -> PyResult<ParamValue> {
    if value.is_none() {
        return Ok(ParamValue::Null);
    }
    // bool before int: Python's bool is an int subclass
    if value.is_instance_of::<PyBool>() {
        return Ok(ParamValue::Bool(value.extract()?));
    }
    if value.is_instance_of::<PyString>() {
        return Ok(ParamValue::Text(value.extract()?));
    }
    if value.is_instance_of::<PyFloat>() {
        return Ok(ParamValue::Double(value.extract()?));
    }
    if let Ok(i) = value.extract::<i64>() {
        return Ok(ParamValue::Integer(i));
    }
    if let Ok(list) = value.downcast::<PyList>() {
        let items = list
            .iter()
            .map(|item| value_from_py(&item))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(ParamValue::List(items));
    }
    if value.hasattr("valueAsText")? {
        let text = value.getattr("valueAsText")?;
        if text.is_none() {
            return Ok(ParamValue::Null);
        }
        return Ok(ParamValue::Text(text.extract()?));
    }
    Ok(ParamValue::Text(value.str()?.extract()?))
}

fn parameters_from_py(parameters: &Bound<'_, PyAny>) -> PyResult<ParameterMap> {
    let mut map = ParameterMap::new();
    if parameters.is_none() {
        return Ok(map);
    }
    if let Ok(dict) = parameters.downcast::<PyDict>() {
        for (key, value) in dict.iter() {
            map.insert(key.extract()?, value_from_py(&value)?);
        }
        return Ok(map);
    }
    for item in parameters.iter()? {
        let item = item?;
        let name: String = item.getattr("name")?.extract()?;
        map.insert(name, value_from_py(&item)?);
    }
    Ok(map)
}

fn replay_messages(sink: &Bound<'_, PyAny>, log: &GpMessages) -> PyResult<()> {
    if sink.is_none() {
        return Ok(());
    }
    if let Ok(list) = sink.downcast::<PyList>() {
        for message in log {
            list.append(message.to_string())?;
        }
        return Ok(());
    }
    for message in log {
        let method = match message.severity {
            Severity::Info => "addMessage",
            Severity::Warning => "addWarningMessage",
            Severity::Error => "addErrorMessage",
        };
        sink.call_method1(method, (message.text.as_str(),))?;
    }
    Ok(())
}

/// Host `arcpy.Parameter` objects when arcpy is importable, plain dicts otherwise.
fn parameter_info_to_py(py: Python<'_>, parameters: Vec<GpParameter>) -> PyResult<PyObject> {
    let arcpy = py.import_bound("arcpy").ok();
    let list = PyList::empty_bound(py);
    for param in parameters {
        let item = match &arcpy {
            Some(arcpy) => {
                let parameter = arcpy.getattr("Parameter")?.call0()?;
                parameter.setattr("displayName", &param.display_name)?;
                parameter.setattr("name", &param.name)?;
                parameter.setattr("datatype", param.data_type.as_str())?;
                parameter.setattr("parameterType", param.parameter_type.as_str())?;
                parameter.setattr("direction", param.direction.as_str())?;
                parameter
            }
            None => {
                let dict = PyDict::new_bound(py);
                dict.set_item("displayName", &param.display_name)?;
                dict.set_item("name", &param.name)?;
                dict.set_item("datatype", param.data_type.as_str())?;
                dict.set_item("parameterType", param.parameter_type.as_str())?;
                dict.set_item("direction", param.direction.as_str())?;
                dict.into_any()
            }
        };
        list.append(item)?;
    }
    Ok(list.into_any().unbind())
}

fn execute_on_host<F>(
    py: Python<'_>,
    parameters: &Bound<'_, PyAny>,
    messages: Option<&Bound<'_, PyAny>>,
    execute: F,
) -> PyResult<()>
where
    F: FnOnce(&ParameterMap, &mut GpMessages) -> crate::Result<()> + Send,
{
    let parameters = parameters_from_py(parameters)?;
    let mut log = GpMessages::new();
    let result = py.allow_threads(|| execute(&parameters, &mut log));
    let replayed = match messages {
        Some(sink) => replay_messages(sink, &log),
        None => Ok(()),
    };
    forwarded_outcome(result, replayed)
}

// =============================================================================
// Classes
// =============================================================================

/// A toolbox as seen by the host: tools addressed by index.
#[pyclass(name = "Toolbox", module = "arcrs")]
#[derive(Debug)]
pub struct PyToolbox {
    inner: Arc<Toolbox>,
}

#[pymethods]
impl PyToolbox {
    #[getter]
    fn label(&self) -> &str {
        self.inner.label()
    }

    #[getter]
    fn alias(&self) -> &str {
        self.inner.alias().as_str()
    }

    /// Labels of all tools, index order.
    fn tools(&self) -> Vec<String> {
        self.inner.tool_labels()
    }

    fn tool_label(&self, index: usize) -> PyResult<String> {
        Ok(self.inner.tool_label(index)?.to_string())
    }

    fn tool_description(&self, index: usize) -> PyResult<String> {
        Ok(self.inner.tool_description(index)?.to_string())
    }

    fn tool_parameter_info(&self, py: Python<'_>, index: usize) -> PyResult<PyObject> {
        parameter_info_to_py(py, self.inner.tool_parameter_info(index)?)
    }

    #[pyo3(signature = (index, parameters, messages=None))]
    fn tool_execute(
        &self,
        py: Python<'_>,
        index: usize,
        parameters: &Bound<'_, PyAny>,
        messages: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<()> {
        let toolbox = &self.inner;
        execute_on_host(py, parameters, messages, |params, log| {
            toolbox.tool_execute(index, params, log)
        })
    }

    fn __len__(&self) -> usize {
        self.inner.tool_count()
    }

    fn __repr__(&self) -> String {
        format!("Toolbox(label={:?}, alias={:?})", self.inner.label(), self.inner.alias().as_str())
    }
}

/// One registered tool.
#[pyclass(name = "Tool", module = "arcrs")]
#[derive(Debug, Clone)]
pub struct PyTool {
    handle: ToolHandle,
}

#[pymethods]
impl PyTool {
    #[getter]
    fn label(&self) -> &str {
        self.handle.label()
    }

    #[getter]
    fn description(&self) -> &str {
        self.handle.description()
    }

    fn parameter_info(&self, py: Python<'_>) -> PyResult<PyObject> {
        parameter_info_to_py(py, self.handle.parameter_info())
    }

    #[pyo3(signature = (parameters, messages=None))]
    fn execute(
        &self,
        py: Python<'_>,
        parameters: &Bound<'_, PyAny>,
        messages: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<()> {
        let handle = &self.handle;
        execute_on_host(py, parameters, messages, |params, log| {
            handle.execute(params, log)
        })
    }

    fn __repr__(&self) -> String {
        format!("Tool(label={:?})", self.handle.label())
    }
}

/// All tools of the configured toolboxes.
#[pyclass(name = "ToolRegistry", module = "arcrs")]
#[derive(Debug)]
pub struct PyToolRegistry {
    inner: ToolRegistry,
}

#[pymethods]
impl PyToolRegistry {
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = Config::load(config_path.as_deref())?;
        let inner = ToolRegistry::from_config(&config, &default_factory())?;
        Ok(Self { inner })
    }

    fn list_tools(&self) -> Vec<String> {
        self.inner.list_tools().into_iter().map(str::to_string).collect()
    }

    /// The first tool with this label, or `None`.
    fn find_tool(&self, label: &str) -> Option<PyTool> {
        self.inner
            .find_tool(label)
            .map(|handle| PyTool { handle: handle.clone() })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Creates a toolbox from the built-in toolbox factory.
#[pyfunction]
fn create_toolbox(label: &str, alias: &str) -> PyResult<PyToolbox> {
    let toolbox = default_factory().create_toolbox(label, alias)?;
    Ok(PyToolbox {
        inner: Arc::new(toolbox),
    })
}

/// This module allows the implementation of Geoprocessing Tools using Rust.
#[pymodule]
fn arcrs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let config = Config::load(None)?;
    crate::observability::init_tracing_with(&config.observability);

    m.add_class::<PyToolbox>()?;
    m.add_class::<PyTool>()?;
    m.add_class::<PyToolRegistry>()?;
    m.add_function(wrap_pyfunction!(create_toolbox, m)?)?;
    Ok(())
}
