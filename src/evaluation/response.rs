use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::script::ExecutableUnit;

/// Coarse type of a script's result value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ResponseType {
    None,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Error,
}

impl From<&Value> for ResponseType {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ResponseType::None,
            Value::Bool(_) => ResponseType::Bool,
            Value::Number(n) if n.is_f64() => ResponseType::Float,
            Value::Number(_) => ResponseType::Int,
            Value::String(_) => ResponseType::String,
            Value::Array(_) => ResponseType::List,
            Value::Object(_) => ResponseType::Map,
        }
    }
}

/// Result of one evaluation, as handed back to hosts.
pub trait EvaluatorResponse: Send + Sync + fmt::Debug {
    fn response_type(&self) -> ResponseType;

    /// Human-readable rendering of the value.
    fn inspect(&self) -> String;

    /// The value itself.
    fn interface(&self) -> Value;

    /// ID of the executable unit that produced this result.
    fn script_exe_id(&self) -> &str;

    /// Wall time spent executing, e.g. `1.5ms`.
    fn exec_time(&self) -> String;
}

/// Engine-agnostic [`EvaluatorResponse`] that backends can return directly.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    value: Value,
    response_type: ResponseType,
    exec_duration: Duration,
    script_exe_id: String,
}

impl EvalResult {
    pub fn new(value: Value, exec_duration: Duration, script_exe_id: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::from(&value),
            value,
            exec_duration,
            script_exe_id: script_exe_id.into(),
        }
    }

    pub fn from_unit(unit: &ExecutableUnit, value: Value, exec_duration: Duration) -> Self {
        Self::new(value, exec_duration, unit.id())
    }

    /// Overrides the inferred type, e.g. to mark an engine error object.
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn exec_duration(&self) -> Duration {
        self.exec_duration
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl EvaluatorResponse for EvalResult {
    fn response_type(&self) -> ResponseType {
        self.response_type
    }

    fn inspect(&self) -> String {
        self.value.to_string()
    }

    fn interface(&self) -> Value {
        self.value.clone()
    }

    fn script_exe_id(&self) -> &str {
        &self.script_exe_id
    }

    fn exec_time(&self) -> String {
        format!("{:?}", self.exec_duration)
    }
}
