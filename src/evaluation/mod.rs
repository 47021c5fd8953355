//! The contract every script engine backend implements.
//!
//! A backend wraps one [`ExecutableUnit`](crate::script::ExecutableUnit) and
//! exposes it as an [`Evaluator`]. Hosts enrich a [`Context`] per request and
//! then evaluate against it; the unit itself is never touched, so one
//! evaluator serves any number of concurrent requests.
//!
//! Backends are expected to build on the helpers here so that they all
//! report failures the same way:
//!
//! * [`add_data_to_context_helper`] for `prepare_context`,
//! * [`load_input_data`] before running the script,
//! * [`ensure_active`] to honour cancellation,
//! * [`EvalResult`] as the returned response.

use async_trait::async_trait;
use thiserror::Error;

use crate::context::Context;
use crate::data::{DataError, DataItem, DataMap};
use crate::script::MachineType;

pub mod helper;
pub mod response;

pub use helper::{add_data_to_context_helper, ensure_active, load_input_data};
pub use response::{EvalResult, EvaluatorResponse, ResponseType};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no data provider available")]
    NoProvider,

    #[error("failed to add data to context: {0}")]
    ContextEnrichment(#[source] DataError),

    #[error("failed to load input data: {0}")]
    InputData(#[source] DataError),

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("{machine} content has unexpected byte code, expected {expected}")]
    ContentTypeMismatch {
        machine: MachineType,
        expected: &'static str,
    },

    #[error("script execution failed: {0}")]
    Execution(String),
}

impl EvalError {
    /// Context holding the items a provider managed to commit before failing.
    pub fn partial_context(&self) -> Option<&Context> {
        match self {
            EvalError::ContextEnrichment(err) => err.partial_context(),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Runs the script against the data visible through `ctx`.
    ///
    /// Read-only: neither `ctx` nor the wrapped unit is modified.
    async fn eval(&self, ctx: &Context) -> Result<Box<dyn EvaluatorResponse>, EvalError>;

    /// Returns a context enriched with `items`, which may be plain maps or
    /// HTTP request/response data.
    fn prepare_context(&self, ctx: &Context, items: &[DataItem]) -> Result<Context, EvalError>;

    /// Map-only form of [`Evaluator::prepare_context`].
    fn add_data_to_context(&self, ctx: &Context, data: &[DataMap]) -> Result<Context, EvalError> {
        let items: Vec<DataItem> = data.iter().cloned().map(DataItem::Map).collect();
        self.prepare_context(ctx, &items)
    }
}
