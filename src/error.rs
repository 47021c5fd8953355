use thiserror::Error;

use crate::data::DataError;
use crate::evaluation::EvalError;
use crate::script::{CompileError, LoaderError, UnitError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    /// True for a static provider's write rejection, however deeply wrapped.
    pub fn is_static_rejection(&self) -> bool {
        match self {
            Error::Data(err) | Error::Eval(EvalError::ContextEnrichment(err)) => {
                err.is_static_rejection()
            }
            _ => false,
        }
    }
}
