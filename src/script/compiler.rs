use std::any::Any;
use std::io::Read;
use std::sync::Arc;

use thiserror::Error;

use super::MachineType;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("script is empty")]
    EmptyScript,

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{machine} compiler error: {message}")]
    Engine {
        machine: MachineType,
        message: String,
    },
}

/// Turns script source into engine-ready content.
///
/// Implemented by each engine backend; called once per executable unit.
pub trait Compiler: Send + Sync {
    fn compile(&self, reader: &mut dyn Read) -> Result<Arc<dyn ExecutableContent>, CompileError>;
}

/// Output of a [`Compiler`].
pub trait ExecutableContent: Send + Sync {
    /// Source text the content was compiled from.
    fn source(&self) -> &str;

    /// Engine-specific compiled form; backends downcast it to their own type.
    fn byte_code(&self) -> &(dyn Any + Send + Sync);

    fn machine_type(&self) -> MachineType;
}

impl std::fmt::Debug for dyn ExecutableContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableContent")
            .field("machine_type", &self.machine_type())
            .field("source_len", &self.source().len())
            .finish()
    }
}
