use std::fmt;
use std::sync::Arc;

use ring::digest::{digest, SHA256};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::RuntimeConfig;
use crate::data::Provider;
use crate::timestamp::Timestamp;

use super::{CompileError, Compiler, ExecutableContent, Loader, LoaderError, MachineType};

/// Length of IDs derived from the compiled source.
pub const CONTENT_ID_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("executable unit requires a loader")]
    MissingLoader,

    #[error("executable unit requires a compiler")]
    MissingCompiler,

    #[error("executable unit requires a data provider")]
    MissingProvider,

    #[error("failed to load script: {0}")]
    Loader(#[from] LoaderError),

    #[error("failed to compile script: {0}")]
    Compile(#[from] CompileError),
}

/// First [`CONTENT_ID_LEN`] hex characters of the SHA-256 of `source`.
pub fn content_id(source: &str) -> String {
    let hash = digest(&SHA256, source.as_bytes());
    hex::encode(&hash.as_ref()[..CONTENT_ID_LEN / 2])
}

/// A compiled script bound to its data provider.
///
/// Built once and never modified, so it can be shared through an `Arc` by
/// any number of concurrent evaluations. Recompiling means building a new
/// unit.
pub struct ExecutableUnit {
    id: String,
    created_at: Timestamp,
    loader: Arc<dyn Loader>,
    compiler: Arc<dyn Compiler>,
    content: Arc<dyn ExecutableContent>,
    provider: Arc<dyn Provider>,
}

impl ExecutableUnit {
    pub fn builder() -> ExecutableUnitBuilder {
        ExecutableUnitBuilder::default()
    }

    /// Loads and compiles the script. An empty `id` falls back to [`content_id`].
    pub fn new(
        id: &str,
        loader: Arc<dyn Loader>,
        compiler: Arc<dyn Compiler>,
        provider: Arc<dyn Provider>,
    ) -> Result<Self, UnitError> {
        Self::builder()
            .id(id)
            .loader(loader)
            .compiler(compiler)
            .provider(provider)
            .build()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn loader(&self) -> &Arc<dyn Loader> {
        &self.loader
    }

    pub fn compiler(&self) -> &Arc<dyn Compiler> {
        &self.compiler
    }

    pub fn content(&self) -> &Arc<dyn ExecutableContent> {
        &self.content
    }

    pub fn data_provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn machine_type(&self) -> MachineType {
        self.content.machine_type()
    }
}

impl fmt::Debug for ExecutableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableUnit")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("machine_type", &self.machine_type())
            .field("source_url", &self.loader.source_url().as_str())
            .finish()
    }
}

#[derive(Default)]
pub struct ExecutableUnitBuilder {
    id: Option<String>,
    loader: Option<Arc<dyn Loader>>,
    compiler: Option<Arc<dyn Compiler>>,
    provider: Option<Arc<dyn Provider>>,
}

impl ExecutableUnitBuilder {
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Takes the unit ID from the runtime configuration, if it sets one.
    pub fn config(mut self, config: &RuntimeConfig) -> Self {
        if let Some(id) = &config.script_id {
            self.id = Some(id.clone());
        }
        self
    }

    pub fn loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn compiler(mut self, compiler: Arc<dyn Compiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(self) -> Result<ExecutableUnit, UnitError> {
        let loader = self.loader.ok_or(UnitError::MissingLoader)?;
        let compiler = self.compiler.ok_or(UnitError::MissingCompiler)?;
        let provider = self.provider.ok_or(UnitError::MissingProvider)?;

        let mut reader = loader.reader().inspect_err(|err| {
            error!(url = %loader.source_url(), error = %err, "failed to open script");
        })?;
        let content = compiler.compile(&mut reader).inspect_err(|err| {
            error!(url = %loader.source_url(), error = %err, "failed to compile script");
        })?;

        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => content_id(content.source()),
        };
        let unit = ExecutableUnit {
            id,
            created_at: Timestamp::now(),
            loader,
            compiler,
            content,
            provider,
        };
        debug!(
            id = %unit.id,
            machine = %unit.machine_type(),
            url = %unit.loader.source_url(),
            "created executable unit"
        );
        Ok(unit)
    }
}
