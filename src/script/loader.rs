//! Script source loaders.
//!
//! A [`Loader`] hands the compiler a reader over the raw script bytes. It is
//! read once, when an [`ExecutableUnit`](super::ExecutableUnit) is built.

use std::{
    fs::File,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

use mockall::automock;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("script source is empty")]
    EmptySource,

    #[error("script path must be absolute: {0}")]
    RelativePath(PathBuf),

    #[error("failed to open script {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("loader error: {0}")]
    Other(String),
}

#[automock]
pub trait Loader: Send + Sync {
    fn reader(&self) -> Result<Box<dyn Read + Send>, LoaderError>;

    fn source_url(&self) -> &Url;
}

/// Script source held in memory.
#[derive(Debug, Clone)]
pub struct StringLoader {
    source: String,
    url: Url,
}

impl StringLoader {
    pub fn new(source: impl Into<String>) -> Result<Self, LoaderError> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(LoaderError::EmptySource);
        }
        let url = Url::parse("string:///inline").map_err(|e| LoaderError::Other(e.to_string()))?;
        Ok(Self { source, url })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Loader for StringLoader {
    fn reader(&self) -> Result<Box<dyn Read + Send>, LoaderError> {
        Ok(Box::new(Cursor::new(self.source.clone().into_bytes())))
    }

    fn source_url(&self) -> &Url {
        &self.url
    }
}

/// Script source read from disk each time a reader is requested.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
    url: Url,
}

impl FileLoader {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref().to_path_buf();
        let url =
            Url::from_file_path(&path).map_err(|_| LoaderError::RelativePath(path.clone()))?;
        Ok(Self { path, url })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for FileLoader {
    fn reader(&self) -> Result<Box<dyn Read + Send>, LoaderError> {
        let file = File::open(&self.path).map_err(|source| LoaderError::Open {
            path: self.path.clone(),
            source,
        })?;
        Ok(Box::new(file))
    }

    fn source_url(&self) -> &Url {
        &self.url
    }
}
