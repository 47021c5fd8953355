//! # Data providers
//!
//! Scripts read their input from a single merged map. The map is assembled by
//! a chain of [`Provider`]s so that compile-time configuration and per-call
//! data stay separate until the moment of evaluation:
//!
//! * [`StaticProvider`]: a fixed map captured when the unit is built. It
//!   rejects every runtime write with [`DataError::StaticProviderNoRuntimeUpdates`].
//! * [`ContextProvider`]: request-scoped data stored inside a [`Context`],
//!   sorted into input, request and response buckets.
//! * [`CompositeProvider`]: an ordered list of providers whose outputs are
//!   combined with [`merge::deep_merge`]; later providers win.
//!
//! ## Failure granularity
//!
//! The three write paths fail differently, on purpose:
//!
//! * `ContextProvider::add_data_to_context` commits every item it could
//!   classify and reports the rest in [`DataError::PartialEnrichment`], which
//!   carries the enriched context.
//! * `CompositeProvider::get_data` stops at the first failing child.
//! * `CompositeProvider::add_data_to_context` tolerates static rejections but
//!   is all-or-nothing for any other failure.
//!
//! ```
//! use std::sync::Arc;
//! use polyscript::context::Context;
//! use polyscript::data::{CompositeProvider, ContextProvider, DataItem, Provider, StaticProvider};
//! use serde_json::json;
//!
//! let statics = StaticProvider::from_value(json!({"greeting": "hello"})).unwrap();
//! let provider = CompositeProvider::new(vec![
//!     Some(Arc::new(statics) as Arc<dyn Provider>),
//!     Some(Arc::new(ContextProvider::default()) as Arc<dyn Provider>),
//! ]);
//!
//! let ctx = provider
//!     .add_data_to_context(&Context::background(), &[DataItem::from(json!({"name": "world"}))])
//!     .unwrap();
//! let data = provider.get_data(&ctx).unwrap();
//! assert_eq!(data["greeting"], json!("hello"));
//! assert_eq!(data["input_data"]["name"], json!("world"));
//! ```

use mockall::automock;
use thiserror::Error;

use crate::context::Context;

pub mod composite;
pub mod context_provider;
pub mod http_data;
pub mod item;
pub mod merge;
pub mod static_provider;

pub use composite::CompositeProvider;
pub use context_provider::ContextProvider;
pub use http_data::{RequestData, ResponseData};
pub use item::{ClassificationError, Classified, DataItem};
pub use static_provider::StaticProvider;

/// String-keyed data as scripts see it.
pub type DataMap = serde_json::Map<String, serde_json::Value>;

/// Context key under which request-scoped data is stored by default.
pub const DEFAULT_CONTEXT_KEY: &str = "eval_data";
/// Bucket for generic caller-supplied maps.
pub const INPUT_DATA_KEY: &str = "input_data";
/// Bucket for HTTP request data.
pub const REQUEST_KEY: &str = "request";
/// Bucket for HTTP response data.
pub const RESPONSE_KEY: &str = "response";

#[automock]
pub trait Provider: Send + Sync {
    /// Returns the data visible to a script evaluated with `ctx`.
    ///
    /// The returned map is owned by the caller; mutating it never affects
    /// later reads.
    fn get_data(&self, ctx: &Context) -> DataResult<DataMap>;

    /// Returns a new context carrying `items`. `ctx` is left untouched.
    fn add_data_to_context(&self, ctx: &Context, items: &[DataItem]) -> DataResult<Context>;
}

#[derive(Debug, Error, Clone)]
pub enum DataError {
    #[error("static provider does not support runtime updates")]
    StaticProviderNoRuntimeUpdates,

    #[error("context provider has an empty context key")]
    EmptyContextKey,

    #[error("value at context key '{key}' is {found}, expected a string-keyed map")]
    InvalidContextValue { key: String, found: String },

    #[error("static data must be a JSON object, got {0}")]
    InvalidStaticData(String),

    #[error(
        "failed to classify {} data item(s): {}",
        .failures.len(),
        join_failures(.failures)
    )]
    PartialEnrichment {
        context: Context,
        failures: Vec<ClassificationError>,
    },

    #[error("provider at position {index} failed: {source}")]
    ProviderFailed {
        index: usize,
        #[source]
        source: Box<DataError>,
    },
}

impl DataError {
    /// True when the error is, or wraps, a static provider's write rejection.
    pub fn is_static_rejection(&self) -> bool {
        match self {
            DataError::StaticProviderNoRuntimeUpdates => true,
            DataError::ProviderFailed { source, .. } => source.is_static_rejection(),
            _ => false,
        }
    }

    /// The partially enriched context of a mixed-success write.
    ///
    /// Only [`DataError::PartialEnrichment`] carries one; wrapped errors do
    /// not, since a composite write never hands out intermediate contexts.
    pub fn partial_context(&self) -> Option<&Context> {
        match self {
            DataError::PartialEnrichment { context, .. } => Some(context),
            _ => None,
        }
    }
}

fn join_failures(failures: &[ClassificationError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type DataResult<T> = Result<T, DataError>;
