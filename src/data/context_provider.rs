use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DataConfig;
use crate::context::Context;

use super::item::{json_kind, Classified};
use super::merge::deep_merge;
use super::{DataError, DataItem, DataMap, DataResult, Provider};

/// Request-scoped data stored in the [`Context`] under one key.
///
/// The stored map keeps caller maps, HTTP requests and HTTP responses in
/// separate buckets so scripts can tell them apart. Caller maps deep-merge
/// into the input bucket; a request or response replaces its bucket whole.
/// The provider itself holds only key names; every write produces a new
/// context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextProvider {
    context_key: String,
    input_key: String,
    request_key: String,
    response_key: String,
}

impl Default for ContextProvider {
    fn default() -> Self {
        Self::from_config(&DataConfig::default())
    }
}

impl ContextProvider {
    /// Uses the default bucket names under a custom context key.
    pub fn new(context_key: impl Into<String>) -> Self {
        Self {
            context_key: context_key.into(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            context_key: config.context_key.clone(),
            input_key: config.input_key.clone(),
            request_key: config.request_key.clone(),
            response_key: config.response_key.clone(),
        }
    }

    pub fn context_key(&self) -> &str {
        &self.context_key
    }

    /// Reads the map stored at the context key, treating absence as empty.
    fn stored(&self, ctx: &Context) -> DataResult<DataMap> {
        if self.context_key.is_empty() {
            return Err(DataError::EmptyContextKey);
        }
        match ctx.value(&self.context_key) {
            None => Ok(DataMap::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(other) => Err(DataError::InvalidContextValue {
                key: self.context_key.clone(),
                found: json_kind(other).to_string(),
            }),
        }
    }

    fn merge_bucket(data: &mut DataMap, key: &str, addition: &DataMap) {
        let merged = match data.get(key) {
            Some(Value::Object(existing)) => deep_merge(existing, addition),
            _ => addition.clone(),
        };
        data.insert(key.to_string(), Value::Object(merged));
    }
}

impl Provider for ContextProvider {
    fn get_data(&self, ctx: &Context) -> DataResult<DataMap> {
        self.stored(ctx)
    }

    fn add_data_to_context(&self, ctx: &Context, items: &[DataItem]) -> DataResult<Context> {
        let mut data = self.stored(ctx)?;
        let mut failures = Vec::new();
        let mut committed = 0;

        for (index, item) in items.iter().enumerate() {
            match item.classify(index) {
                Ok(Classified::Input(map)) => Self::merge_bucket(&mut data, &self.input_key, &map),
                Ok(Classified::Request(map)) => {
                    data.insert(self.request_key.clone(), Value::Object(map));
                }
                Ok(Classified::Response(map)) => {
                    data.insert(self.response_key.clone(), Value::Object(map));
                }
                Err(err) => {
                    warn!(error = %err, "skipping data item");
                    failures.push(err);
                    continue;
                }
            }
            committed += 1;
        }

        let enriched = if committed > 0 {
            ctx.with_value(self.context_key.clone(), Value::Object(data))
        } else {
            ctx.clone()
        };
        debug!(
            committed,
            failed = failures.len(),
            key = %self.context_key,
            "added data to context"
        );

        if failures.is_empty() {
            Ok(enriched)
        } else {
            Err(DataError::PartialEnrichment {
                context: enriched,
                failures,
            })
        }
    }
}
