use serde_json::Value;
use tracing::debug;

use crate::context::Context;

use super::{DataError, DataItem, DataMap, DataResult, Provider};

/// Compile-time data that never changes after construction.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    data: DataMap,
}

impl StaticProvider {
    pub fn new(data: DataMap) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a provider from a JSON object. `null` yields an empty provider.
    pub fn from_value(value: Value) -> DataResult<Self> {
        match value {
            Value::Object(data) => Ok(Self::new(data)),
            Value::Null => Ok(Self::empty()),
            other => Err(DataError::InvalidStaticData(other.to_string())),
        }
    }
}

impl From<DataMap> for StaticProvider {
    fn from(data: DataMap) -> Self {
        Self::new(data)
    }
}

impl Provider for StaticProvider {
    fn get_data(&self, _ctx: &Context) -> DataResult<DataMap> {
        Ok(self.data.clone())
    }

    fn add_data_to_context(&self, _ctx: &Context, items: &[DataItem]) -> DataResult<Context> {
        debug!(items = items.len(), "static provider rejected runtime data");
        Err(DataError::StaticProviderNoRuntimeUpdates)
    }
}
