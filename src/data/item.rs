use std::str::Utf8Error;

use serde_json::Value;
use thiserror::Error;

use super::http_data::{RequestData, ResponseData};
use super::DataMap;

/// One piece of runtime input handed to [`Provider::add_data_to_context`].
///
/// [`Provider::add_data_to_context`]: super::Provider::add_data_to_context
#[derive(Debug, Clone)]
pub enum DataItem {
    /// Generic caller data, merged into the input bucket.
    Map(DataMap),
    Request(RequestData),
    Response(ResponseData),
    /// Untyped JSON. Objects are treated as [`DataItem::Map`]; anything else
    /// is rejected during classification.
    Value(Value),
}

/// Where a classified item lands inside the context data.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Input(DataMap),
    Request(DataMap),
    Response(DataMap),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("unsupported data item at position {index}: {kind}")]
    Unsupported { index: usize, kind: &'static str },

    #[error("{what} body at position {index} is not valid UTF-8: {source}")]
    InvalidBody {
        index: usize,
        what: &'static str,
        #[source]
        source: Utf8Error,
    },
}

impl DataItem {
    /// Sorts the item into its bucket. `index` is the item's position in the
    /// caller's list and only feeds error messages.
    pub fn classify(&self, index: usize) -> Result<Classified, ClassificationError> {
        match self {
            DataItem::Map(map) => Ok(Classified::Input(map.clone())),
            DataItem::Value(Value::Object(map)) => Ok(Classified::Input(map.clone())),
            DataItem::Value(other) => Err(ClassificationError::Unsupported {
                index,
                kind: json_kind(other),
            }),
            DataItem::Request(request) => request
                .to_map()
                .map(Classified::Request)
                .map_err(|source| ClassificationError::InvalidBody {
                    index,
                    what: "request",
                    source,
                }),
            DataItem::Response(response) => response
                .to_map()
                .map(Classified::Response)
                .map_err(|source| ClassificationError::InvalidBody {
                    index,
                    what: "response",
                    source,
                }),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<DataMap> for DataItem {
    fn from(map: DataMap) -> Self {
        DataItem::Map(map)
    }
}

impl From<Value> for DataItem {
    fn from(value: Value) -> Self {
        DataItem::Value(value)
    }
}

impl From<RequestData> for DataItem {
    fn from(request: RequestData) -> Self {
        DataItem::Request(request)
    }
}

impl From<ResponseData> for DataItem {
    fn from(response: ResponseData) -> Self {
        DataItem::Response(response)
    }
}

impl<B: AsRef<[u8]>> From<&http::Request<B>> for DataItem {
    fn from(request: &http::Request<B>) -> Self {
        DataItem::Request(RequestData::from_request(request))
    }
}

impl<B: AsRef<[u8]>> From<&http::Response<B>> for DataItem {
    fn from(response: &http::Response<B>) -> Self {
        DataItem::Response(ResponseData::from_response(response))
    }
}
