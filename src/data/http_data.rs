//! HTTP request/response snapshots and their map form.
//!
//! Field names follow the layout scripts already read from the request and
//! response buckets (`Method`, `URL_Path`, `Header`, ...), so they are kept
//! verbatim. Header names are stored in canonical form (`Content-Type`).

use std::str::Utf8Error;

use http::{HeaderMap, Method, StatusCode, Uri, Version};
use serde_json::{json, Value};

use super::DataMap;

#[derive(Debug, Clone)]
pub struct RequestData {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ResponseData {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RequestData {
    pub fn from_request<B: AsRef<[u8]>>(request: &http::Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            version: request.version(),
            headers: request.headers().clone(),
            body: request.body().as_ref().to_vec(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Converts the snapshot into the request bucket layout.
    ///
    /// Fails only when the body is not valid UTF-8.
    pub fn to_map(&self) -> Result<DataMap, Utf8Error> {
        let body = std::str::from_utf8(&self.body)?;
        let host = self
            .headers
            .get(http::header::HOST)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .or_else(|| self.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();
        let raw_query = self.uri.query().unwrap_or_default();

        let mut map = DataMap::new();
        map.insert("Method".into(), json!(self.method.as_str()));
        map.insert("URL_String".into(), json!(self.uri.to_string()));
        map.insert(
            "URL_Scheme".into(),
            json!(self.uri.scheme_str().unwrap_or_default()),
        );
        map.insert(
            "URL_Host".into(),
            json!(self.uri.authority().map(|a| a.to_string()).unwrap_or_default()),
        );
        map.insert("URL_Path".into(), json!(self.uri.path()));
        map.insert("URL_RawQuery".into(), json!(raw_query));
        map.insert("Proto".into(), json!(format!("{:?}", self.version)));
        map.insert("Header".into(), Value::Object(header_map(&self.headers)));
        map.insert("Host".into(), json!(host));
        map.insert("QueryParams".into(), Value::Object(query_map(raw_query)));
        map.insert("Body".into(), json!(body));
        map.insert("ContentLength".into(), json!(self.body.len()));
        Ok(map)
    }
}

impl<B: AsRef<[u8]>> From<&http::Request<B>> for RequestData {
    fn from(request: &http::Request<B>) -> Self {
        Self::from_request(request)
    }
}

impl ResponseData {
    pub fn from_response<B: AsRef<[u8]>>(response: &http::Response<B>) -> Self {
        Self {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
            body: response.body().as_ref().to_vec(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Converts the snapshot into the response bucket layout.
    pub fn to_map(&self) -> Result<DataMap, Utf8Error> {
        let body = std::str::from_utf8(&self.body)?;
        let status = match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        };

        let mut map = DataMap::new();
        map.insert("Status".into(), json!(status));
        map.insert("StatusCode".into(), json!(self.status.as_u16()));
        map.insert("Proto".into(), json!(format!("{:?}", self.version)));
        map.insert("Header".into(), Value::Object(header_map(&self.headers)));
        map.insert("Body".into(), json!(body));
        map.insert("ContentLength".into(), json!(self.body.len()));
        Ok(map)
    }
}

impl<B: AsRef<[u8]>> From<&http::Response<B>> for ResponseData {
    fn from(response: &http::Response<B>) -> Self {
        Self::from_response(response)
    }
}

fn header_map(headers: &HeaderMap) -> DataMap {
    let mut map = DataMap::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        map.insert(canonical_header_name(name.as_str()), Value::Array(values));
    }
    map
}

/// `x-request-id` becomes `X-Request-Id`.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str().to_ascii_lowercase();
                    format!("{}{rest}", first.to_ascii_uppercase())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn query_map(raw_query: &str) -> DataMap {
    let mut map = DataMap::new();
    for (name, value) in url::form_urlencoded::parse(raw_query.as_bytes()) {
        let entry = map
            .entry(name.into_owned())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = entry {
            values.push(Value::String(value.into_owned()));
        }
    }
    map
}
