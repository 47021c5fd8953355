use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{
    data::{DEFAULT_CONTEXT_KEY, INPUT_DATA_KEY, REQUEST_KEY, RESPONSE_KEY},
    Error, InternalResult,
};

/// Keys used to store request-scoped data inside a context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataConfig {
    #[serde(default = "default_context_key")]
    pub context_key: String,

    #[serde(default = "default_input_key")]
    pub input_key: String,

    #[serde(default = "default_request_key")]
    pub request_key: String,

    #[serde(default = "default_response_key")]
    pub response_key: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            context_key: default_context_key(),
            input_key: default_input_key(),
            request_key: default_request_key(),
            response_key: default_response_key(),
        }
    }
}

/// Host-side settings for building executable units.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub data: DataConfig,

    /// Fixed unit ID; when absent the ID is derived from the compiled source.
    #[serde(default)]
    pub script_id: Option<String>,
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_context_key() -> String {
    DEFAULT_CONTEXT_KEY.to_string()
}

fn default_input_key() -> String {
    INPUT_DATA_KEY.to_string()
}

fn default_request_key() -> String {
    REQUEST_KEY.to_string()
}

fn default_response_key() -> String {
    RESPONSE_KEY.to_string()
}
