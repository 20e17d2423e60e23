use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::bls::{API_ROOT, USER_AGENT};
use crate::error::Result;

const HTTP_CONNECT_TIMEOUT: u64 = 30000;
const HTTP_RECEIVE_TIMEOUT: u64 = 60000;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QcewConfig {
    pub api_root: String,
    pub user_agent: String,
    pub http_connect_timeout: u64, // ms
    pub http_receive_timeout: u64  // ms
}

impl Default for QcewConfig {
    fn default() -> Self {
        QcewConfig {
            api_root: API_ROOT.to_owned(),
            user_agent: USER_AGENT.to_owned(),
            http_connect_timeout: HTTP_CONNECT_TIMEOUT,
            http_receive_timeout: HTTP_RECEIVE_TIMEOUT
        }
    }
}

impl QcewConfig {
    pub fn from_toml(text: &str) -> Result<QcewConfig> {
        Ok(toml::from_str(text)?)
    }

    /// Reads the TOML file at `path`. A missing file is not an error and yields the defaults;
    /// a file that exists but fails to parse is.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<QcewConfig> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(text) => QcewConfig::from_toml(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                Ok(QcewConfig::default())
            },
            Err(e) => Err(e.into())
        }
    }
}
