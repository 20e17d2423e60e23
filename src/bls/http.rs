use std::io::Read;

use log::debug;

use crate::config::QcewConfig;
use crate::error::{QcewError, Result};

/// The only network operation the fetcher needs. Swapped out in tests so request
/// building can be checked without touching the BLS servers.
pub trait HttpClient {
    fn get_text(&self, url: &str) -> Result<String>;
}

pub struct UreqClient {
    user_agent: String,
    connect_timeout: u64, // milliseconds
    receive_timeout: u64, // milliseconds
}

impl UreqClient {
    pub fn new(user_agent: &str, connect_timeout: u64, receive_timeout: u64) -> UreqClient {
        UreqClient {
            user_agent: user_agent.to_owned(),
            connect_timeout,
            receive_timeout,
        }
    }

    pub fn from_config(config: &QcewConfig) -> UreqClient {
        UreqClient::new(&config.user_agent, config.http_connect_timeout, config.http_receive_timeout)
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        UreqClient::from_config(&QcewConfig::default())
    }
}

impl HttpClient for UreqClient {
    fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = ureq::get(url)
            .set("User-Agent", &self.user_agent)
            .timeout_connect(self.connect_timeout)
            .timeout_read(self.receive_timeout)
            .call();

        if let Some(error) = response.synthetic_error() {
            return Err(QcewError::Transport {
                url: url.to_owned(),
                message: error.to_string(),
            });
        }

        if !response.ok() {
            return Err(QcewError::Status {
                url: url.to_owned(),
                status: response.status(),
                status_text: response.status_text().to_owned(),
            });
        }

        // into_string() caps bodies at 10MB and national industry files run larger
        let mut body = String::new();
        response.into_reader().read_to_string(&mut body)?;

        Ok(body)
    }
}
