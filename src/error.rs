//! Error type for request validation, transport and parsing failures.
use std::io;

use thiserror::Error;

use crate::bls::qcew::Method;

#[derive(Error, Debug)]
pub enum QcewError {
    /// The method string was not one of area, industry or size. Holds the rejected input.
    #[error("Method not valid. Please use \"Area\", \"Industry\" or \"Size\".")]
    InvalidMethod(String),

    /// A parameter the method needs was never supplied.
    #[error("{}", .0.missing_message())]
    MissingParameter(Method),

    #[error("Failed to retrieve data from QCEW server with URL {url}. Error: {message}")]
    Transport { url: String, message: String },

    #[error("QCEW server answered {status} {status_text} for URL {url}")]
    Status { url: String, status: u16, status_text: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Failed to parse configuration TOML: {0}")]
    Config(#[from] toml::de::Error),
}

impl QcewError {
    /// True for the two request-validation failures, which mean "no data" rather than a fault.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, QcewError::InvalidMethod(_) | QcewError::MissingParameter(_))
    }
}

pub type Result<T, E = QcewError> = std::result::Result<T, E>;
