//! Error types for kamleads

use thiserror::Error;

use crate::policy::Action;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'kamleads init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The request never produced an HTTP response.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response. The message is taken from the body when possible.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("{context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not logged in. Run 'kamleads login' first.")]
    NotAuthenticated,

    #[error("Not permitted: {0}")]
    NotPermitted(Action),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
