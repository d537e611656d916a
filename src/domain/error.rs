use thiserror::Error;

/// Drop-pattern compilation failure, surfaced at backend setup.
#[derive(Error, Debug, Clone)]
pub enum FilterError {
    #[error("Invalid drop pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A backend could not complete its one-time setup.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    InvalidPattern(#[from] FilterError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} while checking index '{index}'")]
    IndexCheck { index: String, status: u16 },

    #[error("Failed to create index '{index}': {status} - {body}")]
    IndexCreation {
        index: String,
        status: u16,
        body: String,
    },

    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),

    #[error("Backend setup failed: {0}")]
    Custom(String),
}

/// Registration failures returned to the registrant.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Backend for method '{method}' already registered")]
    AlreadyRegistered { method: String },

    #[error("Backend '{method}' failed to initialize: {source}")]
    Setup {
        method: String,
        #[source]
        source: SetupError,
    },
}
