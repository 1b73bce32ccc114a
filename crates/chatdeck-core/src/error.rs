use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not connected to the chat gateway")]
    Disconnected,
    #[error("Request {method} failed: {message}")]
    Request { method: String, message: String },
    #[error("Failed to decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn request(method: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Request {
            method: method.into(),
            message: message.into(),
        }
    }
}
