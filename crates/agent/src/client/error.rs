//! Error — failures surfaced by the Docker API gateway.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Socket connect, handshake, send, body read, or request timeout.
    #[error("cannot fetch data: {0}")]
    Transport(String),
    /// Non-200 response. Displays the daemon's `message`, or the raw body
    /// when the body was not a structured error.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(serde::Deserialize)]
struct ErrorMessage {
    message: String,
}

impl ApiError {
    /// Build an [`ApiError::Api`] from a non-200 response body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ErrorMessage>(body) {
            Ok(decoded) => decoded.message,
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        };
        ApiError::Api { status, message }
    }
}
