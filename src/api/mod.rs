// Remote session API
mod client;

pub use client::HttpSessionApi;

use crate::models::UserIdentity;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// An error from reqwest when making an HTTP request.
    #[error("Error making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// An error response from the server with the given status code and body.
    #[error("Server returned {0}: {1}")]
    ErrorResponse(reqwest::StatusCode, String),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

/// Calls made against the server, authenticated with the active token
#[cfg_attr(test, mockall::automock)]
pub trait SessionApi {
    /// Ask the server who owns the token this client was built with
    fn whoami(&self) -> Result<UserIdentity, ApiError>;

    /// Invalidate `token` on the server
    fn delete_token(&self, token: &str) -> Result<(), ApiError>;
}
