use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error)]
pub enum CliError {
    #[error("No arguments are allowed, got: {}", .0.join(" "))]
    ArgumentError(Vec<String>),

    #[error("Must have a config file already created (looked in {})", .0.display())]
    ConfigUnavailable(PathBuf),

    #[error("No active session: select a context with a cluster and user, or pass --server and --token")]
    NoActiveSession,

    #[error("You must have a token in order to logout")]
    NoCredential,

    #[error("Failed to identify the current user: {0}")]
    IdentifyFailed(#[source] ApiError),

    #[error("Failed to revoke token on the server, local config was not modified: {0}")]
    RemoteRevokeFailed(#[source] ApiError),

    #[error(
        "Token was revoked on the server but {} could not be updated: {source}. \
         Re-run logout or remove the token from the file manually",
        .path.display()
    )]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// `main` reports errors through Debug; show the message instead of the variant
impl std::fmt::Debug for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
