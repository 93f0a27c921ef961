use serde::{Deserialize, Serialize};

/// A cluster the CLI can talk to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClusterEntry {
    pub server: String,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Binds a cluster to a user stanza
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContextEntry {
    pub cluster: String,
    pub user: String,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// A named identity stanza (`[users.<name>]`)
///
/// Only `token` is ever modified by logout. Keys this struct does not know
/// about are kept in `extra` so they survive a rewrite of the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserEntry {
    /// Bearer token, empty once logged out
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

impl UserEntry {
    #[cfg(test)]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..Default::default()
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// The credential currently in use and the server it authenticates against
#[derive(Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub server: String,
    pub token: String,
}

impl ActiveSession {
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

// Hand-written so the token never ends up in logs
impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("server", &self.server)
            .field("token", &if self.has_token() { "<redacted>" } else { "" })
            .finish()
    }
}

/// Caller identity as reported by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
}
