// Remote side of logout
use crate::api::SessionApi;
use crate::error::{CliError, Result};
use crate::models::UserIdentity;

/// Progress of a single logout run
///
/// Transitions only move forward; a failure ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutState {
    Start,
    Gathered,
    Validated,
    RemoteRevoked,
    LocalScrubbed,
    FailedValidation,
    FailedRemote,
    FailedPersist,
}

impl LogoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LogoutState::LocalScrubbed
                | LogoutState::FailedValidation
                | LogoutState::FailedRemote
                | LogoutState::FailedPersist
        )
    }
}

/// Identifies the caller and revokes a token on the server
pub struct SessionRevoker<'a, A: SessionApi> {
    api: &'a A,
}

impl<'a, A: SessionApi> SessionRevoker<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Must run before `revoke`: a revoked token cannot answer who-am-I
    pub fn identify(&self) -> Result<UserIdentity> {
        let user = self.api.whoami().map_err(CliError::IdentifyFailed)?;
        tracing::debug!("Token belongs to {}", user.name);
        Ok(user)
    }

    /// Not retried, a failure is reported as-is
    pub fn revoke(&self, token: &str) -> Result<()> {
        self.api
            .delete_token(token)
            .map_err(CliError::RemoteRevokeFailed)?;
        tracing::info!("Token revoked on server");
        Ok(())
    }
}
