use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::{HttpSessionApi, SessionApi};
use crate::config::{ConfigStore, SessionOverrides};
use crate::error::{CliError, Result};
use crate::models::ActiveSession;
use crate::session::{LogoutState, SessionRevoker};

/// Logs out the current user: revokes the token on the server, then
/// removes it from every user stanza in the config file.
pub struct LogoutOptions<W: Write> {
    starting_config: Option<ConfigStore>,
    session: Option<ActiveSession>,
    config_path: PathBuf,
    out: W,
    state: LogoutState,
}

impl<W: Write> LogoutOptions<W> {
    pub fn new(config_path: PathBuf, out: W) -> Self {
        Self {
            starting_config: None,
            session: None,
            config_path,
            out,
            state: LogoutState::Start,
        }
    }

    pub fn state(&self) -> LogoutState {
        self.state
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Load the config file and resolve the active session
    pub fn gather(&mut self, overrides: &SessionOverrides) -> Result<()> {
        let store = ConfigStore::load_from(&self.config_path)?
            .ok_or_else(|| CliError::ConfigUnavailable(self.config_path.clone()))?;

        self.session = store.active_session(overrides);
        self.starting_config = Some(store);
        self.advance(LogoutState::Gathered);
        Ok(())
    }

    pub fn validate(&mut self, args: &[String]) -> Result<()> {
        let result = self.check(args);
        match result {
            Ok(()) => self.advance(LogoutState::Validated),
            Err(_) => self.advance(LogoutState::FailedValidation),
        }
        result
    }

    fn check(&self, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            return Err(CliError::ArgumentError(args.to_vec()));
        }

        let session = match (&self.starting_config, &self.session) {
            (Some(_), Some(session)) => session,
            _ => return Err(CliError::NoActiveSession),
        };

        if !session.has_token() {
            return Err(CliError::NoCredential);
        }

        Ok(())
    }

    /// Identify, revoke, scrub, persist, confirm
    ///
    /// Nothing local is written unless the server accepted the revoke.
    pub fn execute<A: SessionApi>(&mut self, api: &A) -> Result<()> {
        let (mut store, session) = match (&self.starting_config, &self.session) {
            (Some(store), Some(session)) if self.state == LogoutState::Validated => {
                (store.clone(), session.clone())
            }
            _ => return Err(CliError::NoActiveSession),
        };

        let revoker = SessionRevoker::new(api);
        let user = match revoker
            .identify()
            .and_then(|user| revoker.revoke(&session.token).map(|()| user))
        {
            Ok(user) => user,
            Err(e) => {
                self.advance(LogoutState::FailedRemote);
                return Err(e);
            }
        };
        self.advance(LogoutState::RemoteRevoked);

        let cleared = store.scrub_token(&session.token);
        tracing::debug!("Cleared token from user stanzas: {:?}", cleared);

        if let Err(source) = store.save_to(&self.config_path) {
            self.advance(LogoutState::FailedPersist);
            return Err(CliError::PersistFailed {
                path: self.config_path.clone(),
                source,
            });
        }
        self.starting_config = Some(store);
        self.advance(LogoutState::LocalScrubbed);

        writeln!(
            self.out,
            "User, {}, logged out of {}",
            user.name, session.server
        )?;
        Ok(())
    }

    /// Terminal states are final; later transitions are ignored
    fn advance(&mut self, next: LogoutState) {
        if self.state.is_terminal() {
            tracing::debug!("logout already finished in {:?}", self.state);
            return;
        }
        tracing::debug!("logout: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

pub fn execute(config_path: &Path, overrides: &SessionOverrides, args: &[String]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut options = LogoutOptions::new(config_path.to_path_buf(), stdout.lock());

    options.gather(overrides)?;
    options.validate(args)?;

    let session = options.session.clone().ok_or(CliError::NoActiveSession)?;
    let api = HttpSessionApi::new(&session)?;
    let result = options.execute(&api);
    tracing::debug!("logout finished: {:?}", options.state());
    result
}
