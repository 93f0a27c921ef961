use std::io::Write;
use std::path::Path;

use crate::api::{HttpSessionApi, SessionApi};
use crate::config::{ConfigStore, SessionOverrides};
use crate::error::{CliError, Result};
use crate::session::SessionRevoker;

pub fn execute(config_path: &Path, overrides: &SessionOverrides) -> Result<()> {
    let store = ConfigStore::load_from(config_path)?
        .ok_or_else(|| CliError::ConfigUnavailable(config_path.to_path_buf()))?;
    let session = store
        .active_session(overrides)
        .ok_or(CliError::NoActiveSession)?;
    if !session.has_token() {
        return Err(CliError::NoCredential);
    }

    let api = HttpSessionApi::new(&session)?;
    print_identity(&api, &mut std::io::stdout())
}

fn print_identity<A: SessionApi, W: Write>(api: &A, out: &mut W) -> Result<()> {
    let user = SessionRevoker::new(api).identify()?;
    writeln!(out, "{}", user.name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSessionApi;
    use crate::models::UserIdentity;

    #[test]
    fn test_print_identity() {
        let mut api = MockSessionApi::new();
        api.expect_whoami().times(1).returning(|| {
            Ok(UserIdentity {
                name: "alice".to_string(),
            })
        });
        api.expect_delete_token().times(0);

        let mut out = Vec::new();
        print_identity(&api, &mut out).unwrap();
        assert_eq!(out, b"alice\n");
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&dir.path().join("config.toml"), &SessionOverrides::default())
            .unwrap_err();
        assert!(matches!(err, CliError::ConfigUnavailable(_)));
    }
}
