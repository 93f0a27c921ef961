// Configuration management
use crate::error::{CliError, Result};
use crate::models::{ActiveSession, ClusterEntry, ContextEntry, UserEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Value};

const APP_DIR: &str = "ocli";
const CONFIG_FILE: &str = "config.toml";

/// Local store of clusters, contexts and user stanzas
///
/// A store loaded from disk keeps the parsed document alongside the typed
/// view, and saving writes that document back so comments, key order and
/// keys this crate does not model are preserved.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    #[serde(default)]
    pub clusters: BTreeMap<String, ClusterEntry>,
    #[serde(default)]
    pub contexts: BTreeMap<String, ContextEntry>,
    #[serde(default)]
    pub users: BTreeMap<String, UserEntry>,

    #[serde(flatten)]
    pub extra: toml::Table,

    #[serde(skip)]
    pub(crate) document: Option<DocumentMut>,
}

// Compares values only, the source formatting is not part of equality
impl PartialEq for ConfigStore {
    fn eq(&self, other: &Self) -> bool {
        self.current_context == other.current_context
            && self.clusters == other.clusters
            && self.contexts == other.contexts
            && self.users == other.users
            && self.extra == other.extra
    }
}

/// Values from global CLI flags that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub context: Option<String>,
    pub server: Option<String>,
    pub token: Option<String>,
}

impl ConfigStore {
    /// Resolve the config file path
    ///
    /// An explicit `--config`/`OCLI_CONFIG` path wins. Otherwise the file
    /// lives in `$XDG_CONFIG_HOME/ocli`, then `~/.config/ocli` when
    /// `~/.config` already exists, then `~/.ocli`. Windows uses the
    /// platform config directory.
    pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        let dir = std::env::var_os("XDG_CONFIG_HOME")
            .map(|xdg| PathBuf::from(xdg).join(APP_DIR))
            .or_else(default_config_dir)
            .ok_or_else(|| {
                CliError::ConfigError("Could not determine config directory".to_string())
            })?;

        Ok(dir.join(CONFIG_FILE))
    }

    /// Load the store from `path`, `None` if the file does not exist yet
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("Config file not found at {}", path.display());
            return Ok(None);
        }

        tracing::debug!("Loading config from: {}", path.display());
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let document = contents
            .parse::<DocumentMut>()
            .map_err(|e| CliError::ConfigError(format!("Failed to parse config file: {}", e)))?;
        let mut store: Self = toml::from_str(&contents)
            .map_err(|e| CliError::ConfigError(format!("Failed to parse config file: {}", e)))?;
        store.document = Some(document);

        Ok(Some(store))
    }

    /// Resolve the session the CLI would authenticate with
    ///
    /// Flags win over the file. Returns `None` when no server or no user
    /// stanza can be found; an empty token is still a session.
    pub fn active_session(&self, overrides: &SessionOverrides) -> Option<ActiveSession> {
        let context = overrides
            .context
            .as_ref()
            .or(self.current_context.as_ref())
            .and_then(|name| self.contexts.get(name));

        let server = match (&overrides.server, context) {
            (Some(server), _) => server.clone(),
            (None, Some(ctx)) => self.clusters.get(&ctx.cluster)?.server.clone(),
            (None, None) => return None,
        };

        let token = match (&overrides.token, context) {
            (Some(token), _) => token.clone(),
            (None, Some(ctx)) => self.users.get(&ctx.user)?.token.clone(),
            (None, None) => return None,
        };

        Some(ActiveSession { server, token })
    }

    /// Clear `token` from every user stanza holding it
    ///
    /// Every stanza is visited: aliased users may share one token and all
    /// of them must be cleared. Returns the names of the cleared stanzas.
    pub fn scrub_token(&mut self, token: &str) -> Vec<String> {
        if token.is_empty() {
            return Vec::new();
        }

        let mut cleared = Vec::new();
        for (name, user) in self.users.iter_mut() {
            if user.token == token {
                user.token.clear();
                cleared.push(name.clone());
            }
        }

        if let Some(document) = self.document.as_mut() {
            scrub_document(document, token);
        }
        cleared
    }

    /// Write the whole store to `path`, replacing previous contents
    ///
    /// The file is written to a temporary sibling and renamed over the
    /// target, so a failed write never leaves a truncated config behind.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let contents = match &self.document {
            Some(document) => document.to_string(),
            None => toml::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
        };

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.persist(path).map_err(|e| e.error)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn default_config_dir() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let dot_config = home.join(".config");

    // Don't create ~/.config for users who haven't adopted it
    if dot_config.exists() {
        Some(dot_config.join(APP_DIR))
    } else {
        Some(home.join(format!(".{}", APP_DIR)))
    }
}

#[cfg(not(unix))]
fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Blank matching `users.<name>.token` values in place
///
/// Only the value changes; its surrounding whitespace and comments stay.
fn scrub_document(document: &mut DocumentMut, token: &str) {
    let Some(users) = document.get_mut("users").and_then(Item::as_table_like_mut) else {
        return;
    };

    for (_, user) in users.iter_mut() {
        let Some(value) = user
            .as_table_like_mut()
            .and_then(|entry| entry.get_mut("token"))
            .and_then(Item::as_value_mut)
        else {
            continue;
        };

        if value.as_str() == Some(token) {
            let decor = value.decor().clone();
            *value = Value::from("");
            *value.decor_mut() = decor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
current_context = "alice"

[clusters.prod]
server = "https://api.example.com:6443"

[clusters.staging]
server = "https://api.staging.example.com:6443"

[contexts.alice]
cluster = "prod"
user = "alice"

[contexts.bob]
cluster = "staging"
user = "bob"

[users.alice]
token = "tok-1"

[users.alice-alias]
token = "tok-1"
username = "alice"

[users.bob]
token = "tok-2"
client_certificate = "/etc/ocli/bob.crt"
"#;

    fn sample() -> ConfigStore {
        toml::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let store = sample();
        assert_eq!(store.current_context.as_deref(), Some("alice"));
        assert_eq!(store.clusters.len(), 2);
        assert_eq!(store.users.len(), 3);
        assert_eq!(
            store.users["bob"].client_certificate.as_deref(),
            Some("/etc/ocli/bob.crt")
        );
    }

    #[test]
    fn test_active_session_from_current_context() {
        let session = sample()
            .active_session(&SessionOverrides::default())
            .unwrap();
        assert_eq!(session.server, "https://api.example.com:6443");
        assert_eq!(session.token, "tok-1");
    }

    #[test]
    fn test_active_session_overrides() {
        let store = sample();

        let session = store
            .active_session(&SessionOverrides {
                context: Some("bob".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.server, "https://api.staging.example.com:6443");
        assert_eq!(session.token, "tok-2");

        let session = store
            .active_session(&SessionOverrides {
                server: Some("https://other:8443".to_string()),
                token: Some("tok-9".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.server, "https://other:8443");
        assert_eq!(session.token, "tok-9");
    }

    #[test]
    fn test_active_session_missing() {
        let store = ConfigStore::default();
        assert!(store.active_session(&SessionOverrides::default()).is_none());

        let mut store = sample();
        store.current_context = Some("nope".to_string());
        assert!(store.active_session(&SessionOverrides::default()).is_none());

        let mut store = sample();
        store.users.remove("alice");
        assert!(store.active_session(&SessionOverrides::default()).is_none());
    }

    #[test]
    fn test_scrub_clears_every_matching_stanza() {
        let mut store = sample();
        let before = store.clone();

        let mut cleared = store.scrub_token("tok-1");
        cleared.sort();

        assert_eq!(cleared, vec!["alice".to_string(), "alice-alias".to_string()]);
        assert_eq!(store.users["alice"].token, "");
        assert_eq!(store.users["alice-alias"].token, "");
        assert_eq!(store.users["alice-alias"].username.as_deref(), Some("alice"));
        assert_eq!(store.users["bob"], before.users["bob"]);
        assert_eq!(store.users.len(), 3);
        assert_eq!(store.clusters, before.clusters);
        assert_eq!(store.contexts, before.contexts);
    }

    #[test]
    fn test_scrub_without_match_changes_nothing() {
        let mut store = sample();
        let before = store.clone();

        assert!(store.scrub_token("tok-unknown").is_empty());
        assert!(store.scrub_token("").is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut store = sample();
        store.scrub_token("tok-1");
        store.save_to(&path).unwrap();

        let loaded = ConfigStore::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded, store);
        assert!(loaded.users.contains_key("alice"));
        assert!(!loaded.users["alice"].has_token());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        sample().save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.toml");
        assert!(sample().save_to(&path).is_err());
        assert!(!path.exists());
    }

    const HAND_EDITED: &str = r#"# ocli configuration
current_context = "alice"

[preferences]
colors = false

[clusters.prod]
# self-signed
certificate_authority = "/etc/ocli/ca.crt"
server = "https://api.example.com:6443"

[contexts.alice]
user = "alice"
cluster = "prod"
namespace = "payments"

[users.alice]
token = "tok-1"

[users.alice-alias]
username = "alice"
token = "tok-1"

# bob's service account
[users.bob]
username = "bob"
token = "tok-2"
"#;

    #[test]
    fn test_scrub_keeps_hand_edited_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, HAND_EDITED).unwrap();

        let mut store = ConfigStore::load_from(&path).unwrap().unwrap();
        assert_eq!(store.scrub_token("tok-1").len(), 2);
        store.save_to(&path).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert_eq!(
            saved,
            HAND_EDITED.replace("token = \"tok-1\"", "token = \"\"")
        );
        assert!(saved.contains("# bob's service account\n[users.bob]\nusername = \"bob\"\ntoken = \"tok-2\"\n"));
    }

    #[test]
    fn test_unknown_keys_survive_typed_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        // Parsed without a source document, so saving goes through serde
        let mut store: ConfigStore = toml::from_str(HAND_EDITED).unwrap();
        store.scrub_token("tok-1");
        store.save_to(&path).unwrap();

        let loaded = ConfigStore::load_from(&path).unwrap().unwrap();
        assert_eq!(
            loaded.clusters["prod"]
                .extra
                .get("certificate_authority")
                .and_then(|v| v.as_str()),
            Some("/etc/ocli/ca.crt")
        );
        assert_eq!(
            loaded.contexts["alice"]
                .extra
                .get("namespace")
                .and_then(|v| v.as_str()),
            Some("payments")
        );
        assert!(loaded.extra.contains_key("preferences"));
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ConfigStore::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "users = 3").unwrap();
        assert!(matches!(
            ConfigStore::load_from(&path),
            Err(CliError::ConfigError(_))
        ));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = ConfigStore::config_file_path(Some(Path::new("/tmp/custom.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }
}
