use std::path::Path;

use crate::cli::ConfigCommand;
use crate::config::{ConfigStore, SessionOverrides};
use crate::error::Result;

pub fn execute(command: ConfigCommand, config_path: &Path, overrides: &SessionOverrides) -> Result<()> {
    match command {
        ConfigCommand::Path => {
            println!("Config file path: {}", config_path.display());

            if !config_path.exists() {
                println!("Status: File does not exist");
                return Ok(());
            }

            println!("Status: File exists");
            match ConfigStore::load_from(config_path) {
                Ok(Some(store)) => {
                    println!("Valid: Yes");
                    let with_token = store.users.values().filter(|u| u.has_token()).count();
                    println!("Users: {} ({} with a token)", store.users.len(), with_token);
                    match store.active_session(overrides) {
                        Some(session) => {
                            println!("Server: {}", session.server);
                            println!(
                                "Token: {}",
                                if session.has_token() { "present" } else { "none" }
                            );
                        }
                        None => println!("Active session: none"),
                    }
                }
                Ok(None) => println!("Status: File does not exist"),
                Err(e) => {
                    println!("Valid: No");
                    println!("Error: {}", e);
                }
            }
        }
    }

    Ok(())
}
