pub mod completions;
pub mod config;
pub mod logout;
pub mod whoami;
