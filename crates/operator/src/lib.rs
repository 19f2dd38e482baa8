pub mod ansible;
pub mod config;
pub mod metrics;
pub mod server;
pub mod sources;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid alert payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Playbook exited with code {code}: {stderr}")]
    PlaybookExit { code: i32, stderr: String },
    #[error("Failed to launch playbook: {0}")]
    PlaybookLaunch(String),
    #[error("Playbook timed out after {0}s")]
    PlaybookTimeout(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
