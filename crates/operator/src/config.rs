use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ansible: AnsibleConfig,
    pub remediation: RemediationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsibleConfig {
    /// Executable invoked to run the playbook.
    pub program: String,
    pub playbook: String,
    pub inventory: PathBuf,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationConfig {
    /// Alert name that triggers a restart when firing.
    pub trigger_alert: String,
    /// Service the playbook restarts.
    pub service_name: String,
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        // Create config from environment variables with defaults
        let config = Config {
            server: ServerConfig {
                addr: std::env::var("SERVER_ADDR")
                    .unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            },
            ansible: AnsibleConfig {
                program: std::env::var("ANSIBLE_PROGRAM")
                    .unwrap_or_else(|_| "ansible-playbook".to_string()),
                playbook: std::env::var("ANSIBLE_PLAYBOOK")
                    .unwrap_or_else(|_| "restart_service.yml".to_string()),
                inventory: std::env::var("ANSIBLE_INVENTORY")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("inventory.ini")),
                timeout_secs: std::env::var("PLAYBOOK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            },
            remediation: RemediationConfig {
                trigger_alert: std::env::var("TRIGGER_ALERT")
                    .unwrap_or_else(|_| "NodeExporterDown".to_string()),
                service_name: std::env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "node-exporter".to_string()),
            },
        };

        // Validate required fields
        if config.remediation.trigger_alert.is_empty() {
            return Err(crate::Error::Config(
                "TRIGGER_ALERT must not be empty".to_string(),
            ));
        }
        if config.remediation.service_name.is_empty() {
            return Err(crate::Error::Config(
                "SERVICE_NAME must not be empty".to_string(),
            ));
        }
        if config.ansible.playbook.is_empty() {
            return Err(crate::Error::Config(
                "ANSIBLE_PLAYBOOK must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:5000".to_string(),
            },
            ansible: AnsibleConfig {
                program: "ansible-playbook".to_string(),
                playbook: "restart_service.yml".to_string(),
                inventory: PathBuf::from("inventory.ini"),
                timeout_secs: 300,
            },
            remediation: RemediationConfig {
                trigger_alert: "NodeExporterDown".to_string(),
                service_name: "node-exporter".to_string(),
            },
        }
    }
}
