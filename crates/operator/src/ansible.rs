//! Ansible playbook execution.
//!
//! Runs the restart playbook as a subprocess and classifies failures so the
//! webhook response can tell a playbook error apart from a missing tool.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info};

use crate::{config::AnsibleConfig, Error, Result};

const INVENTORY_CONTENT: &str = "[localhost_group]\nlocalhost ansible_connection=local\n";

#[async_trait]
pub trait Remediator: Send + Sync {
    async fn restart_service(&self, service: &str) -> Result<String>;
}

pub struct PlaybookRunner {
    config: AnsibleConfig,
}

impl PlaybookRunner {
    /// Creates the runner and writes the single-target inventory file the
    /// playbook runs against.
    pub fn new(config: AnsibleConfig) -> Result<Self> {
        write_inventory(&config.inventory)?;
        Ok(Self { config })
    }
}

fn write_inventory(path: &Path) -> Result<()> {
    std::fs::write(path, INVENTORY_CONTENT)?;
    info!("Created Ansible inventory file: {}", path.display());
    Ok(())
}

#[async_trait]
impl Remediator for PlaybookRunner {
    async fn restart_service(&self, service: &str) -> Result<String> {
        let mut cmd = Command::new(&self.config.program);
        cmd.arg(&self.config.playbook)
            .arg("-i")
            .arg(&self.config.inventory)
            .arg("-e")
            .arg(format!("service_name={service}"))
            .kill_on_drop(true);

        info!(service, playbook = %self.config.playbook, "Executing playbook");

        let output = match timeout(
            Duration::from_secs(self.config.timeout_secs),
            cmd.output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!("Failed to launch {}: {}", self.config.program, e);
                return Err(Error::PlaybookLaunch(e.to_string()));
            }
            Err(_) => {
                error!(
                    "Playbook did not finish within {}s",
                    self.config.timeout_secs
                );
                return Err(Error::PlaybookTimeout(self.config.timeout_secs));
            }
        };

        if output.status.success() {
            info!("Playbook executed successfully");
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            error!(code, "Playbook failed");
            Err(Error::PlaybookExit { code, stderr })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnsibleConfig;
    use std::path::PathBuf;

    fn test_config(program: &str, inventory_name: &str) -> AnsibleConfig {
        AnsibleConfig {
            program: program.to_string(),
            playbook: "restart_service.yml".to_string(),
            inventory: std::env::temp_dir().join(inventory_name),
            timeout_secs: 5,
        }
    }

    #[test]
    fn writes_local_inventory() {
        let path = std::env::temp_dir().join("selfheal-inventory-write.ini");
        write_inventory(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[localhost_group]"));
        assert!(contents.contains("localhost ansible_connection=local"));
    }

    #[tokio::test]
    async fn passes_playbook_arguments_in_order() {
        let config = test_config("echo", "selfheal-inventory-args.ini");
        let inventory: PathBuf = config.inventory.clone();
        let runner = PlaybookRunner::new(config).unwrap();

        let output = runner.restart_service("node-exporter").await.unwrap();
        assert_eq!(
            output.trim(),
            format!(
                "restart_service.yml -i {} -e service_name=node-exporter",
                inventory.display()
            )
        );
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported_with_stderr() {
        let config = test_config("false", "selfheal-inventory-exit.ini");
        let runner = PlaybookRunner::new(config).unwrap();

        let err = runner.restart_service("node-exporter").await.unwrap_err();
        match err {
            Error::PlaybookExit { code, .. } => assert_eq!(code, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_tool_is_a_launch_error() {
        let config = test_config(
            "definitely-not-ansible-playbook",
            "selfheal-inventory-launch.ini",
        );
        let runner = PlaybookRunner::new(config).unwrap();

        let err = runner.restart_service("node-exporter").await.unwrap_err();
        assert!(matches!(err, Error::PlaybookLaunch(_)));
    }
}
