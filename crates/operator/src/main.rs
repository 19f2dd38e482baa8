use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use selfheal_operator::{
    ansible::PlaybookRunner,
    config::Config,
    metrics,
    server::Server,
    sources::AlertDispatcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    metrics::register_metrics();

    // Initialize the playbook runner; this writes the inventory file
    let runner = Arc::new(
        PlaybookRunner::new(config.ansible.clone())
            .context("failed to initialize playbook runner")?,
    );

    let dispatcher = Arc::new(AlertDispatcher::new(&config.remediation, runner));

    // Start server
    let server = Server::new(dispatcher);
    info!("Starting server on {}", config.server.addr);
    server
        .start(&config.server.addr)
        .await
        .context("server error")?;

    Ok(())
}
