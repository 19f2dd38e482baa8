mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{sources::AlertDispatcher, Result};

pub struct Server {
    dispatcher: Arc<AlertDispatcher>,
}

impl Server {
    pub fn new(dispatcher: Arc<AlertDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn build_router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/health", get(routes::health))
            .route("/alert", post(routes::receive_alert))
            .route("/deploy", post(routes::deploy_direct))
            .route("/metrics", get(routes::export_metrics))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn start(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.build_router()).await?;
        Ok(())
    }
}
