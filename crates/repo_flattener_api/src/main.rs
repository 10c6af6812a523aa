//! Repository flattener REST API server
//!
//! Main binary for running the API server in production or development.
//! See [`repo_flattener_api::config`] for the environment variables it reads.
//!
//! `RUST_LOG` sets the log level (default: info).

use std::env;
use std::sync::Arc;

use github_client::{create_token_client, GitHubClient};
use repo_flattener_api::{ApiServer, AppState, ServiceConfig, API_VERSION};
use repo_flattener_core::RepositoryFlattener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::debug!(config = ?config, "Loaded configuration");

    let octocrab = create_token_client(&config.github_token, &config.github_api_url)?;
    let client = GitHubClient::new(octocrab).with_timeout(config.upstream_timeout);

    let flattener = RepositoryFlattener::new(Arc::new(client), config.flattener.clone());
    let server = ApiServer::new(config.api, AppState::new(Arc::new(flattener)));

    tracing::info!("Starting repository flattener API server");
    tracing::info!("API version: {}", API_VERSION);
    tracing::info!("GitHub API: {}", config.github_api_url);

    // Start server with graceful shutdown
    server.serve().await
}
