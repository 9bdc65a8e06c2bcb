mod api_client;
mod client;
mod config;
mod display;
mod errors;
mod models;
mod session;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::HttpSalaryApi;
use crate::client::PredictionClient;
use crate::config::Config;
use crate::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so the session's stdout stays readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting salary predictor v{}", env!("CARGO_PKG_VERSION"));

    let api = HttpSalaryApi::new(config.api_base_url.clone())?;
    info!("Prediction service: {}", api.base_url());

    let client = PredictionClient::new(Arc::new(api));
    let stdin = BufReader::new(tokio::io::stdin());
    let mut session = Session::new(client, config.api_base_url, stdin, std::io::stdout());

    session.run().await
}
