//! Birthday Reactor
//!
//! Scans Discord channels and DMs for birthday wishes that mention the
//! account owner and reacts to each one with a configured set of emoji.
//! Uses a ports & adapters layout so the matching and reconciliation logic
//! runs against in-memory mocks in tests.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;

#[cfg(test)]
mod test_utils;

use adapters::{DiscordClientImpl, TokioPacer};
use app::ReactorService;
use config::Config;
use error::{AppError, DiscordError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            if e.fails_process() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn report(error: &AppError) {
    match error {
        AppError::Config(e) => {
            tracing::error!("{}", e);
            tracing::error!("Create a .env file with your Discord token. See .env.example.");
        }
        AppError::Authentication(reason) => {
            tracing::error!("Failed to authenticate: {}. Check your token.", reason);
        }
        AppError::Discord(DiscordError::InvalidToken) => {
            tracing::error!("DISCORD_TOKEN contains characters not allowed in a header. Check your token.");
        }
        AppError::Discord(e) => tracing::error!("{}", e),
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let discord = Arc::new(DiscordClientImpl::new(&config.api_url, &config.token)?);
    let service = ReactorService::new(discord, Arc::new(TokioPacer), config);

    service.run().await?;
    Ok(())
}
