//! `tripsync` terminal client.
//!
//! Reads commands from stdin, sends them to the store, waits for the
//! resulting workflow to settle and renders the new state.

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tripsync::config::{Config, DEFAULT_LOG_FILTER};
use tripsync::terminal::{Command, LineSource, TerminalConfirmer, parse_command};
use tripsync::{AppEnvironment, build_store, view};
use tripsync_api::{ApiClient, LoadingIndicator};
use tripsync_core::environment::SystemClock;
use tripsync_runtime::EffectHandle;

/// How long in-flight effects get to finish on quit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How often the loading indicator is checked while waiting.
const LOADING_POLL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Logs go to stderr so they do not interleave with the rendered screen
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate()?;
    tracing::info!(
        base_url = %config.api.base_url,
        timeout_ms = config.api.timeout_ms,
        "Starting TripSync"
    );

    let api = ApiClient::new(&config.api.base_url, config.api_timeout())?;
    let loading = api.loading().clone();
    let lines = LineSource::stdin();
    let env = AppEnvironment::new(
        api,
        TerminalConfirmer::new(lines.clone()),
        Arc::new(SystemClock),
        config.notification_ttl(),
    );
    let store = build_store(env);

    println!("{}", store.state(view::render).await);
    println!("Type 'help' for the list of commands.");

    while let Some(line) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }

        let command = store.state(|state| parse_command(&line, state)).await;
        match command {
            Ok(Command::Dispatch(action)) => {
                let mut handle = store.send(action).await?;
                settle(&mut handle, &loading).await;
                println!("{}", store.state(view::render).await);
            },
            Ok(Command::Trains) => println!("{}", view::render_trains()),
            Ok(Command::Stations) => println!("{}", view::render_stations()),
            Ok(Command::Help) => println!("{}", view::HELP),
            Ok(Command::Quit) => break,
            Err(error) => println!("{error}"),
        }
    }

    if let Err(error) = store.shutdown(SHUTDOWN_TIMEOUT).await {
        tracing::warn!(%error, "Shutdown did not complete cleanly");
    }
    println!("Goodbye!");
    Ok(())
}

/// Waits for a workflow to finish, announcing slow network calls once.
async fn settle(handle: &mut EffectHandle, loading: &LoadingIndicator) {
    let mut announced = false;
    while tokio::time::timeout(LOADING_POLL, handle.wait()).await.is_err() {
        if !announced && loading.is_active() {
            println!("Loading...");
            announced = true;
        }
    }
}
