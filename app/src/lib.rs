//! # TripSync
//!
//! Terminal client for the TripSync train reservation service.
//!
//! Users register, sign in, pick a train and stations, and create, edit or
//! cancel their reservations against the remote reservation API.
//!
//! ## Architecture
//!
//! ```text
//! typed command ─► AppAction ─► Store ─► app reducer ─► Effect::Future ─► ReservationApi
//!                                 ▲                                         │
//!                                 └──────────── completion action ◄─────────┘
//! ```
//!
//! - [`state`]: the application state the store owns
//! - [`actions`]: user intents and API completions
//! - [`reducers`]: auth, ticket, section and notification workflows
//! - [`view`]: pure text rendering of state snapshots
//! - [`terminal`]: command parsing and `y/N` confirmations
//! - [`config`]: environment-based configuration
//!
//! ## Example
//!
//! ```ignore
//! let env = AppEnvironment::new(api, confirmer, Arc::new(SystemClock), config.notification_ttl());
//! let store = tripsync::build_store(env);
//!
//! let mut handle = store.send(AppAction::login("asha", "secret1")).await?;
//! handle.wait().await;
//! println!("{}", store.state(tripsync::view::render).await);
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod notifications;
pub mod reducers;
pub mod state;
pub mod terminal;
pub mod view;

pub use actions::{AppAction, SaveMode};
pub use config::{Config, ConfigError};
pub use environment::AppEnvironment;
pub use reducers::{AppReducer, app_reducer};
pub use state::{AppState, AuthPhase, Screen};

use tripsync_core::environment::{Confirmer, ReservationApi};
use tripsync_runtime::Store;

/// The store that drives the client
pub type AppStore<A, C> = Store<AppState, AppAction, AppEnvironment<A, C>, AppReducer<A, C>>;

/// Builds a store in its initial state with the application reducer.
///
/// Effects that fail (panic) are turned into [`AppAction::UnexpectedFailure`].
#[must_use]
pub fn build_store<A, C>(environment: AppEnvironment<A, C>) -> AppStore<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    Store::new(AppState::default(), app_reducer(), environment)
        .with_failure_action(|detail| AppAction::UnexpectedFailure { detail })
}
