//! # TripSync API
//!
//! HTTP adapter for the remote reservation service.
//!
//! [`ApiClient`] implements [`ReservationApi`](tripsync_core::environment::ReservationApi)
//! over `reqwest`: JSON bodies, a fixed per-request timeout, and a shared
//! [`LoadingIndicator`] that is active while calls are in flight.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tripsync_api::ApiClient;
//! use tripsync_core::environment::ReservationApi;
//! use tripsync_core::ticket::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8080/api", Duration::from_secs(10))?;
//!
//!     client.login(&Credentials::new("asha", "secret1")).await?;
//!     let tickets = client.list_tickets("asha").await?;
//!
//!     println!("{} tickets", tickets.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod loading;

// Re-export main types for convenience
pub use client::{ApiClient, ClientBuildError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use loading::{LoadingGuard, LoadingIndicator};
pub use tripsync_core::error::ApiError;
