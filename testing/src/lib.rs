//! # TripSync Testing
//!
//! Testing utilities for the TripSync client.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`mocks::MockReservationApi`]: in-memory reservation service that records calls
//! - [`mocks::ScriptedConfirmer`]: answers confirmation prompts from a script
//! - [`mocks::FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use tripsync_testing::mocks::{MockReservationApi, ScriptedConfirmer};
//!
//! #[tokio::test]
//! async fn signs_in() {
//!     let api = MockReservationApi::new().with_user("asha", "secret1");
//!     let store = test_store(api.clone(), ScriptedConfirmer::always(true));
//!
//!     let mut handle = store.send(AppAction::Login { credentials }).await?;
//!     handle.wait().await;
//!
//!     assert_eq!(store.state(|s| s.session_username.clone()).await.as_deref(), Some("asha"));
//! }
//! ```

use chrono::{DateTime, Utc};
use tripsync_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::collections::{HashMap, VecDeque};
    use std::future::Future;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use std::time::Duration;
    use tripsync_core::environment::{Confirmer, ReservationApi};
    use tripsync_core::error::ApiError;
    use tripsync_core::ticket::{Credentials, Registration, Ticket, TicketId, TicketPayload};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tripsync_testing::mocks::FixedClock;
    /// use tripsync_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// The reservation API operations, used to script failures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ApiOperation {
        /// `register`
        Register,
        /// `login`
        Login,
        /// `create_ticket`
        CreateTicket,
        /// `update_ticket`
        UpdateTicket,
        /// `list_tickets`
        ListTickets,
        /// `delete_ticket`
        DeleteTicket,
    }

    /// One recorded call to [`MockReservationApi`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum ApiCall {
        /// `POST /auth/register`
        Register(Registration),
        /// `POST /auth/login`
        Login(Credentials),
        /// `POST /tickets`
        CreateTicket(TicketPayload),
        /// `PUT /tickets/{id}`
        UpdateTicket(TicketId, TicketPayload),
        /// `GET /tickets/user/{username}`
        ListTickets(String),
        /// `DELETE /tickets/{id}`
        DeleteTicket(TicketId),
    }

    impl ApiCall {
        /// Operation this call belongs to
        #[must_use]
        pub const fn operation(&self) -> ApiOperation {
            match self {
                Self::Register(_) => ApiOperation::Register,
                Self::Login(_) => ApiOperation::Login,
                Self::CreateTicket(_) => ApiOperation::CreateTicket,
                Self::UpdateTicket(..) => ApiOperation::UpdateTicket,
                Self::ListTickets(_) => ApiOperation::ListTickets,
                Self::DeleteTicket(_) => ApiOperation::DeleteTicket,
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockApiState {
        users: HashMap<String, String>,
        tickets: Vec<Ticket>,
        next_id: u64,
        calls: Vec<ApiCall>,
        failures: HashMap<ApiOperation, VecDeque<ApiError>>,
        echo_tickets: bool,
    }

    /// In-memory reservation service.
    ///
    /// Behaves like the remote API (unique usernames, password check, tickets
    /// keyed by server-assigned ids), records every call, and can be told to
    /// fail the next call of an operation or to answer slowly.
    #[derive(Debug, Clone)]
    pub struct MockReservationApi {
        state: Arc<Mutex<MockApiState>>,
        latency: Option<Duration>,
    }

    impl Default for MockReservationApi {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockReservationApi {
        /// Create an empty service that echoes created/updated tickets
        #[must_use]
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(MockApiState {
                    echo_tickets: true,
                    next_id: 1,
                    ..MockApiState::default()
                })),
                latency: None,
            }
        }

        /// Seed a registered user
        #[must_use]
        pub fn with_user(self, username: &str, password: &str) -> Self {
            self.lock()
                .users
                .insert(username.to_string(), password.to_string());
            self
        }

        /// Seed an existing ticket
        #[must_use]
        pub fn with_ticket(self, ticket: Ticket) -> Self {
            self.lock().tickets.push(ticket);
            self
        }

        /// Answer create/update with a plain acknowledgement instead of the ticket
        #[must_use]
        pub fn with_opaque_acknowledgements(self) -> Self {
            self.lock().echo_tickets = false;
            self
        }

        /// Delay every answer, e.g. to hold a request in flight
        #[must_use]
        pub const fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Fail the next call of `operation` with `error`
        pub fn fail_next(&self, operation: ApiOperation, error: ApiError) {
            self.lock()
                .failures
                .entry(operation)
                .or_default()
                .push_back(error);
        }

        /// All calls received so far, in order
        #[must_use]
        pub fn calls(&self) -> Vec<ApiCall> {
            self.lock().calls.clone()
        }

        /// Number of calls received for `operation`
        #[must_use]
        pub fn call_count(&self, operation: ApiOperation) -> usize {
            self.lock()
                .calls
                .iter()
                .filter(|call| call.operation() == operation)
                .count()
        }

        /// Snapshot of every stored ticket
        #[must_use]
        pub fn tickets(&self) -> Vec<Ticket> {
            self.lock().tickets.clone()
        }

        fn lock(&self) -> MutexGuard<'_, MockApiState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Records `call`, then either pops a scripted failure or runs `answer`
        async fn respond<T>(
            &self,
            call: ApiCall,
            answer: impl FnOnce(&mut MockApiState) -> Result<T, ApiError>,
        ) -> Result<T, ApiError> {
            let operation = call.operation();
            let scripted = {
                let mut state = self.lock();
                state.calls.push(call);
                state
                    .failures
                    .get_mut(&operation)
                    .and_then(VecDeque::pop_front)
            };

            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }

            match scripted {
                Some(error) => Err(error),
                None => answer(&mut self.lock()),
            }
        }
    }

    fn not_found() -> ApiError {
        ApiError::http(404, "Not Found", "Ticket not found")
    }

    fn store_ticket(state: &mut MockApiState, id: TicketId, payload: &TicketPayload) -> Ticket {
        let ticket = Ticket {
            id,
            username: payload.username.clone(),
            train_name: payload.train_name.clone(),
            source: payload.source.clone(),
            destination: payload.destination.clone(),
            price: payload.price,
            seat: None,
            booked_at: None,
        };
        match state.tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(existing) => existing.clone_from(&ticket),
            None => state.tickets.push(ticket.clone()),
        }
        ticket
    }

    impl ReservationApi for MockReservationApi {
        fn register(&self, registration: &Registration) -> impl Future<Output = Result<(), ApiError>> + Send {
            let registration = registration.clone();
            async move {
                self.respond(ApiCall::Register(registration.clone()), |state| {
                    if state.users.contains_key(&registration.username) {
                        return Err(ApiError::http(409, "Conflict", "Username already exists"));
                    }
                    state
                        .users
                        .insert(registration.username, registration.password);
                    Ok(())
                })
                .await
            }
        }

        fn login(&self, credentials: &Credentials) -> impl Future<Output = Result<(), ApiError>> + Send {
            let credentials = credentials.clone();
            async move {
                self.respond(ApiCall::Login(credentials.clone()), |state| {
                    match state.users.get(&credentials.username) {
                        Some(password) if *password == credentials.password => Ok(()),
                        _ => Err(ApiError::http(401, "Unauthorized", "Invalid username or password")),
                    }
                })
                .await
            }
        }

        fn create_ticket(
            &self,
            payload: &TicketPayload,
        ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send {
            let payload = payload.clone();
            async move {
                self.respond(ApiCall::CreateTicket(payload.clone()), |state| {
                    let id = TicketId::new(format!("t-{}", state.next_id));
                    state.next_id += 1;
                    let ticket = store_ticket(state, id, &payload);
                    Ok(state.echo_tickets.then_some(ticket))
                })
                .await
            }
        }

        fn update_ticket(
            &self,
            id: &TicketId,
            payload: &TicketPayload,
        ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send {
            let id = id.clone();
            let payload = payload.clone();
            async move {
                self.respond(ApiCall::UpdateTicket(id.clone(), payload.clone()), |state| {
                    if !state.tickets.iter().any(|t| t.id == id) {
                        return Err(not_found());
                    }
                    let ticket = store_ticket(state, id, &payload);
                    Ok(state.echo_tickets.then_some(ticket))
                })
                .await
            }
        }

        fn list_tickets(&self, username: &str) -> impl Future<Output = Result<Vec<Ticket>, ApiError>> + Send {
            let username = username.to_string();
            async move {
                self.respond(ApiCall::ListTickets(username.clone()), |state| {
                    Ok(state
                        .tickets
                        .iter()
                        .filter(|t| t.username == username)
                        .cloned()
                        .collect())
                })
                .await
            }
        }

        fn delete_ticket(&self, id: &TicketId) -> impl Future<Output = Result<(), ApiError>> + Send {
            let id = id.clone();
            async move {
                self.respond(ApiCall::DeleteTicket(id.clone()), |state| {
                    let before = state.tickets.len();
                    state.tickets.retain(|t| t.id != id);
                    if state.tickets.len() == before {
                        return Err(not_found());
                    }
                    Ok(())
                })
                .await
            }
        }
    }

    /// Answers confirmation prompts from a script.
    ///
    /// Scripted answers are consumed in order; once exhausted, the default
    /// answer is used. Every prompt is recorded.
    #[derive(Debug, Clone)]
    pub struct ScriptedConfirmer {
        answers: Arc<Mutex<VecDeque<bool>>>,
        prompts: Arc<Mutex<Vec<String>>>,
        default_answer: bool,
    }

    impl ScriptedConfirmer {
        /// Always answer `answer`
        #[must_use]
        pub fn always(answer: bool) -> Self {
            Self {
                answers: Arc::default(),
                prompts: Arc::default(),
                default_answer: answer,
            }
        }

        /// Answer from `answers` in order, then decline
        #[must_use]
        pub fn answers(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: Arc::new(Mutex::new(answers.into_iter().collect())),
                prompts: Arc::default(),
                default_answer: false,
            }
        }

        /// Prompts shown so far
        #[must_use]
        pub fn prompts(&self) -> Vec<String> {
            self.prompts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Confirmer for ScriptedConfirmer {
        fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send {
            self.prompts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(prompt.to_string());
            let answer = self
                .answers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or(self.default_answer);
            std::future::ready(answer)
        }
    }
}

/// Fixtures for domain values
pub mod fixtures {
    use tripsync_core::catalog;
    use tripsync_core::ticket::{Ticket, TicketId};

    /// A ticket owned by `username`, priced from the catalog
    #[must_use]
    pub fn ticket(id: &str, username: &str, train: &str, source: &str, destination: &str) -> Ticket {
        Ticket {
            id: TicketId::new(id),
            username: username.to_string(),
            train_name: train.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            price: catalog::price_of(train).unwrap_or_default(),
            seat: None,
            booked_at: None,
        }
    }
}

// Re-export commonly used items
pub use mocks::{ApiCall, ApiOperation, FixedClock, MockReservationApi, ScriptedConfirmer, test_clock};
pub use reducer_test::{ReducerTest, assertions, collect_actions};
