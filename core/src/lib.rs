//! # TripSync Core
//!
//! Core traits and types for the TripSync reservation client.
//!
//! The client is built as a functional core with an imperative shell: every
//! user-facing workflow is a reducer that updates state in place and returns
//! descriptions of the side effects it needs. The runtime executes those
//! effects and feeds their results back as new actions.
//!
//! ## Core Concepts
//!
//! - **State**: What the client currently knows (session, draft, ticket list)
//! - **Action**: Every input to a reducer (user intents and API results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies (`ReservationApi`, `Confirmer`, `Clock`)
//!
//! ## Domain
//!
//! - [`catalog`]: static train and station reference data
//! - [`ticket`]: tickets, drafts and the request payloads sent to the API
//! - [`validation`]: pure registration/ticket validation
//! - [`error`]: the error taxonomy shared by the adapter and the workflows
//!
//! ## Example
//!
//! ```
//! use tripsync_core::{catalog, validation};
//! use tripsync_core::ticket::TicketDraft;
//!
//! let mut draft = TicketDraft::default();
//! draft.select_train(Some("Local Passenger"));
//! draft.source = "New Delhi".to_string();
//! draft.destination = "Mumbai Central".to_string();
//!
//! assert_eq!(draft.price, Some(150.0));
//! assert!(validation::validate_ticket_draft(&draft).valid);
//! assert_eq!(catalog::stations().len(), 12);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod catalog;
pub mod composition;
pub mod error;
pub mod ticket;
pub mod validation;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all workflow logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for AuthReducer {
    ///     type State = AppState;
    ///     type Action = AppAction;
    ///     type Environment = AppEnvironment<Api, Prompt>;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AppState,
    ///         action: AppAction,
    ///         env: &Self::Environment,
    ///     ) -> SmallVec<[Effect<AppAction>; 4]> {
    ///         match action {
    ///             AppAction::Logout => { /* ... */ smallvec![Effect::None] }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (notification expiry)
        ///
        /// Delays are timers: the runtime does not count them as work that an
        /// action's handle waits for.
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation (API calls, confirmation prompts)
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Feed an action straight back into the store
        ///
        /// Used when one workflow hands over to another (login → dashboard).
        #[must_use]
        pub fn send(action: Action) -> Effect<Action>
        where
            Action: Send + 'static,
        {
            Effect::Future(Box::pin(futures::future::ready(Some(action))))
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter, so the workflows run headless in tests.
pub mod environment {
    use crate::error::ApiError;
    use crate::ticket::{Credentials, Registration, Ticket, TicketId, TicketPayload};
    use chrono::{DateTime, Utc};
    use std::future::Future;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock (production)
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// The remote reservation API, as consumed by the workflows.
    ///
    /// Implemented over HTTP by `tripsync-api` and in memory by
    /// `tripsync-testing`.
    pub trait ReservationApi: Send + Sync {
        /// `POST /auth/register`
        fn register(
            &self,
            registration: &Registration,
        ) -> impl Future<Output = Result<(), ApiError>> + Send;

        /// `POST /auth/login`
        fn login(&self, credentials: &Credentials)
        -> impl Future<Output = Result<(), ApiError>> + Send;

        /// `POST /tickets`
        ///
        /// Returns the created ticket when the server echoes it back.
        fn create_ticket(
            &self,
            payload: &TicketPayload,
        ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send;

        /// `PUT /tickets/{id}`
        fn update_ticket(
            &self,
            id: &TicketId,
            payload: &TicketPayload,
        ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send;

        /// `GET /tickets/user/{username}`
        fn list_tickets(
            &self,
            username: &str,
        ) -> impl Future<Output = Result<Vec<Ticket>, ApiError>> + Send;

        /// `DELETE /tickets/{id}`
        fn delete_ticket(&self, id: &TicketId) -> impl Future<Output = Result<(), ApiError>> + Send;
    }

    /// Asks the user to explicitly confirm a destructive action.
    pub trait Confirmer: Send + Sync {
        /// Returns `true` only when the user accepted `prompt`.
        fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send;
    }
}
