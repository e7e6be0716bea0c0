//! Registration, sign in and sign out.
//!
//! `AuthPhase` moves Anonymous → Authenticating → Authenticated on a
//! successful login and back to Anonymous on failure or confirmed logout.

use super::{Effects, accept_completion};
use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::notifications::NotificationKind;
use crate::state::{AppState, AuthPhase, RequestKind};
use std::marker::PhantomData;
use std::sync::Arc;
use tripsync_core::effect::Effect;
use tripsync_core::environment::{Confirmer, ReservationApi};
use tripsync_core::reducer::Reducer;
use tripsync_core::ticket::{Credentials, Registration};
use tripsync_core::validation::{join_errors, validate_credentials, validate_registration};
use tripsync_core::{SmallVec, smallvec};

/// Shown after a successful registration.
pub const REGISTERED: &str = "Account created successfully! Please sign in to continue.";

/// Shown when logout is requested without a session.
pub const NOT_SIGNED_IN: &str = "You are not currently signed in";

/// Reducer for the auth workflow
pub struct AuthReducer<A, C> {
    _env: PhantomData<fn() -> (A, C)>,
}

impl<A, C> AuthReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }

    fn register(state: &mut AppState, registration: Registration, env: &AppEnvironment<A, C>) -> Effects {
        state.register_form = Registration {
            password: String::new(),
            ..registration.clone()
        };

        let errors = validate_registration(&registration);
        if !errors.is_empty() {
            return smallvec![env.notify(state, NotificationKind::Error, join_errors(&errors))];
        }

        let Some(generation) = state.begin_request(RequestKind::Register) else {
            return super::refuse_busy(state, env);
        };

        tracing::info!(username = %registration.username, generation, "Registering");
        let api = Arc::clone(&env.api);
        smallvec![Effect::Future(Box::pin(async move {
            let action = match api.register(&registration).await {
                Ok(()) => AppAction::RegisterSucceeded { generation },
                Err(error) => AppAction::RegisterFailed { generation, error },
            };
            Some(action)
        }))]
    }

    fn login(state: &mut AppState, credentials: Credentials, env: &AppEnvironment<A, C>) -> Effects {
        if let Err(error) = validate_credentials(&credentials) {
            return smallvec![env.notify(state, NotificationKind::Error, error.to_string())];
        }

        let Some(generation) = state.begin_request(RequestKind::Login) else {
            return super::refuse_busy(state, env);
        };

        state.login_form.username.clone_from(&credentials.username);
        state.auth_phase = AuthPhase::Authenticating;

        tracing::info!(username = %credentials.username, generation, "Signing in");
        let api = Arc::clone(&env.api);
        smallvec![Effect::Future(Box::pin(async move {
            let action = match api.login(&credentials).await {
                Ok(()) => AppAction::LoginSucceeded {
                    generation,
                    username: credentials.username,
                },
                Err(error) => AppAction::LoginFailed { generation, error },
            };
            Some(action)
        }))]
    }

    fn logout(state: &mut AppState, env: &AppEnvironment<A, C>) -> Effects {
        let Some(username) = state.session_username.clone() else {
            return smallvec![
                env.notify(state, NotificationKind::Info, NOT_SIGNED_IN),
                Effect::send(AppAction::ShowLogin),
            ];
        };

        let confirmer = Arc::clone(&env.confirmer);
        let prompt = format!("Sign out from {username}'s account?");
        smallvec![Effect::Future(Box::pin(async move {
            if confirmer.confirm(&prompt).await {
                Some(AppAction::LogoutConfirmed { username })
            } else {
                tracing::debug!("Sign out declined");
                None
            }
        }))]
    }
}

impl<A, C> Default for AuthReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> Reducer for AuthReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<A, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Registration ==========
            AppAction::Register { registration } => Self::register(state, registration, env),

            AppAction::RegisterSucceeded { generation } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                state.register_form = Registration::default();
                smallvec![
                    env.notify(state, NotificationKind::Success, REGISTERED),
                    Effect::send(AppAction::ShowLogin),
                ]
            },

            AppAction::RegisterFailed { generation, error } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                tracing::warn!(kind = error.kind(), "Registration failed");
                smallvec![env.notify(
                    state,
                    NotificationKind::Error,
                    format!("Registration failed: {error}")
                )]
            },

            // ========== Sign in ==========
            AppAction::Login { credentials } => Self::login(state, credentials, env),

            AppAction::LoginSucceeded { generation, username } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                tracing::info!(%username, "Signed in");
                let message = format!("Welcome back, {username}!");
                state.session_username = Some(username);
                state.auth_phase = AuthPhase::Authenticated;
                state.login_form = Credentials::default();
                smallvec![
                    env.notify(state, NotificationKind::Success, message),
                    Effect::send(AppAction::ShowDashboard),
                ]
            },

            AppAction::LoginFailed { generation, error } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                tracing::warn!(kind = error.kind(), "Sign in failed");
                state.auth_phase = if state.is_authenticated() {
                    AuthPhase::Authenticated
                } else {
                    AuthPhase::Anonymous
                };
                smallvec![env.notify(
                    state,
                    NotificationKind::Error,
                    format!("Sign in failed: {error}")
                )]
            },

            // ========== Sign out ==========
            AppAction::Logout => Self::logout(state, env),

            AppAction::LogoutConfirmed { username } => {
                if state.session_username.as_deref() != Some(username.as_str()) {
                    tracing::warn!(%username, "Ignoring sign out for a session that already ended");
                    return SmallVec::new();
                }
                tracing::info!(%username, "Signed out");
                state.session_username = None;
                state.auth_phase = AuthPhase::Anonymous;
                state.reset_form();
                state.tickets.clear();
                state.abandon_request();
                smallvec![
                    env.notify(
                        state,
                        NotificationKind::Success,
                        format!("Successfully signed out. Goodbye, {username}!")
                    ),
                    Effect::send(AppAction::ShowLogin),
                ]
            },

            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reducers::test_support::{TestEnv, default_env, env, latest_message, signed_in};
    use crate::state::Screen;
    use tripsync_core::error::ApiError;
    use tripsync_testing::{
        ApiOperation, MockReservationApi, ReducerTest, ScriptedConfirmer, assertions, collect_actions,
    };

    fn reducer() -> AuthReducer<MockReservationApi, ScriptedConfirmer> {
        AuthReducer::new()
    }

    #[test]
    fn blank_username_blocks_registration() {
        ReducerTest::new(reducer())
            .with_env(default_env())
            .given_state(AppState::default())
            .when_action(AppAction::register("   ", None, "secret1"))
            .then_state(|state| {
                assert_eq!(latest_message(state).as_deref(), Some("Username is required"));
                assert_eq!(state.auth_phase, AuthPhase::Anonymous);
                assert!(state.pending.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_no_future_effect(effects);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }

    #[test]
    fn registration_errors_are_joined() {
        ReducerTest::new(reducer())
            .with_env(default_env())
            .given_state(AppState::default())
            .when_action(AppAction::register("asha", Some("asha.example.com"), "abc"))
            .then_state(|state| {
                assert_eq!(
                    latest_message(state).as_deref(),
                    Some("Valid email is required. Password must be at least 6 characters")
                );
                assert_eq!(state.register_form.email, "asha.example.com");
                assert!(state.register_form.password.is_empty());
            })
            .run();
    }

    #[tokio::test]
    async fn registration_success_returns_to_login() {
        let api = MockReservationApi::new();
        let env: TestEnv = env(api.clone(), ScriptedConfirmer::always(true));

        let (mut state, effects) = ReducerTest::new(reducer())
            .with_env(env.clone())
            .given_state(AppState::default())
            .when_action(AppAction::register("asha", Some("asha@example.com"), "secret1"))
            .then_state(|state| assert!(state.loading))
            .run();

        let actions = collect_actions(effects).await;
        assert_eq!(actions, vec![AppAction::RegisterSucceeded { generation: 1 }]);
        assert_eq!(api.call_count(ApiOperation::Register), 1);

        let follow_up = reducer().reduce(&mut state, actions[0].clone(), &env);
        assert!(!state.loading);
        assert_eq!(latest_message(&state).as_deref(), Some(REGISTERED));
        assert_eq!(collect_actions(follow_up).await, vec![AppAction::ShowLogin]);
    }

    #[tokio::test]
    async fn duplicate_username_surfaces_server_message() {
        let api = MockReservationApi::new().with_user("asha", "secret1");
        let env = env(api, ScriptedConfirmer::always(true));

        let (mut state, effects) = ReducerTest::new(reducer())
            .with_env(env.clone())
            .given_state(AppState::default())
            .when_action(AppAction::register("asha", None, "secret1"))
            .run();

        let failure = collect_actions(effects).await.pop().unwrap();
        reducer().reduce(&mut state, failure, &env);
        assert_eq!(
            latest_message(&state).as_deref(),
            Some("Registration failed: Username already exists")
        );
    }

    #[test]
    fn blank_credentials_make_no_call() {
        ReducerTest::new(reducer())
            .with_env(default_env())
            .given_state(AppState::default())
            .when_action(AppAction::login("asha", ""))
            .then_state(|state| {
                assert_eq!(
                    latest_message(state).as_deref(),
                    Some("Please enter both username and password")
                );
                assert_eq!(state.auth_phase, AuthPhase::Anonymous);
            })
            .then_effects(assertions::assert_no_future_effect)
            .run();
    }

    #[tokio::test]
    async fn login_success_opens_dashboard() {
        let api = MockReservationApi::new().with_user("asha", "secret1");
        let env = env(api, ScriptedConfirmer::always(true));

        let (mut state, effects) = ReducerTest::new(reducer())
            .with_env(env.clone())
            .given_state(AppState::default())
            .when_action(AppAction::login("asha", "secret1"))
            .then_state(|state| assert_eq!(state.auth_phase, AuthPhase::Authenticating))
            .run();

        let succeeded = collect_actions(effects).await.pop().unwrap();
        let follow_up = reducer().reduce(&mut state, succeeded, &env);

        assert_eq!(state.session_username.as_deref(), Some("asha"));
        assert_eq!(state.auth_phase, AuthPhase::Authenticated);
        assert_eq!(latest_message(&state).as_deref(), Some("Welcome back, asha!"));
        assert_eq!(collect_actions(follow_up).await, vec![AppAction::ShowDashboard]);
    }

    #[test]
    fn login_failure_returns_to_anonymous() {
        ReducerTest::new(reducer())
            .with_env(default_env())
            .given_state(AppState {
                auth_phase: AuthPhase::Authenticating,
                pending: Some(crate::state::PendingRequest {
                    kind: RequestKind::Login,
                    generation: 3,
                }),
                loading: true,
                request_generation: 3,
                ..AppState::default()
            })
            .when_action(AppAction::LoginFailed {
                generation: 3,
                error: ApiError::http(401, "Unauthorized", "Invalid username or password"),
            })
            .then_state(|state| {
                assert_eq!(state.auth_phase, AuthPhase::Anonymous);
                assert!(!state.loading);
                assert_eq!(
                    latest_message(state).as_deref(),
                    Some("Sign in failed: Invalid username or password")
                );
            })
            .run();
    }

    #[tokio::test]
    async fn logout_when_anonymous_only_informs() {
        let (state, effects) = ReducerTest::new(reducer())
            .with_env(default_env())
            .given_state(AppState::default())
            .when_action(AppAction::Logout)
            .then_state(|state| {
                assert_eq!(latest_message(state).as_deref(), Some(NOT_SIGNED_IN));
                assert_eq!(
                    state.notifications.latest().map(|n| n.kind),
                    Some(NotificationKind::Info)
                );
            })
            .run();

        assert!(state.session_username.is_none());
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(collect_actions(effects).await, vec![AppAction::ShowLogin]);
    }

    #[tokio::test]
    async fn logout_asks_before_signing_out() {
        let confirmer = ScriptedConfirmer::answers([false]);
        let env = env(MockReservationApi::new(), confirmer.clone());

        let (_, effects) = ReducerTest::new(reducer())
            .with_env(env)
            .given_state(signed_in("asha"))
            .when_action(AppAction::Logout)
            .then_state(|state| assert!(state.is_authenticated()))
            .run();

        assert!(collect_actions(effects).await.is_empty());
        assert_eq!(confirmer.prompts(), vec!["Sign out from asha's account?".to_string()]);
    }

    #[test]
    fn confirmed_logout_clears_session() {
        let mut given = signed_in("asha");
        given.tickets.push(tripsync_testing::fixtures::ticket(
            "t-1",
            "asha",
            "Local Passenger",
            "Pune",
            "Kanpur",
        ));
        given.editing_ticket_id = Some(tripsync_core::ticket::TicketId::new("t-1"));

        ReducerTest::new(reducer())
            .with_env(default_env())
            .given_state(given)
            .when_action(AppAction::LogoutConfirmed {
                username: "asha".to_string(),
            })
            .then_state(|state| {
                assert!(state.session_username.is_none());
                assert!(state.editing_ticket_id.is_none());
                assert!(state.tickets.is_empty());
                assert_eq!(state.auth_phase, AuthPhase::Anonymous);
                assert_eq!(
                    latest_message(state).as_deref(),
                    Some("Successfully signed out. Goodbye, asha!")
                );
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 2))
            .run();
    }
}
