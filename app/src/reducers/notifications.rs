//! Notification expiry and recovery from failed effects.

use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::notifications::NotificationKind;
use crate::state::{AppState, AuthPhase};
use std::marker::PhantomData;
use tripsync_core::effect::Effect;
use tripsync_core::environment::{Confirmer, ReservationApi};
use tripsync_core::reducer::Reducer;
use tripsync_core::{SmallVec, smallvec};

/// Shown when an effect fails without reporting a result.
pub const UNEXPECTED_FAILURE: &str = "An unexpected error occurred. Please try again.";

/// Reducer for notifications
pub struct NotificationsReducer<A, C> {
    _env: PhantomData<fn() -> (A, C)>,
}

impl<A, C> NotificationsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    /// Creates a new `NotificationsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<A, C> Default for NotificationsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> Reducer for NotificationsReducer<A, C>
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
            AppAction::DismissNotification { id } => {
                if !state.notifications.dismiss(id) {
                    tracing::trace!(%id, "Notification already gone");
                }
                SmallVec::new()
            },

            AppAction::UnexpectedFailure { detail } => {
                tracing::error!(%detail, pending = ?state.pending, "Recovering from failed effect");
                // Whatever the failed effect would have answered is now stale.
                state.abandon_request();
                if state.auth_phase == AuthPhase::Authenticating {
                    state.auth_phase = if state.is_authenticated() {
                        AuthPhase::Authenticated
                    } else {
                        AuthPhase::Anonymous
                    };
                }
                smallvec![env.notify(state, NotificationKind::Error, UNEXPECTED_FAILURE)]
            },

            _ => SmallVec::new(),
        }
    }
}
