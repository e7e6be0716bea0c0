//! Screen switching.

use super::Effects;
use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::notifications::NotificationKind;
use crate::state::{AppState, Screen};
use std::marker::PhantomData;
use tripsync_core::effect::Effect;
use tripsync_core::environment::{Confirmer, ReservationApi};
use tripsync_core::reducer::Reducer;
use tripsync_core::ticket::{Credentials, Registration};
use tripsync_core::{SmallVec, smallvec};

/// Shown when the dashboard is requested without a session.
pub const LOGIN_REQUIRED: &str = "Please log in first";

/// Reducer for the section controller
pub struct SectionsReducer<A, C> {
    _env: PhantomData<fn() -> (A, C)>,
}

impl<A, C> SectionsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    /// Creates a new `SectionsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }

    /// Entering the dashboard resets the form and loads the ticket list.
    fn show_dashboard(state: &mut AppState, env: &AppEnvironment<A, C>) -> Effects {
        if !state.is_authenticated() {
            state.screen = Screen::Login;
            return smallvec![env.notify(state, NotificationKind::Error, LOGIN_REQUIRED)];
        }

        state.screen = Screen::Dashboard;
        state.reset_form();
        smallvec![Effect::send(AppAction::LoadTickets)]
    }
}

impl<A, C> Default for SectionsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> Reducer for SectionsReducer<A, C>
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
            AppAction::ShowRegister => {
                state.screen = Screen::Register;
                state.register_form = Registration::default();
                SmallVec::new()
            },
            AppAction::ShowLogin => {
                state.screen = Screen::Login;
                state.login_form = Credentials::default();
                SmallVec::new()
            },
            AppAction::ShowDashboard => Self::show_dashboard(state, env),
            _ => SmallVec::new(),
        }
    }
}
