//! Application reducers.
//!
//! Each workflow has its own reducer over the shared [`AppState`] and
//! [`AppAction`]; [`app_reducer`] combines them into the one the store runs.
//! Workflows hand over to each other by sending actions (login success
//! sends `ShowDashboard`, which sends `LoadTickets`).

pub mod auth;
pub mod notifications;
pub mod sections;
pub mod tickets;

pub use auth::AuthReducer;
pub use notifications::NotificationsReducer;
pub use sections::SectionsReducer;
pub use tickets::TicketsReducer;

use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::notifications::NotificationKind;
use crate::state::AppState;
use tripsync_core::composition::{BoxedReducer, CombinedReducer, combine_reducers};
use tripsync_core::effect::Effect;
use tripsync_core::environment::{Confirmer, ReservationApi};
use tripsync_core::{SmallVec, smallvec};

/// Shown when an action would start a second request.
pub const BUSY_MESSAGE: &str = "Please wait for the current request to finish";

/// Shown when a signed-in action is attempted without a session.
pub const SIGN_IN_REQUIRED: &str = "Please sign in first";

/// The combined application reducer
pub type AppReducer<A, C> = CombinedReducer<AppState, AppAction, AppEnvironment<A, C>>;

/// Effects returned by one reduction
pub(crate) type Effects = SmallVec<[Effect<AppAction>; 4]>;

/// Builds the application reducer
#[must_use]
pub fn app_reducer<A, C>() -> AppReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    let reducers: Vec<BoxedReducer<AppState, AppAction, AppEnvironment<A, C>>> = vec![
        Box::new(SectionsReducer::new()),
        Box::new(AuthReducer::new()),
        Box::new(TicketsReducer::new()),
        Box::new(NotificationsReducer::new()),
    ];
    combine_reducers(reducers)
}

/// The "disabled control": tells the user to wait instead of starting a request.
pub(crate) fn refuse_busy<A, C>(state: &mut AppState, env: &AppEnvironment<A, C>) -> Effects
where
    A: ReservationApi,
    C: Confirmer,
{
    tracing::info!(pending = ?state.pending, "Refused action while a request is in flight");
    smallvec![env.notify(state, NotificationKind::Info, BUSY_MESSAGE)]
}

/// Releases the in-flight slot for `generation`; false means the completion is stale.
pub(crate) fn accept_completion(state: &mut AppState, generation: u64) -> bool {
    let current = state.finish_request(generation);
    if !current {
        tracing::warn!(generation, pending = ?state.pending, "Discarding stale response");
    }
    current
}
