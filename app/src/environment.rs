//! Dependencies injected into the application reducers.

use crate::actions::AppAction;
use crate::notifications::NotificationKind;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tripsync_core::effect::Effect;
use tripsync_core::environment::{Clock, Confirmer, ReservationApi};

/// Environment for the application reducers
///
/// Generic over the API and the confirmation prompt so tests can swap in
/// the in-memory service and a scripted confirmer.
pub struct AppEnvironment<A, C> {
    /// Remote reservation API
    pub api: Arc<A>,
    /// Confirmation prompt for destructive actions
    pub confirmer: Arc<C>,
    /// Clock for notification timestamps
    pub clock: Arc<dyn Clock>,
    /// How long notifications stay visible
    pub notification_ttl: Duration,
}

impl<A, C> AppEnvironment<A, C>
where
    A: ReservationApi,
    C: Confirmer,
{
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(api: A, confirmer: C, clock: Arc<dyn Clock>, notification_ttl: Duration) -> Self {
        Self {
            api: Arc::new(api),
            confirmer: Arc::new(confirmer),
            clock,
            notification_ttl,
        }
    }

    /// Pushes a notification and schedules its dismissal
    pub fn notify(
        &self,
        state: &mut AppState,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Effect<AppAction> {
        let message = message.into();
        tracing::debug!(?kind, %message, "Notification");

        let id = state.notifications.push(kind, message, self.clock.now());
        Effect::Delay {
            duration: self.notification_ttl,
            action: Box::new(AppAction::DismissNotification { id }),
        }
    }
}

// Manual impl: cloning shares the dependencies and needs no `A: Clone`.
impl<A, C> Clone for AppEnvironment<A, C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            confirmer: Arc::clone(&self.confirmer),
            clock: Arc::clone(&self.clock),
            notification_ttl: self.notification_ttl,
        }
    }
}
