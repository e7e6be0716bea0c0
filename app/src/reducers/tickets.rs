//! Reservation form, save, edit, cancel and the ticket list.

use super::{Effects, SIGN_IN_REQUIRED, accept_completion, refuse_busy};
use crate::actions::{AppAction, SaveMode};
use crate::environment::AppEnvironment;
use crate::notifications::NotificationKind;
use crate::state::{AppState, RequestKind};
use std::marker::PhantomData;
use std::sync::Arc;
use tripsync_core::effect::Effect;
use tripsync_core::environment::{Confirmer, ReservationApi};
use tripsync_core::reducer::Reducer;
use tripsync_core::ticket::{Ticket, TicketId};
use tripsync_core::validation::{join_errors, validate_ticket_draft};
use tripsync_core::{SmallVec, smallvec};

/// Asked before cancelling a reservation.
pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this ticket? This action cannot be undone.";

/// Shown after a new reservation was stored.
pub const RESERVED: &str = "Ticket reserved successfully!";

/// Shown after an existing reservation was updated.
pub const UPDATED: &str = "Ticket updated successfully!";

/// Shown after a reservation was cancelled.
pub const CANCELLED: &str = "Ticket cancelled successfully";

/// Shown after a ticket was loaded into the form.
pub const LOADED_FOR_EDITING: &str = "Ticket loaded for editing";

/// Reducer for the ticket workflow
pub struct TicketsReducer<A, C> {
    _env: PhantomData<fn() -> (A, C)>,
}

impl<A, C> TicketsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    /// Creates a new `TicketsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }

    /// Validates the draft and creates or updates it.
    ///
    /// The payload always carries the catalog fare.
    fn save(state: &mut AppState, env: &AppEnvironment<A, C>) -> Effects {
        let Some(username) = state.session_username.clone() else {
            return smallvec![env.notify(state, NotificationKind::Error, SIGN_IN_REQUIRED)];
        };

        let validation = validate_ticket_draft(&state.draft);
        if !validation.valid {
            return smallvec![env.notify(state, NotificationKind::Error, join_errors(&validation.errors))];
        }

        let Some(generation) = state.begin_request(RequestKind::SaveTicket) else {
            return refuse_busy(state, env);
        };

        let payload = state.draft.to_payload(&username);
        let editing = state.editing_ticket_id.clone();
        tracing::info!(
            train = %payload.train_name,
            editing = ?editing.as_ref().map(TicketId::as_str),
            generation,
            "Saving ticket"
        );

        let api = Arc::clone(&env.api);
        smallvec![Effect::Future(Box::pin(async move {
            let (mode, result) = match editing {
                None => (SaveMode::Created, api.create_ticket(&payload).await),
                Some(id) => (SaveMode::Updated, api.update_ticket(&id, &payload).await),
            };
            let action = match result {
                Ok(ticket) => AppAction::TicketSaved {
                    generation,
                    mode,
                    ticket,
                },
                Err(error) => AppAction::SaveFailed { generation, error },
            };
            Some(action)
        }))]
    }

    /// Asks for confirmation, then cancels.
    ///
    /// The in-flight slot is held from the prompt until the server answers.
    fn delete(state: &mut AppState, ticket_id: TicketId, env: &AppEnvironment<A, C>) -> Effects {
        if !state.is_authenticated() {
            return smallvec![env.notify(state, NotificationKind::Error, SIGN_IN_REQUIRED)];
        }

        // Held, not loading: the wait is on the user until they answer
        let Some(generation) = state.hold_request(RequestKind::DeleteTicket) else {
            return refuse_busy(state, env);
        };

        let confirmer = Arc::clone(&env.confirmer);
        smallvec![Effect::Future(Box::pin(async move {
            let action = if confirmer.confirm(CANCEL_PROMPT).await {
                AppAction::DeleteConfirmed { generation, ticket_id }
            } else {
                AppAction::DeleteDeclined { generation }
            };
            Some(action)
        }))]
    }

    fn delete_confirmed(
        state: &mut AppState,
        generation: u64,
        ticket_id: TicketId,
        env: &AppEnvironment<A, C>,
    ) -> Effects {
        if !state.resume_request(generation) {
            tracing::warn!(generation, "Discarding stale cancel confirmation");
            return SmallVec::new();
        }

        tracing::info!(ticket_id = %ticket_id, generation, "Cancelling ticket");
        let api = Arc::clone(&env.api);
        smallvec![Effect::Future(Box::pin(async move {
            let action = match api.delete_ticket(&ticket_id).await {
                Ok(()) => AppAction::TicketDeleted { generation, ticket_id },
                Err(error) => AppAction::DeleteFailed { generation, error },
            };
            Some(action)
        }))]
    }

    fn load(state: &mut AppState, env: &AppEnvironment<A, C>) -> Effects {
        let Some(username) = state.session_username.clone() else {
            return smallvec![env.notify(state, NotificationKind::Error, SIGN_IN_REQUIRED)];
        };

        let Some(generation) = state.begin_request(RequestKind::LoadTickets) else {
            return refuse_busy(state, env);
        };

        let api = Arc::clone(&env.api);
        smallvec![Effect::Future(Box::pin(async move {
            let action = match api.list_tickets(&username).await {
                Ok(tickets) => AppAction::TicketsLoaded { generation, tickets },
                Err(error) => AppAction::LoadFailed { generation, error },
            };
            Some(action)
        }))]
    }

    fn upsert(tickets: &mut Vec<Ticket>, ticket: Ticket) {
        match tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(existing) => *existing = ticket,
            None => tickets.push(ticket),
        }
    }
}

impl<A, C> Default for TicketsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> Reducer for TicketsReducer<A, C>
where
    A: ReservationApi + 'static,
    C: Confirmer + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<A, C>;

    #[allow(clippy::too_many_lines)] // One arm per ticket action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Form ==========
            AppAction::SelectTrain { train } => {
                state.draft.select_train(train.as_deref());
                SmallVec::new()
            },
            AppAction::SelectSource { station } => {
                state.draft.source = station.unwrap_or_default();
                SmallVec::new()
            },
            AppAction::SelectDestination { station } => {
                state.draft.destination = station.unwrap_or_default();
                SmallVec::new()
            },
            AppAction::ResetForm => {
                state.reset_form();
                SmallVec::new()
            },
            AppAction::EditTicket { ticket } => {
                state.start_editing(&ticket);
                smallvec![env.notify(state, NotificationKind::Info, LOADED_FOR_EDITING)]
            },

            // ========== Save ==========
            AppAction::SaveTicket => Self::save(state, env),

            AppAction::TicketSaved {
                generation,
                mode,
                ticket,
            } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                if let Some(ticket) = ticket {
                    Self::upsert(&mut state.tickets, ticket);
                }
                state.reset_form();
                let message = match mode {
                    SaveMode::Created => RESERVED,
                    SaveMode::Updated => UPDATED,
                };
                smallvec![
                    env.notify(state, NotificationKind::Success, message),
                    Effect::send(AppAction::LoadTickets),
                ]
            },

            AppAction::SaveFailed { generation, error } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                tracing::warn!(kind = error.kind(), "Save failed");
                smallvec![env.notify(
                    state,
                    NotificationKind::Error,
                    format!("Failed to save ticket: {error}")
                )]
            },

            // ========== Cancel ==========
            AppAction::DeleteTicket { ticket_id } => Self::delete(state, ticket_id, env),

            AppAction::DeleteConfirmed { generation, ticket_id } => {
                Self::delete_confirmed(state, generation, ticket_id, env)
            },

            AppAction::DeleteDeclined { generation } => {
                accept_completion(state, generation);
                SmallVec::new()
            },

            AppAction::TicketDeleted { generation, ticket_id } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                state.tickets.retain(|t| t.id != ticket_id);
                if state.editing_ticket_id.as_ref() == Some(&ticket_id) {
                    state.reset_form();
                }
                smallvec![
                    env.notify(state, NotificationKind::Success, CANCELLED),
                    Effect::send(AppAction::LoadTickets),
                ]
            },

            AppAction::DeleteFailed { generation, error } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                tracing::warn!(kind = error.kind(), "Cancel failed");
                smallvec![env.notify(
                    state,
                    NotificationKind::Error,
                    format!("Failed to cancel ticket: {error}")
                )]
            },

            // ========== List ==========
            AppAction::LoadTickets => Self::load(state, env),

            AppAction::TicketsLoaded { generation, tickets } => {
                if accept_completion(state, generation) {
                    tracing::debug!(count = tickets.len(), "Tickets loaded");
                    state.tickets = tickets;
                }
                SmallVec::new()
            },

            AppAction::LoadFailed { generation, error } => {
                if !accept_completion(state, generation) {
                    return SmallVec::new();
                }
                tracing::warn!(kind = error.kind(), "Loading tickets failed");
                smallvec![env.notify(
                    state,
                    NotificationKind::Error,
                    format!("Failed to load your tickets: {error}")
                )]
            },

            _ => SmallVec::new(),
        }
    }
}
