//! Application state owned by the store.

use crate::notifications::Notifications;
use tripsync_core::ticket::{Credentials, Registration, Ticket, TicketDraft, TicketId};

/// Which screen is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    /// Account creation
    Register,
    /// Sign in
    #[default]
    Login,
    /// Reservation form and ticket list
    Dashboard,
}

/// Authentication state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// No session
    #[default]
    Anonymous,
    /// A login request is in flight
    Authenticating,
    /// `session_username` is set
    Authenticated,
}

/// Network-triggering actions that take the in-flight slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// `register`
    Register,
    /// `login`
    Login,
    /// `create_ticket` / `update_ticket`
    SaveTicket,
    /// confirmation + `delete_ticket`
    DeleteTicket,
    /// `list_tickets`
    LoadTickets,
}

/// The request currently in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// What was requested
    pub kind: RequestKind,
    /// Generation its completion action must carry
    pub generation: u64,
}

/// Everything the client knows.
///
/// Starts on the login screen with no session. The reducers are the only
/// writers; the view renders snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Signed-in user, if any
    pub session_username: Option<String>,
    /// Ticket loaded into the form for editing
    pub editing_ticket_id: Option<TicketId>,
    /// True while a request is in flight
    pub loading: bool,
    /// Current screen
    pub screen: Screen,
    /// Authentication phase
    pub auth_phase: AuthPhase,
    /// Reservation form
    pub draft: TicketDraft,
    /// Last registration input (password never kept)
    pub register_form: Registration,
    /// Last sign-in input (password never kept)
    pub login_form: Credentials,
    /// The signed-in user's tickets, as last loaded
    pub tickets: Vec<Ticket>,
    /// Visible notifications
    pub notifications: Notifications,
    /// In-flight guard
    pub pending: Option<PendingRequest>,
    /// Last generation handed out
    pub request_generation: u64,
}

impl AppState {
    /// True when a user is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session_username.is_some()
    }

    /// True while a request is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket shown at 1-based position `n` of the list
    #[must_use]
    pub fn ticket_at(&self, n: usize) -> Option<&Ticket> {
        n.checked_sub(1).and_then(|i| self.tickets.get(i))
    }

    /// Clears the reservation form and leaves edit mode
    pub fn reset_form(&mut self) {
        self.draft = TicketDraft::default();
        self.editing_ticket_id = None;
    }

    /// Loads `ticket` into the form in edit mode
    pub fn start_editing(&mut self, ticket: &Ticket) {
        self.draft = TicketDraft::from_ticket(ticket);
        self.editing_ticket_id = Some(ticket.id.clone());
    }

    /// Takes the in-flight slot for `kind`.
    ///
    /// Returns the new generation, or `None` while another request is pending.
    pub fn begin_request(&mut self, kind: RequestKind) -> Option<u64> {
        let generation = self.hold_request(kind)?;
        self.loading = true;
        Some(generation)
    }

    /// Takes the in-flight slot without showing the loading state.
    ///
    /// For requests that wait on the user first; [`Self::resume_request`]
    /// marks the point where the network call starts.
    pub fn hold_request(&mut self, kind: RequestKind) -> Option<u64> {
        if self.pending.is_some() {
            return None;
        }
        self.request_generation += 1;
        let generation = self.request_generation;
        self.pending = Some(PendingRequest { kind, generation });
        Some(generation)
    }

    /// Shows the loading state for a held request.
    ///
    /// Returns false if `generation` is no longer the pending request.
    pub fn resume_request(&mut self, generation: u64) -> bool {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.loading = true;
                true
            },
            _ => false,
        }
    }

    /// Releases the in-flight slot if `generation` is the pending one.
    ///
    /// Returns false for stale completions, which must be ignored.
    pub fn finish_request(&mut self, generation: u64) -> bool {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                self.loading = false;
                true
            },
            _ => false,
        }
    }

    /// Drops the in-flight slot so any outstanding completion becomes stale
    pub fn abandon_request(&mut self) {
        self.pending = None;
        self.loading = false;
    }
}
