//! Every input to the application reducer.
//!
//! User intents come from the terminal; completion actions come back from
//! effects and carry the generation of the request they answer.

use crate::notifications::NotificationId;
use tripsync_core::error::ApiError;
use tripsync_core::ticket::{Credentials, Registration, Ticket, TicketId};

/// Whether a save created a new reservation or updated an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMode {
    /// `POST /tickets`
    Created,
    /// `PUT /tickets/{id}`
    Updated,
}

/// Application actions
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    // ========== Sections ==========
    /// Show the registration screen with an empty form
    ShowRegister,
    /// Show the sign-in screen with an empty form
    ShowLogin,
    /// Show the dashboard (requires a session)
    ShowDashboard,

    // ========== Auth ==========
    /// Create an account
    Register {
        /// Form input
        registration: Registration,
    },
    /// Account created
    RegisterSucceeded {
        /// Request generation
        generation: u64,
    },
    /// Account creation failed
    RegisterFailed {
        /// Request generation
        generation: u64,
        /// Why
        error: ApiError,
    },
    /// Sign in
    Login {
        /// Form input
        credentials: Credentials,
    },
    /// Sign in accepted
    LoginSucceeded {
        /// Request generation
        generation: u64,
        /// User now signed in
        username: String,
    },
    /// Sign in rejected
    LoginFailed {
        /// Request generation
        generation: u64,
        /// Why
        error: ApiError,
    },
    /// Sign out (asks for confirmation)
    Logout,
    /// The user confirmed signing out of `username`
    LogoutConfirmed {
        /// User being signed out
        username: String,
    },

    // ========== Tickets ==========
    /// Choose a train; `None` clears the selection
    SelectTrain {
        /// Catalog train name
        train: Option<String>,
    },
    /// Choose the departure station
    SelectSource {
        /// Station name; `None` clears the selection
        station: Option<String>,
    },
    /// Choose the arrival station
    SelectDestination {
        /// Station name; `None` clears the selection
        station: Option<String>,
    },
    /// Create or update the ticket in the form
    SaveTicket,
    /// Save accepted by the server
    TicketSaved {
        /// Request generation
        generation: u64,
        /// Create or update
        mode: SaveMode,
        /// The stored ticket, when the server echoed it
        ticket: Option<Ticket>,
    },
    /// Save rejected
    SaveFailed {
        /// Request generation
        generation: u64,
        /// Why
        error: ApiError,
    },
    /// Load an existing ticket into the form
    EditTicket {
        /// Ticket to edit
        ticket: Ticket,
    },
    /// Clear the form and leave edit mode
    ResetForm,
    /// Cancel a reservation (asks for confirmation)
    DeleteTicket {
        /// Ticket to cancel
        ticket_id: TicketId,
    },
    /// The user confirmed the cancellation
    DeleteConfirmed {
        /// Request generation
        generation: u64,
        /// Ticket to cancel
        ticket_id: TicketId,
    },
    /// The user kept the reservation
    DeleteDeclined {
        /// Request generation
        generation: u64,
    },
    /// Reservation cancelled
    TicketDeleted {
        /// Request generation
        generation: u64,
        /// Cancelled ticket
        ticket_id: TicketId,
    },
    /// Cancellation rejected
    DeleteFailed {
        /// Request generation
        generation: u64,
        /// Why
        error: ApiError,
    },
    /// Fetch the signed-in user's tickets
    LoadTickets,
    /// Ticket list fetched
    TicketsLoaded {
        /// Request generation
        generation: u64,
        /// The user's tickets
        tickets: Vec<Ticket>,
    },
    /// Ticket list fetch failed
    LoadFailed {
        /// Request generation
        generation: u64,
        /// Why
        error: ApiError,
    },

    // ========== Notifications ==========
    /// A notification expired
    DismissNotification {
        /// Which one
        id: NotificationId,
    },
    /// An effect task failed without producing its completion action
    UnexpectedFailure {
        /// Diagnostic detail for the log
        detail: String,
    },
}

impl AppAction {
    /// Builds a login action from raw form input
    #[must_use]
    pub fn login(username: &str, password: &str) -> Self {
        Self::Login {
            credentials: Credentials::new(username, password),
        }
    }

    /// Builds a registration action from raw form input
    #[must_use]
    pub fn register(username: &str, email: Option<&str>, password: &str) -> Self {
        Self::Register {
            registration: Registration::new(username, email, password),
        }
    }

    /// Builds a train selection
    #[must_use]
    pub fn select_train(train: &str) -> Self {
        Self::SelectTrain {
            train: Some(train.to_string()),
        }
    }

    /// Builds a departure selection
    #[must_use]
    pub fn select_source(station: &str) -> Self {
        Self::SelectSource {
            station: Some(station.to_string()),
        }
    }

    /// Builds an arrival selection
    #[must_use]
    pub fn select_destination(station: &str) -> Self {
        Self::SelectDestination {
            station: Some(station.to_string()),
        }
    }

    /// The request generation a completion action answers, if any
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::RegisterSucceeded { generation }
            | Self::RegisterFailed { generation, .. }
            | Self::LoginSucceeded { generation, .. }
            | Self::LoginFailed { generation, .. }
            | Self::TicketSaved { generation, .. }
            | Self::SaveFailed { generation, .. }
            | Self::DeleteConfirmed { generation, .. }
            | Self::DeleteDeclined { generation }
            | Self::TicketDeleted { generation, .. }
            | Self::DeleteFailed { generation, .. }
            | Self::TicketsLoaded { generation, .. }
            | Self::LoadFailed { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}
