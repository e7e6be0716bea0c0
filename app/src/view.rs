//! Text rendering of [`AppState`] snapshots.
//!
//! Pure: nothing here reads input or touches the store.

use crate::notifications::{Notification, NotificationKind};
use crate::state::{AppState, Screen};
use std::fmt;
use tripsync_core::catalog::{self, format_price};
use tripsync_core::ticket::Ticket;

/// Shown on the dashboard when the user has no reservations.
pub const EMPTY_TICKETS: &str = "No tickets booked yet. Reserve your first ticket!";

/// Command reference printed by `help`.
pub const HELP: &str = "\
Commands:
  register <username> <password> [email]   create an account
  login <username> <password>              sign in
  logout                                   sign out
  show register|login|dashboard            switch screen
  train <name>|none                        choose a train
  from <station>                           choose the departure station
  to <station>                             choose the arrival station
  save                                     reserve or update the ticket in the form
  edit <n>                                 load ticket n into the form
  cancel <n>                               cancel ticket n
  reset                                    clear the form
  refresh                                  reload your tickets
  trains                                   list trains and fares
  stations                                 list stations
  help                                     show this help
  quit                                     exit";

/// Label of the form's submit control
#[must_use]
pub const fn submit_label(state: &AppState) -> &'static str {
    if state.editing_ticket_id.is_some() {
        "Update Ticket"
    } else {
        "Reserve Ticket"
    }
}

/// Renders the whole screen
#[must_use]
pub fn render(state: &AppState) -> String {
    View(state).to_string()
}

/// Numbered train options with category and fare
#[must_use]
pub fn render_trains() -> String {
    catalog::trains()
        .iter()
        .enumerate()
        .map(|(i, train)| format!("  {}. {}", i + 1, train.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered station options
#[must_use]
pub fn render_stations() -> String {
    catalog::stations()
        .iter()
        .enumerate()
        .map(|(i, station)| format!("  {:>2}. {station}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

struct View<'a>(&'a AppState);

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        match &state.session_username {
            Some(username) => writeln!(f, "TripSync | Sign Out ({username})")?,
            None => writeln!(f, "TripSync | Sign In | Register")?,
        }
        writeln!(f, "{}", "-".repeat(48))?;

        for notification in state.notifications.iter() {
            write_notification(f, notification)?;
        }
        if state.loading {
            writeln!(f, "Loading...")?;
        }

        match state.screen {
            Screen::Register => write_register(f, state),
            Screen::Login => write_login(f, state),
            Screen::Dashboard => write_dashboard(f, state),
        }
    }
}

fn write_notification(f: &mut fmt::Formatter<'_>, notification: &Notification) -> fmt::Result {
    let tag = match notification.kind {
        NotificationKind::Info => "info",
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
    };
    writeln!(f, "[{tag}] {}", notification.message)
}

fn write_register(f: &mut fmt::Formatter<'_>, state: &AppState) -> fmt::Result {
    writeln!(f, "Create Account")?;
    if !state.register_form.username.is_empty() {
        writeln!(f, "  Username: {}", state.register_form.username)?;
    }
    if !state.register_form.email.is_empty() {
        writeln!(f, "  Email: {}", state.register_form.email)?;
    }
    writeln!(f, "  register <username> <password> [email]")?;
    writeln!(f, "  Already have an account? show login")
}

fn write_login(f: &mut fmt::Formatter<'_>, state: &AppState) -> fmt::Result {
    writeln!(f, "Sign In")?;
    if !state.login_form.username.is_empty() {
        writeln!(f, "  Username: {}", state.login_form.username)?;
    }
    writeln!(f, "  login <username> <password>")?;
    writeln!(f, "  New here? show register")
}

fn write_dashboard(f: &mut fmt::Formatter<'_>, state: &AppState) -> fmt::Result {
    let draft = &state.draft;
    let or_none = |value: &str| if value.is_empty() { "(none)".to_string() } else { value.to_string() };

    match &state.editing_ticket_id {
        Some(id) => writeln!(f, "Edit Ticket {id}")?,
        None => writeln!(f, "Reserve a Ticket")?,
    }
    let train = catalog::find_train(&draft.train_name)
        .map_or_else(|| or_none(&draft.train_name), |entry| entry.label());
    writeln!(f, "  Train: {train}")?;
    writeln!(f, "  From:  {}", or_none(&draft.source))?;
    writeln!(f, "  To:    {}", or_none(&draft.destination))?;
    match draft.price {
        Some(price) => writeln!(f, "  Price: ₹{}", format_price(price))?,
        None => writeln!(f, "  Price: -")?,
    }
    writeln!(f, "  [{}]", submit_label(state))?;

    writeln!(f)?;
    writeln!(f, "Your Tickets")?;
    if state.tickets.is_empty() {
        return writeln!(f, "  {EMPTY_TICKETS}");
    }
    for (i, ticket) in state.tickets.iter().enumerate() {
        write_ticket(f, i + 1, ticket)?;
    }
    Ok(())
}

fn write_ticket(f: &mut fmt::Formatter<'_>, position: usize, ticket: &Ticket) -> fmt::Result {
    write!(
        f,
        "  {position}. {} | {} -> {} | ₹{}",
        ticket.train_name,
        ticket.source,
        ticket.destination,
        format_price(ticket.price)
    )?;
    if let Some(seat) = &ticket.seat {
        write!(f, " | Seat {seat}")?;
    }
    if let Some(booked_at) = ticket.booked_at {
        write!(f, " | Booked {}", booked_at.format("%Y-%m-%d"))?;
    }
    writeln!(f)
}
