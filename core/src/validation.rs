//! Pure validation of registration, login and ticket input.
//!
//! Errors are returned as values in check order, never raised; an empty
//! list means the input is valid.

use crate::catalog;
use crate::ticket::{Credentials, Registration, TicketDraft};
use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single rule violation, rendered as the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Registration username is blank
    #[error("Username is required")]
    UsernameRequired,
    /// Email was provided without an `@`
    #[error("Valid email is required")]
    InvalidEmail,
    /// Password is blank
    #[error("Password is required")]
    PasswordRequired,
    /// Password is shorter than [`MIN_PASSWORD_LEN`]
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    /// Login attempted with a blank username or password
    #[error("Please enter both username and password")]
    CredentialsRequired,
    /// No train selected, or the train is not in the catalog
    #[error("Please select a train")]
    TrainRequired,
    /// No departure station selected
    #[error("Please select departure station")]
    SourceRequired,
    /// No arrival station selected
    #[error("Please select arrival station")]
    DestinationRequired,
    /// Departure and arrival are the same station
    #[error("Departure and arrival stations must be different")]
    SameStations,
    /// Price missing or not positive
    #[error("Invalid ticket price")]
    InvalidPrice,
    /// Price differs from the catalog fare of the selected train
    #[error("Ticket price does not match the fare for {train}")]
    PriceMismatch {
        /// Selected train
        train: String,
    },
}

/// Result of [`validate_ticket_draft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketValidation {
    /// True when `errors` is empty
    pub valid: bool,
    /// Violations in check order
    pub errors: Vec<ValidationError>,
}

impl TicketValidation {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Checks a registration form.
///
/// Username must be non-blank, an email (if given) must contain `@`, and the
/// password must be present and at least [`MIN_PASSWORD_LEN`] characters.
#[must_use]
pub fn validate_registration(input: &Registration) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.username.trim().is_empty() {
        errors.push(ValidationError::UsernameRequired);
    }
    if !input.email.is_empty() && !input.email.contains('@') {
        errors.push(ValidationError::InvalidEmail);
    }
    if input.password.trim().is_empty() {
        errors.push(ValidationError::PasswordRequired);
    }
    if !input.password.is_empty() && input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::PasswordTooShort);
    }

    errors
}

/// Early login check performed before any network call.
///
/// # Errors
///
/// Returns [`ValidationError::CredentialsRequired`] when either field is blank.
pub fn validate_credentials(input: &Credentials) -> Result<(), ValidationError> {
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(ValidationError::CredentialsRequired);
    }
    Ok(())
}

/// Checks a ticket draft before it is saved.
#[must_use]
pub fn validate_ticket_draft(input: &TicketDraft) -> TicketValidation {
    let mut errors = Vec::new();

    let train = catalog::find_train(&input.train_name);
    if train.is_none() {
        errors.push(ValidationError::TrainRequired);
    }
    if input.source.is_empty() {
        errors.push(ValidationError::SourceRequired);
    }
    if input.destination.is_empty() {
        errors.push(ValidationError::DestinationRequired);
    }
    if input.source == input.destination {
        errors.push(ValidationError::SameStations);
    }

    match input.price {
        Some(price) if price > 0.0 => {
            if let Some(entry) = train {
                if (entry.price - price).abs() > f64::EPSILON {
                    errors.push(ValidationError::PriceMismatch {
                        train: entry.name.to_string(),
                    });
                }
            }
        },
        _ => errors.push(ValidationError::InvalidPrice),
    }

    TicketValidation::from_errors(errors)
}

/// Joins errors into the single message shown to the user.
#[must_use]
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(". ")
}
