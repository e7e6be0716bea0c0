//! Tickets, drafts and the request bodies sent to the reservation API.
//!
//! Wire field names follow the remote API (`trainName`, `bookedAt`).

use crate::catalog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned ticket identifier.
///
/// The client never generates one; it only echoes ids it received.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wraps an id received from the server
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted reservation, owned by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Server-assigned identifier
    pub id: TicketId,
    /// Owner of the reservation
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    /// Catalog train name (empty when the server stored none)
    #[serde(default, deserialize_with = "null_as_default")]
    pub train_name: String,
    /// Departure station
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Arrival station
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination: String,
    /// Fare at booking time
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Seat, when the server assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
    /// Booking time, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<DateTime<Utc>>,
}

/// Reads an explicit `null` as the field's default.
///
/// The server keeps tickets booked without a route, and those come back
/// with `null` names; one of them must not fail the whole list.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// In-progress reservation form data.
///
/// `id` is absent for a new reservation and present while an existing
/// ticket is being edited; it decides between create and update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TicketDraft {
    /// Ticket being edited, if any
    pub id: Option<TicketId>,
    /// Selected train (empty when none is selected)
    pub train_name: String,
    /// Selected departure station
    pub source: String,
    /// Selected arrival station
    pub destination: String,
    /// Fare mirrored from the catalog; `None` while no train is selected
    pub price: Option<f64>,
}

impl TicketDraft {
    /// Loads an existing ticket into the form for editing.
    ///
    /// The price is re-derived from the catalog when the train is still
    /// known, otherwise the ticket's recorded fare is kept for display.
    #[must_use]
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            id: Some(ticket.id.clone()),
            train_name: ticket.train_name.clone(),
            source: ticket.source.clone(),
            destination: ticket.destination.clone(),
            price: catalog::price_of(&ticket.train_name).or(Some(ticket.price)),
        }
    }

    /// Selects a train and mirrors its catalog fare into `price`.
    ///
    /// Selecting nothing, or a name missing from the catalog, clears the price.
    pub fn select_train(&mut self, train: Option<&str>) {
        match train.and_then(catalog::find_train) {
            Some(entry) => {
                self.train_name = entry.name.to_string();
                self.price = Some(entry.price);
            },
            None => {
                self.train_name = train.unwrap_or_default().to_string();
                self.price = None;
            },
        }
    }

    /// True when an existing ticket is being edited
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// Builds the request body for `username`.
    ///
    /// The fare always comes from the catalog; the draft's mirrored price is
    /// only used when the train is unknown (validation rejects that case first).
    #[must_use]
    pub fn to_payload(&self, username: &str) -> TicketPayload {
        TicketPayload {
            username: username.to_string(),
            train_name: self.train_name.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            price: catalog::price_of(&self.train_name)
                .or(self.price)
                .unwrap_or_default(),
        }
    }
}

/// Body of `POST /tickets` and `PUT /tickets/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPayload {
    /// Owner of the reservation
    pub username: String,
    /// Catalog train name
    pub train_name: String,
    /// Departure station
    pub source: String,
    /// Arrival station
    pub destination: String,
    /// Catalog fare
    pub price: f64,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Desired username
    pub username: String,
    /// Optional contact email (empty when not provided)
    #[serde(default)]
    pub email: String,
    /// Password
    pub password: String,
}

impl Registration {
    /// Builds a registration, trimming username and email the way the form does
    #[must_use]
    pub fn new(username: &str, email: Option<&str>, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.unwrap_or_default().trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Builds credentials, trimming the username
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        }
    }
}

// Passwords stay out of logs and debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_ticket() -> Ticket {
        Ticket {
            id: TicketId::new("t-1"),
            username: "asha".to_string(),
            train_name: "Duronto Express".to_string(),
            source: "Pune".to_string(),
            destination: "Nagpur".to_string(),
            price: 1500.0,
            seat: None,
            booked_at: None,
        }
    }

    #[test]
    fn selecting_a_train_mirrors_its_price() {
        let mut draft = TicketDraft::default();
        draft.select_train(Some("Shatabdi Express"));
        assert_eq!(draft.train_name, "Shatabdi Express");
        assert_eq!(draft.price, Some(1800.0));
    }

    #[test]
    fn selecting_no_train_clears_price() {
        let mut draft = TicketDraft::default();
        draft.select_train(Some("Shatabdi Express"));
        draft.select_train(None);
        assert!(draft.train_name.is_empty());
        assert_eq!(draft.price, None);
    }

    #[test]
    fn editing_loads_ticket_fields() {
        let draft = TicketDraft::from_ticket(&sample_ticket());
        assert_eq!(draft.id, Some(TicketId::new("t-1")));
        assert_eq!(draft.source, "Pune");
        assert_eq!(draft.price, Some(1500.0));
        assert!(draft.is_editing());
    }

    #[test]
    fn payload_uses_catalog_price() {
        let mut draft = TicketDraft::default();
        draft.select_train(Some("Local Passenger"));
        draft.price = Some(1.0);
        let payload = draft.to_payload("asha");
        assert!((payload.price - 150.0).abs() < f64::EPSILON);
        assert_eq!(payload.username, "asha");
    }

    #[test]
    fn ticket_decodes_camel_case_wire_format() {
        let json = r#"{"id":"abc","username":"asha","trainName":"Local Passenger",
            "source":"Kanpur","destination":"Lucknow","price":150.0,"seat":null}"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id.as_str(), "abc");
        assert_eq!(ticket.train_name, "Local Passenger");
        assert_eq!(ticket.booked_at, None);
    }

    #[test]
    fn null_route_fields_decode_as_empty() {
        let json = r#"[{"id":"a","username":"asha","trainName":"Local Passenger",
            "source":"Kanpur","destination":"Lucknow","price":150.0},
            {"id":"b","username":"asha","trainName":null,"source":null,
            "destination":null,"seat":"S1","price":null}]"#;
        let tickets: Vec<Ticket> = serde_json::from_str(json).unwrap();
        assert_eq!(tickets.len(), 2);
        let routeless = &tickets[1];
        assert!(routeless.train_name.is_empty());
        assert!(routeless.source.is_empty());
        assert!(routeless.destination.is_empty());
        assert!(routeless.price.abs() < f64::EPSILON);
        assert_eq!(routeless.seat.as_deref(), Some("S1"));
    }

    #[test]
    fn payload_encodes_camel_case() {
        let payload = TicketPayload {
            username: "asha".to_string(),
            train_name: "Local Passenger".to_string(),
            source: "Kanpur".to_string(),
            destination: "Lucknow".to_string(),
            price: 150.0,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["trainName"], "Local Passenger");
        assert_eq!(json["price"], 150.0);
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new(" asha ", "hunter22"));
        assert!(rendered.contains("asha"));
        assert!(!rendered.contains("hunter22"));
    }
}
