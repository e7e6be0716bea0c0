//! Static train and station reference data.
//!
//! The catalog is read-only. A train's price here is authoritative: the
//! client mirrors it into the draft when a train is selected, and the save
//! workflow always sends the catalog price, never a user-supplied one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service class of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainCategory {
    /// Premium long-distance services
    Premium,
    /// Express services
    Express,
    /// Budget services
    Economy,
    /// Regular intercity services
    Regular,
    /// Local passenger services
    Local,
}

impl fmt::Display for TrainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Premium => "Premium",
            Self::Express => "Express",
            Self::Economy => "Economy",
            Self::Regular => "Regular",
            Self::Local => "Local",
        };
        f.write_str(label)
    }
}

/// One train the user can book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainCatalogEntry {
    /// Display name, also the value sent to the API as `trainName`
    pub name: &'static str,
    /// Fare in rupees
    pub price: f64,
    /// Service class
    pub category: TrainCategory,
}

impl TrainCatalogEntry {
    /// Option label as shown in train pickers: `Name (Category) - ₹price`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({}) - ₹{}", self.name, self.category, format_price(self.price))
    }
}

const TRAINS: [TrainCatalogEntry; 8] = [
    TrainCatalogEntry { name: "Vande Bharat Express", price: 2500.0, category: TrainCategory::Premium },
    TrainCatalogEntry { name: "Shatabdi Express", price: 1800.0, category: TrainCategory::Express },
    TrainCatalogEntry { name: "Rajdhani Express", price: 2200.0, category: TrainCategory::Premium },
    TrainCatalogEntry { name: "Duronto Express", price: 1500.0, category: TrainCategory::Express },
    TrainCatalogEntry { name: "Garib Rath Express", price: 800.0, category: TrainCategory::Economy },
    TrainCatalogEntry { name: "Jan Shatabdi Express", price: 600.0, category: TrainCategory::Economy },
    TrainCatalogEntry { name: "Intercity Express", price: 400.0, category: TrainCategory::Regular },
    TrainCatalogEntry { name: "Local Passenger", price: 150.0, category: TrainCategory::Local },
];

const STATIONS: [&str; 12] = [
    "New Delhi",
    "Mumbai Central",
    "Chennai Central",
    "Kolkata",
    "Bangalore City",
    "Hyderabad",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
    "Kanpur",
    "Nagpur",
];

/// All trains, in display order.
#[must_use]
pub const fn trains() -> &'static [TrainCatalogEntry] {
    &TRAINS
}

/// All stations, in display order.
#[must_use]
pub const fn stations() -> &'static [&'static str] {
    &STATIONS
}

/// Looks a train up by its exact name.
#[must_use]
pub fn find_train(name: &str) -> Option<&'static TrainCatalogEntry> {
    TRAINS.iter().find(|train| train.name == name)
}

/// Catalog fare for `name`, if it is a known train.
#[must_use]
pub fn price_of(name: &str) -> Option<f64> {
    find_train(name).map(|train| train.price)
}

/// Returns true if `name` is a known station.
#[must_use]
pub fn is_station(name: &str) -> bool {
    STATIONS.contains(&name)
}

/// Case-insensitive lookup used by the terminal, returning the canonical name.
#[must_use]
pub fn resolve_train(input: &str) -> Option<&'static str> {
    let input = input.trim();
    TRAINS
        .iter()
        .find(|train| train.name.eq_ignore_ascii_case(input))
        .map(|train| train.name)
}

/// Case-insensitive station lookup, returning the canonical name.
#[must_use]
pub fn resolve_station(input: &str) -> Option<&'static str> {
    let input = input.trim();
    STATIONS
        .iter()
        .copied()
        .find(|station| station.eq_ignore_ascii_case(input))
}

/// Formats a fare without a trailing `.0` for whole rupees.
#[must_use]
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}
