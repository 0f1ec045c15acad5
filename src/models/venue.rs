use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Full venue record from the primary provider's detail lookup
#[derive(Debug, Clone, PartialEq)]
pub struct VenueDetail {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub distance: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub categories: Vec<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub phone_number: Option<String>,
    pub url: Option<String>,
}

/// Caller-facing venue recommendation.
///
/// Unknown values are left out of the JSON rather than sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueSummary {
    pub event_date: DateTime<FixedOffset>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_status_now: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_be_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub long: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// How a selection run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// A probed venue is confirmed open at the event time
    ConfirmedOpen,
    /// Nothing was confirmed open; this is the first venue probed
    BestEffort,
    /// No candidate existed in any eligible category
    NoVenue,
}

/// Result of one `select_best` run
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub venue: Option<VenueSummary>,
    pub outcome: SelectionOutcome,
    /// Openness probes spent
    pub probes: u32,
}

impl SelectionResult {
    pub fn none(probes: u32) -> Self {
        Self {
            venue: None,
            outcome: SelectionOutcome::NoVenue,
            probes,
        }
    }
}

/// Inputs for a selection run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectionRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Category labels, most preferred first
    pub categories: Vec<String>,
    pub event_date: DateTime<FixedOffset>,
}

/// Response body for the best-venue endpoint
#[derive(Debug, Serialize)]
pub struct BestVenueResponse {
    pub venue: VenueSummary,
    pub outcome: SelectionOutcome,
    pub probes: u32,
}
