use serde::Deserialize;

use crate::error::AppError;

pub mod candidate;
pub mod hours;
pub mod venue;

pub use candidate::{Candidate, CategoryBatch, ScoredCandidate};
pub use hours::{ClockTime, DisplayHours, HoursEntry, HoursSchedule};
pub use venue::{
    BestVenueResponse, Location, Rating, SelectionOutcome, SelectionRequest, SelectionResult,
    VenueDetail, VenueSummary,
};

// ============================================================================
// Yelp Fusion API Types
// ============================================================================

/// Response from GET /v3/businesses/search
#[derive(Debug, Clone, Deserialize)]
pub struct YelpSearchResponse {
    #[serde(default)]
    pub businesses: Vec<YelpBusiness>,
}

/// A business as returned by both search and detail endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct YelpBusiness {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<YelpCategory>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<YelpCoordinates>,
    #[serde(default)]
    pub location: Option<YelpLocation>,
    #[serde(default)]
    pub display_phone: Option<String>,
    /// Only present on search results
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YelpCategory {
    pub alias: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YelpCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YelpLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

/// A listing without a distance cannot be ranked by proximity
impl TryFrom<YelpBusiness> for Candidate {
    type Error = AppError;

    fn try_from(business: YelpBusiness) -> Result<Self, Self::Error> {
        let distance = business.distance.ok_or_else(|| {
            AppError::ExternalApi(format!("Business {} has no distance", business.id))
        })?;

        Ok(Candidate {
            id: business.id,
            name: business.name,
            distance,
            rating: business.rating.unwrap_or_default(),
            review_count: business.review_count.unwrap_or_default(),
            is_closed: business.is_closed,
        })
    }
}

// ============================================================================
// Foursquare API Types
// ============================================================================

/// Every Foursquare v2 payload is wrapped in `{"meta": .., "response": ..}`
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareEnvelope<T> {
    pub meta: FoursquareMeta,
    pub response: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoursquareMeta {
    pub code: u16,
    #[serde(default)]
    pub error_detail: Option<String>,
}

/// Response from GET /v2/venues/search
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareSearchResponse {
    #[serde(default)]
    pub venues: Vec<FoursquareVenueRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareVenueRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from GET /v2/venues/{id}/hours
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareHoursResponse {
    #[serde(default)]
    pub hours: Option<FoursquareHours>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareHours {
    #[serde(default)]
    pub timeframes: Option<Vec<FoursquareTimeframe>>,
}

/// Machine-readable timeframe: ISO weekdays plus `HHMM` ranges
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareTimeframe {
    pub days: Vec<u32>,
    #[serde(default)]
    pub open: Vec<FoursquareOpenRange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareOpenRange {
    pub start: String,
    pub end: String,
}

/// Response from GET /v2/venues/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareVenueResponse {
    pub venue: FoursquareVenue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareVenue {
    pub id: String,
    #[serde(default)]
    pub hours: Option<FoursquareDisplayHours>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareDisplayHours {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timeframes: Vec<FoursquareDisplayTimeframe>,
}

/// Human-readable timeframe, e.g. `days: "Mon–Fri"`
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareDisplayTimeframe {
    pub days: String,
    #[serde(default)]
    pub open: Vec<FoursquareRenderedTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoursquareRenderedTime {
    pub rendered_time: String,
}
