/// Venue data provider abstraction
///
/// Selection needs two kinds of data that no single provider serves well:
/// listings (distance, rating, review volume) come from a primary search
/// provider, and weekly opening hours come from a secondary provider matched
/// by name and coordinates. Both are traits so the selector can be driven by
/// fakes in tests and by Yelp/Foursquare in production.
use std::sync::Arc;

use serde::Serialize;

use crate::{
    config::Config,
    error::{AppResult, ProviderUnavailable},
    models::{Candidate, DisplayHours, HoursSchedule, VenueDetail},
};

pub mod foursquare;
pub mod yelp;

/// Ordering requested from the primary provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    BestMatch,
    Distance,
    Rating,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::BestMatch => "best_match",
            SortMode::Distance => "distance",
            SortMode::Rating => "rating",
        }
    }
}

/// Parameters for one category search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    /// Metres
    pub radius: u32,
    pub sort: SortMode,
    pub limit: u32,
}

/// Listings provider: candidates per category and full venue detail
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PrimarySearchClient: Send + Sync {
    /// Candidates near a point for one category, in provider order
    async fn search_by_category(&self, params: &SearchParams) -> AppResult<Vec<Candidate>>;

    /// Full record for a venue id returned by `search_by_category`
    async fn get_detail(&self, id: &str) -> AppResult<VenueDetail>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Hours provider: locates a venue by name near a point and reports its hours
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SecondaryHoursClient: Send + Sync {
    /// Most relevant venue id matching `name` within `radius` metres, if any
    async fn search_venue(
        &self,
        latitude: f64,
        longitude: f64,
        name: &str,
        radius: u32,
    ) -> AppResult<Option<String>>;

    /// Weekly hours; `None` when the provider has no hours for the venue
    async fn get_hours(&self, venue_id: &str) -> AppResult<Option<HoursSchedule>>;

    /// Hours as rendered for people, with the current open/closed status
    async fn get_display_hours(&self, venue_id: &str) -> AppResult<Option<DisplayHours>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// The pair of clients a selection run needs
#[derive(Clone)]
pub struct Providers {
    pub primary: Arc<dyn PrimarySearchClient>,
    pub secondary: Arc<dyn SecondaryHoursClient>,
}

impl Providers {
    pub fn new(
        primary: Arc<dyn PrimarySearchClient>,
        secondary: Arc<dyn SecondaryHoursClient>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Builds the Yelp + Foursquare pair from configuration.
    ///
    /// Missing credentials or a client that cannot be built yield
    /// `ProviderUnavailable` rather than aborting start-up.
    pub fn from_config(config: &Config) -> Result<Self, ProviderUnavailable> {
        let primary = yelp::YelpProvider::from_config(config)?;
        let secondary = foursquare::FoursquareProvider::from_config(config)?;

        tracing::info!(
            primary = primary.name(),
            secondary = secondary.name(),
            "Venue providers configured"
        );

        Ok(Self::new(Arc::new(primary), Arc::new(secondary)))
    }
}

/// Reads a required credential, treating blank values as missing
pub(crate) fn required_credential(
    provider: &'static str,
    field: &str,
    value: Option<&String>,
) -> Result<String, ProviderUnavailable> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProviderUnavailable::new(provider, format!("missing {}", field)))
}
