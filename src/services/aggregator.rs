use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::{
    error::{AppError, AppResult},
    models::{DisplayHours, HoursSchedule, Location, Rating, VenueDetail, VenueSummary},
    services::providers::{PrimarySearchClient, SecondaryHoursClient},
};

/// Hours-lookup radii, tried in order until the hours provider finds a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRadii {
    pub tight: u32,
    pub wide: u32,
}

impl Default for MatchRadii {
    fn default() -> Self {
        Self {
            tight: 100,
            wide: 2000,
        }
    }
}

/// What the hours provider knows about a venue
#[derive(Debug, Clone, Default, PartialEq)]
struct HoursLookup {
    schedule: Option<HoursSchedule>,
    display: Option<DisplayHours>,
}

/// Fuses primary detail and secondary hours into a `VenueSummary`
pub struct Aggregator {
    primary: Arc<dyn PrimarySearchClient>,
    secondary: Arc<dyn SecondaryHoursClient>,
    radii: MatchRadii,
}

impl Aggregator {
    pub fn new(
        primary: Arc<dyn PrimarySearchClient>,
        secondary: Arc<dyn SecondaryHoursClient>,
        radii: MatchRadii,
    ) -> Self {
        Self {
            primary,
            secondary,
            radii,
        }
    }

    /// Resolves one candidate into a summary for `event_date`.
    ///
    /// Fails with `UnresolvableCandidate` when the primary provider cannot
    /// return the venue. A miss at the hours provider is not an error: the
    /// summary is still built with `will_be_open` left unknown.
    pub async fn resolve(
        &self,
        candidate_id: &str,
        candidate_name: &str,
        event_date: DateTime<FixedOffset>,
    ) -> AppResult<VenueSummary> {
        let detail = self.primary.get_detail(candidate_id).await.map_err(|e| {
            AppError::UnresolvableCandidate {
                id: candidate_id.to_string(),
                reason: e.to_string(),
            }
        })?;

        let hours = match self
            .lookup_hours(candidate_name, detail.latitude, detail.longitude)
            .await
        {
            Ok(hours) => hours,
            Err(e) => {
                tracing::warn!(
                    candidate_id = %candidate_id,
                    provider = self.secondary.name(),
                    error = %e,
                    "Hours lookup failed, openness unknown"
                );
                HoursLookup::default()
            }
        };

        let will_be_open = hours.schedule.as_ref().map(|s| is_open_at(s, &event_date));

        tracing::info!(
            candidate_id = %candidate_id,
            has_schedule = hours.schedule.is_some(),
            will_be_open = ?will_be_open,
            "Candidate resolved"
        );

        Ok(fuse(detail, hours, will_be_open, event_date))
    }

    /// Tight radius first, wide radius only when the tight one finds nothing
    async fn lookup_hours(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<HoursLookup> {
        let mut venue_id = None;
        for radius in [self.radii.tight, self.radii.wide] {
            venue_id = self
                .secondary
                .search_venue(latitude, longitude, name, radius)
                .await?;
            if venue_id.is_some() {
                break;
            }
        }

        let Some(venue_id) = venue_id else {
            tracing::debug!(name = %name, "No hours-provider match for venue");
            return Ok(HoursLookup::default());
        };

        let schedule = self.secondary.get_hours(&venue_id).await?;
        let display = match self.secondary.get_display_hours(&venue_id).await {
            Ok(display) => display,
            Err(e) => {
                tracing::debug!(venue_id = %venue_id, error = %e, "Display hours unavailable");
                None
            }
        };

        Ok(HoursLookup { schedule, display })
    }
}

/// Whether the schedule has the venue open at `event_date`'s local weekday
/// and hour. Minutes are ignored on both sides of the comparison.
pub fn is_open_at(schedule: &HoursSchedule, event_date: &DateTime<FixedOffset>) -> bool {
    let weekday = event_date.weekday().number_from_monday();
    let hour = event_date.hour() as u8;
    schedule.is_open_at(weekday, hour)
}

fn fuse(
    detail: VenueDetail,
    hours: HoursLookup,
    will_be_open: Option<bool>,
    event_date: DateTime<FixedOffset>,
) -> VenueSummary {
    let categories = Some(detail.categories.join(", ")).filter(|c| !c.is_empty());
    let (hours_status_now, opening_hours) = match hours.display {
        Some(display) => (
            display.status,
            Some(display.lines).filter(|lines| !lines.is_empty()),
        ),
        None => (None, None),
    };

    VenueSummary {
        event_date,
        name: detail.name,
        image_url: detail.image_url,
        distance: detail.distance,
        location: Location {
            lat: detail.latitude,
            long: detail.longitude,
            address: detail.address,
        },
        categories,
        rating: Rating {
            value: detail.rating,
            count: detail.review_count,
        },
        phone_number: detail.phone_number,
        external_url: detail.url,
        hours_status_now,
        will_be_open,
        opening_hours,
    }
}
