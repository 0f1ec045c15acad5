#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset};
use venue_picker::{
    error::{AppError, AppResult},
    models::{
        Candidate, ClockTime, DisplayHours, HoursEntry, HoursSchedule, SelectionRequest,
        VenueDetail,
    },
    services::{
        providers::SearchParams, PrimarySearchClient, Providers, SecondaryHoursClient,
        SelectionSettings, VenueSelector,
    },
};

/// Friday evening in Vancouver
pub fn event_date() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-10-23T19:00:00-07:00").unwrap()
}

pub fn request(categories: &[&str]) -> SelectionRequest {
    SelectionRequest {
        latitude: 49.283552,
        longitude: -123.119506,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        event_date: event_date(),
    }
}

pub fn candidate(id: &str, distance: f64, rating: f64, review_count: u32) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Venue {}", id),
        distance,
        rating,
        review_count,
        is_closed: false,
    }
}

pub fn closed(mut candidate: Candidate) -> Candidate {
    candidate.is_closed = true;
    candidate
}

/// Open every day from 17:00 to 23:00
pub fn evening_hours() -> HoursSchedule {
    HoursSchedule::new(vec![HoursEntry {
        days: (1..=7).collect(),
        open: ClockTime::new(17, 0),
        close: ClockTime::new(23, 0),
    }])
}

/// Open every day from 08:00 to 15:00
pub fn daytime_hours() -> HoursSchedule {
    HoursSchedule::new(vec![HoursEntry {
        days: (1..=7).collect(),
        open: ClockTime::new(8, 0),
        close: ClockTime::new(15, 0),
    }])
}

/// Listings keyed by category; every probe is recorded in order
#[derive(Default)]
pub struct FakePrimary {
    pub listings: HashMap<String, Vec<Candidate>>,
    pub searches: Mutex<Vec<String>>,
    pub probes: Mutex<Vec<String>>,
}

impl FakePrimary {
    pub fn with_category(mut self, category: &str, candidates: Vec<Candidate>) -> Self {
        self.listings.insert(category.to_string(), candidates);
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PrimarySearchClient for FakePrimary {
    async fn search_by_category(&self, params: &SearchParams) -> AppResult<Vec<Candidate>> {
        self.searches.lock().unwrap().push(params.category.clone());
        Ok(self.listings.get(&params.category).cloned().unwrap_or_default())
    }

    async fn get_detail(&self, id: &str) -> AppResult<VenueDetail> {
        self.probes.lock().unwrap().push(id.to_string());

        let candidate = self
            .listings
            .values()
            .flatten()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        Ok(VenueDetail {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            image_url: None,
            distance: Some(candidate.distance),
            latitude: 49.28,
            longitude: -123.12,
            address: Some("Vancouver, BC".to_string()),
            categories: vec!["Test".to_string()],
            rating: Some(candidate.rating),
            review_count: Some(candidate.review_count),
            phone_number: None,
            url: None,
        })
    }

    fn name(&self) -> &'static str {
        "fake-primary"
    }
}

/// Hours keyed by venue name; names without an entry are not found
#[derive(Default)]
pub struct FakeSecondary {
    pub hours: HashMap<String, HoursSchedule>,
}

impl FakeSecondary {
    pub fn with_hours(mut self, name: &str, schedule: HoursSchedule) -> Self {
        self.hours.insert(name.to_string(), schedule);
        self
    }
}

#[async_trait::async_trait]
impl SecondaryHoursClient for FakeSecondary {
    async fn search_venue(
        &self,
        _latitude: f64,
        _longitude: f64,
        name: &str,
        _radius: u32,
    ) -> AppResult<Option<String>> {
        Ok(self.hours.contains_key(name).then(|| name.to_string()))
    }

    async fn get_hours(&self, venue_id: &str) -> AppResult<Option<HoursSchedule>> {
        Ok(self.hours.get(venue_id).cloned())
    }

    async fn get_display_hours(&self, _venue_id: &str) -> AppResult<Option<DisplayHours>> {
        Ok(Some(DisplayHours {
            status: Some("Closed".to_string()),
            lines: vec!["Mon–Sun : 5:00 PM–2:00 AM".to_string()],
        }))
    }

    fn name(&self) -> &'static str {
        "fake-secondary"
    }
}

pub fn selector(primary: Arc<FakePrimary>, secondary: FakeSecondary) -> VenueSelector {
    selector_with_budget(primary, secondary, 3)
}

pub fn selector_with_budget(
    primary: Arc<FakePrimary>,
    secondary: FakeSecondary,
    attempt_budget: u32,
) -> VenueSelector {
    let settings = SelectionSettings {
        attempt_budget,
        ..SelectionSettings::default()
    };
    VenueSelector::new(Ok(Providers::new(primary, Arc::new(secondary))), settings)
}
