/// Foursquare API provider
///
/// Only used for opening hours. Venues are matched by name near the
/// coordinates reported by the primary provider, so the ids of the two
/// providers never need to agree.
///
/// API Flow:
/// 1. Venue search: /v2/venues/search?ll=..&query=..&radius=.. → venue id
/// 2. Hours: /v2/venues/{id}/hours → machine-readable weekly timeframes
/// 3. Venue: /v2/venues/{id} → rendered hours and current status
use std::{collections::BTreeSet, time::Duration};

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult, ProviderUnavailable},
    models::{
        ClockTime, DisplayHours, FoursquareDisplayHours, FoursquareEnvelope,
        FoursquareHoursResponse, FoursquareSearchResponse, FoursquareTimeframe,
        FoursquareVenueResponse, HoursEntry, HoursSchedule,
    },
    services::providers::{required_credential, SecondaryHoursClient},
};

const PROVIDER_NAME: &str = "foursquare";

#[derive(Clone)]
pub struct FoursquareProvider {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    api_version: String,
    api_url: String,
}

impl FoursquareProvider {
    pub fn new(
        client_id: String,
        client_secret: String,
        api_version: String,
        api_url: String,
        timeout_secs: u64,
    ) -> Result<Self, ProviderUnavailable> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            api_version,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderUnavailable> {
        let client_id = required_credential(
            PROVIDER_NAME,
            "FOURSQUARE_CLIENT_ID",
            config.foursquare_client_id.as_ref(),
        )?;
        let client_secret = required_credential(
            PROVIDER_NAME,
            "FOURSQUARE_CLIENT_SECRET",
            config.foursquare_client_secret.as_ref(),
        )?;

        Self::new(
            client_id,
            client_secret,
            config.foursquare_api_version.clone(),
            config.foursquare_api_url.clone(),
            config.request_timeout_secs,
        )
    }

    /// Flatten Foursquare timeframes into one entry per open range.
    ///
    /// Ranges with unparseable times are skipped rather than failing the
    /// whole schedule.
    fn convert_timeframes(&self, timeframes: Vec<FoursquareTimeframe>) -> HoursSchedule {
        let mut entries = Vec::new();

        for timeframe in timeframes {
            let days: BTreeSet<u32> = timeframe
                .days
                .iter()
                .copied()
                .filter(|d| (1..=7).contains(d))
                .collect();
            if days.is_empty() {
                continue;
            }

            for range in timeframe.open {
                match (range.start.parse::<ClockTime>(), range.end.parse::<ClockTime>()) {
                    (Ok(open), Ok(close)) => entries.push(HoursEntry {
                        days: days.clone(),
                        open,
                        close,
                    }),
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::debug!(error = %e, "Skipping Foursquare open range");
                    }
                }
            }
        }

        HoursSchedule::new(entries)
    }

    /// Convert rendered venue hours into display lines
    fn convert_display_hours(&self, hours: FoursquareDisplayHours) -> DisplayHours {
        let lines = hours
            .timeframes
            .into_iter()
            .map(|t| {
                let times: Vec<String> = t.open.into_iter().map(|o| o.rendered_time).collect();
                format!("{} : {}", t.days, times.join(", "))
            })
            .collect();

        DisplayHours {
            status: hours.status,
            lines,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("v", self.api_version.as_str()),
            ])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Foursquare API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Foursquare API response");

        let parse_error = |e: serde_json::Error| {
            tracing::error!(error = %e, "Failed to deserialize Foursquare response");
            AppError::ExternalApi(format!("Failed to parse Foursquare response: {}", e))
        };

        // Error payloads carry an empty `response`, so check `meta` first
        let envelope: FoursquareEnvelope<serde_json::Value> =
            serde_json::from_str(&response_text).map_err(parse_error)?;

        if envelope.meta.code != 200 {
            return Err(AppError::ExternalApi(format!(
                "Foursquare API error {}: {}",
                envelope.meta.code,
                envelope.meta.error_detail.unwrap_or_default()
            )));
        }

        serde_json::from_value(envelope.response).map_err(parse_error)
    }
}

#[async_trait::async_trait]
impl SecondaryHoursClient for FoursquareProvider {
    async fn search_venue(
        &self,
        latitude: f64,
        longitude: f64,
        name: &str,
        radius: u32,
    ) -> AppResult<Option<String>> {
        let url = format!("{}/v2/venues/search", self.api_url);
        let query = [
            ("ll", format!("{},{}", latitude, longitude)),
            ("radius", radius.to_string()),
            ("query", name.to_string()),
        ];

        let results: FoursquareSearchResponse = self.get_json(&url, &query).await?;
        let venue_id = results.venues.into_iter().next().map(|v| v.id);

        tracing::info!(
            query = %name,
            radius = radius,
            matched = venue_id.is_some(),
            provider = PROVIDER_NAME,
            "Venue search completed"
        );

        Ok(venue_id)
    }

    async fn get_hours(&self, venue_id: &str) -> AppResult<Option<HoursSchedule>> {
        let url = format!("{}/v2/venues/{}/hours", self.api_url, venue_id);
        let results: FoursquareHoursResponse = self.get_json(&url, &[]).await?;

        let schedule = results
            .hours
            .and_then(|h| h.timeframes)
            .map(|t| self.convert_timeframes(t));

        tracing::info!(
            venue_id = %venue_id,
            entries = schedule.as_ref().map(|s| s.entries.len()),
            provider = PROVIDER_NAME,
            "Venue hours fetched"
        );

        Ok(schedule)
    }

    async fn get_display_hours(&self, venue_id: &str) -> AppResult<Option<DisplayHours>> {
        let url = format!("{}/v2/venues/{}", self.api_url, venue_id);
        let results: FoursquareVenueResponse = self.get_json(&url, &[]).await?;

        Ok(results
            .venue
            .hours
            .map(|h| self.convert_display_hours(h)))
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
