use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

use crate::{
    config::Config,
    error::ProviderUnavailable,
    models::{
        CategoryBatch, ScoredCandidate, SelectionOutcome, SelectionRequest, SelectionResult,
        VenueSummary,
    },
    services::{
        aggregator::{Aggregator, MatchRadii},
        providers::{Providers, SearchParams, SortMode},
        scoring,
    },
};

/// Tunables for a selection run
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSettings {
    /// Openness probes allowed per run
    pub attempt_budget: u32,
    /// Category search radius in metres
    pub search_radius: u32,
    pub search_limit: u32,
    pub sort: SortMode,
    pub match_radii: MatchRadii,
    /// Categories the primary provider understands
    pub known_categories: HashSet<String>,
}

impl SelectionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempt_budget: config.attempt_budget,
            search_radius: config.search_radius,
            search_limit: config.search_limit,
            sort: SortMode::Distance,
            match_radii: MatchRadii {
                tight: config.tight_search_radius,
                wide: config.search_radius,
            },
            known_categories: config.known_categories.iter().cloned().collect(),
        }
    }
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            attempt_budget: 3,
            search_radius: 2000,
            search_limit: 20,
            sort: SortMode::Distance,
            match_radii: MatchRadii::default(),
            known_categories: crate::config::default_known_categories().into_iter().collect(),
        }
    }
}

/// Picks the best venue that will be open at the event time.
///
/// Categories are tried in preference order. Within a category the highest
/// scoring remaining candidate is probed for opening hours; the first one
/// confirmed open wins. Every probe spends one unit of a budget shared across
/// categories. If nothing is confirmed open, the first probed venue is
/// returned as a best effort.
pub struct VenueSelector {
    providers: Result<Providers, ProviderUnavailable>,
    settings: SelectionSettings,
}

/// Per-run counters and fallback
struct SelectionRun {
    attempts_left: u32,
    probes: u32,
    best_effort: Option<VenueSummary>,
}

impl SelectionRun {
    fn new(budget: u32) -> Self {
        Self {
            attempts_left: budget,
            probes: 0,
            best_effort: None,
        }
    }

    fn exhausted(&self) -> bool {
        self.attempts_left == 0
    }

    fn spend_attempt(&mut self) {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        self.probes += 1;
    }

    /// Set once: later probes never replace the first summary
    fn remember(&mut self, summary: &VenueSummary) {
        if self.best_effort.is_none() {
            self.best_effort = Some(summary.clone());
        }
    }

    fn finish(self) -> SelectionResult {
        match self.best_effort {
            Some(venue) => SelectionResult {
                venue: Some(venue),
                outcome: SelectionOutcome::BestEffort,
                probes: self.probes,
            },
            None => SelectionResult::none(self.probes),
        }
    }
}

impl VenueSelector {
    pub fn new(
        providers: Result<Providers, ProviderUnavailable>,
        settings: SelectionSettings,
    ) -> Self {
        if let Err(e) = &providers {
            tracing::warn!(error = %e, "Venue selection running without providers");
        }
        Self {
            providers,
            settings,
        }
    }

    pub fn settings(&self) -> &SelectionSettings {
        &self.settings
    }

    /// Best venue across all of the request's preferred categories
    pub async fn select_best(&self, request: &SelectionRequest) -> SelectionResult {
        self.run(request, &request.categories).await
    }

    /// Like `select_best`, restricted to `categories`.
    ///
    /// Each listed category must also appear in the request's preferences;
    /// others are skipped.
    pub async fn select_best_within(
        &self,
        request: &SelectionRequest,
        categories: &[String],
    ) -> SelectionResult {
        self.run(request, categories).await
    }

    async fn run(&self, request: &SelectionRequest, categories: &[String]) -> SelectionResult {
        let providers = match &self.providers {
            Ok(providers) => providers,
            Err(e) => {
                tracing::warn!(error = %e, "Providers unavailable, no candidates");
                return SelectionResult::none(0);
            }
        };

        let aggregator = Aggregator::new(
            providers.primary.clone(),
            providers.secondary.clone(),
            self.settings.match_radii,
        );
        let mut run = SelectionRun::new(self.settings.attempt_budget);
        let mut tried: HashSet<&str> = HashSet::new();

        for category in categories {
            if run.exhausted() {
                tracing::info!(probes = run.probes, "Attempt budget exhausted");
                break;
            }
            if !self.is_eligible(category, request) {
                tracing::debug!(category = %category, "Skipping ineligible category");
                continue;
            }
            if !tried.insert(category.as_str()) {
                tracing::debug!(category = %category, "Skipping repeated category");
                continue;
            }

            let mut remaining = self.fetch_scored(providers, request, category).await;
            if remaining.is_empty() {
                tracing::info!(category = %category, "No candidates in category");
                continue;
            }

            while !run.exhausted() {
                let Some(index) = scoring::best_index(&remaining) else {
                    break;
                };
                let scored = remaining.remove(index);

                let probe = aggregator
                    .resolve(
                        &scored.candidate.id,
                        &scored.candidate.name,
                        request.event_date,
                    )
                    .await;
                run.spend_attempt();

                match probe {
                    Ok(summary) if summary.will_be_open == Some(true) => {
                        tracing::info!(
                            category = %category,
                            venue = %summary.name,
                            probes = run.probes,
                            "Venue confirmed open"
                        );
                        return SelectionResult {
                            venue: Some(summary),
                            outcome: SelectionOutcome::ConfirmedOpen,
                            probes: run.probes,
                        };
                    }
                    Ok(summary) => {
                        tracing::debug!(
                            venue = %summary.name,
                            will_be_open = ?summary.will_be_open,
                            attempts_left = run.attempts_left,
                            "Venue not confirmed open"
                        );
                        run.remember(&summary);
                    }
                    Err(e) => {
                        tracing::warn!(
                            candidate_id = %scored.candidate.id,
                            error = %e,
                            attempts_left = run.attempts_left,
                            "Candidate could not be resolved"
                        );
                    }
                }
            }
        }

        let result = run.finish();
        tracing::info!(
            outcome = ?result.outcome,
            probes = result.probes,
            "Venue selection finished"
        );
        result
    }

    fn is_eligible(&self, category: &str, request: &SelectionRequest) -> bool {
        self.settings.known_categories.contains(category)
            && request.categories.iter().any(|c| c == category)
    }

    /// Search failures degrade to an empty category
    async fn fetch_scored(
        &self,
        providers: &Providers,
        request: &SelectionRequest,
        category: &str,
    ) -> Vec<ScoredCandidate> {
        let params = SearchParams {
            latitude: request.latitude,
            longitude: request.longitude,
            category: category.to_string(),
            radius: self.settings.search_radius,
            sort: self.settings.sort,
            limit: self.settings.search_limit,
        };

        match providers.primary.search_by_category(&params).await {
            Ok(candidates) => scoring::score(&CategoryBatch::new(category, candidates)),
            Err(e) => {
                tracing::warn!(
                    category = %category,
                    provider = providers.primary.name(),
                    error = %e,
                    "Category search failed"
                );
                Vec::new()
            }
        }
    }
}

/// Convenience wrapper for callers holding plain coordinates
pub async fn select_best(
    selector: &VenueSelector,
    latitude: f64,
    longitude: f64,
    categories: Vec<String>,
    event_date: DateTime<FixedOffset>,
) -> Option<VenueSummary> {
    let request = SelectionRequest {
        latitude,
        longitude,
        categories,
        event_date,
    };
    selector.select_best(&request).await.venue
}
