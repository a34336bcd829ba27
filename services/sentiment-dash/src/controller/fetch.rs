// services/sentiment-dash/src/controller/fetch.rs
//
// Fetch orchestration: independent loaders per data category, and the
// stale-but-present / last-request-wins rules for applying their results

use std::sync::Arc;

use tracing::{info, warn};

use svckit::config::FEEDBACK_PAGE_LIMIT;
use svckit::errors::ApiError;
use svckit::types::{DashboardSummary, FeedbackRecord, FilterCriteria, Insight};

use super::{ControllerEvent, DashboardController};
use crate::state::{DataCategory, LogLevel, RequestToken, Resolution};

impl DashboardController {
    /// Refresh the given categories. Records are reloaded with a snapshot of
    /// the filters as they are right now.
    pub fn invalidate(&mut self, categories: &[DataCategory]) {
        for category in categories {
            match category {
                DataCategory::Summary => self.load_summary(),
                DataCategory::Insights => self.load_insights(),
                DataCategory::Records => {
                    let filters = self.state.filters.clone();
                    self.load_feedback(filters);
                }
            }
        }
    }

    /// Operator-requested reload of everything.
    pub fn refresh_all(&mut self) {
        info!("Manual refresh requested");
        self.state.add_log(LogLevel::Info, "Refreshing all dashboard data");
        self.invalidate(&DataCategory::ALL);
    }

    pub fn load_summary(&mut self) {
        let token = self.state.summary.begin();
        info!("Requesting dashboard summary ({:?})", token);

        let backend = Arc::clone(&self.backend);
        self.spawn_request(
            async move { backend.fetch_summary().await },
            Box::new(move |result| ControllerEvent::Summary { token, result }),
        );
    }

    pub fn load_insights(&mut self) {
        let token = self.state.insights.begin();
        info!("Requesting insights ({:?})", token);

        let backend = Arc::clone(&self.backend);
        self.spawn_request(
            async move { backend.fetch_insights().await },
            Box::new(move |result| ControllerEvent::Insights { token, result }),
        );
    }

    /// Sets the records-loading flag until this request, or a newer one,
    /// resolves.
    pub fn load_feedback(&mut self, filters: FilterCriteria) {
        let token = self.state.records.begin();
        info!("Requesting feedback records ({:?}, filters {:?})", token, filters);

        let backend = Arc::clone(&self.backend);
        let requested = filters.clone();
        self.spawn_request(
            async move { backend.fetch_feedback(&requested, FEEDBACK_PAGE_LIMIT).await },
            Box::new(move |result| ControllerEvent::Records { token, filters, result }),
        );
    }

    pub(super) fn apply_summary(
        &mut self,
        token: RequestToken,
        result: Result<DashboardSummary, ApiError>,
    ) {
        self.note_reachability(&result);
        let total = result.as_ref().map(|s| s.total_feedback).ok();
        let resolution = self.state.summary.resolve(token, result);
        if let (Resolution::Applied, Some(total)) = (resolution, total) {
            info!("Dashboard summary refreshed: {} feedback entries", total);
        }
        self.report(DataCategory::Summary, token, resolution);
    }

    pub(super) fn apply_insights(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Insight>, ApiError>,
    ) {
        self.note_reachability(&result);
        let count = result.as_ref().map(Vec::len).ok();
        let resolution = self.state.insights.resolve(token, result);
        if let (Resolution::Applied, Some(count)) = (resolution, count) {
            info!("Insights refreshed: {} insights", count);
        }
        self.report(DataCategory::Insights, token, resolution);
    }

    pub(super) fn apply_records(
        &mut self,
        token: RequestToken,
        filters: FilterCriteria,
        result: Result<Vec<FeedbackRecord>, ApiError>,
    ) {
        self.note_reachability(&result);
        let result = result.map(|mut records| {
            records.truncate(FEEDBACK_PAGE_LIMIT);
            records
        });
        let count = result.as_ref().map(Vec::len).ok();
        let resolution = self.state.records.resolve(token, result);
        if let (Resolution::Applied, Some(count)) = (resolution, count) {
            info!("Feedback records refreshed: {} records", count);
            // Date bounds are applied when presenting, against the filters
            // this page was actually fetched with.
            self.state.records_filters = filters;
        }
        self.report(DataCategory::Records, token, resolution);
    }

    fn report(&mut self, category: DataCategory, token: RequestToken, resolution: Resolution) {
        match resolution {
            Resolution::Applied => {}
            Resolution::Failed => {
                let err = self.last_error(category).unwrap_or_default();
                warn!("Failed to refresh {}: {}", category, err);
                let message = if self.has_value(category) {
                    format!("Failed to refresh {}: {} (showing last good data)", category, err)
                } else {
                    format!("Failed to load {}: {}", category, err)
                };
                self.state.add_log(LogLevel::Warn, &message);
            }
            Resolution::Discarded => {
                warn!("Discarded out-of-order {} response ({:?})", category, token);
            }
        }
    }

    fn last_error(&self, category: DataCategory) -> Option<String> {
        let err = match category {
            DataCategory::Summary => self.state.summary.last_error(),
            DataCategory::Insights => self.state.insights.last_error(),
            DataCategory::Records => self.state.records.last_error(),
        };
        err.map(str::to_string)
    }

    fn has_value(&self, category: DataCategory) -> bool {
        match category {
            DataCategory::Summary => self.state.summary.value().is_some(),
            DataCategory::Insights => self.state.insights.value().is_some(),
            DataCategory::Records => self.state.records.value().is_some(),
        }
    }
}
