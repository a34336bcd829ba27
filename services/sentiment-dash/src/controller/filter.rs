// services/sentiment-dash/src/controller/filter.rs
//
// Filter state: edit freely, then commit with `apply_filters`.
// Editing never touches the network.

use tracing::{debug, info};

use svckit::types::{Department, FilterCriteria, FilterPatch, Sentiment};

use super::DashboardController;

/// Step through `None -> all[0] -> ... -> all[n-1] -> None`.
pub fn next_in_cycle<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => all
            .iter()
            .position(|candidate| *candidate == value)
            .and_then(|i| all.get(i + 1))
            .copied(),
    }
}

impl DashboardController {
    pub fn filters(&self) -> &FilterCriteria {
        &self.state.filters
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.state.filters.merge(patch);
        debug!("Filters edited: {:?}", self.state.filters);
    }

    /// Reset every criterion. Like any edit, takes effect on the next apply.
    pub fn clear_filters(&mut self) {
        self.state.filters = FilterCriteria::default();
        debug!("Filters cleared");
    }

    pub fn cycle_department_filter(&mut self) {
        let next = next_in_cycle(self.state.filters.department, &Department::ALL);
        self.set_filter(FilterPatch::default().department(next));
    }

    pub fn cycle_sentiment_filter(&mut self) {
        let next = next_in_cycle(self.state.filters.sentiment, &Sentiment::ALL);
        self.set_filter(FilterPatch::default().sentiment(next));
    }

    /// Commit: reload records with a snapshot of the current criteria.
    pub fn apply_filters(&mut self) {
        let snapshot = self.state.filters.clone();
        info!("Applying filters: {:?}", snapshot);
        self.load_feedback(snapshot);
    }
}
