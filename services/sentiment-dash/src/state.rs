// services/sentiment-dash/src/state.rs
//
// Dashboard state management

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use svckit::types::{DashboardSummary, FeedbackRecord, FilterCriteria, Insight, NewFeedbackDraft};

/// Activity log capacity.
pub const LOG_CAPACITY: usize = 100;

/// How long a submission notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Independently refreshed data sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCategory {
    Summary,
    Insights,
    Records,
}

impl DataCategory {
    pub const ALL: [DataCategory; 3] =
        [DataCategory::Summary, DataCategory::Insights, DataCategory::Records];
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataCategory::Summary => "summary",
            DataCategory::Insights => "insights",
            DataCategory::Records => "records",
        })
    }
}

/// Per-category lifecycle. There is no way back to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Loaded,
    ErrorStale,
}

/// Issue-order sequence number for a request within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// What happened to a response handed to [`Slot::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Failed,
    /// A newer request was issued after this one; the response is ignored.
    Discarded,
}

/// One data set plus its request bookkeeping.
///
/// Only the latest issued request may write the slot, and a failure never
/// clears a value that was loaded earlier.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    value: Option<T>,
    phase: Phase,
    latest: u64,
    last_error: Option<String>,
    updated_at: Option<DateTime<Local>>,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            phase: Phase::Uninitialized,
            latest: 0,
            last_error: None,
            updated_at: None,
        }
    }

    /// Mark a new request as issued and hand out its token.
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.phase = Phase::Loading;
        RequestToken(self.latest)
    }

    pub fn resolve<E: fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<T, E>,
    ) -> Resolution {
        if token.0 != self.latest {
            return Resolution::Discarded;
        }

        match result {
            Ok(value) => {
                self.value = Some(value);
                self.phase = Phase::Loaded;
                self.last_error = None;
                self.updated_at = Some(Local::now());
                Resolution::Applied
            }
            Err(err) => {
                self.phase = Phase::ErrorStale;
                self.last_error = Some(err.to_string());
                Resolution::Failed
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// When the current value was loaded. Failed refreshes leave it alone.
    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    #[default]
    Overview,
    Detailed,
    Insights,
    Submit,
}

impl ActiveView {
    pub const ALL: [ActiveView; 4] = [
        ActiveView::Overview,
        ActiveView::Detailed,
        ActiveView::Insights,
        ActiveView::Submit,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ActiveView::Overview => "Overview",
            ActiveView::Detailed => "Detailed Analysis",
            ActiveView::Insights => "Actionable Insights",
            ActiveView::Submit => "Submit Feedback",
        }
    }

    pub fn index(&self) -> usize {
        ActiveView::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> ActiveView {
        ActiveView::ALL[(self.index() + 1) % ActiveView::ALL.len()]
    }

    pub fn prev(&self) -> ActiveView {
        let len = ActiveView::ALL.len();
        ActiveView::ALL[(self.index() + len - 1) % len]
    }
}

/// Focused field of the submission form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    EmployeeId,
    Department,
    #[default]
    FeedbackText,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::EmployeeId => FormField::Department,
            FormField::Department => FormField::FeedbackText,
            FormField::FeedbackText => FormField::EmployeeId,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::EmployeeId => FormField::FeedbackText,
            FormField::Department => FormField::EmployeeId,
            FormField::FeedbackText => FormField::Department,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
    Invalid,
}

/// Transient acknowledgment shown after a submission attempt.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= NOTICE_TTL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

/// Backend reachability as seen by the startup probe and later requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connection {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    // Remote data
    pub summary: Slot<DashboardSummary>,
    pub insights: Slot<Vec<Insight>>,
    pub records: Slot<Vec<FeedbackRecord>>,
    /// Criteria the loaded records page was fetched with.
    pub records_filters: FilterCriteria,

    // Operator input
    pub filters: FilterCriteria,
    pub draft: NewFeedbackDraft,
    pub form_focus: FormField,
    pub submitting: bool,

    // UI state
    pub view: ActiveView,
    pub notice: Option<Notice>,
    pub connection: Connection,
    pub backend_label: String,

    // Activity log
    pub activity_log: VecDeque<LogEntry>,
}

impl DashboardState {
    pub fn new(backend_label: &str) -> Self {
        Self {
            backend_label: backend_label.to_string(),
            ..Self::default()
        }
    }

    pub fn add_log(&mut self, level: LogLevel, message: &str) {
        self.activity_log.push_back(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.to_string(),
        });

        while self.activity_log.len() > LOG_CAPACITY {
            self.activity_log.pop_front();
        }
    }

    pub fn raise_notice(&mut self, level: NoticeLevel, message: &str) {
        self.notice = Some(Notice {
            level,
            message: message.to_string(),
            raised_at: Instant::now(),
        });
    }

    /// Drop the notice once its time is up.
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    /// True while the latest records request is outstanding.
    pub fn records_loading(&self) -> bool {
        self.records.is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lifecycle() {
        let mut slot: Slot<u32> = Slot::new();
        assert_eq!(slot.phase(), Phase::Uninitialized);

        let token = slot.begin();
        assert!(slot.is_loading());
        assert_eq!(slot.resolve::<String>(token, Ok(7)), Resolution::Applied);
        assert_eq!(slot.phase(), Phase::Loaded);
        assert_eq!(slot.value(), Some(&7));
        assert!(slot.updated_at().is_some());
    }

    #[test]
    fn test_slot_failure_keeps_previous_value() {
        let mut slot: Slot<u32> = Slot::new();
        let token = slot.begin();
        slot.resolve::<String>(token, Ok(7));
        let loaded_at = slot.updated_at();

        let token = slot.begin();
        assert_eq!(slot.value(), Some(&7));
        assert_eq!(slot.resolve(token, Err("HTTP 500")), Resolution::Failed);
        assert_eq!(slot.phase(), Phase::ErrorStale);
        assert_eq!(slot.value(), Some(&7));
        assert_eq!(slot.updated_at(), loaded_at);
        assert_eq!(slot.last_error(), Some("HTTP 500"));

        // Recovery clears the error.
        let token = slot.begin();
        slot.resolve::<String>(token, Ok(9));
        assert_eq!(slot.last_error(), None);
        assert_eq!(slot.value(), Some(&9));
    }

    #[test]
    fn test_slot_failure_before_first_load() {
        let mut slot: Slot<u32> = Slot::new();
        let token = slot.begin();
        slot.resolve(token, Err("connection refused"));
        assert_eq!(slot.phase(), Phase::ErrorStale);
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn test_slot_discards_out_of_order_responses() {
        let mut slot: Slot<&str> = Slot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(first < second);

        assert_eq!(slot.resolve::<String>(second, Ok("newer")), Resolution::Applied);
        assert_eq!(slot.resolve::<String>(first, Ok("older")), Resolution::Discarded);
        assert_eq!(slot.value(), Some(&"newer"));
        assert_eq!(slot.phase(), Phase::Loaded);
    }

    #[test]
    fn test_stale_failure_does_not_release_newer_request() {
        let mut slot: Slot<u32> = Slot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert_eq!(slot.resolve(first, Err("timeout")), Resolution::Discarded);
        assert!(slot.is_loading());
        assert_eq!(slot.last_error(), None);
    }

    #[test]
    fn test_activity_log_is_capped() {
        let mut state = DashboardState::new("test");
        for i in 0..(LOG_CAPACITY + 20) {
            state.add_log(LogLevel::Info, &format!("entry {}", i));
        }
        assert_eq!(state.activity_log.len(), LOG_CAPACITY);
        assert_eq!(state.activity_log.front().unwrap().message, "entry 20");
    }

    #[test]
    fn test_notice_expires() {
        let mut state = DashboardState::new("test");
        state.raise_notice(NoticeLevel::Success, "Feedback submitted successfully!");
        let raised = state.notice.as_ref().unwrap().raised_at;

        state.expire_notice(raised + Duration::from_secs(1));
        assert!(state.notice.is_some());

        state.expire_notice(raised + NOTICE_TTL);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(ActiveView::Submit.next(), ActiveView::Overview);
        assert_eq!(ActiveView::Overview.prev(), ActiveView::Submit);
        assert_eq!(FormField::FeedbackText.next(), FormField::EmployeeId);
    }
}
