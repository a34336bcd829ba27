// svckit/src/types.rs
//
// Wire and domain types for the employee-feedback dashboard.
// Client-controlled inputs (filters, drafts) use closed enums; data coming
// back from the backend keeps department labels as strings, since the
// backend stores whatever department it was given.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownSentiment(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    #[default]
    Engineering,
    Sales,
    #[serde(rename = "HR")]
    Hr,
    Marketing,
    Finance,
    Operations,
    #[serde(rename = "Customer Support")]
    CustomerSupport,
}

impl Department {
    pub const ALL: [Department; 7] = [
        Department::Engineering,
        Department::Sales,
        Department::Hr,
        Department::Marketing,
        Department::Finance,
        Department::Operations,
        Department::CustomerSupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Sales => "Sales",
            Department::Hr => "HR",
            Department::Marketing => "Marketing",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::CustomerSupport => "Customer Support",
        }
    }

    /// Position in the fixed display order.
    pub fn index(&self) -> usize {
        Department::ALL.iter().position(|d| d == self).unwrap_or(0)
    }

    pub fn next(&self) -> Department {
        Department::ALL[(self.index() + 1) % Department::ALL.len()]
    }

    pub fn prev(&self) -> Department {
        let len = Department::ALL.len();
        Department::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ValidationError;

    /// Accepts display names case-insensitively; `-` and `_` stand in for spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::UnknownDepartment(s.to_string()))
    }
}

/// Aggregate metrics returned by `GET /dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_feedback: u64,
    pub sentiment_distribution: BTreeMap<Sentiment, u64>,
    pub department_breakdown: BTreeMap<String, BTreeMap<Sentiment, u64>>,
    #[serde(default)]
    pub sentiment_timeline: Vec<TimelinePoint>,
    #[serde(default)]
    pub recent_feedback: Vec<FeedbackRecord>,
}

/// Daily sentiment counts, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Critical,
    High,
    Other(String),
}

impl Priority {
    pub fn label(&self) -> &str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Other(label) => label,
        }
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Critical" => Priority::Critical,
            "High" => Priority::High,
            _ => Priority::Other(label),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.label().to_string()
    }
}

/// Generated recommendation from `GET /insights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub priority: Priority,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub affected_departments: Vec<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

/// A stored, classified feedback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub department: String,
    pub feedback_text: String,
    // Unclassified entries count as Neutral, same as the backend's aggregates.
    #[serde(default, deserialize_with = "sentiment_or_neutral")]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub processed: bool,
}

fn sentiment_or_neutral<'de, D>(deserializer: D) -> Result<Sentiment, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Sentiment>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend timestamps are either RFC 3339 or naive UTC
/// (`2024-05-01T10:00:00.123456`).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Detailed-view filter. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub department: Option<Department>,
    pub sentiment: Option<Sentiment>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Merge a patch; fields the patch does not mention are kept.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(sentiment) = patch.sentiment {
            self.sentiment = sentiment;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
    }

    /// Inclusive calendar-date check (UTC) against the date bounds.
    pub fn admits_date(&self, ts: &DateTime<Utc>) -> bool {
        let day = ts.date_naive();
        self.start_date.map_or(true, |start| day >= start)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

/// Partial filter update. The outer `Option` says whether the field is
/// touched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub department: Option<Option<Department>>,
    pub sentiment: Option<Option<Sentiment>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl FilterPatch {
    pub fn department(mut self, department: Option<Department>) -> Self {
        self.department = Some(department);
        self
    }

    pub fn sentiment(mut self, sentiment: Option<Sentiment>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = Some(date);
        self
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Feedback form contents, edited by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFeedbackDraft {
    pub employee_id: String,
    pub feedback_text: String,
    pub department: Department,
}

impl NewFeedbackDraft {
    /// Client-side guard before sending. The backend may still reject.
    pub fn validate(&self) -> Result<FeedbackSubmission, ValidationError> {
        let text = self.feedback_text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyFeedback);
        }

        let employee_id = self.employee_id.trim();
        Ok(FeedbackSubmission {
            employee_id: (!employee_id.is_empty()).then(|| employee_id.to_string()),
            feedback_text: text.to_string(),
            department: self.department,
        })
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub employee_id: Option<String>,
    pub feedback_text: String,
    pub department: Department,
}

/// Body of `GET /departments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentList {
    pub departments: Vec<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceBanner {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_parses_backend_payload() {
        let json = r#"{
            "total_feedback": 10,
            "sentiment_distribution": {"Positive": 6, "Neutral": 3, "Negative": 1},
            "sentiment_timeline": [
                {"date": "2024-05-01", "positive": 1, "neutral": 0, "negative": 0}
            ],
            "department_breakdown": {
                "Engineering": {"Positive": 4, "Neutral": 1, "Negative": 0},
                "Customer Support": {"Positive": 2, "Neutral": 2, "Negative": 1}
            },
            "recent_feedback": []
        }"#;

        let summary: DashboardSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_feedback, 10);
        assert_eq!(summary.sentiment_distribution[&Sentiment::Positive], 6);
        assert_eq!(summary.department_breakdown["Customer Support"][&Sentiment::Negative], 1);
        assert_eq!(summary.sentiment_timeline.len(), 1);
    }

    #[test]
    fn test_summary_without_optional_sections() {
        let json = r#"{
            "total_feedback": 0,
            "sentiment_distribution": {},
            "department_breakdown": {}
        }"#;
        let summary: DashboardSummary = serde_json::from_str(json).unwrap();
        assert!(summary.sentiment_timeline.is_empty());
        assert!(summary.recent_feedback.is_empty());
    }

    #[test]
    fn test_record_with_naive_timestamp_and_nulls() {
        let json = r#"{
            "id": "4f1c",
            "employee_id": null,
            "feedback_text": "Fine.",
            "department": "HR",
            "timestamp": "2024-05-01T10:15:30.123456",
            "sentiment": null,
            "confidence_score": null,
            "processed": false
        }"#;

        let record: FeedbackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id, None);
        assert_eq!(record.sentiment, Sentiment::Neutral);
        assert_eq!(record.confidence_score, None);
        assert_eq!(record.timestamp.to_rfc3339(), "2024-05-01T10:15:30.123456+00:00");
    }

    #[test]
    fn test_timestamp_accepts_rfc3339_and_whole_seconds() {
        assert!(timestamp::parse("2024-05-01T10:15:30Z").is_some());
        assert!(timestamp::parse("2024-05-01T12:15:30+02:00").is_some());
        assert!(timestamp::parse("2024-05-01T10:15:30").is_some());
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_priority_keeps_unknown_labels() {
        let insight: Insight = serde_json::from_str(
            r#"{"priority": "Medium", "category": "Workload", "description": "d",
                "affected_departments": ["Sales"], "suggested_actions": []}"#,
        )
        .unwrap();
        assert_eq!(insight.priority, Priority::Other("Medium".to_string()));
        assert_eq!(Priority::from("Critical".to_string()), Priority::Critical);
    }

    #[test]
    fn test_department_names_round_trip() {
        for department in Department::ALL {
            let json = serde_json::to_string(&department).unwrap();
            assert_eq!(json, format!("\"{}\"", department.as_str()));
            assert_eq!(department.as_str().parse::<Department>().unwrap(), department);
        }
        assert_eq!("customer-support".parse::<Department>().unwrap(), Department::CustomerSupport);
        assert_eq!(
            "Legal".parse::<Department>(),
            Err(ValidationError::UnknownDepartment("Legal".to_string()))
        );
    }

    #[test]
    fn test_department_cycle_wraps() {
        assert_eq!(Department::CustomerSupport.next(), Department::Engineering);
        assert_eq!(Department::Engineering.prev(), Department::CustomerSupport);
    }

    #[test]
    fn test_filter_merge_keeps_untouched_fields() {
        let mut filters = FilterCriteria {
            department: Some(Department::Sales),
            ..FilterCriteria::default()
        };

        filters.merge(FilterPatch::default().sentiment(Some(Sentiment::Negative)));
        assert_eq!(filters.department, Some(Department::Sales));
        assert_eq!(filters.sentiment, Some(Sentiment::Negative));

        filters.merge(FilterPatch::default().department(None));
        assert_eq!(filters.department, None);
        assert_eq!(filters.sentiment, Some(Sentiment::Negative));
    }

    #[test]
    fn test_filter_date_bounds_are_inclusive() {
        let filters = FilterCriteria {
            start_date: Some(parse_date("2024-05-01").unwrap()),
            end_date: Some(parse_date("2024-05-03").unwrap()),
            ..FilterCriteria::default()
        };
        let at = |raw: &str| timestamp::parse(raw).unwrap();

        assert!(filters.admits_date(&at("2024-05-01T00:00:00Z")));
        assert!(filters.admits_date(&at("2024-05-03T23:59:59Z")));
        assert!(!filters.admits_date(&at("2024-04-30T23:59:59Z")));
        assert!(!filters.admits_date(&at("2024-05-04T00:00:00Z")));
        assert!(parse_date("05/01/2024").is_err());
    }

    #[test]
    fn test_draft_validation() {
        let draft = NewFeedbackDraft::default();
        assert_eq!(draft.validate(), Err(ValidationError::EmptyFeedback));

        let blank = NewFeedbackDraft {
            feedback_text: "   \n".to_string(),
            ..NewFeedbackDraft::default()
        };
        assert_eq!(blank.validate(), Err(ValidationError::EmptyFeedback));

        let draft = NewFeedbackDraft {
            employee_id: "  ".to_string(),
            feedback_text: " Great onboarding. ".to_string(),
            department: Department::Hr,
        };
        let submission = draft.validate().unwrap();
        assert_eq!(submission.employee_id, None);
        assert_eq!(submission.feedback_text, "Great onboarding.");

        let body = serde_json::to_value(&submission).unwrap();
        assert_eq!(body["department"], "HR");
        assert!(body["employee_id"].is_null());
    }
}
