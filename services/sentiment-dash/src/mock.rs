// services/sentiment-dash/src/mock.rs
//
// In-process backend for demo mode. Holds a seeded feedback store, answers
// every endpoint with simulated latency, and classifies new feedback with a
// simple keyword heuristic.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use svckit::errors::ApiError;
use svckit::types::{
    DashboardSummary, FeedbackRecord, FeedbackSubmission, FilterCriteria, Insight, Priority,
    Sentiment, TimelinePoint,
};

use crate::api::FeedbackBackend;

const POSITIVE_WORDS: [&str; 8] = [
    "good", "great", "excellent", "happy", "satisfied", "love", "amazing", "wonderful",
];
const NEGATIVE_WORDS: [&str; 8] = [
    "bad", "terrible", "hate", "awful", "frustrated", "disappointed", "angry", "upset",
];

/// Confidence reported for keyword classification.
pub const KEYWORD_CONFIDENCE: f64 = 0.6;

const TIMELINE_DAYS: u64 = 7;
const RECENT_FEEDBACK: usize = 10;

/// Negative entries a department needs before it gets a morale insight.
const DEPARTMENT_NEGATIVE_THRESHOLD: usize = 2;
/// Organization-wide negative share that triggers a critical insight.
const CRITICAL_NEGATIVE_RATIO: f64 = 0.3;

/// Count keyword hits; the side with more hits wins, ties are neutral.
pub fn classify(text: &str) -> (Sentiment, f64) {
    let lower = text.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();
    let positive = hits(&POSITIVE_WORDS);
    let negative = hits(&NEGATIVE_WORDS);

    let sentiment = if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };
    (sentiment, KEYWORD_CONFIDENCE)
}

/// Aggregate `records` the way the feedback service does. `records` must be
/// most-recent-first.
pub fn build_summary(records: &[FeedbackRecord], today: NaiveDate) -> DashboardSummary {
    let mut distribution: BTreeMap<Sentiment, u64> =
        Sentiment::ALL.into_iter().map(|s| (s, 0)).collect();
    let mut breakdown: BTreeMap<String, BTreeMap<Sentiment, u64>> = BTreeMap::new();

    for record in records {
        *distribution.entry(record.sentiment).or_default() += 1;
        let counts = breakdown
            .entry(record.department.clone())
            .or_insert_with(|| Sentiment::ALL.into_iter().map(|s| (s, 0)).collect());
        *counts.entry(record.sentiment).or_default() += 1;
    }

    let timeline = (0..TIMELINE_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let mut point = TimelinePoint {
                date,
                positive: 0,
                neutral: 0,
                negative: 0,
            };
            for record in records.iter().filter(|r| r.timestamp.date_naive() == date) {
                match record.sentiment {
                    Sentiment::Positive => point.positive += 1,
                    Sentiment::Neutral => point.neutral += 1,
                    Sentiment::Negative => point.negative += 1,
                }
            }
            point
        })
        .collect();

    DashboardSummary {
        total_feedback: records.len() as u64,
        sentiment_distribution: distribution,
        department_breakdown: breakdown,
        sentiment_timeline: timeline,
        recent_feedback: records.iter().take(RECENT_FEEDBACK).cloned().collect(),
    }
}

pub fn build_insights(records: &[FeedbackRecord]) -> Vec<Insight> {
    let mut insights = Vec::new();

    let mut negatives: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.sentiment == Sentiment::Negative) {
        *negatives.entry(record.department.as_str()).or_default() += 1;
    }

    for (department, count) in &negatives {
        if *count >= DEPARTMENT_NEGATIVE_THRESHOLD {
            insights.push(Insight {
                priority: Priority::High,
                category: "Department Morale".to_string(),
                description: format!(
                    concat!(
                        "{} department shows concerning sentiment patterns ",
                        "with {} negative feedback instances"
                    ),
                    department, count
                ),
                affected_departments: vec![department.to_string()],
                suggested_actions: vec![
                    "Schedule team meeting to address concerns".to_string(),
                    "Conduct one-on-one sessions with team members".to_string(),
                    "Review workload distribution and processes".to_string(),
                    "Implement feedback follow-up mechanisms".to_string(),
                ],
            });
        }
    }

    if !records.is_empty() {
        let negative_total: usize = negatives.values().sum();
        let ratio = negative_total as f64 / records.len() as f64;
        if ratio > CRITICAL_NEGATIVE_RATIO {
            let departments: BTreeSet<&str> =
                records.iter().map(|r| r.department.as_str()).collect();
            insights.push(Insight {
                priority: Priority::Critical,
                category: "Overall Sentiment".to_string(),
                description: format!(
                    "High negative sentiment ratio ({:.1}%) across organization",
                    ratio * 100.0
                ),
                affected_departments: departments.into_iter().map(str::to_string).collect(),
                suggested_actions: vec![
                    "Conduct organization-wide sentiment survey".to_string(),
                    "Review management practices and policies".to_string(),
                    "Implement employee wellness programs".to_string(),
                    "Establish regular feedback channels".to_string(),
                ],
            });
        }
    }

    insights
}

pub struct MockBackend {
    store: RwLock<Vec<FeedbackRecord>>,
    latency_ms: (u64, u64),
    failure_rate: f64,
}

impl MockBackend {
    /// Store seeded with a week of sample feedback.
    pub fn new() -> Self {
        Self::with_records(sample_feedback(Utc::now()))
    }

    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    fn with_records(mut records: Vec<FeedbackRecord>) -> Self {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self {
            store: RwLock::new(records),
            latency_ms: (80, 400),
            failure_rate: 0.0,
        }
    }

    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = (min_ms, max_ms.max(min_ms));
        self
    }

    /// Fraction of requests answered with a 503, in `[0, 1]`.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    async fn simulate(&self, endpoint: &str) -> Result<(), ApiError> {
        // ThreadRng is not Send; it must be gone before the await.
        let (delay, fail) = {
            let mut rng = rand::thread_rng();
            let (min, max) = self.latency_ms;
            (rng.gen_range(min..=max), rng.gen_bool(self.failure_rate))
        };

        tokio::time::sleep(Duration::from_millis(delay)).await;
        debug!("Demo backend answered {} after {}ms", endpoint, delay);

        if fail {
            return Err(ApiError::Server {
                status: 503,
                body: format!("simulated outage on {}", endpoint),
            });
        }
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackBackend for MockBackend {
    async fn fetch_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.simulate("/dashboard").await?;
        let store = self.store.read().await;
        Ok(build_summary(&store, Utc::now().date_naive()))
    }

    async fn fetch_insights(&self) -> Result<Vec<Insight>, ApiError> {
        self.simulate("/insights").await?;
        let store = self.store.read().await;
        Ok(build_insights(&store))
    }

    async fn fetch_feedback(
        &self,
        filters: &FilterCriteria,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, ApiError> {
        self.simulate("/feedback").await?;
        let store = self.store.read().await;
        Ok(store
            .iter()
            .filter(|r| filters.department.map_or(true, |d| r.department == d.as_str()))
            .filter(|r| filters.sentiment.map_or(true, |s| r.sentiment == s))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn submit_feedback(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<FeedbackRecord, ApiError> {
        self.simulate("POST /feedback").await?;

        let (sentiment, confidence) = classify(&submission.feedback_text);
        let record = FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            employee_id: submission.employee_id.clone(),
            department: submission.department.as_str().to_string(),
            feedback_text: submission.feedback_text.clone(),
            sentiment,
            confidence_score: Some(confidence),
            timestamp: Utc::now(),
            processed: true,
        };

        self.store.write().await.insert(0, record.clone());
        info!("Demo backend stored feedback {} ({})", record.id, record.sentiment);
        Ok(record)
    }

    async fn fetch_departments(&self) -> Result<Vec<String>, ApiError> {
        self.simulate("/departments").await?;
        let store = self.store.read().await;
        let departments: BTreeSet<&str> = store.iter().map(|r| r.department.as_str()).collect();
        Ok(departments.into_iter().map(str::to_string).collect())
    }

    async fn ping(&self) -> Result<String, ApiError> {
        self.simulate("/").await?;
        Ok("Employee Sentiment Analysis demo backend".to_string())
    }

    fn describe(&self) -> String {
        "demo backend".to_string()
    }
}

/// A week of feedback ending at `now`.
fn sample_feedback(now: DateTime<Utc>) -> Vec<FeedbackRecord> {
    let samples: [(Option<&str>, &str, &str, i64); 18] = [
        (Some("EMP001"), "Engineering", "The new CI pipeline is great, builds are fast.", 2),
        (Some("EMP014"), "Engineering", "Frustrated by the constant context switching.", 9),
        (None, "Engineering", "On-call rotation was rebalanced this sprint.", 30),
        (Some("EMP022"), "Sales", "Quarterly targets feel unrealistic and the team is upset.", 5),
        (Some("EMP031"), "Sales", "Terrible CRM outages cost us two demos this week.", 27),
        (None, "Sales", "Disappointed that commission changes were not explained.", 52),
        (Some("EMP040"), "HR", "Happy with the new benefits enrollment process.", 12),
        (Some("EMP041"), "HR", "Policy handbook was updated last Monday.", 75),
        (Some("EMP055"), "Marketing", "Love the creative freedom on the rebrand campaign!", 3),
        (None, "Marketing", "Campaign review meetings moved to Thursdays.", 44),
        (Some("EMP063"), "Finance", "Month-end close went smoothly, excellent collaboration.", 20),
        (Some("EMP064"), "Finance", "Expense tool is awful to use on mobile.", 98),
        (Some("EMP070"), "Operations", "Warehouse shifts are covered for the holidays.", 16),
        (Some("EMP072"), "Operations", "Satisfied with the new safety training.", 120),
        (Some("EMP080"), "Customer Support", "Angry customers all week and no escalation path.", 1),
        (Some("EMP081"), "Customer Support", "Ticket backlog is bad and we are frustrated.", 36),
        (None, "Customer Support", "Amazing support from the team lead during the outage.", 60),
        (Some("EMP090"), "Engineering", "Wonderful mentoring program for new hires.", 140),
    ];

    samples
        .into_iter()
        .map(|(employee, department, text, hours_ago)| {
            let (sentiment, confidence) = classify(text);
            FeedbackRecord {
                id: Uuid::new_v4().to_string(),
                employee_id: employee.map(str::to_string),
                department: department.to_string(),
                feedback_text: text.to_string(),
                sentiment,
                confidence_score: Some(confidence),
                timestamp: now - chrono::Duration::hours(hours_ago),
                processed: true,
            }
        })
        .collect()
}
