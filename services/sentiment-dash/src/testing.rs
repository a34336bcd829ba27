// services/sentiment-dash/src/testing.rs
//
// Scripted backend for controller tests. Each call pops the next scripted
// response; gated responses let a test decide when (and in which order)
// requests complete.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;

use svckit::errors::ApiError;
use svckit::types::{
    DashboardSummary, FeedbackRecord, FeedbackSubmission, FilterCriteria, Insight, Sentiment,
};

use crate::api::FeedbackBackend;

pub enum Scripted<T> {
    Ready(Result<T, ApiError>),
    Gated(oneshot::Receiver<Result<T, ApiError>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Summary,
    Insights,
    Feedback(FilterCriteria),
    Submit(FeedbackSubmission),
    Departments,
    Ping,
}

type Queue<T> = Mutex<VecDeque<Scripted<T>>>;

#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    summary: Queue<DashboardSummary>,
    insights: Queue<Vec<Insight>>,
    feedback: Queue<Vec<FeedbackRecord>>,
    submit: Queue<FeedbackRecord>,
    ping: Queue<String>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_summary(&self, result: Result<DashboardSummary, ApiError>) {
        self.summary.lock().unwrap().push_back(Scripted::Ready(result));
    }

    pub fn push_insights(&self, result: Result<Vec<Insight>, ApiError>) {
        self.insights.lock().unwrap().push_back(Scripted::Ready(result));
    }

    pub fn push_feedback(&self, result: Result<Vec<FeedbackRecord>, ApiError>) {
        self.feedback.lock().unwrap().push_back(Scripted::Ready(result));
    }

    pub fn push_submit(&self, result: Result<FeedbackRecord, ApiError>) {
        self.submit.lock().unwrap().push_back(Scripted::Ready(result));
    }

    pub fn push_ping(&self, result: Result<String, ApiError>) {
        self.ping.lock().unwrap().push_back(Scripted::Ready(result));
    }

    /// Next feedback call blocks until the returned sender fires (or is
    /// dropped, which surfaces as an aborted request).
    pub fn gate_feedback(&self) -> oneshot::Sender<Result<Vec<FeedbackRecord>, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.feedback.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn gate_submit(&self) -> oneshot::Sender<Result<FeedbackRecord, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.submit.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn next_from<T>(queue: &Queue<T>, fallback: impl FnOnce() -> T) -> Result<T, ApiError> {
    let scripted = queue.lock().unwrap().pop_front();
    match scripted {
        None => Ok(fallback()),
        Some(Scripted::Ready(result)) => result,
        Some(Scripted::Gated(rx)) => rx.await.unwrap_or(Err(ApiError::Aborted)),
    }
}

#[async_trait]
impl FeedbackBackend for ScriptedBackend {
    async fn fetch_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.record(Call::Summary);
        next_from(&self.summary, DashboardSummary::default).await
    }

    async fn fetch_insights(&self) -> Result<Vec<Insight>, ApiError> {
        self.record(Call::Insights);
        next_from(&self.insights, Vec::new).await
    }

    async fn fetch_feedback(
        &self,
        filters: &FilterCriteria,
        _limit: usize,
    ) -> Result<Vec<FeedbackRecord>, ApiError> {
        self.record(Call::Feedback(filters.clone()));
        next_from(&self.feedback, Vec::new).await
    }

    async fn submit_feedback(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<FeedbackRecord, ApiError> {
        self.record(Call::Submit(submission.clone()));
        let department = submission.department.as_str().to_string();
        next_from(&self.submit, || sample_record("created", &department, Sentiment::Positive)).await
    }

    async fn fetch_departments(&self) -> Result<Vec<String>, ApiError> {
        self.record(Call::Departments);
        Ok(vec!["Engineering".to_string()])
    }

    async fn ping(&self) -> Result<String, ApiError> {
        self.record(Call::Ping);
        next_from(&self.ping, || "scripted backend".to_string()).await
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub fn sample_record(id: &str, department: &str, sentiment: Sentiment) -> FeedbackRecord {
    FeedbackRecord {
        id: id.to_string(),
        employee_id: Some("EMP001".to_string()),
        department: department.to_string(),
        feedback_text: format!("feedback {}", id),
        sentiment,
        confidence_score: Some(0.9),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        processed: true,
    }
}

pub fn summary_with(total: u64, positive: u64, neutral: u64, negative: u64) -> DashboardSummary {
    let distribution: BTreeMap<Sentiment, u64> = [
        (Sentiment::Positive, positive),
        (Sentiment::Neutral, neutral),
        (Sentiment::Negative, negative),
    ]
    .into_iter()
    .collect();

    DashboardSummary {
        total_feedback: total,
        sentiment_distribution: distribution.clone(),
        department_breakdown: [("Engineering".to_string(), distribution)].into_iter().collect(),
        ..DashboardSummary::default()
    }
}

pub fn server_error() -> ApiError {
    ApiError::Server {
        status: 500,
        body: "Error getting dashboard data".to_string(),
    }
}

/// A genuine transport-level `reqwest::Error`, produced without touching
/// the network.
pub async fn transport_error() -> ApiError {
    let err = reqwest::Client::new()
        .get("not a url")
        .send()
        .await
        .expect_err("malformed URL must fail");
    ApiError::Http(err)
}
