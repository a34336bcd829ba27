// services/sentiment-dash/src/api.rs
//
// Backend seam: the trait the dashboard controller talks to, and the
// reqwest client for the feedback service's REST API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use svckit::config::ClientConfig;
use svckit::errors::ApiError;
use svckit::types::{
    DashboardSummary, DepartmentList, FeedbackRecord, FeedbackSubmission, FilterCriteria, Insight,
    ServiceBanner,
};

/// Remote source of truth for feedback, aggregates and insights.
#[async_trait]
pub trait FeedbackBackend: Send + Sync {
    /// `GET /dashboard`
    async fn fetch_summary(&self) -> Result<DashboardSummary, ApiError>;

    /// `GET /insights`
    async fn fetch_insights(&self) -> Result<Vec<Insight>, ApiError>;

    /// `GET /feedback`, most recent first, at most `limit` records.
    async fn fetch_feedback(
        &self,
        filters: &FilterCriteria,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, ApiError>;

    /// `POST /feedback`; the backend classifies the text before answering.
    async fn submit_feedback(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<FeedbackRecord, ApiError>;

    /// `GET /departments`: departments that actually have feedback.
    async fn fetch_departments(&self) -> Result<Vec<String>, ApiError>;

    /// `GET /`: service banner, used as a reachability probe.
    async fn ping(&self) -> Result<String, ApiError>;

    /// Short label for the header and logs.
    fn describe(&self) -> String;
}

/// Query parameters for `GET /feedback`. Date bounds are not part of the
/// endpoint and stay client-side.
pub fn feedback_query(filters: &FilterCriteria, limit: usize) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.to_string())];
    if let Some(department) = filters.department {
        query.push(("department", department.as_str().to_string()));
    }
    if let Some(sentiment) = filters.sentiment {
        query.push(("sentiment", sentiment.as_str().to_string()));
    }
    query
}

pub struct HttpBackend {
    client: reqwest::Client,
    api_root: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let resp = self.client.get(&url).send().await?;
        Self::read_json(resp).await
    }
}

#[async_trait]
impl FeedbackBackend for HttpBackend {
    async fn fetch_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get_json("/dashboard").await
    }

    async fn fetch_insights(&self) -> Result<Vec<Insight>, ApiError> {
        self.get_json("/insights").await
    }

    async fn fetch_feedback(
        &self,
        filters: &FilterCriteria,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, ApiError> {
        let url = self.url("/feedback");
        let query = feedback_query(filters, limit);
        debug!(url = %url, ?query, "GET");
        let resp = self.client.get(&url).query(&query).send().await?;
        Self::read_json(resp).await
    }

    async fn submit_feedback(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<FeedbackRecord, ApiError> {
        let url = self.url("/feedback");
        info!(url = %url, department = %submission.department, "submitting feedback");
        let resp = self.client.post(&url).json(submission).send().await?;
        Self::read_json(resp).await
    }

    async fn fetch_departments(&self) -> Result<Vec<String>, ApiError> {
        let list: DepartmentList = self.get_json("/departments").await?;
        Ok(list.departments)
    }

    async fn ping(&self) -> Result<String, ApiError> {
        let banner: ServiceBanner = self.get_json("/").await?;
        Ok(banner.message)
    }

    fn describe(&self) -> String {
        self.api_root.clone()
    }
}
