// services/sentiment-dash/src/controller/mod.rs
//
// Dashboard controller: sole owner of dashboard state.
//
// Every request runs as its own task and reports back over a channel; the
// UI task applies the outcomes one at a time through `handle`, so state is
// never touched concurrently.

mod fetch;
mod filter;
mod submit;

pub use filter::next_in_cycle;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{info, warn};

use svckit::errors::ApiError;
use svckit::types::{DashboardSummary, FeedbackRecord, FilterCriteria, Insight};

use crate::api::FeedbackBackend;
use crate::state::{ActiveView, Connection, DashboardState, DataCategory, LogLevel, RequestToken};

/// Outcome of a request, delivered back to the controller.
#[derive(Debug)]
pub enum ControllerEvent {
    Summary {
        token: RequestToken,
        result: Result<DashboardSummary, ApiError>,
    },
    Insights {
        token: RequestToken,
        result: Result<Vec<Insight>, ApiError>,
    },
    Records {
        token: RequestToken,
        filters: FilterCriteria,
        result: Result<Vec<FeedbackRecord>, ApiError>,
    },
    Submitted {
        result: Result<FeedbackRecord, ApiError>,
    },
    Probe {
        result: Result<String, ApiError>,
    },
}

type Wrap<T> = Box<dyn FnOnce(Result<T, ApiError>) -> ControllerEvent + Send>;

/// Exactly-once reply for a spawned request. If the task is dropped before
/// it answers, the guard reports `ApiError::Aborted` so loading flags are
/// still released.
struct Reply<T> {
    tx: mpsc::UnboundedSender<ControllerEvent>,
    wrap: Option<Wrap<T>>,
}

impl<T> Reply<T> {
    fn new(tx: mpsc::UnboundedSender<ControllerEvent>, wrap: Wrap<T>) -> Self {
        Self { tx, wrap: Some(wrap) }
    }

    fn send(mut self, result: Result<T, ApiError>) {
        if let Some(wrap) = self.wrap.take() {
            let _ = self.tx.send(wrap(result));
        }
    }
}

impl<T> Drop for Reply<T> {
    fn drop(&mut self) {
        if let Some(wrap) = self.wrap.take() {
            let _ = self.tx.send(wrap(Err(ApiError::Aborted)));
        }
    }
}

pub struct DashboardController {
    backend: Arc<dyn FeedbackBackend>,
    state: DashboardState,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    in_flight: usize,
}

impl DashboardController {
    pub fn new(backend: Arc<dyn FeedbackBackend>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = DashboardState::new(&backend.describe());

        Self {
            backend,
            state,
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    /// Start with pre-selected filters (used for command-line filter flags).
    pub fn with_filters(mut self, filters: FilterCriteria) -> Self {
        self.state.filters = filters;
        self
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Requests issued but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Probe the backend and load every data set once. The loads are
    /// independent; none waits for another.
    pub fn start(&mut self) {
        info!("Dashboard starting against {}", self.state.backend_label);
        self.state
            .add_log(LogLevel::Info, &format!("Connecting to {}...", self.state.backend_label));

        let backend = Arc::clone(&self.backend);
        self.spawn_request(
            async move { backend.ping().await },
            Box::new(|result| ControllerEvent::Probe { result }),
        );

        self.invalidate(&DataCategory::ALL);
    }

    pub fn set_view(&mut self, view: ActiveView) {
        self.state.view = view;
    }

    pub fn expire_notice(&mut self, now: Instant) {
        self.state.expire_notice(now);
    }

    /// Wait for the next request outcome. Never returns `None` while the
    /// controller is alive, since it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    pub fn handle(&mut self, event: ControllerEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            ControllerEvent::Summary { token, result } => self.apply_summary(token, result),
            ControllerEvent::Insights { token, result } => self.apply_insights(token, result),
            ControllerEvent::Records { token, filters, result } => {
                self.apply_records(token, filters, result)
            }
            ControllerEvent::Submitted { result } => self.apply_submitted(result),
            ControllerEvent::Probe { result } => self.apply_probe(result),
        }
    }

    /// Apply the next outcome. Returns false if the channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Apply outcomes until nothing is in flight, including refreshes
    /// triggered along the way.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            if !self.process_next().await {
                break;
            }
        }
    }

    fn spawn_request<T, F>(&mut self, request: F, wrap: Wrap<T>)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let reply = Reply::new(self.events_tx.clone(), wrap);
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = request.await;
            reply.send(result);
        });
    }

    fn apply_probe(&mut self, result: Result<String, ApiError>) {
        match result {
            Ok(banner) => {
                info!("Backend reachable: {}", banner);
                self.set_connection(Connection::Connected);
            }
            Err(err) => {
                warn!("Backend probe failed: {}", err);
                self.state
                    .add_log(LogLevel::Warn, &format!("Backend probe failed: {}", err));
                self.note_reachability::<()>(&Err(err));
            }
        }
    }

    /// Track reachability from any response. A server error still proves the
    /// backend is up; only transport failures mark it disconnected.
    fn note_reachability<T>(&mut self, result: &Result<T, ApiError>) {
        let connection = match result {
            Ok(_) | Err(ApiError::Server { .. }) | Err(ApiError::Json(_)) => Connection::Connected,
            Err(ApiError::Http(_)) => Connection::Disconnected,
            Err(ApiError::Aborted) => return,
        };
        self.set_connection(connection);
    }

    fn set_connection(&mut self, connection: Connection) {
        if self.state.connection == connection {
            return;
        }

        let label = self.state.backend_label.clone();
        match connection {
            Connection::Connected => {
                self.state.add_log(LogLevel::Info, &format!("Connected to {}", label));
            }
            Connection::Disconnected => {
                warn!("Lost connection to {}", label);
                self.state.add_log(LogLevel::Warn, &format!("Lost connection to {}", label));
            }
            Connection::Unknown => {}
        }
        self.state.connection = connection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;
    use crate::testing::{
        sample_record, server_error, summary_with, transport_error, Call, ScriptedBackend,
    };

    #[tokio::test]
    async fn test_start_loads_every_category() {
        let backend = ScriptedBackend::new();
        backend.push_summary(Ok(summary_with(10, 6, 3, 1)));
        let record = sample_record("a", "Sales", svckit::types::Sentiment::Positive);
        backend.push_feedback(Ok(vec![record]));

        let mut controller = DashboardController::new(backend.clone());
        controller.start();
        assert_eq!(controller.in_flight(), 4);
        assert!(controller.state().records_loading());

        controller.settle().await;

        let state = controller.state();
        assert_eq!(state.summary.phase(), Phase::Loaded);
        assert_eq!(state.insights.phase(), Phase::Loaded);
        assert_eq!(state.records.phase(), Phase::Loaded);
        assert!(!state.records_loading());
        assert_eq!(state.connection, Connection::Connected);
        assert_eq!(state.summary.value().unwrap().total_feedback, 10);

        let calls = backend.calls();
        assert!(calls.contains(&Call::Ping));
        assert!(calls.contains(&Call::Summary));
        assert!(calls.contains(&Call::Insights));
        assert!(calls.contains(&Call::Feedback(FilterCriteria::default())));
    }

    #[tokio::test]
    async fn test_reachability_follows_responses() {
        let backend = ScriptedBackend::new();
        let mut controller = DashboardController::new(backend);

        controller.in_flight += 1;
        controller.handle(ControllerEvent::Probe {
            result: Err(transport_error().await),
        });
        assert_eq!(controller.state().connection, Connection::Disconnected);
        assert!(controller
            .state()
            .activity_log
            .iter()
            .any(|entry| entry.message.starts_with("Backend probe failed")));

        // A server-side error still means the backend answered.
        let token = controller.state.summary.begin();
        controller.in_flight += 1;
        controller.handle(ControllerEvent::Summary {
            token,
            result: Err(server_error()),
        });
        assert_eq!(controller.state().connection, Connection::Connected);
        assert_eq!(controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_reports_disconnected() {
        let backend = ScriptedBackend::new();
        backend.push_ping(Err(transport_error().await));
        backend.push_summary(Err(transport_error().await));
        backend.push_insights(Err(transport_error().await));
        backend.push_feedback(Err(transport_error().await));

        let mut controller = DashboardController::new(backend);
        controller.start();
        controller.settle().await;

        let state = controller.state();
        assert_eq!(state.connection, Connection::Disconnected);
        assert!(!state.records_loading());
        assert_eq!(state.insights.phase(), Phase::ErrorStale);
        assert!(state.insights.value().is_none());
        assert!(state
            .activity_log
            .iter()
            .any(|entry| entry.message.starts_with("Backend probe failed")));
    }

    #[tokio::test]
    async fn test_dropped_reply_reports_aborted() {
        let backend = ScriptedBackend::new();
        let mut controller = DashboardController::new(backend);

        let token = controller.state.records.begin();
        let reply: Reply<Vec<FeedbackRecord>> = Reply::new(
            controller.events_tx.clone(),
            Box::new(move |result| ControllerEvent::Records {
                token,
                filters: FilterCriteria::default(),
                result,
            }),
        );
        controller.in_flight += 1;
        drop(reply);

        controller.settle().await;
        assert!(!controller.state().records_loading());
        assert_eq!(controller.state().records.phase(), Phase::ErrorStale);
        assert_eq!(
            controller.state().records.last_error(),
            Some("request dropped before a response arrived")
        );
    }
}
