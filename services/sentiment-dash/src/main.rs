// services/sentiment-dash/src/main.rs
//
// Terminal dashboard for employee-feedback sentiment analysis
//
// Run with: cargo run --bin sentiment-dash -- --demo

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use svckit::config::{ClientConfig, DEFAULT_BASE_URL};
use svckit::types::{parse_date, Department, FilterCriteria, Sentiment};

use sentiment_dash::input::{self, map_key};
use sentiment_dash::report::Report;
use sentiment_dash::ui::draw_ui;
use sentiment_dash::{DashboardController, FeedbackBackend, HttpBackend, MockBackend};

#[derive(Parser, Debug)]
#[command(name = "sentiment-dash")]
#[command(about = "Terminal dashboard for employee-feedback sentiment analysis")]
#[command(version)]
struct Args {
    /// Run against an in-process demo backend (no server required)
    #[arg(long, short)]
    demo: bool,

    /// Demo backend: share of requests answered with a 503, from 0.0 to 1.0
    #[arg(long, default_value = "0.0")]
    demo_failure_rate: f64,

    /// Demo backend: fixed response latency in milliseconds (default: random 80-400)
    #[arg(long)]
    demo_latency_ms: Option<u64>,

    /// Demo backend: start with no feedback on file
    #[arg(long)]
    demo_empty: bool,

    /// Feedback service base URL; `/api` is appended
    #[arg(long, env = "SENTIMENT_DASH_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Load every view once, print a text report and exit
    #[arg(long)]
    once: bool,

    /// UI tick interval in milliseconds
    #[arg(long, default_value = "250")]
    tick_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Initial department filter (e.g. "Customer Support" or customer-support)
    #[arg(long)]
    department: Option<Department>,

    /// Initial sentiment filter
    #[arg(long)]
    sentiment: Option<Sentiment>,

    /// Only show feedback on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    since: Option<NaiveDate>,

    /// Only show feedback on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    until: Option<NaiveDate>,
}

impl Args {
    fn initial_filters(&self) -> FilterCriteria {
        FilterCriteria {
            department: self.department,
            sentiment: self.sentiment,
            start_date: self.since,
            end_date: self.until,
        }
    }

    fn demo_backend(&self) -> MockBackend {
        let mut backend = if self.demo_empty {
            MockBackend::empty()
        } else {
            MockBackend::new()
        };
        if let Some(ms) = self.demo_latency_ms {
            backend = backend.with_latency(ms, ms);
        }
        backend.with_failure_rate(self.demo_failure_rate)
    }
}

/// The TUI owns the terminal, so logs only go to stderr in `--once` mode;
/// otherwise they need `--log-file`.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sentiment_dash={0},svckit={0}", args.log_level).into()
    });

    if let Some(path) = &args.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else if args.once {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let backend: Arc<dyn FeedbackBackend> = if args.demo {
        info!(
            "Starting sentiment dashboard in DEMO mode (failure rate {})",
            args.demo_failure_rate
        );
        Arc::new(args.demo_backend())
    } else {
        let config = ClientConfig::new(&args.api_url)
            .with_timeout(Duration::from_millis(args.timeout_ms));
        info!("Starting sentiment dashboard against {}", config.api_root());
        Arc::new(HttpBackend::new(&config)?)
    };

    let mut controller =
        DashboardController::new(Arc::clone(&backend)).with_filters(args.initial_filters());

    if args.once {
        return run_once(&mut controller, backend.as_ref()).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run app
    let result = run_app(&mut terminal, &mut controller, &args).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_once(
    controller: &mut DashboardController,
    backend: &dyn FeedbackBackend,
) -> Result<()> {
    controller.start();
    controller.settle().await;

    let departments = match backend.fetch_departments().await {
        Ok(departments) => Some(departments),
        Err(err) => {
            warn!("Could not list departments: {}", err);
            None
        }
    };

    let mut report = Report::new(controller.state());
    if let Some(departments) = &departments {
        report = report.with_departments(departments);
    }
    print!("{}", report);
    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut DashboardController,
    args: &Args,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(16)));

    controller.start();

    loop {
        // Draw UI
        terminal.draw(|frame| draw_ui(frame, controller.state(), args.demo))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = map_key(controller.state(), key) {
                        if input::apply(controller, action) {
                            info!("Quit requested");
                            return Ok(());
                        }
                    }
                }
                // Resize and friends only need a redraw.
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
            Some(event) = controller.next_event() => controller.handle(event),
            _ = ticker.tick() => controller.expire_notice(Instant::now()),
        }
    }
}
