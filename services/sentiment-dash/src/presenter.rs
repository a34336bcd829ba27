// services/sentiment-dash/src/presenter.rs
//
// Aggregate presenter: pure derivations from dashboard state into
// display-ready values. Nothing here mutates state or performs I/O.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Local, Locale, TimeZone, Utc};

use svckit::types::{
    DashboardSummary, Department, FeedbackRecord, Insight, Priority, Sentiment, TimelinePoint,
};

use crate::state::{DashboardState, Phase, Slot};

/// Shown instead of a confidence score the backend did not provide.
pub const NOT_AVAILABLE: &str = "N/A";
pub const ANONYMOUS: &str = "Anonymous";
pub const NO_ISSUES_TITLE: &str = "Great News!";
pub const NO_ISSUES_BODY: &str =
    "No critical issues detected. Employee sentiment appears healthy across the organization.";

/// Share of `label` in the distribution, in percent with one decimal.
/// Zero when there is no feedback at all.
pub fn sentiment_percentage(summary: &DashboardSummary, label: Sentiment) -> f64 {
    if summary.total_feedback == 0 {
        return 0.0;
    }
    let count = summary.sentiment_distribution.get(&label).copied().unwrap_or(0);
    round_one_decimal(count as f64 / summary.total_feedback as f64 * 100.0)
}

/// Percentages for every label, in display order.
pub fn sentiment_percentages(summary: &DashboardSummary) -> Vec<(Sentiment, f64)> {
    Sentiment::ALL
        .into_iter()
        .map(|label| (label, sentiment_percentage(summary, label)))
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRow {
    pub name: String,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
}

impl DepartmentRow {
    pub fn count(&self, label: Sentiment) -> u64 {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// One row per department in the breakdown. Known departments come first in
/// their usual order, then anything else the backend reported.
pub fn department_rows(summary: &DashboardSummary) -> Vec<DepartmentRow> {
    let mut rows: Vec<DepartmentRow> = summary
        .department_breakdown
        .iter()
        .map(|(name, counts)| {
            let get = |label| counts.get(&label).copied().unwrap_or(0);
            DepartmentRow {
                name: name.clone(),
                positive: get(Sentiment::Positive),
                neutral: get(Sentiment::Neutral),
                negative: get(Sentiment::Negative),
                total: counts.values().sum(),
            }
        })
        .collect();

    rows.sort_by_key(|row| {
        let rank = row
            .name
            .parse::<Department>()
            .map(|d| d.index())
            .unwrap_or(Department::ALL.len());
        (rank, row.name.clone())
    });
    rows
}

/// Feedback count for the header; zero until a summary has loaded.
pub fn header_total(state: &DashboardState) -> u64 {
    state.summary.value().map_or(0, |summary| summary.total_feedback)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub label: String,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

pub fn timeline_rows(points: &[TimelinePoint]) -> Vec<TimelineRow> {
    points
        .iter()
        .map(|point| TimelineRow {
            label: point.date.format("%m/%d").to_string(),
            positive: point.positive,
            neutral: point.neutral,
            negative: point.negative,
        })
        .collect()
}

/// What the insights view should show.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightsView<'a> {
    Loading,
    /// Nothing has loaded and the last attempt failed.
    Unavailable(&'a str),
    /// Loaded, and the backend found nothing to flag.
    NoIssues,
    Issues(&'a [Insight]),
}

pub fn insights_view(slot: &Slot<Vec<Insight>>) -> InsightsView<'_> {
    match slot.value() {
        Some(insights) if insights.is_empty() => InsightsView::NoIssues,
        Some(insights) => InsightsView::Issues(insights),
        None => match slot.phase() {
            Phase::ErrorStale => {
                InsightsView::Unavailable(slot.last_error().unwrap_or("unknown error"))
            }
            _ => InsightsView::Loading,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordsView<'a> {
    Loading,
    Table(Vec<&'a FeedbackRecord>),
}

/// Records view: a loading marker while a records request is outstanding,
/// otherwise the loaded page narrowed to the date bounds it was fetched with.
pub fn records_view(state: &DashboardState) -> RecordsView<'_> {
    if state.records_loading() {
        return RecordsView::Loading;
    }

    let bounds = &state.records_filters;
    let rows = state
        .records
        .value()
        .map(|records| records.iter().filter(|r| bounds.admits_date(&r.timestamp)).collect())
        .unwrap_or_default();
    RecordsView::Table(rows)
}

pub fn confidence_display(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}%", score * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Locale variables in precedence order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

/// Calendar date of `ts` in `tz`, in `locale`'s date representation (`%x`).
pub fn date_display_in<Tz>(ts: &DateTime<Utc>, tz: &Tz, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ts.with_timezone(tz).format_localized("%x", locale).to_string()
}

/// Local calendar date in the user's locale; POSIX (`05/13/24`) when the
/// environment names no known locale.
pub fn date_display(ts: &DateTime<Utc>) -> String {
    date_display_in(ts, &Local, user_locale().unwrap_or(Locale::POSIX))
}

/// Locale named by the first non-empty of `LC_ALL`, `LC_TIME` and `LANG`.
pub fn locale_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<Locale> {
    let value = LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(*var))
        .find(|value| !value.trim().is_empty())?;
    parse_locale(value.trim())
}

/// `de_DE.UTF-8`, `sr_RS.UTF-8@latin`, `C` and friends. Codesets are ignored.
fn parse_locale(value: &str) -> Option<Locale> {
    let (name, modifier) = match value.split_once('@') {
        Some((name, modifier)) => (name, Some(modifier)),
        None => (value, None),
    };
    let name = name.split('.').next().unwrap_or(name);
    if name == "C" {
        return Some(Locale::POSIX);
    }

    modifier
        .and_then(|modifier| Locale::try_from(format!("{}@{}", name, modifier).as_str()).ok())
        .or_else(|| Locale::try_from(name).ok())
}

fn user_locale() -> Option<Locale> {
    static LOCALE: OnceLock<Option<Locale>> = OnceLock::new();
    *LOCALE.get_or_init(|| locale_from_env(|var| std::env::var(var).ok()))
}

pub fn employee_display(employee_id: Option<&str>) -> &str {
    match employee_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => ANONYMOUS,
    }
}

pub fn priority_badge(priority: &Priority) -> String {
    format!("{} Priority", priority.label())
}

/// Compact count for stat boxes (1.50K, 2.00M).
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}
