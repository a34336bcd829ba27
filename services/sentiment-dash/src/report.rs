// services/sentiment-dash/src/report.rs
//
// Plain-text snapshot of the dashboard for `--once` runs

use std::fmt;

use svckit::types::Sentiment;

use crate::presenter::{
    confidence_display, date_display, department_rows, employee_display, header_total,
    insights_view, priority_badge, records_view, sentiment_percentage, timeline_rows, InsightsView,
    RecordsView, NO_ISSUES_BODY, NO_ISSUES_TITLE,
};
use crate::state::{DashboardState, LogLevel, Phase};

/// Longest feedback excerpt printed per record.
const EXCERPT_CHARS: usize = 60;

pub struct Report<'a> {
    state: &'a DashboardState,
    departments: Option<&'a [String]>,
}

impl<'a> Report<'a> {
    pub fn new(state: &'a DashboardState) -> Self {
        Self {
            state,
            departments: None,
        }
    }

    /// Departments the backend reports as having feedback.
    pub fn with_departments(mut self, departments: &'a [String]) -> Self {
        self.departments = Some(departments);
        self
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(summary) = self.state.summary.value() else {
            let reason = self.state.summary.last_error().unwrap_or("not loaded");
            return writeln!(f, "Summary unavailable: {}", reason);
        };

        writeln!(f, "Total feedback: {}", header_total(self.state))?;
        if let Some(loaded_at) = self.state.summary.updated_at() {
            let stale = match self.state.summary.phase() {
                Phase::ErrorStale => " (stale)",
                _ => "",
            };
            writeln!(f, "Last refreshed: {}{}", loaded_at.format("%H:%M:%S"), stale)?;
        }
        writeln!(f)?;
        writeln!(f, "Sentiment distribution")?;
        for sentiment in Sentiment::ALL {
            let count = summary.sentiment_distribution.get(&sentiment).copied().unwrap_or(0);
            writeln!(
                f,
                "  {:<10} {:>5.1}%  ({})",
                sentiment.as_str(),
                sentiment_percentage(summary, sentiment),
                count
            )?;
        }

        let rows = department_rows(summary);
        if !rows.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "  {:<18} {:>8} {:>8} {:>8} {:>6}",
                "Department", "Positive", "Neutral", "Negative", "Total"
            )?;
            for row in rows {
                writeln!(
                    f,
                    "  {:<18} {:>8} {:>8} {:>8} {:>6}",
                    row.name, row.positive, row.neutral, row.negative, row.total
                )?;
            }
        }

        let timeline = timeline_rows(&summary.sentiment_timeline);
        if !timeline.is_empty() {
            writeln!(f)?;
            writeln!(f, "Last 7 days (positive/neutral/negative)")?;
            for day in timeline {
                writeln!(f, "  {}  {}/{}/{}", day.label, day.positive, day.neutral, day.negative)?;
            }
        }
        Ok(())
    }

    fn write_insights(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Actionable insights")?;
        match insights_view(&self.state.insights) {
            InsightsView::Loading => writeln!(f, "  (not loaded)"),
            InsightsView::Unavailable(err) => writeln!(f, "  Insights unavailable: {}", err),
            InsightsView::NoIssues => writeln!(f, "  {} {}", NO_ISSUES_TITLE, NO_ISSUES_BODY),
            InsightsView::Issues(insights) => {
                for insight in insights {
                    writeln!(
                        f,
                        "  [{}] {}: {}",
                        priority_badge(&insight.priority),
                        insight.category,
                        insight.description
                    )?;
                    let affected = insight.affected_departments.join(", ");
                    writeln!(f, "    Affected departments: {}", affected)?;
                    for action in &insight.suggested_actions {
                        writeln!(f, "    - {}", action)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn write_records(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = match records_view(self.state) {
            RecordsView::Loading => return writeln!(f, "Feedback records: (still loading)"),
            RecordsView::Table(rows) => rows,
        };

        if self.state.records.value().is_none() {
            let reason = self.state.records.last_error().unwrap_or("not loaded");
            return writeln!(f, "Feedback records unavailable: {}", reason);
        }

        writeln!(f, "Feedback records ({})", rows.len())?;
        for record in rows {
            writeln!(
                f,
                "  {:<10} {:<12} {:<18} {:<9} {:>7}  {}",
                date_display(&record.timestamp),
                employee_display(record.employee_id.as_deref()),
                record.department,
                record.sentiment.as_str(),
                confidence_display(record.confidence_score),
                excerpt(&record.feedback_text)
            )?;
        }
        Ok(())
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(EXCERPT_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Employee Sentiment Dashboard ({})", self.state.backend_label)?;
        writeln!(f, "{}", "=".repeat(40))?;
        self.write_summary(f)?;
        writeln!(f)?;
        self.write_insights(f)?;
        writeln!(f)?;
        self.write_records(f)?;

        if let Some(departments) = self.departments {
            writeln!(f)?;
            writeln!(f, "Departments with feedback: {}", departments.join(", "))?;
        }

        let problems: Vec<&str> = self
            .state
            .activity_log
            .iter()
            .filter(|entry| entry.level != LogLevel::Info)
            .map(|entry| entry.message.as_str())
            .collect();
        if !problems.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings")?;
            for message in problems {
                writeln!(f, "  {}", message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_record, server_error, summary_with};

    #[test]
    fn test_report_lists_every_section() {
        let mut state = DashboardState::new("http://localhost:8001/api");
        let token = state.summary.begin();
        state.summary.resolve::<String>(token, Ok(summary_with(10, 6, 3, 1)));
        let token = state.insights.begin();
        state.insights.resolve::<String>(token, Ok(Vec::new()));

        let mut record = sample_record("r-1", "Finance", Sentiment::Neutral);
        record.employee_id = None;
        record.confidence_score = None;
        let token = state.records.begin();
        state.records.resolve::<String>(token, Ok(vec![record]));

        let departments = vec!["Engineering".to_string(), "Finance".to_string()];
        let text = Report::new(&state).with_departments(&departments).to_string();

        assert!(text.contains("Total feedback: 10"));
        assert!(text.contains("Last refreshed: "));
        assert!(!text.contains("(stale)"));
        assert!(text.contains("Positive    60.0%  (6)"));
        assert!(text.contains("Great News!"));
        assert!(text.contains("Feedback records (1)"));
        assert!(text.contains("Anonymous"));
        assert!(text.contains("N/A"));
        assert!(text.contains("Departments with feedback: Engineering, Finance"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_report_explains_failures() {
        let mut state = DashboardState::new("test");
        let token = state.summary.begin();
        state.summary.resolve(token, Err(server_error()));
        let token = state.insights.begin();
        state.insights.resolve(token, Err(server_error()));
        state.add_log(LogLevel::Warn, "Failed to load summary: server returned 500");

        let text = Report::new(&state).to_string();
        assert!(text.contains("Summary unavailable: server returned 500"));
        assert!(text.contains("Insights unavailable"));
        assert!(text.contains("Feedback records unavailable: not loaded"));
        assert!(text.contains("Warnings"));
    }

    #[test]
    fn test_report_flags_stale_summary() {
        let mut state = DashboardState::new("test");
        let token = state.summary.begin();
        state.summary.resolve::<String>(token, Ok(summary_with(4, 1, 1, 2)));
        let token = state.summary.begin();
        state.summary.resolve(token, Err(server_error()));

        let text = Report::new(&state).to_string();
        assert!(text.contains("Total feedback: 4"));
        assert!(text.contains(" (stale)"));
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        let long = "x".repeat(100);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }
}
