// services/sentiment-dash/src/ui.rs
//
// Terminal rendering. Every function here only reads dashboard state.

use ratatui::{
    prelude::*,
    widgets::*,
};

use svckit::types::{DashboardSummary, Priority, Sentiment};

use crate::presenter::{
    confidence_display, date_display, department_rows, employee_display, format_number,
    header_total, insights_view, priority_badge, records_view, sentiment_percentage, timeline_rows,
    InsightsView, RecordsView, NO_ISSUES_BODY, NO_ISSUES_TITLE,
};
use crate::state::{
    ActiveView, Connection, DashboardState, FormField, LogLevel, NoticeLevel, Phase, Slot,
};

// Color palette: Red, White, Silver, Gold
mod colors {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(220, 50, 47);
    pub const DARK_RED: Color = Color::Rgb(139, 0, 0);
    pub const WHITE: Color = Color::Rgb(253, 246, 227);
    pub const SILVER: Color = Color::Rgb(147, 161, 161);
    pub const GOLD: Color = Color::Rgb(255, 193, 37);
    pub const DARK_GOLD: Color = Color::Rgb(184, 134, 11);
    pub const ORANGE: Color = Color::Rgb(203, 75, 22);
    pub const BG_DARK: Color = Color::Rgb(0, 20, 30);
    pub const BG_PANEL: Color = Color::Rgb(7, 30, 41);
    pub const SUCCESS: Color = Color::Rgb(133, 153, 0);
    pub const ERROR: Color = Color::Rgb(220, 50, 47);
}

fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => colors::SUCCESS,
        Sentiment::Neutral => colors::GOLD,
        Sentiment::Negative => colors::RED,
    }
}

fn priority_color(priority: &Priority) -> Color {
    match priority {
        Priority::Critical => colors::RED,
        Priority::High => colors::ORANGE,
        Priority::Other(_) => colors::GOLD,
    }
}

fn panel(title: &str, title_color: Color, border_color: Color) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(title_color).bold()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL))
}

/// Suffix for panel titles whose data failed to refresh.
fn stale_marker<T>(slot: &Slot<T>) -> &'static str {
    if slot.phase() == Phase::ErrorStale && slot.value().is_some() {
        "[STALE] "
    } else if slot.is_loading() && slot.value().is_some() {
        "[REFRESHING] "
    } else {
        ""
    }
}

pub fn draw_ui(frame: &mut Frame, state: &DashboardState, demo_mode: bool) {
    let area = frame.area();

    // Background
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG_DARK)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(10),   // Active view
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], state, demo_mode);
    draw_tabs(frame, chunks[1], state);

    match state.view {
        ActiveView::Overview => draw_overview(frame, chunks[2], state),
        ActiveView::Detailed => draw_detailed(frame, chunks[2], state),
        ActiveView::Insights => draw_insights(frame, chunks[2], state),
        ActiveView::Submit => draw_submit_form(frame, chunks[2], state),
    }

    draw_notice(frame, chunks[3], state);
    draw_footer(frame, chunks[4], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DashboardState, demo_mode: bool) {
    let (mode_text, mode_color) = if demo_mode {
        ("DEMO", colors::GOLD)
    } else {
        match state.connection {
            Connection::Connected => ("CONNECTED", colors::SUCCESS),
            Connection::Disconnected => ("DISCONNECTED", colors::RED),
            Connection::Unknown => ("CONNECTING", colors::SILVER),
        }
    };

    let title = Line::from(vec![
        Span::styled(
            " EMPLOYEE SENTIMENT ",
            Style::default().fg(colors::WHITE).bg(colors::DARK_RED).bold(),
        ),
        Span::raw("  "),
        Span::styled("DASHBOARD", Style::default().fg(colors::GOLD).bold()),
        Span::raw("  "),
        Span::styled(format!("[{}]", mode_text), Style::default().fg(mode_color).bold()),
        Span::raw("  "),
        Span::styled(
            format!("{} feedback entries", format_number(header_total(state))),
            Style::default().fg(colors::SILVER),
        ),
    ]);

    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(colors::DARK_RED))
                .style(Style::default().bg(colors::BG_DARK)),
        );

    frame.render_widget(header, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let titles: Vec<Line> = ActiveView::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {} {} ", i + 1, view.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.view.index())
        .style(Style::default().fg(colors::SILVER).bg(colors::BG_DARK))
        .highlight_style(Style::default().fg(colors::BG_DARK).bg(colors::GOLD).bold())
        .divider(Span::styled("|", Style::default().fg(colors::DARK_GOLD)));

    frame.render_widget(tabs, area);
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn draw_overview(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stats
            Constraint::Length(5), // Distribution
            Constraint::Min(8),    // Departments + timeline/activity
        ])
        .split(area);

    match state.summary.value() {
        Some(summary) => {
            draw_stats_panel(frame, chunks[0], summary);
            draw_distribution(frame, chunks[1], summary, stale_marker(&state.summary));
        }
        None => {
            let message = match state.summary.last_error() {
                Some(err) => format!("Dashboard data unavailable: {}", err),
                None => "Loading dashboard data...".to_string(),
            };
            let placeholder = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors::SILVER))
                .block(panel(" SUMMARY ", colors::WHITE, colors::SILVER));
            let merged = Rect {
                height: chunks[0].height + chunks[1].height,
                ..chunks[0]
            };
            frame.render_widget(placeholder, merged);
        }
    }

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(4)])
        .split(lower[1]);

    let empty = DashboardSummary::default();
    let summary = state.summary.value().unwrap_or(&empty);
    draw_department_panel(frame, lower[0], summary);
    draw_timeline_panel(frame, right[0], summary);
    draw_activity_panel(frame, right[1], state);
}

fn draw_stats_panel(frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    draw_stat_box(
        frame,
        chunks[0],
        "TOTAL FEEDBACK",
        &format_number(summary.total_feedback),
        colors::WHITE,
    );

    for (chunk, sentiment) in chunks[1..].iter().zip(Sentiment::ALL) {
        draw_stat_box(
            frame,
            *chunk,
            &sentiment.as_str().to_uppercase(),
            &format!("{:.1}%", sentiment_percentage(summary, sentiment)),
            sentiment_color(sentiment),
        );
    }
}

fn draw_stat_box(frame: &mut Frame, area: Rect, label: &str, value: &str, value_color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(
            label,
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            value,
            Style::default().fg(value_color).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn draw_distribution(frame: &mut Frame, area: Rect, summary: &DashboardSummary, marker: &str) {
    let title = format!(" SENTIMENT DISTRIBUTION {}", marker);
    let block = panel(&title, colors::GOLD, colors::DARK_GOLD);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 3])
        .split(inner);

    for (row, sentiment) in rows.iter().zip(Sentiment::ALL) {
        let pct = sentiment_percentage(summary, sentiment);
        let count = summary.sentiment_distribution.get(&sentiment).copied().unwrap_or(0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(sentiment_color(sentiment)).bg(colors::BG_DARK))
            .percent((pct.round() as u16).min(100))
            .label(format!("{} {:.1}% ({})", sentiment, pct, count));
        frame.render_widget(gauge, *row);
    }
}

fn draw_department_panel(frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
    let header_style = Style::default().fg(colors::GOLD).bold();

    let rows: Vec<Row> = department_rows(summary)
        .into_iter()
        .map(|row| {
            let mut cells = vec![Cell::from(Span::styled(
                row.name.clone(),
                Style::default().fg(colors::WHITE),
            ))];
            for sentiment in Sentiment::ALL {
                cells.push(Cell::from(Span::styled(
                    row.count(sentiment).to_string(),
                    Style::default().fg(sentiment_color(sentiment)),
                )));
            }
            cells.push(Cell::from(Span::styled(
                row.total.to_string(),
                Style::default().fg(colors::WHITE).bold(),
            )));
            Row::new(cells)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(18),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from(Span::styled("DEPARTMENT", header_style)),
            Cell::from(Span::styled("POSITIVE", header_style)),
            Cell::from(Span::styled("NEUTRAL", header_style)),
            Cell::from(Span::styled("NEGATIVE", header_style)),
            Cell::from(Span::styled("TOTAL", header_style)),
        ])
        .bottom_margin(1),
    )
    .block(panel(" DEPARTMENT BREAKDOWN ", colors::WHITE, colors::SILVER));

    frame.render_widget(table, area);
}

fn draw_timeline_panel(frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
    let header_style = Style::default().fg(colors::GOLD).bold();

    let rows: Vec<Row> = timeline_rows(&summary.sentiment_timeline)
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(Span::styled(row.label, Style::default().fg(colors::SILVER))),
                Cell::from(Span::styled(
                    row.positive.to_string(),
                    Style::default().fg(colors::SUCCESS),
                )),
                Cell::from(Span::styled(
                    row.neutral.to_string(),
                    Style::default().fg(colors::GOLD),
                )),
                Cell::from(Span::styled(
                    row.negative.to_string(),
                    Style::default().fg(colors::RED),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(Row::new(vec![
        Cell::from(Span::styled("DAY", header_style)),
        Cell::from(Span::styled("POSITIVE", header_style)),
        Cell::from(Span::styled("NEUTRAL", header_style)),
        Cell::from(Span::styled("NEGATIVE", header_style)),
    ]))
    .block(panel(" LAST 7 DAYS ", colors::WHITE, colors::SILVER));

    frame.render_widget(table, area);
}

fn draw_activity_panel(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let logs: Vec<Line> = state
        .activity_log
        .iter()
        .rev()
        .take(20)
        .map(|entry| {
            let (prefix, color) = match entry.level {
                LogLevel::Error => ("[ERR]", colors::ERROR),
                LogLevel::Warn => ("[WRN]", colors::GOLD),
                LogLevel::Info => ("[INF]", colors::SUCCESS),
            };

            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(entry.message.as_str(), Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(logs)
        .block(panel(" ACTIVITY LOG ", colors::WHITE, colors::SILVER))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Detailed analysis
// ---------------------------------------------------------------------------

fn draw_detailed(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    draw_filter_bar(frame, chunks[0], state);
    draw_records(frame, chunks[1], state);
}

fn draw_filter_bar(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let filters = &state.filters;
    let label = Style::default().fg(colors::SILVER);
    let value = Style::default().fg(colors::WHITE).bold();
    let date = |d: Option<chrono::NaiveDate>| d.map_or("-".to_string(), |d| d.to_string());

    let criteria = Line::from(vec![
        Span::styled("Department: ", label),
        Span::styled(
            filters.department.map_or("All Departments", |d| d.as_str()),
            value,
        ),
        Span::raw("  |  "),
        Span::styled("Sentiment: ", label),
        Span::styled(
            filters.sentiment.map_or("All Sentiments", |s| s.as_str()),
            value,
        ),
        Span::raw("  |  "),
        Span::styled("From: ", label),
        Span::styled(date(filters.start_date), value),
        Span::raw("  "),
        Span::styled("To: ", label),
        Span::styled(date(filters.end_date), value),
    ]);

    let status = if state.filters != state.records_filters {
        Line::from(Span::styled(
            "Filters changed - press Enter to apply",
            Style::default().fg(colors::GOLD),
        ))
    } else {
        Line::from(Span::styled(
            "Filters applied",
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        ))
    };

    let paragraph = Paragraph::new(vec![criteria, status])
        .block(panel(" FILTERS ", colors::GOLD, colors::DARK_GOLD));
    frame.render_widget(paragraph, area);
}

fn draw_records(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = match records_view(state) {
        RecordsView::Loading => {
            let loading = Paragraph::new("Loading feedback...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors::SILVER))
                .block(panel(" EMPLOYEE FEEDBACK DATA ", colors::WHITE, colors::SILVER));
            frame.render_widget(loading, area);
            return;
        }
        RecordsView::Table(rows) => rows,
    };

    if state.records.value().is_none() {
        let message = match state.records.last_error() {
            Some(err) => format!("Feedback unavailable: {}", err),
            None => "No feedback loaded yet".to_string(),
        };
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors::SILVER))
            .block(panel(" EMPLOYEE FEEDBACK DATA ", colors::WHITE, colors::SILVER));
        frame.render_widget(placeholder, area);
        return;
    }

    let header_style = Style::default().fg(colors::GOLD).bold();
    let count = rows.len();

    let table_rows: Vec<Row> = rows
        .into_iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(Span::styled(
                    date_display(&record.timestamp),
                    Style::default().fg(colors::SILVER),
                )),
                Cell::from(Span::styled(
                    employee_display(record.employee_id.as_deref()),
                    Style::default().fg(colors::WHITE),
                )),
                Cell::from(Span::styled(
                    record.department.as_str(),
                    Style::default().fg(colors::SILVER),
                )),
                Cell::from(Span::styled(
                    record.sentiment.as_str(),
                    Style::default().fg(sentiment_color(record.sentiment)).bold(),
                )),
                Cell::from(Span::styled(
                    confidence_display(record.confidence_score),
                    Style::default().fg(colors::SILVER),
                )),
                Cell::from(Span::styled(
                    record.feedback_text.as_str(),
                    Style::default().fg(colors::WHITE),
                )),
            ])
        })
        .collect();

    let title = format!(
        " EMPLOYEE FEEDBACK DATA ({}) {}",
        count,
        stale_marker(&state.records)
    );

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from(Span::styled("DATE", header_style)),
            Cell::from(Span::styled("EMPLOYEE ID", header_style)),
            Cell::from(Span::styled("DEPARTMENT", header_style)),
            Cell::from(Span::styled("SENTIMENT", header_style)),
            Cell::from(Span::styled("CONFIDENCE", header_style)),
            Cell::from(Span::styled("FEEDBACK", header_style)),
        ])
        .bottom_margin(1),
    )
    .block(panel(&title, colors::WHITE, colors::SILVER))
    .row_highlight_style(Style::default().bg(colors::BG_DARK));

    frame.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

fn draw_insights(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let title = format!(" ACTIONABLE INSIGHTS {}", stale_marker(&state.insights));
    let block = panel(&title, colors::GOLD, colors::DARK_GOLD);

    let lines: Vec<Line> = match insights_view(&state.insights) {
        InsightsView::Loading => vec![Line::from(Span::styled(
            "Loading insights...",
            Style::default().fg(colors::SILVER),
        ))],
        InsightsView::Unavailable(err) => vec![Line::from(Span::styled(
            format!("Insights unavailable: {}", err),
            Style::default().fg(colors::ERROR),
        ))],
        InsightsView::NoIssues => vec![
            Line::from(Span::styled(NO_ISSUES_TITLE, Style::default().fg(colors::SUCCESS).bold())),
            Line::from(Span::styled(NO_ISSUES_BODY, Style::default().fg(colors::SILVER))),
        ],
        InsightsView::Issues(insights) => {
            let mut lines = Vec::new();
            for insight in insights {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {} ", priority_badge(&insight.priority)),
                        Style::default()
                            .fg(colors::BG_DARK)
                            .bg(priority_color(&insight.priority))
                            .bold(),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        insight.category.as_str(),
                        Style::default().fg(colors::WHITE).bold(),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    insight.description.as_str(),
                    Style::default().fg(colors::WHITE),
                )));
                lines.push(Line::from(vec![
                    Span::styled("Affected Departments: ", Style::default().fg(colors::SILVER)),
                    Span::styled(
                        insight.affected_departments.join(", "),
                        Style::default().fg(colors::GOLD),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    "Suggested Actions:",
                    Style::default().fg(colors::SILVER),
                )));
                for action in &insight.suggested_actions {
                    lines.push(Line::from(Span::styled(
                        format!("  - {}", action),
                        Style::default().fg(colors::WHITE),
                    )));
                }
                lines.push(Line::from(""));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Submit feedback
// ---------------------------------------------------------------------------

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { colors::GOLD } else { colors::SILVER };
    panel(title, if focused { colors::GOLD } else { colors::WHITE }, border)
}

fn draw_submit_form(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Intro
            Constraint::Length(3), // Employee id
            Constraint::Length(3), // Department
            Constraint::Min(5),    // Feedback text
            Constraint::Length(1), // Status
        ])
        .split(area);

    let intro = Paragraph::new(concat!(
        "Help us understand your workplace experience. ",
        "Your feedback is classified by sentiment to generate insights.",
    ))
    .style(Style::default().fg(colors::SILVER))
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[0]);

    let draft = &state.draft;
    let focus = state.form_focus;

    let employee = if draft.employee_id.is_empty() && focus != FormField::EmployeeId {
        Span::styled(
            "e.g., EMP001 (leave blank for anonymous)",
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        )
    } else {
        Span::styled(draft.employee_id.as_str(), Style::default().fg(colors::WHITE))
    };
    frame.render_widget(
        Paragraph::new(Line::from(employee))
            .block(field_block(" Employee ID (Optional) ", focus == FormField::EmployeeId)),
        chunks[1],
    );

    let department = Line::from(vec![
        Span::styled("< ", Style::default().fg(colors::DARK_GOLD)),
        Span::styled(draft.department.as_str(), Style::default().fg(colors::WHITE).bold()),
        Span::styled(" >", Style::default().fg(colors::DARK_GOLD)),
    ]);
    frame.render_widget(
        Paragraph::new(department)
            .block(field_block(" Department * ", focus == FormField::Department)),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new(draft.feedback_text.as_str())
            .style(Style::default().fg(colors::WHITE))
            .wrap(Wrap { trim: false })
            .block(field_block(" Your Feedback * ", focus == FormField::FeedbackText)),
        chunks[3],
    );

    let status = if state.submitting {
        Span::styled("Submitting feedback...", Style::default().fg(colors::GOLD).bold())
    } else {
        Span::styled(
            "Press Enter to submit feedback",
            Style::default().fg(colors::SILVER),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[4]);
}

fn draw_notice(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let Some(notice) = &state.notice else {
        return;
    };

    let color = match notice.level {
        NoticeLevel::Success => colors::SUCCESS,
        NoticeLevel::Failure => colors::ERROR,
        NoticeLevel::Invalid => colors::GOLD,
    };
    let line = Line::from(Span::styled(
        notice.message.as_str(),
        Style::default().fg(color).bold(),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let key = |label: &'static str, bg: Color| {
        Span::styled(label, Style::default().fg(colors::BG_DARK).bg(bg))
    };
    let hint = |text: &'static str| Span::styled(text, Style::default().fg(colors::SILVER));

    let mut spans = match state.view {
        ActiveView::Submit => vec![
            key(" [ENTER] ", colors::GOLD),
            hint(" Submit "),
            Span::raw("  "),
            key(" [TAB] ", colors::WHITE),
            hint(" Next Field "),
            Span::raw("  "),
            key(" [LEFT/RIGHT] ", colors::SILVER),
            hint(" Department "),
            Span::raw("  "),
            key(" [ESC] ", colors::WHITE),
            hint(" Back "),
            Span::raw("  "),
        ],
        ActiveView::Detailed => vec![
            key(" [D] ", colors::GOLD),
            hint(" Department "),
            Span::raw("  "),
            key(" [S] ", colors::GOLD),
            hint(" Sentiment "),
            Span::raw("  "),
            key(" [C] ", colors::SILVER),
            hint(" Clear "),
            Span::raw("  "),
            key(" [ENTER] ", colors::WHITE),
            hint(" Apply Filters "),
            Span::raw("  "),
        ],
        ActiveView::Overview | ActiveView::Insights => vec![
            key(" [1-4] ", colors::WHITE),
            hint(" Views "),
            Span::raw("  "),
        ],
    };

    if state.view != ActiveView::Submit {
        spans.extend([
            key(" [R] ", colors::WHITE),
            hint(" Refresh "),
            Span::raw("  "),
            key(" [Q] ", colors::RED),
            hint(" Quit "),
        ]);
    } else {
        spans.extend([key(" [CTRL+C] ", colors::RED), hint(" Quit ")]);
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(colors::DARK_RED))
                .style(Style::default().bg(colors::BG_DARK)),
        );

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_record, server_error, summary_with};
    use ratatui::backend::TestBackend;
    use svckit::types::Insight;

    fn render(state: &DashboardState, demo_mode: bool) -> String {
        let backend = TestBackend::new(140, 45);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw_ui(frame, state, demo_mode)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new("test");
        let token = state.summary.begin();
        state.summary.resolve::<String>(token, Ok(summary_with(10, 6, 3, 1)));

        let mut anonymous = sample_record("r-2", "HR", Sentiment::Negative);
        anonymous.employee_id = None;
        anonymous.confidence_score = None;
        let token = state.records.begin();
        let records = vec![sample_record("r-1", "Sales", Sentiment::Positive), anonymous];
        state.records.resolve::<String>(token, Ok(records));
        state
    }

    #[test]
    fn test_overview_renders_percentages() {
        let state = loaded_state();
        let screen = render(&state, false);
        assert!(screen.contains("TOTAL FEEDBACK"));
        assert!(screen.contains("60.0%"));
        assert!(screen.contains("10.0%"));
        assert!(screen.contains("DEPARTMENT BREAKDOWN"));
        assert!(screen.contains("Engineering"));
        assert!(screen.contains("CONNECTING"));
    }

    #[test]
    fn test_overview_before_first_load() {
        let mut state = DashboardState::new("test");
        state.summary.begin();
        let screen = render(&state, true);
        assert!(screen.contains("Loading dashboard data..."));
        assert!(screen.contains("[DEMO]"));
    }

    #[test]
    fn test_overview_marks_stale_summary() {
        let mut state = loaded_state();
        let token = state.summary.begin();
        state.summary.resolve(token, Err(server_error()));
        let screen = render(&state, false);
        assert!(screen.contains("[STALE]"));
        assert!(screen.contains("60.0%"));
    }

    #[test]
    fn test_detailed_view_loading_and_table() {
        let mut state = loaded_state();
        state.view = ActiveView::Detailed;

        let screen = render(&state, false);
        assert!(screen.contains("EMPLOYEE FEEDBACK DATA (2)"));
        assert!(screen.contains("Anonymous"));
        assert!(screen.contains("N/A"));
        assert!(screen.contains("90.0%"));
        assert!(screen.contains("All Departments"));

        state.records.begin();
        let screen = render(&state, false);
        assert!(screen.contains("Loading feedback..."));
    }

    #[test]
    fn test_insights_view_states() {
        let mut state = DashboardState::new("test");
        state.view = ActiveView::Insights;
        let token = state.insights.begin();
        state.insights.resolve::<String>(token, Ok(Vec::new()));
        assert!(render(&state, false).contains(NO_ISSUES_TITLE));

        let token = state.insights.begin();
        state.insights.resolve::<String>(
            token,
            Ok(vec![Insight {
                priority: Priority::High,
                category: "Department Morale".to_string(),
                description: "Sales department shows concerning sentiment patterns".to_string(),
                affected_departments: vec!["Sales".to_string()],
                suggested_actions: vec!["Schedule team meeting to address concerns".to_string()],
            }]),
        );
        let screen = render(&state, false);
        assert!(screen.contains("High Priority"));
        assert!(screen.contains("Department Morale"));
        assert!(!screen.contains(NO_ISSUES_TITLE));
    }

    #[test]
    fn test_submit_form_and_notice() {
        let mut state = DashboardState::new("test");
        state.view = ActiveView::Submit;
        state.draft.feedback_text = "Standups run long".to_string();
        state.raise_notice(NoticeLevel::Failure, "Error submitting feedback. Please try again.");

        let screen = render(&state, false);
        assert!(screen.contains("Employee ID (Optional)"));
        assert!(screen.contains("Standups run long"));
        assert!(screen.contains("< Engineering >"));
        assert!(screen.contains("Error submitting feedback. Please try again."));
    }
}
