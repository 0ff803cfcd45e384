use std::{io, time::Duration};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, Gauge, Padding, Paragraph},
};
use sirme_core::service::period_stats::{client_breakdown, weekly_breakdown, ClientHours, WeeklyHours};
use sirme_core::time::{today, week_end, week_start};
use sirme_core::{TimeEntryRecord, ValidationRules};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    regular: Color,
    mps: Color,
    over: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    regular: Color::Green,
    mps: Color::Blue,
    over: Color::Red,
};

const EXPECTED_WEEK_HOURS: f64 = 40.0;

pub struct WeekView {
    pub hours: WeeklyHours,
    pub clients: Vec<ClientHours>,
}

pub struct DashboardApp {
    pub employee: String,
    pub weeks: Vec<WeekView>,
    pub current_week_index: usize,
    pub max_daily_hours: f64,
}

impl DashboardApp {
    /// One view per week from `employee`'s earliest record through the
    /// current week. Other employees' records are ignored.
    pub fn new(records: &[TimeEntryRecord], employee: &str, current: NaiveDate, rules: &ValidationRules) -> Self {
        let records: Vec<&TimeEntryRecord> = records.iter().filter(|r| r.employee_name == employee).collect();
        let first = records.iter().map(|r| r.date).min().unwrap_or(current).min(current);

        let mut weeks = Vec::new();
        let mut monday = week_start(first);
        while monday <= current {
            let sunday = week_end(monday);
            let in_week: Vec<TimeEntryRecord> = records
                .iter()
                .filter(|r| r.date >= monday && r.date <= sunday)
                .map(|r| (*r).clone())
                .collect();
            weeks.push(WeekView {
                hours: weekly_breakdown(&in_week, monday),
                clients: client_breakdown(&in_week),
            });
            monday = sunday + chrono::Duration::days(1);
        }

        let current_week_index = weeks.len().saturating_sub(1);
        Self {
            employee: employee.to_string(),
            weeks,
            current_week_index,
            max_daily_hours: rules.max_daily_hours,
        }
    }

    pub fn next_week(&mut self) {
        if !self.weeks.is_empty() && self.current_week_index < self.weeks.len() - 1 {
            self.current_week_index += 1;
        }
    }

    pub fn previous_week(&mut self) {
        if self.current_week_index > 0 {
            self.current_week_index -= 1;
        }
    }

    pub fn current_data(&self) -> Option<&WeekView> {
        self.weeks.get(self.current_week_index)
    }
}

pub fn run(records: &[TimeEntryRecord], employee: &str, rules: &ValidationRules) -> Result<()> {
    let mut app = DashboardApp::new(records, employee, today(), rules);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut DashboardApp) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Left | KeyCode::Char('h') => app.previous_week(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_week(),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + sidebar
            Constraint::Length(1), // Footer
        ])
        .split(size);

    let Some(view) = app.current_data() else {
        frame.render_widget(
            Paragraph::new("No data available").alignment(Alignment::Center),
            main_layout[1],
        );
        return;
    };

    // --- Header ---
    let title = format!(" {} · Week of {} ", app.employee, view.hours.week_start.format("%Y-%m-%d"));
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Min(1),
            Constraint::Length(48),
        ])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled("SIRME HOURS", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)))
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(if app.current_week_index > 0 { THEME.text } else { THEME.muted })),
        Span::styled(title, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(if app.current_week_index + 1 < app.weeks.len() { THEME.text } else { THEME.muted })),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);
    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    // --- Content ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Length(1),
            Constraint::Percentage(30),
        ])
        .split(main_layout[1]);

    draw_chart(frame, &view.hours, app.max_daily_hours, content_chunks[0]);
    draw_info_panel(frame, view, content_chunks[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("NAV: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(
        Paragraph::new(help).alignment(Alignment::Center).style(Style::default().fg(THEME.muted)),
        main_layout[2],
    );
}

fn draw_chart(frame: &mut Frame, week: &WeeklyHours, max_daily_hours: f64, area: Rect) {
    let mut bar_data = Vec::new();

    for day in &week.days {
        let regular = day.hours - day.mps_hours;

        // Regular hours carry the day label
        bar_data.push((day.day_of_week.clone(), (regular * 10.0).round() as u64, THEME.regular));
        bar_data.push(("".to_string(), (day.mps_hours * 10.0).round() as u64, THEME.mps));
        // Spacer
        bar_data.push(("".to_string(), 0, Color::Reset));
    }

    let bar_items: Vec<Bar> = bar_data.iter().map(|(label, value, color)| {
        Bar::default()
            .label(label.as_str())
            .value(*value)
            .style(Style::default().fg(*color))
            .text_value(if *value > 0 { format!("{:.1}", *value as f64 / 10.0) } else { "".to_string() })
    }).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Hours per Day (regular / MPS) "),
        )
        .bar_width(5)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bar_items))
        .max((max_daily_hours.min(12.0) * 10.0) as u64);

    frame.render_widget(chart, area);
}

/// Cuts `text` to `width` terminal columns.
fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn draw_info_panel(frame: &mut Frame, view: &WeekView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Totals
            Constraint::Min(3),    // Clients
            Constraint::Length(3), // Gauge
        ])
        .split(area);

    let week = &view.hours;
    let mps: f64 = week.days.iter().map(|d| d.mps_hours).sum();

    let info_text = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Regular: ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.2}h", week.total - mps), Style::default().fg(THEME.regular).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("MPS:     ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.2}h", mps), Style::default().fg(THEME.mps).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Total:   ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.2}h", week.total), Style::default().fg(THEME.text)),
        ]),
    ];
    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(info_block, chunks[0]);

    let name_width = (chunks[1].width as usize).saturating_sub(12).max(4);
    let client_lines: Vec<Line> = if view.clients.is_empty() {
        vec![Line::from(Span::styled("No entries", Style::default().fg(THEME.muted)))]
    } else {
        view.clients
            .iter()
            .map(|c| {
                Line::from(vec![
                    Span::styled(format!("{:<w$}", fit_width(&c.client_name, name_width), w = name_width), Style::default().fg(THEME.text)),
                    Span::styled(format!(" {:>6.2}h", c.hours), Style::default().fg(THEME.primary)),
                ])
            })
            .collect()
    };
    let clients = Paragraph::new(client_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Clients "),
    );
    frame.render_widget(clients, chunks[1]);

    let ratio = week.total / EXPECTED_WEEK_HOURS;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Week Progress ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(if ratio > 1.0 { THEME.over } else { THEME.regular }))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{:.0}% of {}h", ratio * 100.0, EXPECTED_WEEK_HOURS));
    frame.render_widget(gauge, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sirme_core::ProjectContribution;

    fn record(date: NaiveDate, hours: f64) -> TimeEntryRecord {
        let mut r = TimeEntryRecord::new("Ann", date);
        r.projects.push(ProjectContribution::new("Acme", "Web", hours));
        r
    }

    #[test]
    fn test_weeks_cover_history_to_today() {
        let current = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        let records = vec![record(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(), 6.0)];
        let mut app = DashboardApp::new(&records, "Ann", current, &ValidationRules::default());

        assert_eq!(app.weeks.len(), 3);
        assert_eq!(app.current_week_index, 2);
        assert_eq!(app.current_data().unwrap().hours.total, 0.0);

        app.previous_week();
        app.previous_week();
        app.previous_week();
        assert_eq!(app.current_week_index, 0);
        assert_eq!(app.current_data().unwrap().hours.total, 6.0);
        assert_eq!(app.current_data().unwrap().clients[0].client_name, "Acme");
    }

    #[test]
    fn test_only_selected_employee_counts() {
        let current = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let mut bob = record(date, 5.0);
        bob.employee_name = "Bob".to_string();
        let records = vec![record(date, 2.0), bob];

        let app = DashboardApp::new(&records, "Ann", current, &ValidationRules::default());
        assert_eq!(app.weeks.len(), 1);
        let view = app.current_data().unwrap();
        assert_eq!(view.hours.total, 2.0);
        assert_eq!(view.clients[0].hours, 2.0);
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("Acme", 10), "Acme");
        assert_eq!(fit_width("Globex Corporation", 8), "Globex …");
    }
}
