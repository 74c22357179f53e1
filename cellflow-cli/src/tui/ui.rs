//! TUI rendering.

use cellflow::dataset::X_SPAN;
use cellflow::Snapshot;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Dataset as ChartDataset, Gauge, GraphType, Paragraph, Wrap,
};
use ratatui::Frame;

use super::state::App;
use crate::config::Keybindings;
use crate::render::{self, Section};

const BAR_BG: Color = Color::Rgb(35, 37, 42);

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, kb: &Keybindings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Slider
            Constraint::Min(10),        // Chart and statistics
            Constraint::Percentage(35), // Report
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_slider(frame, app, chunks[0]);
    render_chart(frame, app, middle[0]);
    render_statistics(frame, app, middle[1]);
    render_report(frame, app, chunks[2]);
    render_status_bar(frame, app, kb, chunks[3]);
}

fn render_slider(frame: &mut Frame, app: &App, area: Rect) {
    let config = &app.config;
    let label = format!(
        "Sample size: {}  ({}..{}, step {})",
        app.sample_size(),
        config.min_sample_size,
        config.max_sample_size,
        config.step
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::White))
                .title("sample_size "),
        )
        .gauge_style(Style::default().fg(Color::Blue).bg(BAR_BG))
        .ratio(app.slider_ratio())
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::White))
        .title("dataset ");

    let Some(snapshot) = &app.snapshot else {
        frame.render_widget(Paragraph::new("No data").block(block), area);
        return;
    };

    let points: Vec<(f64, f64)> = snapshot.dataset.iter().map(|p| (p.x, p.y)).collect();
    let fit_line: Vec<(f64, f64)> = snapshot
        .statistics
        .fit
        .map(|fit| vec![(0.0, fit.predict(0.0)), (X_SPAN, fit.predict(X_SPAN))])
        .unwrap_or_default();
    let (y_min, y_max) = y_bounds(snapshot);

    let mut datasets = vec![ChartDataset::default()
        .name(format!("n = {}", snapshot.dataset.len()))
        .marker(Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];
    if !fit_line.is_empty() {
        datasets.push(
            ChartDataset::default()
                .name("fit")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&fit_line),
        );
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("x")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, X_SPAN])
                .labels(axis_labels(0.0, X_SPAN)),
        )
        .y_axis(
            Axis::default()
                .title("y")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(axis_labels(y_min, y_max)),
        );

    frame.render_widget(chart, area);
}

/// Whole-number y bounds with one unit of headroom.
fn y_bounds(snapshot: &Snapshot) -> (f64, f64) {
    let stats = &snapshot.statistics;
    let low = (stats.min_y - 1.0).floor();
    let high = (stats.max_y + 1.0).ceil();
    if high > low {
        (low, high)
    } else {
        (low, low + 1.0)
    }
}

fn axis_labels(low: f64, high: f64) -> Vec<Line<'static>> {
    [low, (low + high) / 2.0, high]
        .iter()
        .map(|v| Line::from(format!("{v:.0}")))
        .collect()
}

fn render_statistics(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = match &app.snapshot {
        Some(snapshot) => render::statistics_lines(&snapshot.statistics)
            .into_iter()
            .map(Line::from)
            .collect(),
        None => vec![],
    };
    lines.push(Line::default());
    lines.extend(
        app.graph_lines
            .iter()
            .map(|l| Line::styled(l.clone(), Style::default().fg(Color::DarkGray))),
    );

    let stats = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP | Borders::LEFT)
            .border_style(Style::default().fg(Color::White))
            .title("statistics "),
    );

    frame.render_widget(stats, area);
}

fn render_report(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match &app.snapshot {
        Some(snapshot) => render::report_sections(&snapshot.report)
            .into_iter()
            .map(|(section, text)| Line::styled(text, section_style(section)))
            .collect(),
        None => vec![],
    };

    let report = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::White))
                .title("report "),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(report, area);
}

fn section_style(section: Section) -> Style {
    match section {
        Section::Title => Style::default().add_modifier(Modifier::BOLD),
        Section::Summary | Section::Range => Style::default(),
        Section::Note => Style::default().fg(Color::Blue),
        Section::Warning => Style::default().fg(Color::Yellow),
        Section::Insight => Style::default().fg(Color::Green),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, kb: &Keybindings, area: Rect) {
    let key = |binding: &crate::config::KeyBinding| {
        Span::styled(format!("[{}]", binding.primary()), Style::default().fg(Color::Cyan))
    };
    let help = vec![
        key(&kb.decrease),
        Span::raw("/"),
        key(&kb.increase),
        Span::raw(" Step  "),
        key(&kb.reseed),
        Span::raw(" Resample  "),
        key(&kb.reset),
        Span::raw(" Reset  "),
        key(&kb.view_report),
        Span::raw(" Report  "),
        key(&kb.quit),
        Span::raw(" Quit  "),
    ];

    let help_width: usize = help.iter().map(|s| s.width()).sum();

    let status = match (&app.error, &app.last_pass) {
        (Some(message), _) => Span::styled(
            format!("Error: {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        (None, Some(pass)) => Span::styled(
            render::pass_line(pass, app.show_timings),
            Style::default().fg(Color::Green),
        ),
        (None, None) => Span::styled("Ready", Style::default().fg(Color::Green)),
    };

    let bar_style = Style::default().bg(BAR_BG);

    // Left side: help keys.
    let left = Paragraph::new(Line::from(help)).style(bar_style);

    // Right side: pass status.
    let right = Paragraph::new(Line::from(vec![status]))
        .alignment(Alignment::Right)
        .style(bar_style);

    // Prioritize commands over status when space is limited.
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(help_width as u16), Constraint::Fill(1)])
        .split(area);

    frame.render_widget(left, chunks[0]);
    frame.render_widget(right, chunks[1]);
}
