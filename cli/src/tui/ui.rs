use bookdash_core::{summarize_lead_times, LeadTimeSummary};
use num_format::{Locale, ToFormattedString};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Padding, Paragraph, Row, Table},
};

use crate::tui::app::{App, Focus};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    kept: Color,
    cancelled: Color,
    accent: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    kept: Color::Green,
    cancelled: Color::Red,
    accent: Color::Yellow,
};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // KPI tiles
            Constraint::Min(12),   // Filters + Charts
            Constraint::Length(1), // Footer
        ])
        .split(size);

    draw_header(frame, app, main_layout[0]);
    draw_kpis(frame, app, main_layout[1]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Filter sidebar
            Constraint::Min(40),    // Charts
        ])
        .split(main_layout[2]);

    draw_filters(frame, app, content_chunks[0]);
    draw_charts(frame, app, content_chunks[1]);

    let help = Line::from(vec![
        Span::styled("TAB: ", Style::default().fg(THEME.muted)),
        Span::styled("Pane ", Style::default().fg(THEME.text)),
        Span::styled(" j/k: ", Style::default().fg(THEME.muted)),
        Span::styled("Move ", Style::default().fg(THEME.text)),
        Span::styled(" SPACE: ", Style::default().fg(THEME.muted)),
        Span::styled("Toggle ", Style::default().fg(THEME.text)),
        Span::styled(" a: ", Style::default().fg(THEME.muted)),
        Span::styled("All ", Style::default().fg(THEME.text)),
        Span::styled(" q: ", Style::default().fg(THEME.muted)),
        Span::styled("Quit", Style::default().fg(THEME.text)),
    ]);
    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(1),
            Constraint::Length(34),
        ])
        .split(area);

    let app_title = Paragraph::new(Span::styled(
        "BOOKDASH",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let shown = app.data.kpis.total_bookings;
    let total = app.service.table().len();
    let scope = Line::from(vec![
        Span::styled(
            shown.to_formatted_string(&Locale::en),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" / {} bookings", total.to_formatted_string(&Locale::en)),
            Style::default().fg(THEME.muted),
        ),
    ]);
    let scope_widget = Paragraph::new(scope)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(scope_widget, header_layout[2]);

    frame.render_widget(header_block, area);
}

fn draw_kpis(frame: &mut Frame, app: &App, area: Rect) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let kpis = &app.data.kpis;
    kpi_tile(
        frame,
        tiles[0],
        " Total Bookings ",
        kpis.total_bookings.to_formatted_string(&Locale::en),
        THEME.primary,
    );
    kpi_tile(
        frame,
        tiles[1],
        " Cancelled ",
        kpis.cancelled_bookings.to_formatted_string(&Locale::en),
        THEME.cancelled,
    );
    kpi_tile(
        frame,
        tiles[2],
        " Cancellation Rate ",
        format!("{:.2}%", kpis.cancellation_rate),
        THEME.accent,
    );
    kpi_tile(
        frame,
        tiles[3],
        " Avg Lead Time ",
        format!("{:.1} days", kpis.avg_lead_time),
        THEME.kept,
    );
}

fn kpi_tile(frame: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ];
    let tile = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted)),
    );
    frame.render_widget(tile, area);
}

fn draw_filters(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let hotel_rows: Vec<Row> = app
        .service
        .table()
        .hotels
        .iter()
        .map(|hotel| check_row(app.selection.hotels.contains(hotel), hotel.clone()))
        .collect();
    let hotels = filter_list(hotel_rows, " Hotels ", app.focus == Focus::Hotels);
    frame.render_stateful_widget(hotels, chunks[0], &mut app.hotels_state);

    let year_rows: Vec<Row> = app
        .service
        .table()
        .years
        .iter()
        .map(|year| check_row(app.selection.years.contains(year), year.to_string()))
        .collect();
    let years = filter_list(year_rows, " Years ", app.focus == Focus::Years);
    frame.render_stateful_widget(years, chunks[1], &mut app.years_state);
}

fn check_row(selected: bool, label: String) -> Row<'static> {
    let (mark, style) = if selected {
        ("[x]", Style::default().fg(THEME.kept))
    } else {
        ("[ ]", Style::default().fg(THEME.muted))
    };
    Row::new(vec![
        Span::styled(mark, style),
        Span::styled(label, Style::default().fg(THEME.text)),
    ])
}

fn filter_list(rows: Vec<Row<'static>>, title: &'static str, focused: bool) -> Table<'static> {
    let border = if focused { THEME.primary } else { THEME.muted };
    Table::new(rows, [Constraint::Length(3), Constraint::Min(4)])
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ")
}

fn draw_charts(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);
    draw_monthly_chart(frame, app, top[0]);
    draw_hotel_chart(frame, app, top[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    draw_lead_time_panel(frame, app, bottom[0]);
    draw_country_chart(frame, app, bottom[1]);
}

fn draw_monthly_chart(frame: &mut Frame, app: &App, area: Rect) {
    let bars: Vec<Bar> = app
        .data
        .monthly
        .iter()
        .map(|entry| {
            Bar::default()
                .label(&entry.month.name()[..3])
                .value(entry.count)
                .style(Style::default().fg(THEME.primary))
                .text_value(if entry.count > 0 {
                    entry.count.to_string()
                } else {
                    String::new()
                })
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(" Monthly Booking Trend "))
        .bar_width(4)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_hotel_chart(frame: &mut Frame, app: &App, area: Rect) {
    // Rates are fractions; scale by 10x percent so one bar step is 0.1%
    // and the axis tops out at 100%.
    let bars: Vec<Bar> = app
        .data
        .by_hotel
        .iter()
        .map(|entry| {
            let pct = entry.rate * 100.0;
            Bar::default()
                .label(entry.hotel.as_str())
                .value((pct * 10.0) as u64)
                .style(Style::default().fg(THEME.cancelled))
                .text_value(format!("{:.1}%", pct))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(" Cancellation by Hotel "))
        .bar_width(14)
        .bar_gap(2)
        .max(1000)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_lead_time_panel(frame: &mut Frame, app: &App, area: Rect) {
    let kept = summarize_lead_times(&app.data.lead_times.kept);
    let cancelled = summarize_lead_times(&app.data.lead_times.cancelled);

    let mut text = vec![Line::from("")];
    text.extend(summary_lines("Not Cancelled", &kept, THEME.kept));
    text.push(Line::from(""));
    text.extend(summary_lines("Cancelled", &cancelled, THEME.cancelled));

    let panel = Paragraph::new(text).block(chart_block(" Lead Time vs Cancellation "));
    frame.render_widget(panel, area);
}

fn summary_lines(label: &'static str, summary: &LeadTimeSummary, color: Color) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                format!(" {:<14}", label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("n={}", summary.count.to_formatted_string(&Locale::en)),
                Style::default().fg(THEME.text),
            ),
        ]),
        Line::from(vec![
            Span::styled("   mean ", Style::default().fg(THEME.muted)),
            Span::raw(format!("{:.1}", summary.mean)),
            Span::styled("  median ", Style::default().fg(THEME.muted)),
            Span::raw(summary.median.to_string()),
        ]),
        Line::from(vec![
            Span::styled("   min ", Style::default().fg(THEME.muted)),
            Span::raw(summary.min.to_string()),
            Span::styled("  p25 ", Style::default().fg(THEME.muted)),
            Span::raw(summary.p25.to_string()),
            Span::styled("  p75 ", Style::default().fg(THEME.muted)),
            Span::raw(summary.p75.to_string()),
            Span::styled("  max ", Style::default().fg(THEME.muted)),
            Span::raw(summary.max.to_string()),
        ]),
    ]
}

fn draw_country_chart(frame: &mut Frame, app: &App, area: Rect) {
    let bars: Vec<Bar> = app
        .data
        .top_countries
        .iter()
        .map(|entry| {
            Bar::default()
                .label(entry.country.as_str())
                .value(entry.count)
                .style(Style::default().fg(THEME.accent))
                .text_value(entry.count.to_formatted_string(&Locale::en))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(" Top 10 Countries "))
        .bar_width(6)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn chart_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}
