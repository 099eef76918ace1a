use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_money;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Monthly chart
            Constraint::Length(3), // Payments sparkline
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_monthly_chart(f, chunks[1], app);
    render_paid_sparkline(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let s = &app.dashboard.summary;
    let balance_color = if s.remaining_balance > Decimal::ZERO {
        theme::YELLOW
    } else {
        theme::GREEN
    };

    render_card(
        f,
        cards[0],
        "Total Cost",
        format_money(s.total_cost, &app.currency),
        theme::ACCENT,
        format!("{} entries", s.total_entries),
    );
    render_card(
        f,
        cards[1],
        "Total Paid",
        format_money(s.total_paid, &app.currency),
        theme::GREEN,
        String::new(),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        format_money(s.remaining_balance, &app.currency),
        balance_color,
        "net of advances".into(),
    );
    render_card(
        f,
        cards[3],
        "Advance",
        format_money(s.total_advance, &app.currency),
        theme::PEACH,
        format!("{} overpaid", s.advance_entries),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    display: String,
    color: ratatui::style::Color,
    subtitle: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_monthly_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Monthly Expense ({}) ", app.currency),
            theme::title_style(),
        ));

    if app.dashboard.monthly.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses yet. Add one with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    // Stored most recent first; the chart reads left to right
    let bars: Vec<Bar> = app
        .dashboard
        .monthly
        .iter()
        .rev()
        .map(|m| {
            Bar::default()
                .value(m.total_expense.to_u64().unwrap_or(0))
                .text_value(short_amount(m.total_expense))
                .label(Line::from(m.month.clone()))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_paid_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .dashboard
        .monthly
        .iter()
        .rev()
        .map(|m| m.total_paid.to_u64().unwrap_or(0))
        .collect();

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(" Payments Trend ", theme::title_style())),
        )
        .data(&data)
        .style(Style::default().fg(theme::GREEN));

    f.render_widget(sparkline, area);
}

/// Compact bar label: `950`, `12.5k`, `3.2M`.
fn short_amount(val: Decimal) -> String {
    let v = val.to_f64().unwrap_or(0.0);
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}
