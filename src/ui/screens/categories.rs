use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_money, format_quantity, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(area);

    render_table(f, chunks[0], app);
    render_selected(f, chunks[1], app);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Categories ({}) ", app.categories.len()),
            theme::title_style(),
        ));

    if app.categories.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No categories yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        [
            "Category", "Quantity", "Unit", "Entries", "Total Cost", "Paid", "Balance", "Advance",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, c)| {
            let style = if i == app.category_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&c.category, 22)),
                Cell::from(format_quantity(c.total_quantity)),
                Cell::from(c.unit_type.clone()),
                Cell::from(c.entry_count.to_string()),
                Cell::from(format_amount(c.total_expense)),
                Cell::from(format_amount(c.total_paid)),
                Cell::from(Span::styled(
                    format_amount(c.remaining_balance),
                    theme::balance_style(c.remaining_balance),
                )),
                Cell::from(format_amount(c.total_advance)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(13),
        Constraint::Length(12),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

/// Share of the overall cost taken by the highlighted category.
fn render_selected(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Share of Total Cost ", theme::title_style()));

    let Some(selected) = app.categories.get(app.category_index) else {
        f.render_widget(block, area);
        return;
    };

    let total: Decimal = app.categories.iter().map(|c| c.total_expense).sum();
    let ratio = if total.is_zero() {
        0.0
    } else {
        (selected.total_expense / total).to_f64().unwrap_or(0.0)
    };

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme::ACCENT)
                .bg(theme::SURFACE)
                .add_modifier(Modifier::BOLD),
        )
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{} ({}): {} of {} ({:.1}%)",
            selected.category,
            selected.unit_type,
            format_money(selected.total_expense, &app.currency),
            format_money(total, &app.currency),
            ratio * 100.0
        ));

    f.render_widget(gauge, area);
}
