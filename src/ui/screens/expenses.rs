use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_quantity, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Expenses ({}){} ", app.expenses.len(), filter_label(app));

    if app.expenses.is_empty() {
        let hint = if app.filter().is_empty() {
            "Add one with :add date=.. category=.. qty=.. unit=.. price=.. paid=.."
        } else {
            "Press Esc to clear the search, :month and :category to clear filters"
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No expenses to show", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(title, theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = [
        "#", "Date", "Category", "Qty", "Unit", "Price", "Total", "Paid", "Balance", "Status",
        "Note",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, e)| {
            let figures = e.figures();
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let note = figures
                .advance_note
                .as_deref()
                .or((!e.description.is_empty()).then_some(e.description.as_str()))
                .unwrap_or("");

            Row::new(vec![
                Cell::from(e.id.to_string()),
                Cell::from(e.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(&e.category, 18)),
                Cell::from(format_quantity(e.quantity)),
                Cell::from(truncate(&e.unit_type, 8)),
                Cell::from(format_amount(e.unit_price)),
                Cell::from(format_amount(figures.total_cost)),
                Cell::from(format_amount(e.amount_paid)),
                Cell::from(Span::styled(
                    format_amount(figures.remaining_balance),
                    theme::balance_style(figures.remaining_balance),
                )),
                Cell::from(Span::styled(
                    figures.status.to_string(),
                    theme::status_style(figures.status),
                )),
                Cell::from(truncate(note, 30)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Min(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(8),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(title, theme::title_style())),
    );

    f.render_widget(table, area);
}

fn filter_label(app: &App) -> String {
    let filter = app.filter();
    let mut parts = Vec::new();
    if let Some(m) = &filter.month {
        parts.push(format!("month: {m}"));
    }
    if let Some(c) = &filter.category {
        parts.push(format!("category: {c}"));
    }
    if let Some(s) = &filter.search {
        parts.push(format!("search: '{s}'"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" {}", parts.join(", "))
    }
}
