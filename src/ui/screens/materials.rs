use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_quantity, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Material Totals ({}) ", app.materials.len()),
            theme::title_style(),
        ));

    if app.materials.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No materials purchased yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        [
            "Material",
            "Quantity",
            "Unit",
            "Entries",
            "Total Cost",
            "Total Paid",
            "Advance",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let page = area.height.saturating_sub(4) as usize;
    let mut rows: Vec<Row> = app
        .materials
        .iter()
        .enumerate()
        .skip(app.material_scroll)
        .take(page)
        .map(|(i, m)| {
            let style = if i == app.material_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let advance_style = if m.total_advance > Decimal::ZERO {
                Style::default().fg(theme::PEACH)
            } else {
                theme::dim_style()
            };
            Row::new(vec![
                Cell::from(truncate(&m.category, 24)),
                Cell::from(format_quantity(m.total_quantity)),
                Cell::from(m.unit_type.clone()),
                Cell::from(m.entry_count.to_string()),
                Cell::from(format_amount(m.total_cost)),
                Cell::from(format_amount(m.total_paid)),
                Cell::from(Span::styled(format_amount(m.total_advance), advance_style)),
            ])
            .style(style)
        })
        .collect();

    let sum = |field: fn(&crate::models::MaterialTotal) -> Decimal| {
        app.materials.iter().map(field).sum::<Decimal>()
    };
    rows.push(
        Row::new(vec![
            Cell::from("GRAND TOTAL"),
            Cell::from(""),
            Cell::from(""),
            Cell::from(
                app.materials
                    .iter()
                    .map(|m| m.entry_count)
                    .sum::<usize>()
                    .to_string(),
            ),
            Cell::from(format_amount(sum(|m| m.total_cost))),
            Cell::from(format_amount(sum(|m| m.total_paid))),
            Cell::from(format_amount(sum(|m| m.total_advance))),
        ])
        .style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    );

    let widths = [
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(15),
        Constraint::Length(15),
        Constraint::Length(13),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
