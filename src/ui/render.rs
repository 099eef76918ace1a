use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::screens;
use super::theme;

/// Key bindings listed in the help popup, two per row.
const KEYS: &[(&str, &str)] = &[
    ("j/k, Up/Down", "Move cursor"),
    ("1-4", "Switch tabs"),
    ("Tab/Shift-Tab", "Cycle tabs"),
    ("g/G", "Top/Bottom"),
    ("H/L", "Prev/Next month"),
    ("Ctrl-d/u", "Half page down/up"),
    (":", "Command mode"),
    ("/", "Live search"),
    ("e, Enter", "Edit expense"),
    ("D", "Delete expense"),
    ("Esc", "Cancel/Clear"),
    ("Ctrl-q", "Quit"),
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let [tabs, body, status, command] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_tabs(f, tabs, app.screen);
    match app.screen {
        Screen::Dashboard => screens::dashboard::render(f, body, app),
        Screen::Expenses => screens::expenses::render(f, body, app),
        Screen::Materials => screens::materials::render(f, body, app),
        Screen::Categories => screens::categories::render(f, body, app),
    }
    render_status_bar(f, status, app);
    render_command_bar(f, command, app);

    if app.show_help {
        render_help(f, f.area());
    }
}

fn render_tabs(f: &mut Frame, area: Rect, current: Screen) {
    let titles = Screen::all().iter().enumerate().map(|(i, &screen)| {
        let label_style = if screen == current {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        Line::from(vec![
            Span::styled(format!("{}:", i + 1), theme::dim_style()),
            Span::styled(screen.to_string(), label_style),
        ])
    });

    let selected = Screen::all().iter().position(|&s| s == current);
    let tabs = Tabs::new(titles)
        .select(selected.unwrap_or(0))
        .highlight_style(Style::default())
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(tabs, area);
}

fn mode_color(mode: InputMode) -> Color {
    match mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Search => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    }
}

fn screen_hints(screen: Screen) -> &'static str {
    match screen {
        Screen::Dashboard => " :add | :export | ? help ",
        Screen::Expenses => " e edit | D delete | H/L month | / search | ? help ",
        Screen::Materials => " :export-materials | ? help ",
        Screen::Categories => " :category NAME | ? help ",
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode = format!(" {} ", app.input_mode);
    let info = format!(
        " {} | {} | {} entries | {}",
        app.screen,
        app.month_filter.as_deref().unwrap_or("all months"),
        app.expense_count,
        app.currency
    );
    let hints = screen_hints(app.screen);
    let pad = (area.width as usize).saturating_sub(mode.len() + info.len() + hints.len());

    let chip = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_color(app.input_mode))
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(mode, chip),
        Span::raw(info),
        Span::raw(" ".repeat(pad)),
        Span::raw(hints),
    ]);
    f.render_widget(Paragraph::new(line).style(theme::status_bar_style()), area);
}

/// A prompt followed by the text being typed; returns the line and the cursor column.
fn prompt_line<'a>(prompt: &'a str, color: Color, text: &'a str) -> (Line<'a>, u16) {
    let column = (prompt.chars().count() + text.chars().count()) as u16;
    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(color)),
        Span::styled(text, theme::command_bar_style()),
    ]);
    (line, column)
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (line, cursor) = match app.input_mode {
        InputMode::Command => {
            let (line, col) = prompt_line(":", theme::ACCENT, &app.command_input);
            (line, Some(col))
        }
        InputMode::Editing => {
            let (line, col) = prompt_line("edit> ", theme::GREEN, &app.command_input);
            (line, Some(col))
        }
        InputMode::Search => {
            let (mut line, col) = prompt_line("/", theme::YELLOW, &app.search_input);
            if !app.search_input.is_empty() {
                line.push_span(Span::styled(
                    format!("  ({} matches)", app.expenses.len()),
                    theme::dim_style(),
                ));
            }
            (line, Some(col))
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(app.confirm_message.as_str(), Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal if app.status_message.is_empty() => (
            Line::styled(" Press : for commands, / to search, ? for help", theme::dim_style()),
            None,
        ),
        InputMode::Normal => (
            Line::styled(app.status_message.as_str(), theme::command_bar_style()),
            None,
        ),
    };

    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme::COMMAND_BG)),
        area,
    );
    if let Some(col) = cursor {
        f.set_cursor_position((area.x + col, area.y));
    }
}

fn heading(title: &str) -> Line<'_> {
    Line::styled(
        title,
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    )
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(
            " SiteBook Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        heading(" Keys"),
    ];
    for pair in KEYS.chunks(2) {
        let row: String = pair
            .iter()
            .map(|(key, what)| format!("  {key:<14} {what:<22}"))
            .collect();
        lines.push(Line::styled(row, theme::normal_style()));
    }

    lines.push(Line::default());
    lines.push(heading(" Commands"));
    // One row per command, under its longest name
    let mut by_description: BTreeMap<&str, &str> = BTreeMap::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        let entry = by_description.entry(cmd.description).or_insert(name);
        if name.len() > entry.len() {
            *entry = name;
        }
    }
    let mut rows: Vec<(&str, &str)> = by_description
        .into_iter()
        .map(|(description, name)| (name, description))
        .collect();
    rows.sort_unstable();
    for (name, description) in rows {
        lines.push(Line::styled(
            format!("  :{name:<18} {description}"),
            theme::normal_style(),
        ));
    }

    lines.push(Line::default());
    lines.push(Line::styled(" Press any key to close ", theme::dim_style()));
    lines
}

fn render_help(f: &mut Frame, area: Rect) {
    let lines = help_lines();
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 100.min(area.width.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::HEADER_BG)),
        ),
        popup,
    );
}
