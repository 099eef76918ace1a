use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Config;
use crate::db::Database;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database, config: &Config) -> Result<()> {
    let mut app = App::new(config.currency.clone(), config.export_dir.clone());
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    tracing::info!("terminal session started");
    let result = event_loop(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "terminal session failed");
        eprintln!("Error: {e:?}");
    }
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab, status and command bars plus the table border and header
            app.visible_rows = (f.area().height.saturating_sub(6) as usize).max(1);
            crate::ui::render::render(f, app);
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if app.show_help {
            app.show_help = false;
            continue;
        }
        match app.input_mode {
            InputMode::Normal => on_normal_key(key, app, db)?,
            InputMode::Command => on_command_key(key, app, db)?,
            InputMode::Search => on_search_key(key, app, db)?,
            InputMode::Editing => on_edit_key(key, app, db)?,
            InputMode::Confirm => on_confirm_key(key, app, db)?,
        }
    }
    Ok(())
}

/// Applies a typing key to `buf`. Returns false for keys that are not typing.
fn type_into(buf: &mut String, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => buf.push(c),
        KeyCode::Backspace => {
            buf.pop();
        }
        _ => return false,
    }
    true
}

// ── Key handlers ─────────────────────────────────────────────

fn on_normal_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let half_page = (app.visible_rows / 2) as isize;
    let current = app.screen;
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Char('d') if ctrl => move_by(app, half_page),
        KeyCode::Char('u') if ctrl => move_by(app, -half_page),
        KeyCode::Char(':') => {
            app.command_input.clear();
            app.input_mode = InputMode::Command;
        }
        KeyCode::Char('/') => {
            app.search_input.clear();
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => move_by(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_by(app, -1),
        KeyCode::Char('g') => jump(app, false),
        KeyCode::Char('G') => jump(app, true),
        KeyCode::Char(n @ '1'..='4') => {
            let idx = n as usize - '1' as usize;
            show(app, db, Screen::all()[idx])?;
        }
        KeyCode::Tab => show(app, db, current.cycle(1))?,
        KeyCode::BackTab => show(app, db, current.cycle(-1))?,
        KeyCode::Char('H') => commands::handle_command("prev-month", app, db)?,
        KeyCode::Char('L') => commands::handle_command("next-month", app, db)?,
        KeyCode::Char('e') | KeyCode::Enter if current == Screen::Expenses => {
            commands::handle_command("edit", app, db)?;
        }
        KeyCode::Char('D') if current == Screen::Expenses => {
            commands::handle_command("delete", app, db)?;
        }
        KeyCode::Esc => {
            app.status_message.clear();
            if !app.search_input.is_empty() {
                app.search_input.clear();
                app.refresh_expenses(db)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn on_command_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        _ => {
            if type_into(&mut app.command_input, key) && app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
    }
    Ok(())
}

fn on_search_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.screen = Screen::Expenses;
            app.refresh_expenses(db)?;
        }
        KeyCode::Esc => {
            app.search_input.clear();
            app.input_mode = InputMode::Normal;
            app.refresh_expenses(db)?;
        }
        _ => {
            if type_into(&mut app.search_input, key) {
                // results follow every keystroke
                app.screen = Screen::Expenses;
                app.expense_index = 0;
                app.expense_scroll = 0;
                app.refresh_expenses(db)?;
            }
        }
    }
    Ok(())
}

fn on_edit_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let args = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            let Some(id) = app.editing_id.take() else {
                return Ok(());
            };
            if let Err(e) = commands::replace_expense(id, &args, app, db) {
                tracing::warn!(id, error = %e, "edit rejected");
                app.set_status(format!("Error: {e}"));
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.editing_id = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        _ => {
            type_into(&mut app.command_input, key);
        }
    }
    Ok(())
}

fn on_confirm_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    let pending = app.pending_action.take();
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();

    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        app.set_status("Cancelled");
        return Ok(());
    }
    if let Some(PendingAction::DeleteExpense { id, label }) = pending {
        let message = match db.delete_expense(id) {
            Ok(_) => format!("Deleted {label}"),
            Err(e) if e.is_not_found() => format!("Already gone: {label}"),
            Err(e) => return Err(e.into()),
        };
        app.refresh_all(db)?;
        app.set_status(message);
    }
    Ok(())
}

// ── Navigation ───────────────────────────────────────────────

fn show(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db),
        Screen::Expenses => app.refresh_expenses(db),
        Screen::Materials => app.refresh_materials(db),
        Screen::Categories => app.refresh_categories(db),
    }
}

/// Cursor, scroll offset and length of the list on the current screen.
fn cursor(app: &mut App) -> Option<(&mut usize, &mut usize, usize)> {
    match app.screen {
        Screen::Dashboard => None,
        Screen::Expenses => Some((
            &mut app.expense_index,
            &mut app.expense_scroll,
            app.expenses.len(),
        )),
        Screen::Materials => Some((
            &mut app.material_index,
            &mut app.material_scroll,
            app.materials.len(),
        )),
        Screen::Categories => Some((
            &mut app.category_index,
            &mut app.category_scroll,
            app.categories.len(),
        )),
    }
}

/// Moves the cursor `rows` down (negative for up), keeping it on screen.
fn move_by(app: &mut App, rows: isize) {
    let page = app.visible_rows.max(1);
    let Some((index, scroll, len)) = cursor(app) else {
        return;
    };
    for _ in 0..rows.unsigned_abs() {
        if rows > 0 {
            scroll_down(index, scroll, len, page);
        } else {
            scroll_up(index, scroll);
        }
    }
}

fn jump(app: &mut App, to_bottom: bool) {
    let page = app.visible_rows.max(1);
    if let Some((index, scroll, len)) = cursor(app) {
        if to_bottom {
            scroll_to_bottom(index, scroll, len, page);
        } else {
            scroll_to_top(index, scroll);
        }
    }
}
