use anyhow::Result;
use std::path::PathBuf;

use crate::db::Database;
use crate::models::*;
use crate::ui::util::clamp_cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    Materials,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Expenses,
            Self::Materials,
            Self::Categories,
        ]
    }

    /// The screen `step` tabs away, wrapping at both ends.
    pub(crate) fn cycle(self, step: isize) -> Screen {
        let all = Self::all();
        let here = all.iter().position(|&s| s == self).unwrap_or(0) as isize;
        all[(here + step).rem_euclid(all.len() as isize) as usize]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Materials => write!(f, "Materials"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, label: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency: String,
    pub(crate) export_dir: PathBuf,

    // Dashboard
    pub(crate) dashboard: Dashboard,

    // Expenses
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) expense_count: i64,
    /// `YYYY-MM`; `None` shows every month.
    pub(crate) month_filter: Option<String>,
    pub(crate) category_filter: Option<String>,

    // Materials
    pub(crate) materials: Vec<MaterialTotal>,
    pub(crate) material_index: usize,
    pub(crate) material_scroll: usize,

    // Categories
    pub(crate) categories: Vec<CategoryTotal>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    /// Entry being edited in `InputMode::Editing`.
    pub(crate) editing_id: Option<i64>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(currency: String, export_dir: PathBuf) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency,
            export_dir,

            dashboard: Dashboard::default(),

            expenses: Vec::new(),
            expense_index: 0,
            expense_scroll: 0,
            expense_count: 0,
            month_filter: None,
            category_filter: None,

            materials: Vec::new(),
            material_index: 0,
            material_scroll: 0,

            categories: Vec::new(),
            category_index: 0,
            category_scroll: 0,

            editing_id: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn filter(&self) -> ExpenseFilter {
        let search = self.search_input.trim();
        ExpenseFilter {
            month: self.month_filter.clone(),
            category: self.category_filter.clone(),
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        self.dashboard = db.get_dashboard()?;
        self.expense_count = db.get_expense_count()?;
        Ok(())
    }

    pub(crate) fn refresh_expenses(&mut self, db: &Database) -> Result<()> {
        self.expenses = db.search_expenses(&self.filter())?;
        self.expense_count = db.get_expense_count()?;
        clamp_cursor(
            &mut self.expense_index,
            &mut self.expense_scroll,
            self.expenses.len(),
        );
        Ok(())
    }

    pub(crate) fn refresh_materials(&mut self, db: &Database) -> Result<()> {
        self.materials = db.get_material_totals()?;
        clamp_cursor(
            &mut self.material_index,
            &mut self.material_scroll,
            self.materials.len(),
        );
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_category_totals()?;
        clamp_cursor(
            &mut self.category_index,
            &mut self.category_scroll,
            self.categories.len(),
        );
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?;
        self.refresh_expenses(db)?;
        self.refresh_materials(db)?;
        self.refresh_categories(db)?;
        Ok(())
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        if self.screen != Screen::Expenses {
            return None;
        }
        self.expenses.get(self.expense_index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
