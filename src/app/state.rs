//! App state - pure data structure with no I/O logic

use crate::app::controller::BillListController;
use crate::app::form::AddBillForm;
use crate::app::picker::{category_options, month_options, Picker};
use crate::constants::ALL_CATEGORIES_LABEL;
use crate::messages::ui_events::Popup;
use crate::messages::RenderState;
use crate::models::{Category, MonthKey};

/// Main application state - pure data, no I/O
pub struct AppState {
    // Bill list and its filters
    pub bills: BillListController,
    pub selected: usize,

    // Categories known to the backend
    pub categories: Vec<Category>,

    // Popups
    pub popup: Popup,
    pub category_picker: Picker<Option<Category>>,
    pub month_picker: Picker<MonthKey>,
    pub form: AddBillForm,

    // Status bar
    pub notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MonthKey::current())
    }
}

impl AppState {
    /// State for a screen opened during `month`
    pub fn new(month: MonthKey) -> Self {
        AppState {
            bills: BillListController::new(month),
            selected: 0,
            categories: Vec::new(),
            popup: Popup::None,
            category_picker: Picker::new(category_options(&[])),
            month_picker: Picker::new(month_options(month)),
            form: AddBillForm::default(),
            notice: None,
        }
    }

    pub fn category_label(&self) -> String {
        self.bills
            .active_category()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| ALL_CATEGORIES_LABEL.to_string())
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let (picker_title, picker_labels, picker_cursor) = match self.popup {
            Popup::CategoryPicker => (
                " Filter by type ",
                self.category_picker.labels(),
                self.category_picker.cursor(),
            ),
            Popup::MonthPicker => (
                " Filter by month ",
                self.month_picker.labels(),
                self.month_picker.cursor(),
            ),
            _ => ("", Vec::new(), 0),
        };

        RenderState {
            total_expense: self.bills.total_expense(),
            total_income: self.bills.total_income(),
            category_label: self.category_label(),
            month_label: self.bills.active_month().to_string(),
            bills: self.bills.visible().to_vec(),
            show_list: self.bills.shows_list(),
            selected: self.selected,
            current_page: self.bills.current_page(),
            total_pages: self.bills.total_pages(),
            refresh_status: self.bills.refresh_status(),
            load_status: self.bills.load_status(),
            load_threshold: crate::constants::LOAD_THRESHOLD_ROWS,
            popup: self.popup,
            picker_title,
            picker_labels,
            picker_cursor,
            form: self.form.clone(),
            form_category: self
                .form
                .selected_category(&self.categories)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| String::from("<none>")),
            notice: self.notice.clone(),
        }
    }
}
