//! Render state - data structure sent from App layer to UI for rendering

use rust_decimal::Decimal;

use crate::app::controller::GestureStatus;
use crate::app::form::AddBillForm;
use crate::constants::{ALL_CATEGORIES_LABEL, LOAD_THRESHOLD_ROWS};
use crate::messages::ui_events::Popup;
use crate::models::{DailyBills, MonthKey};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Header
    pub total_expense: Decimal,
    pub total_income: Decimal,
    pub category_label: String,
    pub month_label: String,

    // Bill list
    pub bills: Vec<DailyBills>,
    /// False when the list is empty: no list and no gesture surface is drawn
    pub show_list: bool,
    pub selected: usize,
    pub current_page: u32,
    pub total_pages: u32,

    // Gesture surface feedback
    pub refresh_status: GestureStatus,
    pub load_status: GestureStatus,
    pub load_threshold: usize,

    // Popups
    pub popup: Popup,
    pub picker_title: &'static str,
    pub picker_labels: Vec<String>,
    pub picker_cursor: usize,
    pub form: AddBillForm,
    pub form_category: String,

    /// One-line message for the status bar
    pub notice: Option<String>,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            total_expense: Decimal::ZERO,
            total_income: Decimal::ZERO,
            category_label: String::from(ALL_CATEGORIES_LABEL),
            month_label: MonthKey::current().to_string(),
            bills: Vec::new(),
            show_list: false,
            selected: 0,
            current_page: 1,
            total_pages: 0,
            refresh_status: GestureStatus::Idle,
            load_status: GestureStatus::Idle,
            load_threshold: LOAD_THRESHOLD_ROWS,
            popup: Popup::None,
            picker_title: "",
            picker_labels: Vec::new(),
            picker_cursor: 0,
            form: AddBillForm::default(),
            form_category: String::new(),
            notice: None,
        }
    }
}
