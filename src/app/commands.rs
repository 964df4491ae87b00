//! Command handlers - business logic for processing UI events and network responses
//!
//! Handlers that need the network return the command to send; the actor
//! forwards it.

use chrono::Local;

use crate::app::controller::FetchRequest;
use crate::app::picker::category_options;
use crate::app::AppState;
use crate::messages::ui_events::Popup;
use crate::messages::{NetworkCommand, NetworkResponse};

impl From<FetchRequest> for NetworkCommand {
    fn from(request: FetchRequest) -> Self {
        NetworkCommand::FetchBills {
            id: request.id,
            query: request.query,
        }
    }
}

impl AppState {
    /// Commands to issue when the screen is first shown
    pub fn mount(&mut self) -> Vec<NetworkCommand> {
        let mut commands = vec![NetworkCommand::FetchCategories];
        commands.extend(self.bills.mount().map(NetworkCommand::from));
        commands
    }

    // ========================
    // List gestures
    // ========================

    pub fn pull_refresh(&mut self) -> Option<NetworkCommand> {
        self.bills.request_refresh().map(NetworkCommand::from)
    }

    pub fn scroll_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, load_more: bool) -> Option<NetworkCommand> {
        let len = self.bills.visible().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
        if load_more {
            self.bills.request_load_more().map(NetworkCommand::from)
        } else {
            None
        }
    }

    // ========================
    // Filter pickers
    // ========================

    pub fn open_category_picker(&mut self) {
        let current = self.bills.active_category().cloned();
        self.category_picker.open(&current);
        self.popup = Popup::CategoryPicker;
    }

    pub fn open_month_picker(&mut self) {
        self.month_picker.open(&self.bills.active_month());
        self.popup = Popup::MonthPicker;
    }

    pub fn picker_next(&mut self) {
        match self.popup {
            Popup::CategoryPicker => self.category_picker.next(),
            Popup::MonthPicker => self.month_picker.next(),
            _ => {}
        }
    }

    pub fn picker_prev(&mut self) {
        match self.popup {
            Popup::CategoryPicker => self.category_picker.prev(),
            Popup::MonthPicker => self.month_picker.prev(),
            _ => {}
        }
    }

    /// Taking the popup down first delivers each confirmation once
    pub fn picker_confirm(&mut self) -> Option<NetworkCommand> {
        let popup = std::mem::take(&mut self.popup);
        let request = match popup {
            Popup::CategoryPicker => self
                .category_picker
                .confirm()
                .and_then(|category| self.bills.select_category(category)),
            Popup::MonthPicker => self
                .month_picker
                .confirm()
                .and_then(|month| self.bills.select_month(month)),
            other => {
                self.popup = other;
                None
            }
        };
        request.map(NetworkCommand::from)
    }

    pub fn picker_cancel(&mut self) {
        self.popup = Popup::None;
    }

    // ========================
    // Add bill
    // ========================

    pub fn open_add_bill(&mut self) {
        self.form.open(Local::now().date_naive());
        self.popup = Popup::AddBill;
    }

    pub fn form_char(&mut self, c: char) {
        self.form.input_char(c);
    }

    pub fn form_backspace(&mut self) {
        self.form.backspace();
    }

    pub fn form_next_field(&mut self) {
        self.form.next_field();
    }

    pub fn form_toggle_kind(&mut self) {
        self.form.toggle_kind();
    }

    pub fn form_next_category(&mut self) {
        self.form.next_category(&self.categories);
    }

    pub fn form_prev_category(&mut self) {
        self.form.prev_category(&self.categories);
    }

    pub fn form_submit(&mut self) -> Option<NetworkCommand> {
        if self.form.submitting {
            return None;
        }
        match self.form.validate(&self.categories) {
            Ok(bill) => {
                self.form.error = None;
                self.form.submitting = true;
                tracing::info!(amount = %bill.amount, category = %bill.category.name, "Submitting bill");
                Some(NetworkCommand::AddBill(bill))
            }
            Err(err) => {
                self.form.error = Some(err.to_string());
                None
            }
        }
    }

    pub fn form_cancel(&mut self) {
        self.form.close();
        self.popup = Popup::None;
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.popup = match self.popup {
            Popup::Help => Popup::None,
            _ => Popup::Help,
        };
    }

    pub fn close_help(&mut self) {
        self.popup = Popup::None;
    }

    // ========================
    // Network responses
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::BillsLoaded { id, page } => {
                if self.bills.apply_page(id, page) {
                    if self.bills.current_page() == 1 {
                        self.selected = 0;
                    }
                    self.selected = self
                        .selected
                        .min(self.bills.visible().len().saturating_sub(1));
                    self.notice = None;
                }
                None
            }
            NetworkResponse::BillsFailed { id, error } => {
                if self.bills.apply_failure(id, &error) {
                    self.notice = Some(format!("Could not load bills: {}", error));
                }
                None
            }
            NetworkResponse::CategoriesLoaded(categories) => {
                tracing::info!(count = categories.len(), "Categories loaded");
                self.category_picker.set_options(category_options(&categories));
                self.categories = categories;
                None
            }
            NetworkResponse::CategoriesFailed(error) => {
                tracing::warn!(%error, "Category fetch failed");
                self.notice = Some(format!("Could not load types: {}", error));
                None
            }
            NetworkResponse::BillAdded => {
                self.form.close();
                if self.popup == Popup::AddBill {
                    self.popup = Popup::None;
                }
                self.notice = Some(String::from("Bill added"));
                self.bills.add_bill_completed().map(NetworkCommand::from)
            }
            NetworkResponse::AddBillFailed(error) => {
                tracing::warn!(%error, "Adding bill failed");
                self.form.submitting = false;
                self.form.error = Some(error.to_string());
                None
            }
        }
    }
}
