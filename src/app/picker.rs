//! Popup pickers for the category and month filters
//!
//! A picker only knows its options and the highlighted row. Whether it is
//! showing is the app's popup state; confirming hands the highlighted value
//! back to the caller.

use crate::constants::{ALL_CATEGORIES_LABEL, MONTH_PICKER_SPAN};
use crate::models::{Category, MonthKey};

#[derive(Clone, Debug)]
pub struct PickerOption<T> {
    pub label: String,
    pub value: T,
}

#[derive(Clone, Debug)]
pub struct Picker<T> {
    options: Vec<PickerOption<T>>,
    cursor: usize,
}

impl<T: Clone + PartialEq> Picker<T> {
    pub fn new(options: Vec<PickerOption<T>>) -> Self {
        Picker {
            options,
            cursor: 0,
        }
    }

    pub fn set_options(&mut self, options: Vec<PickerOption<T>>) {
        self.options = options;
        self.cursor = self.cursor.min(self.options.len().saturating_sub(1));
    }

    /// Put the cursor on `current` if it is one of the options
    pub fn open(&mut self, current: &T) {
        self.cursor = self
            .options
            .iter()
            .position(|o| o.value == *current)
            .unwrap_or(0);
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.cursor = (self.cursor + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.options.is_empty() {
            self.cursor = self
                .cursor
                .checked_sub(1)
                .unwrap_or(self.options.len() - 1);
        }
    }

    pub fn confirm(&self) -> Option<T> {
        self.options.get(self.cursor).map(|o| o.value.clone())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.label.clone()).collect()
    }
}

/// "All types" followed by every known category
pub fn category_options(categories: &[Category]) -> Vec<PickerOption<Option<Category>>> {
    std::iter::once(PickerOption {
        label: ALL_CATEGORIES_LABEL.to_string(),
        value: None,
    })
    .chain(categories.iter().map(|c| PickerOption {
        label: format!("{} ({})", c.name, c.kind.as_str().to_lowercase()),
        value: Some(c.clone()),
    }))
    .collect()
}

/// The last `MONTH_PICKER_SPAN` months up to `latest`, newest first
pub fn month_options(latest: MonthKey) -> Vec<PickerOption<MonthKey>> {
    latest
        .trailing(MONTH_PICKER_SPAN)
        .into_iter()
        .map(|m| PickerOption {
            label: m.to_string(),
            value: m,
        })
        .collect()
}
