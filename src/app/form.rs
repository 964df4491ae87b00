//! Add-bill popup form

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{BillKind, Category, NewBill};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("enter an amount")]
    EmptyAmount,
    #[error("'{0}' is not a number")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount can have at most two decimals")]
    TooPrecise,
    #[error("no {0} categories available")]
    NoCategory(&'static str),
}

/// Field receiving typed characters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Amount,
    Remark,
}

#[derive(Clone, Debug, Default)]
pub struct AddBillForm {
    pub open: bool,
    pub kind: BillKind,
    pub amount: String,
    pub remark: String,
    pub date: NaiveDate,
    pub category_index: usize,
    pub active_field: FormField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl AddBillForm {
    /// Reset and show the form for a bill dated `today`
    pub fn open(&mut self, today: NaiveDate) {
        *self = AddBillForm {
            open: true,
            date: today,
            ..AddBillForm::default()
        };
    }

    pub fn close(&mut self) {
        self.open = false;
        self.submitting = false;
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggle();
        self.category_index = 0;
    }

    pub fn next_field(&mut self) {
        self.active_field = match self.active_field {
            FormField::Amount => FormField::Remark,
            FormField::Remark => FormField::Amount,
        };
    }

    pub fn next_category(&mut self, categories: &[Category]) {
        let count = self.categories_for_kind(categories).len();
        if count > 0 {
            self.category_index = (self.category_index + 1) % count;
        }
    }

    pub fn prev_category(&mut self, categories: &[Category]) {
        let count = self.categories_for_kind(categories).len();
        if count > 0 {
            self.category_index = self.category_index.checked_sub(1).unwrap_or(count - 1);
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Amount => {
                if c.is_ascii_digit() || (c == '.' && !self.amount.contains('.')) {
                    self.amount.push(c);
                }
            }
            FormField::Remark => self.remark.push(c),
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Amount => self.amount.pop(),
            FormField::Remark => self.remark.pop(),
        };
    }

    pub fn categories_for_kind<'a>(&self, categories: &'a [Category]) -> Vec<&'a Category> {
        categories.iter().filter(|c| c.kind == self.kind).collect()
    }

    pub fn selected_category<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        self.categories_for_kind(categories)
            .get(self.category_index)
            .copied()
    }

    /// Build the bill to submit, or explain what is wrong with the input
    pub fn validate(&self, categories: &[Category]) -> Result<NewBill, FormError> {
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(FormError::EmptyAmount);
        }
        let amount =
            Decimal::from_str(raw).map_err(|_| FormError::InvalidAmount(raw.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(FormError::NonPositiveAmount);
        }
        if amount.normalize().scale() > 2 {
            return Err(FormError::TooPrecise);
        }
        let category = self
            .selected_category(categories)
            .ok_or(FormError::NoCategory(self.kind.as_str()))?;

        Ok(NewBill {
            kind: self.kind,
            amount,
            category: category.clone(),
            date: self.date,
            remark: self.remark.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category { id: 1, name: "dining".into(), kind: BillKind::Expense },
            Category { id: 2, name: "transport".into(), kind: BillKind::Expense },
            Category { id: 11, name: "salary".into(), kind: BillKind::Income },
        ]
    }

    fn form_with_amount(amount: &str) -> AddBillForm {
        let mut form = AddBillForm::default();
        form.open(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        form.amount = amount.to_string();
        form
    }

    #[test]
    fn test_valid_expense() {
        let mut form = form_with_amount("12.5");
        form.next_category(&categories());
        form.next_field();
        for c in "lunch ".chars() {
            form.input_char(c);
        }

        let bill = form.validate(&categories()).unwrap();
        assert_eq!(bill.amount, Decimal::new(125, 1));
        assert_eq!(bill.category.name, "transport");
        assert_eq!(bill.remark, "lunch");
        assert_eq!(bill.kind, BillKind::Expense);
    }

    #[test]
    fn test_income_uses_income_categories() {
        let mut form = form_with_amount("3000");
        form.toggle_kind();
        let bill = form.validate(&categories()).unwrap();
        assert_eq!(bill.category.name, "salary");
    }

    #[test]
    fn test_rejects_bad_amounts() {
        let cats = categories();
        assert_eq!(form_with_amount("").validate(&cats), Err(FormError::EmptyAmount));
        assert_eq!(form_with_amount("0").validate(&cats), Err(FormError::NonPositiveAmount));
        assert_eq!(form_with_amount("-4").validate(&cats), Err(FormError::NonPositiveAmount));
        assert_eq!(form_with_amount("1.234").validate(&cats), Err(FormError::TooPrecise));
        assert_eq!(
            form_with_amount("1.2.3").validate(&cats),
            Err(FormError::InvalidAmount("1.2.3".into()))
        );
        assert!(form_with_amount("1.50").validate(&cats).is_ok());
    }

    #[test]
    fn test_amount_field_filters_input() {
        let mut form = form_with_amount("");
        for c in "1a2..5".chars() {
            form.input_char(c);
        }
        assert_eq!(form.amount, "12.5");
        form.backspace();
        assert_eq!(form.amount, "12.");
    }

    #[test]
    fn test_no_category_for_kind() {
        let form = form_with_amount("5");
        assert_eq!(form.validate(&[]), Err(FormError::NoCategory("Expense")));
    }
}
