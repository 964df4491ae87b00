use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Whether a bill takes money out or brings it in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum BillKind {
    #[default]
    Expense,
    Income,
}

impl BillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillKind::Expense => "Expense",
            BillKind::Income => "Income",
        }
    }

    pub fn toggle(&self) -> BillKind {
        match self {
            BillKind::Expense => BillKind::Income,
            BillKind::Income => BillKind::Expense,
        }
    }
}

impl TryFrom<u8> for BillKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BillKind::Expense),
            2 => Ok(BillKind::Income),
            other => Err(format!("unknown bill kind {}", other)),
        }
    }
}

impl From<BillKind> for u8 {
    fn from(kind: BillKind) -> u8 {
        match kind {
            BillKind::Expense => 1,
            BillKind::Income => 2,
        }
    }
}

/// A transaction category ("type" on the backend)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BillKind,
}

/// A single income or expense record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: u64,
    pub pay_type: BillKind,
    pub amount: Decimal,
    /// Epoch milliseconds
    #[serde(deserialize_with = "timestamp_millis")]
    pub date: i64,
    pub type_id: u32,
    pub type_name: String,
    #[serde(default)]
    pub remark: String,
}

impl Bill {
    /// Amount with its sign: negative for expenses
    pub fn signed_amount(&self) -> Decimal {
        match self.pay_type {
            BillKind::Expense => -self.amount,
            BillKind::Income => self.amount,
        }
    }
}

/// One day's bills; the unit the bill list is paged in
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyBills {
    pub date: String,
    pub bills: Vec<Bill>,
}

impl DailyBills {
    pub fn total(&self, kind: BillKind) -> Decimal {
        self.bills
            .iter()
            .filter(|b| b.pay_type == kind)
            .map(|b| b.amount)
            .sum()
    }
}

/// One page of the filtered bill list plus the aggregates of the whole query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPage<T = DailyBills> {
    #[serde(rename = "list")]
    pub items: Vec<T>,
    pub total_expense: Decimal,
    pub total_income: Decimal,
    #[serde(rename = "totalPage")]
    pub total_pages: u32,
}

/// Parameters of one bill-list request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillQuery {
    pub page: u32,
    pub page_size: u32,
    pub month: MonthKey,
    pub category_id: Option<u32>,
}

/// A bill about to be recorded
#[derive(Clone, Debug, PartialEq)]
pub struct NewBill {
    pub kind: BillKind,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub remark: String,
}

/// A calendar month, displayed and sent as `YYYY-MM`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<MonthKey> {
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthKey)
    }

    /// The month containing today's local date
    pub fn current() -> MonthKey {
        MonthKey::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> MonthKey {
        // Day 1 always exists for a month that already contains `date`
        MonthKey(date.with_day(1).unwrap_or(date))
    }

    pub fn parse(text: &str) -> Option<MonthKey> {
        NaiveDate::parse_from_str(&format!("{}-01", text.trim()), "%Y-%m-%d")
            .ok()
            .map(MonthKey)
    }

    pub fn prev(&self) -> MonthKey {
        MonthKey(self.0.checked_sub_months(Months::new(1)).unwrap_or(self.0))
    }

    /// `count` months ending at (and including) this one, newest first
    pub fn trailing(&self, count: usize) -> Vec<MonthKey> {
        let mut months = Vec::with_capacity(count);
        let mut month = *self;
        for _ in 0..count {
            months.push(month);
            month = month.prev();
        }
        months
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl Default for MonthKey {
    fn default() -> Self {
        MonthKey::current()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// The backend sends timestamps either as numbers or as numeric strings
fn timestamp_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_parse_and_display() {
        let month = MonthKey::parse("2023-01").unwrap();
        assert_eq!(month.to_string(), "2023-01");
        assert_eq!(month.prev().to_string(), "2022-12");
        assert!(MonthKey::parse("2023-13").is_none());
        assert!(MonthKey::parse("january").is_none());
    }

    #[test]
    fn test_month_key_trailing() {
        let months = MonthKey::new(2024, 2).unwrap().trailing(3);
        let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2024-02", "2024-01", "2023-12"]);
    }

    #[test]
    fn test_deserialize_bill_page() {
        let json = r#"{
            "totalExpense": 42.5,
            "totalIncome": "100.00",
            "totalPage": 3,
            "list": [
                {
                    "date": "2023-01-05",
                    "bills": [
                        {"id": 7, "pay_type": 1, "amount": "12.50", "date": "1672900000000",
                         "type_id": 1, "type_name": "dining", "remark": ""},
                        {"id": 8, "pay_type": 2, "amount": "100.00", "date": 1672900000001,
                         "type_id": 11, "type_name": "salary"}
                    ]
                }
            ]
        }"#;
        let page: BillPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_expense, Decimal::new(425, 1));
        assert_eq!(page.items.len(), 1);

        let day = &page.items[0];
        assert_eq!(day.bills[0].date, 1_672_900_000_000);
        assert_eq!(day.bills[1].pay_type, BillKind::Income);
        assert_eq!(day.total(BillKind::Expense), Decimal::new(1250, 2));
        assert_eq!(day.bills[0].signed_amount(), Decimal::new(-1250, 2));
    }

    #[test]
    fn test_unknown_bill_kind_rejected() {
        let json = r#"{"id": 1, "name": "x", "type": 9}"#;
        assert!(serde_json::from_str::<Category>(json).is_err());
    }
}
