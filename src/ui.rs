use chrono::DateTime;
use ratatui::{prelude::*, widgets::*};
use rust_decimal::Decimal;

use crate::app::controller::GestureStatus;
use crate::models::{BillKind, DailyBills};

/// Two-decimal money text
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Refresh indicator text shown at the top of the list
pub fn refresh_label(status: GestureStatus) -> &'static str {
    match status {
        GestureStatus::Idle => "",
        GestureStatus::InProgress => "Refreshing...",
        GestureStatus::Succeeded => "Up to date",
        GestureStatus::Failed => "Refresh failed - press r to retry",
    }
}

/// Load-more indicator text shown at the bottom of the list
pub fn load_label(status: GestureStatus, current_page: u32, total_pages: u32) -> &'static str {
    match status {
        GestureStatus::InProgress => "Loading more...",
        GestureStatus::Failed => "Loading failed - scroll down to retry",
        _ if current_page >= total_pages => "No more bills",
        _ => "Scroll down for more",
    }
}

/// Indicator color
pub fn status_color(status: GestureStatus) -> Color {
    match status {
        GestureStatus::Idle => Color::DarkGray,
        GestureStatus::InProgress => Color::Yellow,
        GestureStatus::Succeeded => Color::Green,
        GestureStatus::Failed => Color::Red,
    }
}

/// Bill kind color
pub fn kind_color(kind: BillKind) -> Color {
    match kind {
        BillKind::Expense => Color::Red,
        BillKind::Income => Color::Green,
    }
}

/// `HH:MM` of an epoch-millisecond timestamp
pub fn format_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Lines for one day of bills: a header with day totals, then one line per bill
pub fn day_lines(day: &DailyBills, highlighted: bool) -> Vec<Line<'static>> {
    let header_style = if highlighted {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().bold()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(day.date.clone(), header_style),
        Span::styled(
            format!("  out {}", format_money(day.total(BillKind::Expense))),
            Style::default().fg(kind_color(BillKind::Expense)),
        ),
        Span::styled(
            format!("  in {}", format_money(day.total(BillKind::Income))),
            Style::default().fg(kind_color(BillKind::Income)),
        ),
    ])];

    for bill in &day.bills {
        let remark = if bill.remark.is_empty() {
            String::new()
        } else {
            format!(" | {}", bill.remark)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<12}", bill.type_name)),
            Span::styled(
                format!("{:>12}", format_money(bill.signed_amount())),
                Style::default().fg(kind_color(bill.pay_type)),
            ),
            Span::styled(
                format!("  {}{}", format_time(bill.date), remark),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines
}

/// Picker popup list
pub fn render_picker<'a>(title: &'a str, labels: &[String]) -> List<'a> {
    let items: Vec<ListItem> = labels.iter().map(|l| ListItem::new(l.clone())).collect();

    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().bg(Color::Black)),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ")
}
