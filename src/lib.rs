//! # Billfold
//!
//! A terminal bill book: a scrollable list of expenses and income for one
//! month, with pull-to-refresh, incremental page loading, a category filter,
//! a month filter and a popup for recording new bills.
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous, also decides when a key is a refresh/load-more gesture
//! - App Layer (State machine) - owns the bill list controller, pickers and add-bill form
//! - Network Layer (Tokio runtime) - talks to the bill service

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Bill, BillKind, BillPage, BillQuery, Category, DailyBills, MonthKey, NewBill};
pub use error::FetchError;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, BillListController, GestureStatus};
pub use network::{BillClient, NetworkActor};
