//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Number of list items (days of bills) requested per page
pub const PAGE_SIZE: u32 = 5;

/// Rows from the end of the list at which scrolling down counts as a load-more gesture
pub const LOAD_THRESHOLD_ROWS: usize = 2;

/// How many months the month picker offers, newest first
pub const MONTH_PICKER_SPAN: usize = 24;

/// Default backend URL when no configuration is present
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:7001";

/// Request timeout for the bill service, in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Label shown when no category filter is active
pub const ALL_CATEGORIES_LABEL: &str = "All types";

/// Log file name, created inside the configured log directory
pub const LOG_FILE_NAME: &str = "billfold.log";

/// Application name
pub const APP_NAME: &str = "Billfold";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
