//! Network messages - communication between App and Network layers

use crate::error::FetchError;
use crate::models::{BillPage, BillQuery, Category, NewBill};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch one page of the bill list
    FetchBills {
        id: u64,
        query: BillQuery,
    },
    /// Fetch the categories offered by the filter and the add-bill form
    FetchCategories,
    /// Record a new bill
    AddBill(NewBill),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// A bill page arrived for request `id`
    BillsLoaded {
        id: u64,
        page: BillPage,
    },
    /// Request `id` failed
    BillsFailed {
        id: u64,
        error: FetchError,
    },
    CategoriesLoaded(Vec<Category>),
    CategoriesFailed(FetchError),
    BillAdded,
    AddBillFailed(FetchError),
}
