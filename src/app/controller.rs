//! Bill list controller - pagination, filters and the two refresh gestures
//!
//! Every operation only rewrites the targeting state (page, category, month).
//! Fetches are issued from a single place, [`BillListController::on_targeting_changed`],
//! and handed back to the caller as a [`FetchRequest`] to forward to the
//! network layer. Responses come back through [`BillListController::apply_page`]
//! and [`BillListController::apply_failure`]; only the most recently issued
//! request is ever applied.

use rust_decimal::Decimal;

use crate::constants::PAGE_SIZE;
use crate::error::FetchError;
use crate::models::{BillPage, BillQuery, Category, DailyBills, MonthKey};

/// Indicator state of a refresh or load-more gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

/// Which gesture a fetch is reported against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Refresh,
    LoadMore,
}

/// Everything that determines the next fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Targeting {
    pub page: u32,
    pub category: Option<Category>,
    pub month: MonthKey,
}

impl Targeting {
    fn same_query(&self, category: &Option<Category>, month: MonthKey) -> bool {
        self.category == *category && self.month == month
    }

    pub fn to_query(&self) -> BillQuery {
        BillQuery {
            page: self.page,
            page_size: PAGE_SIZE,
            month: self.month,
            category_id: self.category.as_ref().map(|c| c.id),
        }
    }
}

/// A fetch the owner must send to the bill service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub query: BillQuery,
}

#[derive(Clone, Debug)]
struct InFlight {
    id: u64,
    targeting: Targeting,
    gesture: Gesture,
}

/// The query the visible list belongs to and how many pages of it it holds
#[derive(Clone, Debug)]
struct Loaded {
    category: Option<Category>,
    month: MonthKey,
    pages: u32,
}

enum ListSync {
    /// Visible list holds exactly pages `1..=page` of the targeted query
    Current,
    /// Same query, but the targeted page never arrived (failed load-more)
    MissingPage,
    /// Visible list belongs to another query, or nothing was loaded yet
    Stale,
}

pub struct BillListController<T = DailyBills> {
    targeting: Targeting,
    visible: Vec<T>,
    loaded: Option<Loaded>,
    total_pages: u32,
    total_expense: Decimal,
    total_income: Decimal,
    refresh_status: GestureStatus,
    load_status: GestureStatus,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

impl<T> Default for BillListController<T> {
    fn default() -> Self {
        Self::new(MonthKey::current())
    }
}

impl<T> BillListController<T> {
    pub fn new(month: MonthKey) -> Self {
        BillListController {
            targeting: Targeting {
                page: 1,
                category: None,
                month,
            },
            visible: Vec::new(),
            loaded: None,
            total_pages: 0,
            total_expense: Decimal::ZERO,
            total_income: Decimal::ZERO,
            refresh_status: GestureStatus::Idle,
            load_status: GestureStatus::Idle,
            in_flight: None,
            next_request_id: 1,
        }
    }

    // ========================
    // Operations
    // ========================

    /// Initial load when the screen is shown
    pub fn mount(&mut self) -> Option<FetchRequest> {
        self.refresh_status = GestureStatus::InProgress;
        self.on_targeting_changed(self.targeting.clone(), true, Gesture::Refresh)
    }

    /// Re-selecting the active category issues no fetch and leaves the refresh indicator alone
    pub fn select_category(&mut self, category: Option<Category>) -> Option<FetchRequest> {
        let next = Targeting {
            page: 1,
            category,
            month: self.targeting.month,
        };
        self.retarget_for_refresh(next)
    }

    /// Re-selecting the active month issues no fetch and leaves the refresh indicator alone
    pub fn select_month(&mut self, month: MonthKey) -> Option<FetchRequest> {
        let next = Targeting {
            page: 1,
            category: self.targeting.category.clone(),
            month,
        };
        self.retarget_for_refresh(next)
    }

    /// Pull-down gesture: back to page 1 of the current filters
    pub fn request_refresh(&mut self) -> Option<FetchRequest> {
        self.refresh_status = GestureStatus::InProgress;
        // On page 1 nothing changes, so the same targeting is re-issued
        let force = self.targeting.page == 1;
        let next = Targeting {
            page: 1,
            ..self.targeting.clone()
        };
        self.on_targeting_changed(next, force, Gesture::Refresh)
    }

    /// Pull-up gesture: the next page, appended to the visible list
    pub fn request_load_more(&mut self) -> Option<FetchRequest> {
        if let Some(in_flight) = &self.in_flight {
            tracing::debug!(id = in_flight.id, "load-more ignored, fetch outstanding");
            return None;
        }

        match self.list_sync() {
            ListSync::Current => {
                if self.targeting.page >= self.total_pages {
                    return None;
                }
                self.load_status = GestureStatus::InProgress;
                let next = Targeting {
                    page: self.targeting.page + 1,
                    ..self.targeting.clone()
                };
                self.on_targeting_changed(next, false, Gesture::LoadMore)
            }
            ListSync::MissingPage => {
                self.load_status = GestureStatus::InProgress;
                self.on_targeting_changed(self.targeting.clone(), true, Gesture::LoadMore)
            }
            ListSync::Stale => {
                tracing::debug!("load-more ignored, list does not match current filters");
                None
            }
        }
    }

    /// A new bill was recorded elsewhere; show it
    pub fn add_bill_completed(&mut self) -> Option<FetchRequest> {
        self.request_refresh()
    }

    /// Apply a successful response. Returns false if the response was stale.
    pub fn apply_page(&mut self, id: u64, page: BillPage<T>) -> bool {
        let Some(in_flight) = self.take_in_flight(id) else {
            return false;
        };

        let fetched = page.items.len();
        if in_flight.targeting.page == 1 {
            self.visible = page.items;
        } else {
            self.visible.extend(page.items);
        }
        self.loaded = Some(Loaded {
            category: in_flight.targeting.category,
            month: in_flight.targeting.month,
            pages: in_flight.targeting.page,
        });

        self.total_expense = page.total_expense;
        self.total_income = page.total_income;
        self.total_pages = page.total_pages;
        self.refresh_status = GestureStatus::Succeeded;
        self.load_status = GestureStatus::Succeeded;

        tracing::info!(
            id,
            page = in_flight.targeting.page,
            fetched,
            visible = self.visible.len(),
            total_pages = self.total_pages,
            "Bill page applied"
        );
        true
    }

    /// Record a failed fetch. The visible list is left untouched.
    pub fn apply_failure(&mut self, id: u64, error: &FetchError) -> bool {
        let Some(in_flight) = self.take_in_flight(id) else {
            return false;
        };

        tracing::warn!(id, gesture = ?in_flight.gesture, %error, "Bill fetch failed");
        match in_flight.gesture {
            Gesture::Refresh => self.refresh_status = GestureStatus::Failed,
            Gesture::LoadMore => self.load_status = GestureStatus::Failed,
        }
        true
    }

    // ========================
    // Fetch triggering
    // ========================

    /// The only place a fetch is issued. Fires when `next` differs from the
    /// current targeting, or unconditionally when `force` is set.
    fn on_targeting_changed(
        &mut self,
        next: Targeting,
        force: bool,
        gesture: Gesture,
    ) -> Option<FetchRequest> {
        if next == self.targeting && !force {
            tracing::debug!(page = next.page, month = %next.month, "targeting unchanged, no fetch");
            return None;
        }
        self.targeting = next;

        let id = self.next_request_id;
        self.next_request_id += 1;

        if let Some(superseded) = self.in_flight.replace(InFlight {
            id,
            targeting: self.targeting.clone(),
            gesture,
        }) {
            tracing::debug!(superseded = superseded.id, by = id, "fetch superseded");
            // Nothing is loading for the superseded gesture any more
            if superseded.gesture != gesture {
                match superseded.gesture {
                    Gesture::Refresh => self.refresh_status = GestureStatus::Idle,
                    Gesture::LoadMore => self.load_status = GestureStatus::Idle,
                }
            }
        }

        let query = self.targeting.to_query();
        tracing::info!(
            id,
            page = query.page,
            month = %query.month,
            category = ?query.category_id,
            ?gesture,
            "Fetching bills"
        );
        Some(FetchRequest { id, query })
    }

    fn retarget_for_refresh(&mut self, next: Targeting) -> Option<FetchRequest> {
        let request = self.on_targeting_changed(next, false, Gesture::Refresh);
        if request.is_some() {
            self.refresh_status = GestureStatus::InProgress;
        }
        request
    }

    fn take_in_flight(&mut self, id: u64) -> Option<InFlight> {
        if self.in_flight.as_ref().map(|f| f.id) == Some(id) {
            self.in_flight.take()
        } else {
            tracing::debug!(id, "discarding stale bill response");
            None
        }
    }

    fn list_sync(&self) -> ListSync {
        match &self.loaded {
            Some(loaded) if self.targeting.same_query(&loaded.category, loaded.month) => {
                if loaded.pages == self.targeting.page {
                    ListSync::Current
                } else if loaded.pages + 1 == self.targeting.page {
                    ListSync::MissingPage
                } else {
                    ListSync::Stale
                }
            }
            _ => ListSync::Stale,
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    /// The list (and its gesture surface) is only shown when there is something in it
    pub fn shows_list(&self) -> bool {
        !self.visible.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.targeting.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn active_category(&self) -> Option<&Category> {
        self.targeting.category.as_ref()
    }

    pub fn active_month(&self) -> MonthKey {
        self.targeting.month
    }

    pub fn refresh_status(&self) -> GestureStatus {
        self.refresh_status
    }

    pub fn load_status(&self) -> GestureStatus {
        self.load_status
    }

    pub fn total_expense(&self) -> Decimal {
        self.total_expense
    }

    pub fn total_income(&self) -> Decimal {
        self.total_income
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillKind;

    type Controller = BillListController<u32>;

    fn month(text: &str) -> MonthKey {
        MonthKey::parse(text).unwrap()
    }

    fn dining() -> Category {
        Category {
            id: 1,
            name: "dining".into(),
            kind: BillKind::Expense,
        }
    }

    fn page_of(items: std::ops::Range<u32>, total_pages: u32) -> BillPage<u32> {
        BillPage {
            items: items.collect(),
            total_expense: Decimal::new(1050, 2),
            total_income: Decimal::new(300, 0),
            total_pages,
        }
    }

    /// Scenario A: mounted with defaults, first page of three loaded
    fn mounted() -> Controller {
        let mut c = Controller::new(month("2023-01"));
        let req = c.mount().unwrap();
        assert!(c.apply_page(req.id, page_of(0..5, 3)));
        c
    }

    #[test]
    fn test_initial_load() {
        let mut c = Controller::new(month("2023-01"));
        assert!(!c.shows_list());

        let req = c.mount().unwrap();
        assert_eq!(
            req.query,
            BillQuery {
                page: 1,
                page_size: 5,
                month: month("2023-01"),
                category_id: None,
            }
        );
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);

        assert!(c.apply_page(req.id, page_of(0..5, 3)));
        assert_eq!(c.visible().len(), 5);
        assert_eq!(c.refresh_status(), GestureStatus::Succeeded);
        assert_eq!(c.total_pages(), 3);
        assert_eq!(c.total_expense(), Decimal::new(1050, 2));
        assert!(c.shows_list());
        // Settled: the same response cannot be applied twice
        assert!(!c.apply_page(req.id, page_of(0..5, 3)));
    }

    #[test]
    fn test_default_month_is_current() {
        let c = Controller::default();
        assert_eq!(c.active_month(), MonthKey::current());
        assert_eq!(c.current_page(), 1);
        assert!(c.active_category().is_none());
    }

    #[test]
    fn test_load_more_appends() {
        let mut c = mounted();
        let req = c.request_load_more().unwrap();
        assert_eq!(req.query.page, 2);
        assert_eq!(c.load_status(), GestureStatus::InProgress);

        assert!(c.apply_page(req.id, page_of(5..10, 3)));
        assert_eq!(c.visible().len(), 10);
        assert_eq!(c.current_page(), 2);
        assert_eq!(c.visible(), (0..10).collect::<Vec<_>>().as_slice());
        assert_eq!(c.load_status(), GestureStatus::Succeeded);
    }

    #[test]
    fn test_page_accumulation_in_fetch_order() {
        let mut c = mounted();
        let mut expected: Vec<u32> = (0..5).collect();
        // Uneven page sizes: the list is the concatenation of whatever each page held
        for (page, size) in [(2u32, 5u32), (3, 2)] {
            let req = c.request_load_more().unwrap();
            assert_eq!(req.query.page, page);
            let start = 100 * page;
            assert!(c.apply_page(req.id, page_of(start..start + size, 3)));
            expected.extend(start..start + size);
            assert_eq!(c.visible(), expected.as_slice());
        }
    }

    #[test]
    fn test_filter_switch_replaces_list() {
        let mut c = mounted();
        let req = c.request_load_more().unwrap();
        c.apply_page(req.id, page_of(5..10, 3));

        let req = c.select_category(Some(dining())).unwrap();
        assert_eq!(c.current_page(), 1);
        assert_eq!(req.query.page, 1);
        assert_eq!(req.query.category_id, Some(1));
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);
        // Old list stays visible until the new page arrives
        assert_eq!(c.visible().len(), 10);

        assert!(c.apply_page(req.id, page_of(0..2, 1)));
        assert_eq!(c.visible().len(), 2);
        assert_eq!(c.active_category(), Some(&dining()));
    }

    #[test]
    fn test_same_category_twice_fetches_once() {
        let mut c = mounted();
        assert!(c.select_category(Some(dining())).is_some());
        assert!(c.select_category(Some(dining())).is_none());
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);
    }

    #[test]
    fn test_same_month_does_not_refetch() {
        let mut c = mounted();
        assert!(c.select_month(month("2023-01")).is_none());
        assert_eq!(c.refresh_status(), GestureStatus::Succeeded);

        let req = c.select_month(month("2023-02")).unwrap();
        assert_eq!(req.query.month, month("2023-02"));
    }

    #[test]
    fn test_load_more_saturates() {
        let mut c = mounted();
        for page in 2..=3 {
            let req = c.request_load_more().unwrap();
            c.apply_page(req.id, page_of(page * 10..page * 10 + 5, 3));
        }
        assert_eq!(c.current_page(), 3);
        let before = c.visible().to_vec();

        for _ in 0..5 {
            assert!(c.request_load_more().is_none());
        }
        assert_eq!(c.current_page(), 3);
        assert_eq!(c.total_pages(), 3);
        assert_eq!(c.visible(), before.as_slice());
    }

    #[test]
    fn test_load_more_noop_before_first_page() {
        let mut c = Controller::new(month("2023-01"));
        assert!(c.request_load_more().is_none());
        assert_eq!(c.current_page(), 1);
        assert_eq!(c.load_status(), GestureStatus::Idle);
    }

    #[test]
    fn test_load_more_noop_while_fetching() {
        let mut c = mounted();
        let first = c.request_load_more().unwrap();
        assert!(c.request_load_more().is_none());
        assert_eq!(c.current_page(), 2);

        c.apply_page(first.id, page_of(5..10, 3));
        assert_eq!(c.request_load_more().unwrap().query.page, 3);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut c = Controller::new(month("2023-01"));
        let january = c.mount().unwrap();
        let february = c.select_month(month("2023-02")).unwrap();

        assert!(!c.apply_page(january.id, page_of(0..5, 3)));
        assert!(c.visible().is_empty());
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);
        assert_eq!(c.total_pages(), 0);

        assert!(c.apply_page(february.id, page_of(50..52, 1)));
        assert_eq!(c.visible(), &[50, 51]);

        // A late failure of the superseded request flips nothing either
        assert!(!c.apply_failure(january.id, &FetchError::Status(500)));
        assert_eq!(c.refresh_status(), GestureStatus::Succeeded);
    }

    #[test]
    fn test_stale_response_after_newer_applied() {
        let mut c = mounted();
        let dining_req = c.select_category(Some(dining())).unwrap();
        let all_req = c.select_category(None).unwrap();

        assert!(c.apply_page(all_req.id, page_of(0..5, 3)));
        assert!(!c.apply_page(dining_req.id, page_of(90..92, 1)));
        assert_eq!(c.visible().len(), 5);
        assert_eq!(c.total_pages(), 3);
    }

    #[test]
    fn test_refresh_supersedes_load_more() {
        let mut c = mounted();
        let load = c.request_load_more().unwrap();
        let refresh = c.request_refresh().unwrap();
        assert_eq!(c.load_status(), GestureStatus::Idle);

        assert!(!c.apply_page(load.id, page_of(5..10, 3)));
        assert!(c.apply_failure(refresh.id, &FetchError::Timeout));
        assert_eq!(c.refresh_status(), GestureStatus::Failed);
        assert_eq!(c.load_status(), GestureStatus::Idle);
        assert_eq!(c.visible().len(), 5);
    }

    #[test]
    fn test_filter_change_supersedes_load_more() {
        let mut c = mounted();
        c.request_load_more().unwrap();
        let req = c.select_category(Some(dining())).unwrap();
        assert_eq!(c.load_status(), GestureStatus::Idle);
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);

        assert!(c.apply_page(req.id, page_of(0..2, 1)));
        assert_eq!(c.load_status(), GestureStatus::Succeeded);
    }

    #[test]
    fn test_refresh_on_first_page_refetches() {
        let mut c = mounted();
        let req = c.request_refresh().unwrap();
        assert_eq!(req.query.page, 1);
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);

        assert!(c.apply_page(req.id, page_of(10..15, 3)));
        assert_eq!(c.visible(), &[10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_refresh_on_later_page_resets_to_first() {
        let mut c = mounted();
        let req = c.request_load_more().unwrap();
        c.apply_page(req.id, page_of(5..10, 3));

        let req = c.request_refresh().unwrap();
        assert_eq!(c.current_page(), 1);
        assert_eq!(req.query.page, 1);
        assert!(c.apply_page(req.id, page_of(0..5, 3)));
        assert_eq!(c.visible().len(), 5);
    }

    #[test]
    fn test_failed_refresh_keeps_list() {
        let mut c = mounted();
        let before = c.visible().to_vec();

        let req = c.request_refresh().unwrap();
        assert!(c.apply_failure(req.id, &FetchError::Transport("connection refused".into())));
        assert_eq!(c.refresh_status(), GestureStatus::Failed);
        assert_eq!(c.load_status(), GestureStatus::Succeeded);
        assert_eq!(c.visible(), before.as_slice());

        // Retrying the gesture re-issues the same request
        let retry = c.request_refresh().unwrap();
        assert_eq!(retry.query, req.query);
        assert_ne!(retry.id, req.id);
    }

    #[test]
    fn test_failed_load_more_retry_same_page() {
        let mut c = mounted();
        let req = c.request_load_more().unwrap();
        assert!(c.apply_failure(req.id, &FetchError::Timeout));
        assert_eq!(c.load_status(), GestureStatus::Failed);
        assert_eq!(c.refresh_status(), GestureStatus::Succeeded);
        assert_eq!(c.visible().len(), 5);

        let retry = c.request_load_more().unwrap();
        assert_eq!(retry.query.page, 2);
        assert_eq!(c.load_status(), GestureStatus::InProgress);
        assert!(c.apply_page(retry.id, page_of(5..10, 3)));
        assert_eq!(c.visible().len(), 10);
    }

    #[test]
    fn test_load_more_after_failed_filter_change_is_noop() {
        let mut c = mounted();
        let req = c.select_month(month("2023-02")).unwrap();
        c.apply_failure(req.id, &FetchError::Status(502));

        // The visible list is still January's; appending February's page 2 would mix queries
        assert!(c.request_load_more().is_none());

        let req = c.request_refresh().unwrap();
        assert_eq!(req.query.month, month("2023-02"));
        c.apply_page(req.id, page_of(0..5, 2));
        assert_eq!(c.request_load_more().unwrap().query.page, 2);
    }

    #[test]
    fn test_add_bill_completed_refreshes() {
        let mut c = mounted();
        let req = c.add_bill_completed().unwrap();
        assert_eq!(req.query.page, 1);
        assert_eq!(c.refresh_status(), GestureStatus::InProgress);
    }

    #[test]
    fn test_empty_result_hides_list() {
        let mut c = mounted();
        let req = c.select_month(month("2022-06")).unwrap();
        c.apply_page(req.id, page_of(0..0, 0));
        assert!(!c.shows_list());
        assert!(c.request_load_more().is_none());
    }
}
