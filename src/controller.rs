// src/controller.rs
//! List controller: owns the query state of one entity list, turns every state
//! change into a fetch and keeps the last good page.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::ListConfig;
use crate::entities::{Entity, ListFilter};
use crate::error::{ClientError, ClientResult};
use crate::forms::modal::{ModalKind, ModalListener};
use crate::gateway::Gateway;
use crate::notify::Notifier;
use crate::pagination::{ListQuery, PageInfo, MAX_PAGE_SIZE};
use crate::status::EntityStatus;

#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub query: ListQuery,
    /// What the search box shows; reaches `query.search` when the debounce fires.
    pub search_input: String,
    pub items: Vec<T>,
    pub total_count: u64,
    pub loading: bool,
}

impl<T> ListState<T> {
    pub fn page_info(&self) -> PageInfo {
        PageInfo::from_page(self.total_count, self.query.page_number, self.query.page_size)
    }
}

struct Inner<T: Entity> {
    gateway: Gateway<T>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ListState<T>>,
    seq: AtomicU64,
    debounce: Duration,
    pending_search: Mutex<Option<JoinHandle<()>>>,
}

/// Cheap to clone; clones share the same list.
pub struct ListController<T: Entity> {
    inner: Arc<Inner<T>>,
}

impl<T: Entity> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Entity> ListController<T> {
    pub fn new(gateway: Gateway<T>, notifier: Arc<dyn Notifier>, settings: &ListConfig) -> Self {
        let query = ListQuery::new(settings.page_size, gateway.config().default_sort);
        Self {
            inner: Arc::new(Inner {
                gateway,
                notifier,
                state: Mutex::new(ListState {
                    query,
                    search_input: String::new(),
                    items: Vec::new(),
                    total_count: 0,
                    loading: false,
                }),
                seq: AtomicU64::new(0),
                debounce: settings.debounce(),
                pending_search: Mutex::new(None),
            }),
        }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.inner.gateway
    }

    pub fn state(&self) -> ListState<T> {
        lock(&self.inner.state).clone()
    }

    pub fn query(&self) -> ListQuery {
        lock(&self.inner.state).query.clone()
    }

    pub fn page_info(&self) -> PageInfo {
        lock(&self.inner.state).page_info()
    }

    // ==================== FETCH ====================

    /// Issues the current query. A response that arrives after a newer fetch
    /// was started is dropped; a failure empties the list and raises a toast.
    pub async fn fetch(&self) {
        let (seq, query) = {
            let mut state = lock(&self.inner.state);
            state.loading = true;
            let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
            (seq, state.query.clone())
        };

        tracing::debug!(
            "Fetching {} page {} (seq {})",
            T::KIND.label(),
            query.page_number,
            seq
        );
        let result = self.inner.gateway.list(&query).await;

        if self.inner.seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("Discarding stale {} response (seq {})", T::KIND.label(), seq);
            return;
        }

        let failure = {
            let mut state = lock(&self.inner.state);
            state.loading = false;
            match result {
                Ok(page) => {
                    state.items = page.items;
                    state.total_count = page.total_count;
                    None
                }
                Err(err) => {
                    state.items.clear();
                    state.total_count = 0;
                    Some(err)
                }
            }
        };

        if let Some(err) = failure {
            tracing::warn!("Failed to load {} list: {}", T::KIND.label(), err);
            self.inner.notifier.error(&err.user_message());
        }
    }

    /// Changes the query without fetching; callers batch edits and then `fetch`.
    pub fn update_query<F: FnOnce(&mut ListQuery)>(&self, f: F) {
        let mut state = lock(&self.inner.state);
        f(&mut state.query);
    }

    // ==================== QUERY CHANGES ====================

    /// Shows `text` at once; the fetch waits for the debounce window and only
    /// the last keystroke inside it goes out.
    pub fn set_search(&self, text: &str) {
        lock(&self.inner.state).search_input = text.to_string();

        let controller = self.clone();
        let window = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            controller.apply_search().await;
        });

        if let Some(previous) = lock(&self.inner.pending_search).replace(handle) {
            previous.abort();
        }
    }

    async fn apply_search(&self) {
        {
            let mut state = lock(&self.inner.state);
            state.query.search = state.search_input.trim().to_string();
            state.query.page_number = 1;
        }
        self.fetch().await;
    }

    /// Waits for a scheduled search fetch, if any.
    pub async fn settle(&self) {
        let pending = lock(&self.inner.pending_search).take();
        if let Some(handle) = pending {
            // A cancelled task is one that a newer keystroke replaced.
            let _ = handle.await;
        }
    }

    pub async fn set_status_filter(&self, status: Option<EntityStatus>) {
        self.update_query(|query| {
            query.filters.status = status;
            query.page_number = 1;
        });
        self.fetch().await;
    }

    pub async fn set_availability_filter(&self, available: Option<bool>) -> ClientResult<()> {
        if !self.inner.gateway.config().supports(ListFilter::Availability) {
            return Err(ClientError::validation(format!(
                "{} lists cannot be filtered by availability",
                T::KIND.label()
            )));
        }
        self.update_query(|query| {
            query.filters.is_available = available;
            query.page_number = 1;
        });
        self.fetch().await;
        Ok(())
    }

    pub async fn set_sort(&self, field: &str) -> ClientResult<()> {
        if !self.inner.gateway.config().is_sortable(field) {
            return Err(ClientError::validation(format!(
                "{} lists cannot be sorted by '{}'",
                T::KIND.label(),
                field
            )));
        }
        self.update_query(|query| query.toggle_sort(field));
        self.fetch().await;
        Ok(())
    }

    pub async fn set_page(&self, page_number: u32) {
        self.update_query(|query| query.page_number = page_number.max(1));
        self.fetch().await;
    }

    pub async fn set_page_size(&self, page_size: u32) {
        self.update_query(|query| {
            query.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
            query.page_number = 1;
        });
        self.fetch().await;
    }

    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// Back to page 1 with filters and sort untouched; new records land there.
    pub async fn reload_first_page(&self) {
        self.update_query(|query| query.page_number = 1);
        self.fetch().await;
    }

    /// Deleting the only row of a later page steps back one page.
    pub async fn after_delete(&self) {
        {
            let mut state = lock(&self.inner.state);
            if state.items.len() == 1 && state.query.page_number > 1 {
                state.query.page_number -= 1;
            }
        }
        self.fetch().await;
    }
}

#[async_trait]
impl<T: Entity> ModalListener for ListController<T> {
    async fn on_success(&self, kind: ModalKind) {
        match kind {
            ModalKind::Create => self.reload_first_page().await,
            ModalKind::Update => self.refresh().await,
            ModalKind::DeleteConfirm => self.after_delete().await,
            ModalKind::View => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::MockTransport;
    use crate::gateway::Method;
    use crate::models::{Category, Location};
    use crate::notify::{RecordingNotifier, ToastLevel};
    use serde_json::{json, Value};

    const LIST: &str = "Category/Categories";

    fn categories(names: &[&str], total: u64) -> Value {
        let items: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "categoryId": i + 1, "categoryName": name, "status": 1 }))
            .collect();
        json!({ "items": items, "totalCount": total })
    }

    fn new_controller(transport: Arc<MockTransport>) -> (ListController<Category>, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let controller = ListController::new(
            Gateway::new(transport),
            Arc::new(notifier.clone()),
            &ListConfig::default(),
        );
        (controller, notifier)
    }

    fn sent_query(call: &crate::gateway::testing::Call) -> ListQuery {
        serde_json::from_value(call.body.clone().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_populates_state() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Dairy", "Frozen"], 2)));
        let (controller, notifier) = new_controller(transport);

        controller.fetch().await;

        let state = controller.state();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.total_count, 2);
        assert!(!state.loading);
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Dairy"], 1)));
        let (controller, _) = new_controller(transport.clone());

        for text in ["d", "da", "dai", "dair", "dairy"] {
            controller.set_search(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(controller.state().search_input, "dairy");
        assert!(transport.calls_to(Method::Post, LIST).is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        controller.settle().await;

        let calls = transport.calls_to(Method::Post, LIST);
        assert_eq!(calls.len(), 1);
        assert_eq!(sent_query(&calls[0]).search, "dairy");
        assert_eq!(sent_query(&calls[0]).page_number, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let transport = MockTransport::new();
        transport.on_delayed(
            Method::Post,
            LIST,
            Duration::from_millis(300),
            Ok(categories(&["Old"], 1)),
        );
        transport.on(Method::Post, LIST, Ok(categories(&["New", "Newer"], 2)));
        let (controller, _) = new_controller(transport);

        tokio::join!(controller.fetch(), controller.fetch());

        let state = controller.state();
        assert_eq!(state.total_count, 2);
        assert_eq!(state.items[0].category_name, "New");
    }

    #[tokio::test]
    async fn test_sort_toggles_and_resets_page() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Dairy"], 30)));
        let (controller, _) = new_controller(transport);

        controller.set_page(3).await;
        controller.set_sort("categoryName").await.unwrap();
        let query = controller.query();
        assert_eq!(query.page_number, 1);
        assert!(!query.sort_ascending);

        controller.set_sort("categoryName").await.unwrap();
        assert!(controller.query().sort_ascending);

        controller.set_sort("status").await.unwrap();
        controller.set_sort("categoryName").await.unwrap();
        assert!(controller.query().sort_ascending);

        assert!(controller.set_sort("description").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_of_last_row_steps_back() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Only"], 21)));
        let (controller, _) = new_controller(transport.clone());

        controller.set_page(3).await;
        controller.after_delete().await;
        assert_eq!(controller.query().page_number, 2);

        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["One", "Two"], 22)));
        let (controller, _) = new_controller(transport.clone());
        controller.set_page(3).await;
        controller.after_delete().await;
        assert_eq!(controller.query().page_number, 3);
        assert_eq!(sent_query(transport.calls().last().unwrap()).page_number, 3);
    }

    #[tokio::test]
    async fn test_delete_on_first_page_stays() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Only"], 1)));
        let (controller, _) = new_controller(transport);

        controller.fetch().await;
        controller.after_delete().await;
        assert_eq!(controller.query().page_number, 1);
    }

    #[tokio::test]
    async fn test_failure_empties_list_and_notifies() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Dairy"], 1)));
        transport.on(Method::Post, LIST, Ok(json!({ "result": "unexpected" })));
        let (controller, notifier) = new_controller(transport);

        controller.fetch().await;
        assert_eq!(controller.state().items.len(), 1);

        controller.refresh().await;
        let state = controller.state();
        assert!(state.items.is_empty());
        assert_eq!(state.total_count, 0);
        assert_eq!(notifier.count(ToastLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_filters_reset_page() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Dairy"], 40)));
        let (controller, _) = new_controller(transport.clone());

        controller.set_page(4).await;
        controller.set_status_filter(Some(EntityStatus::Inactive)).await;

        let last = sent_query(transport.calls().last().unwrap());
        assert_eq!(last.page_number, 1);
        assert_eq!(last.filters.status, Some(EntityStatus::Inactive));

        assert!(controller.set_availability_filter(Some(true)).await.is_err());
    }

    #[tokio::test]
    async fn test_availability_filter_on_locations() {
        let transport = MockTransport::new();
        transport.on(Method::Post, "Location/Locations", Ok(json!({ "data": [] })));
        let controller: ListController<Location> = ListController::new(
            Gateway::new(transport.clone()),
            Arc::new(RecordingNotifier::new()),
            &ListConfig::default(),
        );

        controller.set_availability_filter(Some(false)).await.unwrap();
        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body["filters"], json!({ "isAvailable": false }));
    }

    #[tokio::test]
    async fn test_modal_success_routes() {
        let transport = MockTransport::new();
        transport.on(Method::Post, LIST, Ok(categories(&["Dairy"], 40)));
        let (controller, _) = new_controller(transport.clone());

        controller.set_status_filter(Some(EntityStatus::Active)).await;
        controller.set_page(3).await;
        controller.on_success(ModalKind::Create).await;

        let last = sent_query(transport.calls().last().unwrap());
        assert_eq!(last.page_number, 1);
        assert_eq!(last.filters.status, Some(EntityStatus::Active));

        let before = transport.calls().len();
        controller.on_success(ModalKind::View).await;
        assert_eq!(transport.calls().len(), before);
    }
}
