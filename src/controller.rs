//! Todo controller.
//!
//! Owns one view's worth of state: the effective list, the current
//! navigational query and the fetch lifecycle. Reads go remote source →
//! overlay merge → filter/paginate. Writes go to the patch store only,
//! then the in-memory list is updated and the page window re-derived;
//! nothing written ever reaches the remote.
//!
//! Every load takes a [`LoadTicket`]. Only the most recent ticket may
//! publish its result, so a slow response from an earlier load can never
//! overwrite fresher state.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_FETCH_LIMIT;
use crate::error::{Error, Result};
use crate::model::{Item, PageQuery, Patch, StatusFilter};
use crate::overlay::merge;
use crate::paginate::{
    filter_by_status, page_after_removal, paginate, prepend_to_list, remove_from_list,
    total_pages, update_in_list,
};
use crate::remote::RemoteSource;
use crate::storage::{KeyValueStore, PatchStore};
use crate::validate::normalize_text;

/// Fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Token identifying one load. Later loads get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// What the caller should do after a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The current page still has items.
    Stay,
    /// The current page emptied; the controller moved to this page.
    MovedTo(usize),
}

/// State and actions for one todo view.
pub struct TodoController<R: RemoteSource, S: KeyValueStore> {
    remote: R,
    patches: PatchStore<S>,
    fetch_limit: usize,
    query: PageQuery,
    state: LoadState,
    all: Vec<Item>,
    filtered_count: usize,
    displayed: Vec<Item>,
    total_pages: usize,
    latest_ticket: u64,
}

impl<R: RemoteSource, S: KeyValueStore> TodoController<R, S> {
    /// Create a controller. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(remote: R, patches: PatchStore<S>, query: PageQuery) -> Self {
        Self {
            remote,
            patches,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            query,
            state: LoadState::Loading,
            all: Vec::new(),
            filtered_count: 0,
            displayed: Vec::new(),
            total_pages: 1,
            latest_ticket: 0,
        }
    }

    /// Override how many todos a refresh requests.
    #[must_use]
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit.max(1);
        self
    }

    pub const fn query(&self) -> PageQuery {
        self.query
    }

    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// The current page window.
    pub fn items(&self) -> &[Item] {
        &self.displayed
    }

    /// The whole effective list, unfiltered.
    pub fn all_items(&self) -> &[Item] {
        &self.all
    }

    /// Number of items matching the current status filter.
    pub const fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub const fn patches(&self) -> &PatchStore<S> {
        &self.patches
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    // ── Fetch lifecycle ──────────────────────────────────────

    /// Start a load and return its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.latest_ticket)
    }

    /// Publish the outcome of a load.
    ///
    /// Returns `Ok(false)` when the ticket is stale and the result was
    /// discarded, `Ok(true)` when it was applied.
    ///
    /// # Errors
    ///
    /// Returns the fetch error of a current load, after clearing the list.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Item>>) -> Result<bool> {
        if ticket.0 != self.latest_ticket {
            debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "Discarding stale load result"
            );
            return Ok(false);
        }

        match result {
            Ok(remote) => {
                self.all = merge(&remote, &self.patches.get_all_patches());
                self.state = LoadState::Loaded;
                self.refresh_display();
                Ok(true)
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                self.all.clear();
                self.displayed.clear();
                self.filtered_count = 0;
                self.total_pages = 1;
                Err(e)
            }
        }
    }

    /// Fetch, merge and derive the current page.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the list is empty afterwards.
    pub async fn refresh(&mut self) -> Result<()> {
        let ticket = self.begin_load();
        let result = self.remote.fetch_snapshot(0, self.fetch_limit).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    // ── Navigation ───────────────────────────────────────────

    /// Go to `page` and reload.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn navigate_to_page(&mut self, page: usize) -> Result<()> {
        self.query = self.query.with_page(page);
        self.refresh().await
    }

    /// Change the status filter (back to page 1) and reload.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn set_status(&mut self, status: StatusFilter) -> Result<()> {
        self.query = self.query.with_status(status);
        self.refresh().await
    }

    /// Change the page size (back to page 1) and reload.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn set_per_page(&mut self, per_page: usize) -> Result<()> {
        self.query = self.query.with_per_page(per_page);
        self.refresh().await
    }

    // ── Local actions ────────────────────────────────────────

    /// Create a local todo and show it at the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for empty or whitespace-only text.
    pub fn add(&mut self, text: &str) -> Result<Item> {
        let text = normalize_text(text)?;
        let item = self.patches.create_synthetic(&text);
        info!(id = item.id, "Added todo");

        prepend_to_list(&mut self.all, item.clone());
        self.refresh_display();
        Ok(item)
    }

    /// Flip the completion flag of a todo.
    ///
    /// Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns `Error::TodoNotFound` if `id` is not visible. Without a
    /// loaded list, returns `Error::Fetch` for a remote todo whose
    /// current state is unknown locally.
    pub fn toggle(&mut self, id: i64) -> Result<bool> {
        let current = match self.resolve(id)? {
            Some(item) => item.completed,
            None => self.stored_completion(id)?,
        };
        let completed = !current;
        self.patches.upsert_patch(id, Patch::completed(completed));
        info!(id, completed, "Toggled todo");

        update_in_list(&mut self.all, id, |item| item.completed = completed);
        self.refresh_display();
        Ok(completed)
    }

    /// Replace the text of a todo.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for empty text, `Error::TodoNotFound`
    /// if `id` is not visible.
    pub fn edit(&mut self, id: i64, text: &str) -> Result<()> {
        let text = normalize_text(text)?;
        self.resolve(id)?;
        self.patches.upsert_patch(id, Patch::text(text.clone()));
        info!(id, "Edited todo");

        update_in_list(&mut self.all, id, |item| item.text = text);
        self.refresh_display();
        Ok(())
    }

    /// Hide a todo for good (until reset).
    ///
    /// Steps back one page when the current page became empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::TodoNotFound` if `id` is not visible.
    pub fn remove(&mut self, id: i64) -> Result<Navigation> {
        self.resolve(id)?;
        self.patches.mark_deleted(id);
        info!(id, "Deleted todo");

        remove_from_list(&mut self.all, id);
        if !self.is_loaded() {
            self.refresh_display();
            return Ok(Navigation::Stay);
        }

        let page = page_after_removal(
            &self.all,
            self.query.status(),
            self.query.page(),
            self.query.per_page(),
        );

        let navigation = if page == self.query.page() {
            Navigation::Stay
        } else {
            self.query = self.query.with_page(page);
            Navigation::MovedTo(page)
        };
        self.refresh_display();
        Ok(navigation)
    }

    /// A todo as currently known: from the loaded list, or for a local
    /// todo from the patch store.
    #[must_use]
    pub fn lookup(&self, id: i64) -> Option<Item> {
        if let Some(item) = self.all.iter().find(|item| item.id == id) {
            return Some(item.clone());
        }
        if id >= 0 {
            return None;
        }
        self.patches
            .get_all_patches()
            .get(&id.to_string())
            .filter(|patch| !patch.is_deleted())
            .and_then(|patch| patch.to_synthetic(id))
    }

    /// Drop every local change and reload the pristine snapshot.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn reset(&mut self) -> Result<()> {
        self.patches.clear();
        info!("Cleared local changes");
        self.refresh().await
    }

    fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Check that `id` may be changed.
    ///
    /// With a loaded list only visible todos qualify. Without one, local
    /// todos resolve from the patch store and remote ids are taken on
    /// trust (`Ok(None)`) unless already deleted.
    fn resolve(&self, id: i64) -> Result<Option<Item>> {
        if self.is_loaded() {
            return self
                .all
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .map(Some)
                .ok_or(Error::TodoNotFound { id });
        }

        let patches = self.patches.get_all_patches();
        let patch = patches.get(&id.to_string());
        if patch.is_some_and(Patch::is_deleted) {
            return Err(Error::TodoNotFound { id });
        }
        if id < 0 {
            return patch
                .and_then(|patch| patch.to_synthetic(id))
                .map(Some)
                .ok_or(Error::TodoNotFound { id });
        }

        warn!(id, "Todo list not loaded, changing todo without checking it exists");
        Ok(None)
    }

    /// Completion flag recorded locally for a remote todo.
    fn stored_completion(&self, id: i64) -> Result<bool> {
        self.patches
            .get_all_patches()
            .get(&id.to_string())
            .and_then(|patch| patch.completed)
            .ok_or_else(|| Error::Fetch {
                status: None,
                message: format!("state of todo {id} is unknown until the todo list loads"),
            })
    }

    fn refresh_display(&mut self) {
        let filtered = filter_by_status(&self.all, self.query.status());
        self.displayed = paginate(&filtered, self.query.page(), self.query.per_page()).to_vec();
        self.filtered_count = filtered.len();
        self.total_pages = total_pages(filtered.len(), self.query.per_page());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct FakeRemote {
        items: Vec<Item>,
        fail: bool,
    }

    impl RemoteSource for FakeRemote {
        fn describe(&self) -> String {
            "fake".to_string()
        }

        async fn fetch_snapshot(&self, offset: usize, limit: usize) -> Result<Vec<Item>> {
            if self.fail {
                return Err(Error::Fetch {
                    status: Some(503),
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(self.items.iter().skip(offset).take(limit).cloned().collect())
        }
    }

    fn remote_items(count: i64) -> Vec<Item> {
        (1..=count)
            .map(|id| Item {
                id,
                text: format!("remote {id}"),
                completed: id % 3 == 0,
                owner_tag: 7,
            })
            .collect()
    }

    fn controller(
        count: i64,
        query: PageQuery,
    ) -> TodoController<FakeRemote, MemoryStore> {
        TodoController::new(
            FakeRemote {
                items: remote_items(count),
                fail: false,
            },
            PatchStore::new(MemoryStore::new()),
            query,
        )
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn test_refresh_derives_page() {
        let mut ctl = controller(25, PageQuery::new(3, 10, StatusFilter::All));
        assert_eq!(ctl.state(), &LoadState::Loading);

        ctl.refresh().await.unwrap();
        assert_eq!(ctl.state(), &LoadState::Loaded);
        assert_eq!(ids(ctl.items()), vec![21, 22, 23, 24, 25]);
        assert_eq!(ctl.total_pages(), 3);
        assert_eq!(ctl.filtered_count(), 25);
    }

    #[tokio::test]
    async fn test_fetch_limit_bounds_snapshot() {
        let mut ctl = controller(200, PageQuery::default());
        ctl.refresh().await.unwrap();
        assert_eq!(ctl.all_items().len(), 150);

        let mut ctl = controller(200, PageQuery::default()).with_fetch_limit(20);
        ctl.refresh().await.unwrap();
        assert_eq!(ctl.all_items().len(), 20);
    }

    #[tokio::test]
    async fn test_fetch_failure_empties_list() {
        let mut ctl = controller(5, PageQuery::default());
        ctl.refresh().await.unwrap();
        assert_eq!(ctl.items().len(), 5);

        ctl.remote.fail = true;
        let err = ctl.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert!(matches!(ctl.state(), LoadState::Failed(msg) if msg.contains("Service Unavailable")));
        assert!(ctl.items().is_empty());
        assert!(ctl.all_items().is_empty());
        assert_eq!(ctl.total_pages(), 1);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut ctl = controller(0, PageQuery::default());
        let first = ctl.begin_load();
        let second = ctl.begin_load();
        assert!(first < second);

        assert!(ctl.finish_load(second, Ok(remote_items(2))).unwrap());
        assert!(!ctl.finish_load(first, Ok(remote_items(9))).unwrap());
        assert_eq!(ids(ctl.items()), vec![1, 2]);

        let third = ctl.begin_load();
        let stale_error = Err(Error::Fetch {
            status: None,
            message: "late".to_string(),
        });
        assert!(!ctl.finish_load(second, stale_error).unwrap());
        assert_eq!(ctl.state(), &LoadState::Loading);
        assert!(ctl.finish_load(third, Ok(remote_items(3))).unwrap());
        assert_eq!(ctl.items().len(), 3);
    }

    #[tokio::test]
    async fn test_add_shows_item_first_and_persists() {
        let mut ctl = controller(3, PageQuery::default());
        ctl.refresh().await.unwrap();

        let first = ctl.add("  first local  ").unwrap();
        let second = ctl.add("second local").unwrap();
        assert_eq!(first.id, -1);
        assert_eq!(first.text, "first local");
        assert_eq!(second.id, -2);
        assert_eq!(ids(ctl.items()), vec![-2, -1, 1, 2, 3]);

        // A fresh load orders synthetic items the same way.
        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![-2, -1, 1, 2, 3]);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut ctl = controller(0, PageQuery::default());
        assert!(matches!(ctl.add("   "), Err(Error::Validation(_))));
        assert!(ctl.patches().get_all_patches().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_and_edit_survive_refresh() {
        let mut ctl = controller(3, PageQuery::default());
        ctl.refresh().await.unwrap();

        assert!(ctl.toggle(1).unwrap());
        ctl.edit(2, " renamed ").unwrap();
        assert_eq!(ctl.lookup(2).unwrap().text, "renamed");

        ctl.refresh().await.unwrap();
        assert!(ctl.items()[0].completed);
        assert_eq!(ctl.items()[1].text, "renamed");

        assert!(!ctl.toggle(1).unwrap());
    }

    fn offline_controller(count: i64) -> TodoController<FakeRemote, MemoryStore> {
        let mut ctl = controller(count, PageQuery::default());
        ctl.remote.fail = true;
        ctl
    }

    #[tokio::test]
    async fn test_local_todo_changes_work_offline() {
        let mut ctl = offline_controller(3);
        ctl.add("offline").unwrap();
        assert!(ctl.refresh().await.is_err());

        assert!(ctl.toggle(-1).unwrap());
        ctl.edit(-1, "still offline").unwrap();
        let item = ctl.lookup(-1).unwrap();
        assert!(item.completed);
        assert_eq!(item.text, "still offline");

        assert_eq!(ctl.remove(-1).unwrap(), Navigation::Stay);
        assert!(ctl.lookup(-1).is_none());
        assert!(matches!(ctl.toggle(-1), Err(Error::TodoNotFound { id: -1 })));
        assert!(matches!(ctl.toggle(-7), Err(Error::TodoNotFound { id: -7 })));

        ctl.remote.fail = false;
        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_remote_todo_changes_offline_are_best_effort() {
        let mut ctl = offline_controller(3);
        assert!(ctl.refresh().await.is_err());

        ctl.edit(2, "edited blind").unwrap();
        assert!(matches!(ctl.toggle(2), Err(Error::Fetch { .. })));
        ctl.remove(3).unwrap();
        assert!(matches!(ctl.edit(3, "again"), Err(Error::TodoNotFound { id: 3 })));

        ctl.remote.fail = false;
        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![1, 2]);
        assert_eq!(ctl.items()[1].text, "edited blind");

        assert!(ctl.toggle(1).unwrap());
        ctl.remote.fail = true;
        assert!(ctl.refresh().await.is_err());
        // The flag is stored locally now, so it can flip offline.
        assert!(!ctl.toggle(1).unwrap());
    }

    #[tokio::test]
    async fn test_actions_on_unknown_id() {
        let mut ctl = controller(3, PageQuery::default());
        ctl.refresh().await.unwrap();

        assert!(matches!(ctl.toggle(99), Err(Error::TodoNotFound { id: 99 })));
        assert!(matches!(ctl.edit(99, "x"), Err(Error::TodoNotFound { .. })));
        assert!(matches!(ctl.remove(99), Err(Error::TodoNotFound { .. })));
        assert!(matches!(ctl.edit(1, ""), Err(Error::Validation(_))));
        assert!(ctl.patches().get_all_patches().is_empty());
    }

    #[tokio::test]
    async fn test_removed_item_stays_gone() {
        let mut ctl = controller(4, PageQuery::default());
        ctl.refresh().await.unwrap();

        assert_eq!(ctl.remove(2).unwrap(), Navigation::Stay);
        assert_eq!(ids(ctl.items()), vec![1, 3, 4]);

        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![1, 3, 4]);
        assert!(matches!(ctl.toggle(2), Err(Error::TodoNotFound { .. })));
    }

    #[tokio::test]
    async fn test_removing_only_item_on_last_page_moves_back() {
        let mut ctl = controller(11, PageQuery::new(2, 10, StatusFilter::All));
        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![11]);

        assert_eq!(ctl.remove(11).unwrap(), Navigation::MovedTo(1));
        assert_eq!(ctl.query().page(), 1);
        assert_eq!(ctl.items().len(), 10);
        assert_eq!(ctl.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_filtered_pages() {
        // Completed remote ids: 3, 6, 9, 12.
        let mut ctl = controller(12, PageQuery::new(1, 3, StatusFilter::Completed));
        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![3, 6, 9]);
        assert_eq!(ctl.total_pages(), 2);

        ctl.navigate_to_page(2).await.unwrap();
        assert_eq!(ids(ctl.items()), vec![12]);

        ctl.set_status(StatusFilter::Pending).await.unwrap();
        assert_eq!(ctl.query().page(), 1);
        assert_eq!(ids(ctl.items()), vec![1, 2, 4]);

        ctl.set_per_page(5).await.unwrap();
        assert_eq!(ids(ctl.items()), vec![1, 2, 4, 5, 7]);
    }

    #[tokio::test]
    async fn test_toggle_moves_item_between_filters() {
        let mut ctl = controller(3, PageQuery::new(1, 10, StatusFilter::Pending));
        ctl.refresh().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![1, 2]);

        ctl.toggle(1).unwrap();
        assert_eq!(ids(ctl.items()), vec![2]);
    }

    #[tokio::test]
    async fn test_reset_restores_snapshot() {
        let mut ctl = controller(3, PageQuery::default());
        ctl.refresh().await.unwrap();
        ctl.add("local").unwrap();
        ctl.remove(1).unwrap();
        ctl.edit(2, "changed").unwrap();

        ctl.reset().await.unwrap();
        assert_eq!(ids(ctl.items()), vec![1, 2, 3]);
        assert_eq!(ctl.items()[1].text, "remote 2");
        assert!(ctl.patches().get_all_patches().is_empty());
    }
}
