//! Library listings shared by every entity kind
//!
//! A [`LibraryController`] owns one [`LibraryState`] and keeps it in step
//! with the server: immediate refreshes after writes, debounced refreshes
//! after page/search/sort edits, and last-write-wins on responses.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::application::error::ForgeError;
use crate::application::ports::outbound::{ApiError, ForgeApiPort};
use crate::application::state::{BusyFlag, LibraryParams, LibraryState};
use crate::application::services::url_sync::UrlSync;
use crate::domain::entities::ListResponse;
use crate::domain::value_objects::{
    CharacterId, CreatureId, EntityKind, LibrarySort, ListQuery, MagicItemId, ProgressionId,
    RecordId, SpellId,
};

/// The list and delete calls of one library
#[async_trait]
pub trait LibraryEndpoint: Send + Sync + 'static {
    type Id: RecordId;

    fn name(&self) -> &'static str;

    async fn list(&self, query: &ListQuery) -> Result<ListResponse<Self::Id>, ApiError>;

    async fn delete(&self, id: Self::Id) -> Result<(), ApiError>;
}

macro_rules! library_endpoint {
    ($name:ident, $id:ty, $label:literal, $list:ident, $delete:ident) => {
        pub struct $name(pub Arc<dyn ForgeApiPort>);

        #[async_trait]
        impl LibraryEndpoint for $name {
            type Id = $id;

            fn name(&self) -> &'static str {
                $label
            }

            async fn list(&self, query: &ListQuery) -> Result<ListResponse<$id>, ApiError> {
                self.0.$list(query).await
            }

            async fn delete(&self, id: $id) -> Result<(), ApiError> {
                self.0.$delete(id).await
            }
        }
    };
}

library_endpoint!(CharacterLibrary, CharacterId, "characters", list_characters, delete_character);
library_endpoint!(MagicItemLibrary, MagicItemId, "items", list_magic_items, delete_magic_item);
library_endpoint!(SpellLibrary, SpellId, "spells", list_spells, delete_spell);
library_endpoint!(CreatureLibrary, CreatureId, "creatures", list_creatures, delete_creature);
library_endpoint!(
    ProgressionLibrary,
    ProgressionId,
    "progressions",
    list_progressions,
    delete_progression
);

pub struct LibraryController<E: LibraryEndpoint> {
    endpoint: E,
    state: RwLock<LibraryState<E::Id>>,
    url: Option<(UrlSync, EntityKind)>,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    deleting: BusyFlag,
}

impl<E: LibraryEndpoint> LibraryController<E> {
    pub fn new(endpoint: E, page_size: u32, debounce: Duration) -> Self {
        Self {
            endpoint,
            state: RwLock::new(LibraryState::new(page_size)),
            url: None,
            debounce,
            pending: Mutex::new(None),
            deleting: BusyFlag::new(),
        }
    }

    /// Mirror this library's page/search/sort into the URL under `kind`
    pub fn with_url_sync(mut self, url: UrlSync, kind: EntityKind) -> Self {
        self.url = Some((url, kind));
        self
    }

    pub async fn view(&self) -> LibraryState<E::Id> {
        self.state.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.is_loaded()
    }

    /// Fetch the current page now. Returns after the response is applied
    /// (or discarded as stale). A page left past the end by a shrunken total
    /// is pulled back into range and fetched once more.
    #[instrument(skip(self), fields(library = self.endpoint.name()))]
    pub async fn refresh(&self) -> Result<(), ApiError> {
        if self.fetch().await? {
            debug!("Page was past the end, fetching the last page");
            self.publish_url().await;
            self.fetch().await?;
        }
        Ok(())
    }

    /// One list round trip. Returns `true` when applying the response moved
    /// the page back into range.
    async fn fetch(&self) -> Result<bool, ApiError> {
        let (token, query) = self.state.write().await.begin_request();
        debug!(token, page = query.page, search = %query.search, sort = %query.sort, "Listing");
        match self.endpoint.list(&query).await {
            Ok(response) => {
                let total = response.total;
                let mut state = self.state.write().await;
                if !state.apply(token, response) {
                    debug!(token, "Discarded stale list response");
                    return Ok(false);
                }
                debug!(token, total, "Applied list response");
                Ok(state.page() != query.page)
            }
            Err(err) => {
                self.state.write().await.fail(token);
                Err(err)
            }
        }
    }

    /// Refresh after the debounce window, superseding any pending refresh.
    /// Does nothing while the library is not on screen.
    pub async fn schedule_refresh(self: &Arc<Self>) {
        if !self.state.read().await.is_active() {
            return;
        }
        let this = Arc::clone(self);
        let delay = self.debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !this.state.read().await.is_active() {
                return;
            }
            if let Err(err) = this.refresh().await {
                warn!(library = this.endpoint.name(), error = %err, "Debounced refresh failed");
            }
        });
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Mark the library as on or off screen. Becoming visible for the first
    /// time triggers the initial listing. Going off screen drops a pending
    /// debounced refresh.
    pub async fn set_active(&self, active: bool) -> Result<(), ApiError> {
        if !active {
            self.cancel_pending();
        }
        let needs_load = {
            let mut state = self.state.write().await;
            state.set_active(active);
            active && !state.is_loaded() && !state.is_busy()
        };
        if needs_load {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Adopt page/search/sort read from the URL without fetching
    pub async fn restore(&self, params: &LibraryParams) {
        self.state.write().await.restore(params);
        self.publish_url().await;
    }

    pub async fn set_page(self: &Arc<Self>, page: i64) -> bool {
        let changed = self.state.write().await.set_page(page);
        self.after_edit(changed).await
    }

    pub async fn next_page(self: &Arc<Self>) -> bool {
        let changed = self.state.write().await.next_page();
        self.after_edit(changed).await
    }

    pub async fn prev_page(self: &Arc<Self>) -> bool {
        let changed = self.state.write().await.prev_page();
        self.after_edit(changed).await
    }

    pub async fn set_search(self: &Arc<Self>, search: impl Into<String>) -> bool {
        let changed = self.state.write().await.set_search(search);
        self.after_edit(changed).await
    }

    pub async fn set_sort(self: &Arc<Self>, sort: LibrarySort) -> bool {
        let changed = self.state.write().await.set_sort(sort);
        self.after_edit(changed).await
    }

    async fn after_edit(self: &Arc<Self>, changed: bool) -> bool {
        if changed {
            self.publish_url().await;
            self.schedule_refresh().await;
        }
        changed
    }

    async fn publish_url(&self) {
        if let Some((url, kind)) = &self.url {
            let params = self.state.read().await.params();
            url.set_library(*kind, params);
        }
    }

    /// Delete a record, then refresh the listing once the delete has landed
    #[instrument(skip(self), fields(library = self.endpoint.name(), record_id = %id))]
    pub async fn delete(&self, id: E::Id) -> Result<(), ForgeError> {
        let _guard = self.deleting.try_acquire().ok_or(ForgeError::Busy("delete"))?;
        self.endpoint.delete(id).await?;
        info!(record_id = %id, "Deleted from {}", self.endpoint.name());
        self.refresh_after_write().await;
        Ok(())
    }

    /// Refresh following a save or delete. The write already succeeded, so a
    /// failed listing is only logged.
    pub async fn refresh_after_write(&self) {
        if let Err(err) = self.refresh().await {
            warn!(library = self.endpoint.name(), error = %err, "Refresh after write failed");
        }
    }

    /// Abort a pending debounced refresh
    pub fn cancel_pending(&self) {
        if let Some(task) = self
            .pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            task.abort();
        }
    }
}

impl<E: LibraryEndpoint> Drop for LibraryController<E> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
