//! Pagination sync controller.
//!
//! # Overview
//! `PageController` owns one page of items, the total item count and the
//! edit session. Operations never perform I/O: they return `Outgoing`
//! requests tagged with a `Ticket`, and the host feeds each result back
//! through `PageController::handle`, which applies it and may return
//! follow-up requests.
//!
//! # Design
//! - Page loads and count refreshes each carry a generation number. Only
//!   the most recently issued load may replace `items`, and only the most
//!   recent refresh may set `total_count`; older responses and failures are
//!   dropped whenever they arrive.
//! - Every successful mutation applies the change it already knows about
//!   and then reloads the current page. Adds and deletes also refresh the
//!   total count, so the page count never lags a size change.
//! - Failures are logged and kept in `PageState::last_error`; local state is
//!   otherwise left as it was.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::ItemClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::types::{CreateItem, Item, UpdateItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub page_size: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The locally held, possibly stale view of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub page_index: usize,
    pub items: Vec<Item>,
    pub total_count: usize,
    /// True until the first page load succeeds.
    pub loading: bool,
    /// Most recent failure; cleared by the next successful response.
    pub last_error: Option<ApiError>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_index: 0,
            items: Vec::new(),
            total_count: 0,
            loading: true,
            last_error: None,
        }
    }
}

/// At most one item is edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    pub target_id: Option<Uuid>,
    pub draft_text: String,
}

impl EditSession {
    pub fn is_editing(&self, id: Uuid) -> bool {
        self.target_id == Some(id)
    }
}

/// Identifies what an in-flight request was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ticket {
    LoadPage { page_index: usize, generation: u64 },
    CountAll { generation: u64 },
    Create,
    Toggle { id: Uuid, completed: bool },
    Rename { id: Uuid, text: String },
    Delete { id: Uuid },
}

/// A request the host must execute, and the ticket to hand back with its
/// result.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

#[derive(Debug, Clone)]
pub struct PageController {
    client: ItemClient,
    page_size: usize,
    state: PageState,
    edit: EditSession,
    generation: u64,
    count_generation: u64,
}

impl PageController {
    pub fn new(client: ItemClient, config: ControllerConfig) -> Self {
        Self {
            client,
            page_size: config.page_size.max(1),
            state: PageState::default(),
            edit: EditSession::default(),
            generation: 0,
            count_generation: 0,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.state.total_count, self.page_size)
    }

    pub fn can_go_prev(&self) -> bool {
        pagination::can_go_prev(self.state.page_index)
    }

    pub fn can_go_next(&self) -> bool {
        pagination::can_go_next(self.state.page_index, self.total_pages())
    }

    /// Initial page and count.
    pub fn mount(&mut self) -> Vec<Outgoing> {
        vec![self.load_page(0), self.refresh_total_count()]
    }

    /// Current page and count again.
    pub fn reload(&mut self) -> Vec<Outgoing> {
        self.resync()
    }

    pub fn load_page(&mut self, page_index: usize) -> Outgoing {
        self.generation += 1;
        self.state.page_index = page_index;
        let offset = pagination::offset(page_index, self.page_size);
        Outgoing {
            ticket: Ticket::LoadPage {
                page_index,
                generation: self.generation,
            },
            request: self.client.build_list_page(offset, self.page_size),
        }
    }

    pub fn refresh_total_count(&mut self) -> Outgoing {
        self.count_generation += 1;
        Outgoing {
            ticket: Ticket::CountAll {
                generation: self.count_generation,
            },
            request: self.client.build_list_all(),
        }
    }

    /// Returns `None` for blank text.
    pub fn add_item(&mut self, text: &str) -> Result<Option<Outgoing>, ApiError> {
        if text.trim().is_empty() {
            debug!("ignoring add with blank text");
            return Ok(None);
        }
        let built = self.client.build_create_item(&CreateItem::new(text));
        let request = self.record(built)?;
        Ok(Some(Outgoing {
            ticket: Ticket::Create,
            request,
        }))
    }

    /// Returns `None` when `id` is not on the current page, since the
    /// flipped value is only known for items held locally.
    pub fn toggle_completion(&mut self, id: Uuid) -> Result<Option<Outgoing>, ApiError> {
        let Some(item) = self.state.items.iter().find(|item| item.id == id) else {
            debug!(%id, "toggle for item not on current page");
            return Ok(None);
        };
        let completed = !item.completed;
        let built = self.client.build_update_item(id, &UpdateItem::completed(completed));
        let request = self.record(built)?;
        Ok(Some(Outgoing {
            ticket: Ticket::Toggle { id, completed },
            request,
        }))
    }

    pub fn delete_item(&mut self, id: Uuid) -> Outgoing {
        Outgoing {
            ticket: Ticket::Delete { id },
            request: self.client.build_delete_item(id),
        }
    }

    /// Starts editing `id`, discarding any other unsaved draft.
    pub fn begin_edit(&mut self, id: Uuid, current_text: &str) {
        if let Some(previous) = self.edit.target_id.filter(|prev| *prev != id) {
            debug!(%previous, %id, "discarding unsaved edit");
        }
        self.edit = EditSession {
            target_id: Some(id),
            draft_text: current_text.to_string(),
        };
    }

    pub fn set_draft(&mut self, text: &str) {
        if self.edit.target_id.is_some() {
            self.edit.draft_text = text.to_string();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditSession::default();
    }

    /// Returns `None` for blank text; the edit session stays open.
    pub fn save_edit(&mut self, id: Uuid, new_text: &str) -> Result<Option<Outgoing>, ApiError> {
        if new_text.trim().is_empty() {
            debug!(%id, "ignoring save with blank text");
            return Ok(None);
        }
        let built = self.client.build_update_item(id, &UpdateItem::text(new_text));
        let request = self.record(built)?;
        Ok(Some(Outgoing {
            ticket: Ticket::Rename {
                id,
                text: new_text.to_string(),
            },
            request,
        }))
    }

    /// Moves `delta` pages. Returns `None` when the target lies outside
    /// `[0, total_pages)`, matching disabled prev/next controls. Page 0 is
    /// always reachable.
    pub fn navigate(&mut self, delta: isize) -> Option<Outgoing> {
        let Some(target) = self.state.page_index.checked_add_signed(delta) else {
            debug!(page_index = self.state.page_index, delta, "navigation before first page");
            return None;
        };
        if target != 0 && target >= self.total_pages() {
            debug!(target, total_pages = self.total_pages(), "navigation past last page");
            return None;
        }
        Some(self.load_page(target))
    }

    /// Applies the result of a request issued by this controller.
    ///
    /// Returns the follow-up requests on success. On failure the error is
    /// logged, stored in `last_error` and returned; nothing else changes.
    /// Results of superseded page loads and count refreshes are dropped
    /// with `Ok(vec![])`.
    pub fn handle(
        &mut self,
        ticket: Ticket,
        result: Result<HttpResponse, ApiError>,
    ) -> Result<Vec<Outgoing>, ApiError> {
        match ticket {
            Ticket::LoadPage { page_index, generation } if generation != self.generation => {
                debug!(page_index, generation, latest = self.generation, "dropping stale page response");
                return Ok(Vec::new());
            }
            Ticket::CountAll { generation } if generation != self.count_generation => {
                debug!(generation, latest = self.count_generation, "dropping stale count response");
                return Ok(Vec::new());
            }
            _ => {}
        }
        match self.apply(&ticket, result) {
            Ok(follow_ups) => {
                self.state.last_error = None;
                Ok(follow_ups)
            }
            Err(err) => {
                warn!(?ticket, error = %err, "item store request failed");
                self.state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn apply(
        &mut self,
        ticket: &Ticket,
        result: Result<HttpResponse, ApiError>,
    ) -> Result<Vec<Outgoing>, ApiError> {
        let response = result?;
        match ticket {
            Ticket::LoadPage { .. } => {
                self.state.items = self.client.parse_list_items(response)?;
                self.state.loading = false;
                Ok(Vec::new())
            }
            Ticket::CountAll { .. } => {
                self.state.total_count = self.client.parse_list_items(response)?.len();
                let last = pagination::last_page(self.total_pages());
                if self.state.page_index > last {
                    debug!(page_index = self.state.page_index, last, "page vanished, stepping back");
                    return Ok(vec![self.load_page(last)]);
                }
                Ok(Vec::new())
            }
            Ticket::Create => {
                self.client.parse_create_item(response)?;
                Ok(self.resync())
            }
            Ticket::Toggle { id, completed } => {
                self.client.parse_update_item(response)?;
                if let Some(item) = self.find_mut(*id) {
                    item.completed = *completed;
                }
                let page_index = self.state.page_index;
                Ok(vec![self.load_page(page_index)])
            }
            Ticket::Rename { id, text } => {
                self.client.parse_update_item(response)?;
                if let Some(item) = self.find_mut(*id) {
                    item.text = text.clone();
                }
                if self.edit.is_editing(*id) {
                    self.edit = EditSession::default();
                }
                let page_index = self.state.page_index;
                Ok(vec![self.load_page(page_index)])
            }
            Ticket::Delete { id } => {
                self.client.parse_delete_item(response)?;
                self.state.items.retain(|item| item.id != *id);
                Ok(self.resync())
            }
        }
    }

    fn resync(&mut self) -> Vec<Outgoing> {
        let page_index = self.state.page_index;
        vec![self.load_page(page_index), self.refresh_total_count()]
    }

    fn find_mut(&mut self, id: Uuid) -> Option<&mut Item> {
        self.state.items.iter_mut().find(|item| item.id == id)
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.inspect_err(|err| {
            warn!(error = %err, "failed to build request");
            self.state.last_error = Some(err.clone());
        })
    }
}
