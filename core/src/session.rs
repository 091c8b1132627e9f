//! Synchronous driver pairing a `PageController` with a `Transport`.
//!
//! Each operation drains its whole request queue, follow-ups included,
//! before returning. Requests run one at a time in FIFO order, so a session
//! never sees out-of-order responses; the controller still guards page
//! loads and count refreshes for hosts that execute requests concurrently.
//!
//! An operation fails only when one of its own requests fails. Once a
//! mutation has been applied, a failed reconcile (the page reload or count
//! refresh that follows it) is logged and left in `PageState::last_error`
//! rather than reported as a failure of the mutation.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::controller::{Outgoing, PageController};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Retry settings for idempotent requests (GET, PATCH, DELETE).
///
/// Only transport failures and 5xx responses are retried. Creation is never
/// retried, since the store has no way to deduplicate a repeated POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first. 0 behaves like 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct Session<T> {
    controller: PageController,
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> Session<T> {
    pub fn new(controller: PageController, transport: T) -> Self {
        Self {
            controller,
            transport,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    pub fn mount(&mut self) -> Result<(), ApiError> {
        let out = self.controller.mount();
        self.drive(out)
    }

    pub fn reload(&mut self) -> Result<(), ApiError> {
        let out = self.controller.reload();
        self.drive(out)
    }

    pub fn load_page(&mut self, page_index: usize) -> Result<(), ApiError> {
        let out = self.controller.load_page(page_index);
        self.drive(vec![out])
    }

    pub fn refresh_total_count(&mut self) -> Result<(), ApiError> {
        let out = self.controller.refresh_total_count();
        self.drive(vec![out])
    }

    pub fn add_item(&mut self, text: &str) -> Result<(), ApiError> {
        let out = self.controller.add_item(text)?;
        self.drive(out.into_iter().collect())
    }

    pub fn toggle_completion(&mut self, id: Uuid) -> Result<(), ApiError> {
        let out = self.controller.toggle_completion(id)?;
        self.drive(out.into_iter().collect())
    }

    pub fn delete_item(&mut self, id: Uuid) -> Result<(), ApiError> {
        let out = self.controller.delete_item(id);
        self.drive(vec![out])
    }

    pub fn begin_edit(&mut self, id: Uuid, current_text: &str) {
        self.controller.begin_edit(id, current_text);
    }

    pub fn set_draft(&mut self, text: &str) {
        self.controller.set_draft(text);
    }

    pub fn cancel_edit(&mut self) {
        self.controller.cancel_edit();
    }

    pub fn save_edit(&mut self, id: Uuid, new_text: &str) -> Result<(), ApiError> {
        let out = self.controller.save_edit(id, new_text)?;
        self.drive(out.into_iter().collect())
    }

    /// Returns `Ok(false)` when the move was out of range and nothing was
    /// sent.
    pub fn navigate(&mut self, delta: isize) -> Result<bool, ApiError> {
        match self.controller.navigate(delta) {
            Some(out) => self.drive(vec![out]).map(|()| true),
            None => Ok(false),
        }
    }

    /// Runs `initial` and every follow-up. Returns the first failure among
    /// `initial`, after the queue has been fully drained.
    fn drive(&mut self, initial: Vec<Outgoing>) -> Result<(), ApiError> {
        let mut queue: VecDeque<(Outgoing, bool)> =
            initial.into_iter().map(|out| (out, true)).collect();
        let mut first_error = None;
        while let Some((Outgoing { ticket, request }, primary)) = queue.pop_front() {
            let result = self.execute(&request);
            match self.controller.handle(ticket, result) {
                Ok(follow_ups) => queue.extend(follow_ups.into_iter().map(|out| (out, false))),
                Err(err) if primary => {
                    first_error.get_or_insert(err);
                }
                Err(err) => debug!(error = %err, "reconcile failed after applied change"),
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let attempts = if request.method.is_idempotent() {
            self.retry.max_attempts.max(1)
        } else {
            1
        };
        let mut attempt = 1;
        loop {
            let result = self.transport.execute(request);
            let transient = match &result {
                Ok(response) => response.is_server_error(),
                Err(err) => err.is_transient(),
            };
            if !transient || attempt >= attempts {
                return result;
            }
            warn!(method = request.method.as_str(), path = %request.path, attempt, "retrying request");
            if !self.retry.backoff.is_zero() {
                std::thread::sleep(self.retry.backoff);
            }
            attempt += 1;
        }
    }
}
