//! Paginated client core for a remote item list.
//!
//! # Overview
//! Keeps one locally held page of items consistent with a Remote Item Store
//! across create, update, delete and page navigation. The controller never touches
//! the network: it builds `HttpRequest` values and consumes `HttpResponse`
//! values, and the host performs the round-trip.
//!
//! # Design
//! - `ItemClient` is the stateless codec for the store's REST surface.
//! - `PageController` owns the page state and edit session. Its operations
//!   return tagged requests, and `handle` applies their results.
//! - `Session` drives a controller synchronously over any `Transport`,
//!   retrying idempotent requests.
//! - `PageView` is the UI projected from controller state.
//! - `UreqTransport` (feature `ureq`, on by default) is a blocking
//!   `Transport` for hosts that do not bring their own.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod pagination;
pub mod session;
pub mod types;
#[cfg(feature = "ureq")]
pub mod ureq_transport;
pub mod view;

pub use client::ItemClient;
pub use controller::{ControllerConfig, EditSession, Outgoing, PageController, PageState, Ticket};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use pagination::DEFAULT_PAGE_SIZE;
pub use session::{RetryPolicy, Session};
pub use types::{CreateItem, Item, UpdateItem};
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;
pub use view::{PageView, RowView};
