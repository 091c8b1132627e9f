use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// json-server style slicing: `_start` skips, `_limit` caps. Both optional.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "_start")]
    pub start: Option<usize>,
    #[serde(rename = "_limit")]
    pub limit: Option<usize>,
}

/// Items in insertion order, which is also list order.
pub type Db = Arc<RwLock<Vec<Item>>>;

pub fn app() -> Router {
    app_with_items(Vec::new())
}

pub fn app_with_items(items: Vec<Item>) -> Router {
    let db: Db = Arc::new(RwLock::new(items));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", patch(update_item).delete(delete_item))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Vec::new()).await
}

pub async fn serve(listener: TcpListener, items: Vec<Item>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_items(items)).await
}

async fn list_items(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Item>> {
    let items = db.read().await;
    let page: Vec<Item> = items
        .iter()
        .skip(params.start.unwrap_or(0))
        .take(params.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    debug!(start = ?params.start, limit = ?params.limit, returned = page.len(), "list items");
    Json(page)
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        text: input.text,
        completed: input.completed,
    };
    db.write().await.push(item.clone());
    debug!(id = %item.id, "created item");
    (StatusCode::CREATED, Json(item))
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = db.write().await;
    let item = items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(text) = input.text {
        item.text = text;
    }
    if let Some(completed) = input.completed {
        item.completed = completed;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut items = db.write().await;
    let index = items
        .iter()
        .position(|item| item.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    items.remove(index);
    Ok(StatusCode::NO_CONTENT)
}
