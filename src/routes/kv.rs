//! Raw access to flat string keys of the store.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KeyValue {
    key: String,
    value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetResult {
    message: String,
}

pub async fn get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyValue>, ApiError> {
    let value = state.store.get(&key).await?;
    Ok(Json(KeyValue { key, value }))
}

pub async fn set_value(
    State(state): State<AppState>,
    Path((key, value)): Path<(String, String)>,
) -> Result<Json<SetResult>, ApiError> {
    state.store.set(&key, &value).await?;
    Ok(Json(SetResult {
        message: format!("Set {} = {}", key, value),
    }))
}
