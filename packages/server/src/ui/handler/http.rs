//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        http::{RoomDetailDto, RoomSummaryDto},
        websocket::DirectoryEntryDto,
    },
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_name).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(GetRoomDetailError::RoomNotFound(name)) => {
            tracing::debug!("Room '{}' not found", name);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Current online-user directory
pub async fn get_directory(State(state): State<Arc<AppState>>) -> Json<Vec<DirectoryEntryDto>> {
    let entries = state.directory.snapshot().await;
    Json(entries.iter().map(DirectoryEntryDto::from).collect())
}
