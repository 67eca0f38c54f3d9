//! 健康检查与兜底路由。

use crate::AppState;
use api_contract::{ApiResponse, HealthDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(HealthDto {
            ok: true,
            directory_entries: state.translator.directory().len(),
        }),
    )
        .into_response()
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("ROUTE.NOT_FOUND", "not found")),
    )
        .into_response()
}
