//! 适配器指标快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use t2w_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            requests_received: snapshot.requests_received,
            requests_unauthorized: snapshot.requests_unauthorized,
            requests_without_location: snapshot.requests_without_location,
            fields_unmapped: snapshot.fields_unmapped,
            field_parse_errors: snapshot.field_parse_errors,
            records_built: snapshot.records_built,
            forward_success: snapshot.forward_success,
            forward_failure: snapshot.forward_failure,
            forward_latency_ms_total: snapshot.forward_latency_ms_total,
            forward_latency_ms_count: snapshot.forward_latency_ms_count,
        })),
    )
        .into_response()
}
