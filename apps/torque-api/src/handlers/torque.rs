//! Torque 上报 handler
//!
//! - GET /api/torque
//!
//! Torque 会持续重推未被确认的数据，且无法处理错误，
//! 因此无论校验或上送结果如何，一律应答 200 `OK!`。

use crate::AppState;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use t2w_config::ForwardErrorPolicy;
use t2w_telemetry::{
    record_field_parse_error, record_fields_unmapped, record_forward_failure,
    record_forward_latency_ms, record_forward_success, record_records_built,
    record_request_received, record_request_unauthorized, record_request_without_location,
};
use t2w_translate::{TorqueQuery, TranslatedRequest, Translation};
use tracing::{debug, error, info, warn};

/// Torque 固定确认体。
pub const ACK_BODY: &str = "OK!";

pub async fn torque_upload(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    record_request_received();
    let params = match params {
        Ok(Query(params)) => params,
        Err(err) => {
            warn!(target: "torque.upload", error = %err, "torque_query_unreadable");
            Vec::new()
        }
    };
    let query = TorqueQuery::from_pairs(params);

    match state.translator.translate(&query) {
        Translation::Unauthorized { caller } => {
            record_request_unauthorized();
            info!(target: "torque.upload", caller = %caller, "torque_caller_unauthorized");
        }
        Translation::MissingLocation => {
            record_request_without_location();
            info!(target: "torque.upload", "torque_without_location");
        }
        Translation::Accepted(request) => forward_request(&state, request).await,
    }
    acknowledge()
}

/// 逐条上送；失败按配置策略处理，不影响应答。
async fn forward_request(state: &AppState, request: TranslatedRequest) {
    for err in &request.field_errors {
        record_field_parse_error();
        warn!(target: "torque.upload", error = %err, "torque_field_degraded");
    }
    record_fields_unmapped(request.unmapped_fields as u64);
    record_records_built(request.records.len() as u64);

    let mut forwarded = 0usize;
    for record in &request.records {
        let started_at = Instant::now();
        match state.forwarder.forward(record).await {
            Ok(()) => {
                forwarded += 1;
                record_forward_success();
                record_forward_latency_ms(started_at.elapsed().as_millis() as u64);
                debug!(target: "torque.upload", metric = %record.metric_name, "gts_forwarded");
            }
            Err(err) => {
                record_forward_failure();
                match state.forward_error_policy {
                    ForwardErrorPolicy::Log => {
                        warn!(
                            target: "torque.upload",
                            metric = %record.metric_name,
                            error = %err,
                            "gts_forward_failed"
                        );
                    }
                    ForwardErrorPolicy::Fatal => {
                        error!(
                            target: "torque.upload",
                            metric = %record.metric_name,
                            error = %err,
                            "gts_forward_failed_fatal"
                        );
                        state.fatal.trigger(err.to_string());
                        return;
                    }
                }
            }
        }
    }
    info!(
        target: "torque.upload",
        built = request.records.len(),
        forwarded = forwarded,
        unmapped = request.unmapped_fields,
        "torque_request_forwarded"
    );
}

pub fn acknowledge() -> Response {
    ([(header::CONTENT_TYPE, "text/html")], ACK_BODY).into_response()
}
