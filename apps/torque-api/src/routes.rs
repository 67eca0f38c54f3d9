//! 路由定义
//!
//! - Torque 上报：/api/torque
//! - 健康检查：/health
//! - 指标快照：/metrics

use super::AppState;
use super::handlers::*;
use super::middleware::request_context;
use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

/// 创建完整的应用路由（含追踪中间件）。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/torque", get(torque_upload))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}
