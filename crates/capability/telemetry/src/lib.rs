//! 追踪、请求 ID 与进程级计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub requests_unauthorized: u64,
    pub requests_without_location: u64,
    pub fields_unmapped: u64,
    pub field_parse_errors: u64,
    pub records_built: u64,
    pub forward_success: u64,
    pub forward_failure: u64,
    pub forward_latency_ms_total: u64,
    pub forward_latency_ms_count: u64,
}

/// 适配器计数器。
#[derive(Default)]
pub struct TelemetryMetrics {
    requests_received: AtomicU64,
    requests_unauthorized: AtomicU64,
    requests_without_location: AtomicU64,
    fields_unmapped: AtomicU64,
    field_parse_errors: AtomicU64,
    records_built: AtomicU64,
    forward_success: AtomicU64,
    forward_failure: AtomicU64,
    forward_latency_ms_total: AtomicU64,
    forward_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_unauthorized: self.requests_unauthorized.load(Ordering::Relaxed),
            requests_without_location: self.requests_without_location.load(Ordering::Relaxed),
            fields_unmapped: self.fields_unmapped.load(Ordering::Relaxed),
            field_parse_errors: self.field_parse_errors.load(Ordering::Relaxed),
            records_built: self.records_built.load(Ordering::Relaxed),
            forward_success: self.forward_success.load(Ordering::Relaxed),
            forward_failure: self.forward_failure.load(Ordering::Relaxed),
            forward_latency_ms_total: self.forward_latency_ms_total.load(Ordering::Relaxed),
            forward_latency_ms_count: self.forward_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录 Torque 上报请求次数。
pub fn record_request_received() {
    metrics().requests_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录调用方不在白名单的请求次数。
pub fn record_request_unauthorized() {
    metrics()
        .requests_unauthorized
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录缺少 GPS 字段的请求次数。
pub fn record_request_without_location() {
    metrics()
        .requests_without_location
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录未映射字段数。
pub fn record_fields_unmapped(count: u64) {
    metrics().fields_unmapped.fetch_add(count, Ordering::Relaxed);
}

/// 记录字段解析失败次数（海拔、时间戳）。
pub fn record_field_parse_error() {
    metrics().field_parse_errors.fetch_add(1, Ordering::Relaxed);
}

/// 记录生成的 GTS 记录数。
pub fn record_records_built(count: u64) {
    metrics().records_built.fetch_add(count, Ordering::Relaxed);
}

/// 记录上送成功次数。
pub fn record_forward_success() {
    metrics().forward_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录上送失败次数。
pub fn record_forward_failure() {
    metrics().forward_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录单次上送耗时（毫秒）。
pub fn record_forward_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .forward_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .forward_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
