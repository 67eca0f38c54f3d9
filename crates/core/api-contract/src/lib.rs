//! 稳定的 DTO 与 API 响应契约。

use serde::Serialize;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 健康检查响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub ok: bool,
    pub directory_entries: usize,
}

/// 适配器指标快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
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
