pub mod data;
pub mod geo;
pub mod time;

pub use data::{GtsRecord, device_labels};
pub use geo::{Location, elevation_to_mm};
pub use time::millis_to_micros;

/// 单个字段解析错误（仅影响该字段，不中断请求）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("invalid elevation: {0:?}")]
    Elevation(String),
    #[error("invalid timestamp: {0:?}")]
    Timestamp(String),
    /// 已映射字段没有取值，记录被跳过。
    #[error("empty value for field {0:?}")]
    EmptyValue(String),
}
