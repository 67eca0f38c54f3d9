//! Torque 协议固定字段。

/// GPS 经度。
pub const LONGITUDE: &str = "kff1005";
/// GPS 纬度。
pub const LATITUDE: &str = "kff1006";
/// GPS 海拔（米）。
pub const ELEVATION: &str = "kff1010";
pub const DEVICE_ID: &str = "id";
/// 毫秒时间戳。
pub const TIMESTAMP: &str = "time";
/// 调用方身份（Torque 中配置的 email）。
pub const CALLER: &str = "eml";
