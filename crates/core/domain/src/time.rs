use crate::FieldError;

/// Torque 上报毫秒时间戳，Warp 10 以微秒为单位。
pub fn millis_to_micros(raw: &str) -> Result<i64, FieldError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|ms| ms.checked_mul(1000))
        .ok_or_else(|| FieldError::Timestamp(raw.to_string()))
}
