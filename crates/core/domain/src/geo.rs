use crate::FieldError;

/// 单次上报的地理位置。
///
/// 经纬度按原文透传，海拔已换算为毫米。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
    pub elevation_mm: i64,
}

/// 米 -> 毫米，向零截断。
///
/// 普通十进制写法按文本换算，避免 `1.005 * 1000.0` 得到 `1004` 这类浮点误差；
/// 指数写法回退到浮点运算。
pub fn elevation_to_mm(raw: &str) -> Result<i64, FieldError> {
    let trimmed = raw.trim();
    let meters = trimmed
        .parse::<f64>()
        .map_err(|_| FieldError::Elevation(raw.to_string()))?;
    if !meters.is_finite() {
        return Err(FieldError::Elevation(raw.to_string()));
    }
    if let Some(mm) = decimal_to_mm(trimmed) {
        return Ok(mm);
    }
    // `as` 会把越界值钳到 i64 边界，越界按解析失败处理
    let mm = (meters * 1000.0).trunc();
    if mm < i64::MIN as f64 || mm >= i64::MAX as f64 {
        return Err(FieldError::Elevation(raw.to_string()));
    }
    Ok(mm as i64)
}

fn decimal_to_mm(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().ok()?
    };
    let mut millis: String = fraction.chars().take(3).collect();
    while millis.len() < 3 {
        millis.push('0');
    }
    let millis = millis.parse::<i64>().ok()?;

    let mm = whole.checked_mul(1000)?.checked_add(millis)?;
    Some(if negative { -mm } else { mm })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(elevation_to_mm("12.345"), Ok(12345));
        assert_eq!(elevation_to_mm("12.3459"), Ok(12345));
        assert_eq!(elevation_to_mm("1.005"), Ok(1005));
        assert_eq!(elevation_to_mm("-0.5009"), Ok(-500));
    }

    #[test]
    fn accepts_short_forms() {
        assert_eq!(elevation_to_mm("0"), Ok(0));
        assert_eq!(elevation_to_mm(".5"), Ok(500));
        assert_eq!(elevation_to_mm("7."), Ok(7000));
        assert_eq!(elevation_to_mm("+3"), Ok(3000));
        assert_eq!(elevation_to_mm(" 42.1 "), Ok(42100));
    }

    #[test]
    fn exponent_falls_back_to_float() {
        assert_eq!(elevation_to_mm("1e2"), Ok(100_000));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            elevation_to_mm("1e300"),
            Err(FieldError::Elevation("1e300".to_string()))
        );
        assert_eq!(
            elevation_to_mm("-1e300"),
            Err(FieldError::Elevation("-1e300".to_string()))
        );
        assert_eq!(
            elevation_to_mm("99999999999999999.5"),
            Err(FieldError::Elevation("99999999999999999.5".to_string()))
        );
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(elevation_to_mm("abc").is_err());
        assert!(elevation_to_mm("").is_err());
        assert!(elevation_to_mm("NaN").is_err());
        assert!(elevation_to_mm("inf").is_err());
    }
}
