use std::fmt;

/// Warp 10 GTS 输入格式的单条记录。
///
/// 序列化格式：`TS/LAT:LON/ELEV NAME{LABELS} VALUE`，不做任何转义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsRecord {
    /// 微秒时间戳；缺失时由数据存储在写入时打戳。
    pub timestamp_us: Option<i64>,
    pub latitude: String,
    pub longitude: String,
    /// 海拔（毫米）。
    pub elevation_mm: i64,
    pub metric_name: String,
    /// `key=value` 逗号列表，设备标签始终在首位。
    pub labels: String,
    pub value: String,
}

impl GtsRecord {
    /// 生成上送请求体。
    pub fn to_body(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GtsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ts) = self.timestamp_us {
            write!(f, "{}", ts)?;
        }
        write!(
            f,
            "/{}:{}/{} {}{{{}}} {}",
            self.latitude,
            self.longitude,
            self.elevation_mm,
            self.metric_name,
            self.labels,
            self.value
        )
    }
}

/// 组装标签：`id=<device_id>` 在前，目录标签（非空时）逗号追加。
pub fn device_labels(device_id: &str, tag: &str) -> String {
    if tag.is_empty() {
        format!("id={}", device_id)
    } else {
        format!("id={},{}", device_id, tag)
    }
}
