//! Torque 上报请求 -> GTS 记录。
//!
//! 纯计算，不做 I/O；上送与日志由调用方负责。

pub mod fields;
pub mod query;

pub use query::TorqueQuery;

use domain::{FieldError, GtsRecord, Location, device_labels, elevation_to_mm, millis_to_micros};
use std::collections::HashSet;
use std::sync::Arc;
use t2w_directory::KeyDirectory;

/// 允许上报的调用方（Torque 中配置的 email）。
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    users: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, caller: &str) -> bool {
        self.users.contains(caller)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// 单次请求的翻译结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// 调用方不在白名单，应答但不产生记录。
    Unauthorized { caller: String },
    /// 缺少经纬度或海拔，应答但不产生记录。
    MissingLocation,
    Accepted(TranslatedRequest),
}

/// 通过校验的请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedRequest {
    /// 按查询参数顺序排列。
    pub records: Vec<GtsRecord>,
    /// 目录中不存在的参数个数（含协议元数据字段）。
    pub unmapped_fields: usize,
    /// 已降级处理的字段错误（含因空值跳过的字段）。
    pub field_errors: Vec<FieldError>,
}

/// 请求翻译器，持有只读目录与白名单。
#[derive(Debug, Clone)]
pub struct Translator {
    directory: Arc<KeyDirectory>,
    allow_list: Arc<AllowList>,
}

impl Translator {
    pub fn new(directory: Arc<KeyDirectory>, allow_list: AllowList) -> Self {
        Self {
            directory,
            allow_list: Arc::new(allow_list),
        }
    }

    pub fn directory(&self) -> &KeyDirectory {
        &self.directory
    }

    pub fn translate(&self, query: &TorqueQuery) -> Translation {
        let caller = query.get(fields::CALLER).unwrap_or_default();
        if !self.allow_list.contains(caller) {
            return Translation::Unauthorized {
                caller: caller.to_string(),
            };
        }

        let mut field_errors = Vec::new();
        let Some(location) = extract_location(query, &mut field_errors) else {
            return Translation::MissingLocation;
        };

        let timestamp_us = match query.get(fields::TIMESTAMP).map(millis_to_micros) {
            Some(Ok(ts)) => Some(ts),
            Some(Err(err)) => {
                field_errors.push(err);
                None
            }
            None => {
                field_errors.push(FieldError::Timestamp(String::new()));
                None
            }
        };
        let device_id = query.get(fields::DEVICE_ID).unwrap_or_default();

        let mut records = Vec::new();
        let mut unmapped_fields = 0;
        for (key, value) in query.iter() {
            let Some(entry) = self.directory.get(key) else {
                unmapped_fields += 1;
                continue;
            };
            if value.is_empty() {
                field_errors.push(FieldError::EmptyValue(key.to_string()));
                continue;
            }
            records.push(GtsRecord {
                timestamp_us,
                latitude: location.latitude.clone(),
                longitude: location.longitude.clone(),
                elevation_mm: location.elevation_mm,
                metric_name: entry.metric_name.clone(),
                labels: device_labels(device_id, &entry.tag),
                value: value.to_string(),
            });
        }

        Translation::Accepted(TranslatedRequest {
            records,
            unmapped_fields,
            field_errors,
        })
    }
}

/// 三个 GPS 字段缺一不可；海拔无法解析时降级为 0。
fn extract_location(query: &TorqueQuery, field_errors: &mut Vec<FieldError>) -> Option<Location> {
    let longitude = query.get(fields::LONGITUDE).filter(|v| !v.is_empty())?;
    let latitude = query.get(fields::LATITUDE).filter(|v| !v.is_empty())?;
    let elevation = query.get(fields::ELEVATION).filter(|v| !v.is_empty())?;

    let elevation_mm = elevation_to_mm(elevation).unwrap_or_else(|err| {
        field_errors.push(err);
        0
    });
    Some(Location {
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
        elevation_mm,
    })
}
