//! Torque 字段码 -> 指标名/标签 的只读映射目录。
//!
//! 启动时加载一次，之后仅并发读取，不需要加锁。
//! 数据源为三列 CSV（字段码、指标名、标签），首行为表头。

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// 目录加载错误（启动阶段致命）。
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("io error: {0}")]
    Io(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("line {line}: expected 3 columns, found {found}")]
    ColumnCount { line: u64, found: usize },
}

/// 单个字段码的映射。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub metric_name: String,
    /// `key=value[,key=value...]`，可为空。
    pub tag: String,
}

/// 字段码映射目录。
#[derive(Debug, Clone, Default)]
pub struct KeyDirectory {
    entries: HashMap<String, KeyEntry>,
}

impl KeyDirectory {
    /// 解析三列 CSV。表头同样必须是三列；字段码重复时后者覆盖前者。
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|err| DirectoryError::Csv(err.to_string()))?;
            if row.len() != 3 {
                let line = row
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(index as u64 + 1);
                return Err(DirectoryError::ColumnCount {
                    line,
                    found: row.len(),
                });
            }
            if index == 0 {
                continue;
            }
            debug!(
                target: "torque.directory",
                field_code = &row[0],
                metric_name = &row[1],
                tag = &row[2],
                "directory_entry_loaded"
            );
            entries.insert(
                row[0].to_string(),
                KeyEntry {
                    metric_name: row[1].to_string(),
                    tag: row[2].to_string(),
                },
            );
        }
        Ok(Self { entries })
    }

    /// 通过 HTTP GET 拉取映射表。
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self, DirectoryError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| DirectoryError::Fetch(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| DirectoryError::Fetch(err.to_string()))?;
        let directory = Self::from_reader(body.as_ref())?;
        info!(target: "torque.directory", url = %url, entries = directory.len(), "directory_fetched");
        Ok(directory)
    }

    /// 从本地文件读取映射表。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|err| DirectoryError::Io(format!("{}: {}", path.display(), err)))?;
        let directory = Self::from_reader(content.as_slice())?;
        info!(
            target: "torque.directory",
            path = %path.display(),
            entries = directory.len(),
            "directory_read"
        );
        Ok(directory)
    }

    pub fn get(&self, field_code: &str) -> Option<&KeyEntry> {
        self.entries.get(field_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyEntry)> {
        self.entries
            .iter()
            .map(|(code, entry)| (code.as_str(), entry))
    }
}

impl FromIterator<(String, KeyEntry)> for KeyDirectory {
    fn from_iter<I: IntoIterator<Item = (String, KeyEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_keeps_last_duplicate() {
        let csv = "key,name,tags\nkff1005,gps.longitude,\nkd,speed,unit=kmh\nkd,obd.speed,unit=kmh\n";
        let directory = KeyDirectory::from_reader(csv.as_bytes()).expect("load");
        assert_eq!(directory.len(), 2);
        assert!(directory.get("key").is_none());
        assert_eq!(
            directory.get("kd"),
            Some(&KeyEntry {
                metric_name: "obd.speed".to_string(),
                tag: "unit=kmh".to_string(),
            })
        );
    }

    #[test]
    fn quoted_tag_may_hold_commas() {
        let csv = "key,name,tags\nkc,rpm,\"unit=rpm,source=obd\"\n";
        let directory = KeyDirectory::from_reader(csv.as_bytes()).expect("load");
        assert_eq!(
            directory.get("kc").map(|entry| entry.tag.as_str()),
            Some("unit=rpm,source=obd")
        );
    }

    #[test]
    fn rejects_short_row() {
        let csv = "key,name,tags\nkc,rpm,\nkd,speed\n";
        let err = KeyDirectory::from_reader(csv.as_bytes()).expect_err("short row");
        assert!(matches!(err, DirectoryError::ColumnCount { line: 3, found: 2 }));
    }

    #[test]
    fn rejects_long_row() {
        let csv = "key,name,tags\nkc,rpm,\nkd,speed,unit=kmh,extra\n";
        let err = KeyDirectory::from_reader(csv.as_bytes()).expect_err("long row");
        assert!(matches!(err, DirectoryError::ColumnCount { line: 3, found: 4 }));
    }

    #[test]
    fn rejects_long_header() {
        let csv = "key,name,tags,extra\nkc,rpm,\n";
        let err = KeyDirectory::from_reader(csv.as_bytes()).expect_err("long header");
        assert!(matches!(err, DirectoryError::ColumnCount { line: 1, found: 4 }));
    }

    #[test]
    fn iter_lists_every_code() {
        let csv = "key,name,tags\nkc,rpm,\nkd,speed,\n";
        let directory = KeyDirectory::from_reader(csv.as_bytes()).expect("load");
        let mut codes: Vec<&str> = directory.iter().map(|(code, _)| code).collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["kc", "kd"]);
    }

    #[test]
    fn header_only_is_empty() {
        let directory = KeyDirectory::from_reader("key,name,tags\n".as_bytes()).expect("load");
        assert!(directory.is_empty());
    }
}
