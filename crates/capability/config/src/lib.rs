//! 应用运行配置加载。

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Torque 字段映射表的默认地址。
pub const DEFAULT_KEYS_URL: &str =
    "https://raw.githubusercontent.com/PierreZ/Torque2Warp10/master/keys.csv";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("no allowed users configured in {0}")]
    EmptyAllowList(String),
}

/// 字段映射表来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeysSource {
    Url(String),
    Path(PathBuf),
}

/// 上送失败时的处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardErrorPolicy {
    /// 记录日志后继续处理下一条记录。
    #[default]
    Log,
    /// 当前请求应答后停止服务，进程以非零状态退出。
    Fatal,
}

impl FromStr for ForwardErrorPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "fatal" => Ok(Self::Fatal),
            other => Err(other.to_string()),
        }
    }
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub warp10_endpoint: String,
    pub warp10_token: String,
    pub warp10_timeout_ms: Option<u64>,
    pub allowed_users: Vec<String>,
    pub keys_source: KeysSource,
    pub forward_error_policy: ForwardErrorPolicy,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（便于测试，不依赖进程环境）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let warp10_endpoint = read_required(&lookup, "WARP10_ENDPOINT")?;
        let warp10_token = read_required(&lookup, "WARP10_TOKEN")?;
        let allowed_users = read_allow_list(&lookup, "ALLOWED_USERS")?;
        let http_addr = read_optional(&lookup, "TORQUE_HTTP_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let keys_source = match read_optional(&lookup, "TORQUE_KEYS_PATH") {
            Some(path) => KeysSource::Path(PathBuf::from(path)),
            None => KeysSource::Url(
                read_optional(&lookup, "TORQUE_KEYS_URL")
                    .unwrap_or_else(|| DEFAULT_KEYS_URL.to_string()),
            ),
        };
        let forward_error_policy = match read_optional(&lookup, "TORQUE_FORWARD_ERROR_POLICY") {
            Some(value) => value.parse::<ForwardErrorPolicy>().map_err(|_| {
                ConfigError::Invalid("TORQUE_FORWARD_ERROR_POLICY".to_string(), value)
            })?,
            None => ForwardErrorPolicy::default(),
        };
        let warp10_timeout_ms = read_optional_positive_u64(&lookup, "WARP10_TIMEOUT_MS")?;

        Ok(Self {
            http_addr,
            warp10_endpoint,
            warp10_token,
            warp10_timeout_ms,
            allowed_users,
            keys_source,
            forward_error_policy,
        })
    }
}

fn read_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    read_optional(lookup, key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// 逗号分隔的调用方白名单，空项忽略。
fn read_allow_list<F>(lookup: &F, key: &str) -> Result<Vec<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let users: Vec<String> = lookup(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(str::to_string)
        .collect();
    if users.is_empty() {
        return Err(ConfigError::EmptyAllowList(key.to_string()));
    }
    Ok(users)
}

fn read_optional_positive_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match read_optional(lookup, key) {
        None => Ok(None),
        Some(value) => match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        },
    }
}
