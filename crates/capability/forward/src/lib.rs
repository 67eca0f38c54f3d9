//! GTS 记录上送（每条记录一次 HTTP POST，不做批量与重试）。

use async_trait::async_trait;
use domain::GtsRecord;
use std::time::Duration;
use tracing::debug;

/// Warp 10 写入令牌请求头。
pub const TOKEN_HEADER: &str = "X-Warp10-Token";
/// Warp 10 写入接口路径。
pub const UPDATE_PATH: &str = "/api/v0/update";

const MAX_ERROR_BODY: usize = 256;

/// 上送错误。
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("client error: {0}")]
    Client(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// 记录上送器抽象。
#[async_trait]
pub trait RecordForwarder: Send + Sync {
    async fn forward(&self, record: &GtsRecord) -> Result<(), ForwardError>;
}

/// Warp 10 上送配置。
#[derive(Debug, Clone)]
pub struct Warp10Config {
    /// 数据存储根地址，末尾 `/` 会被忽略。
    pub endpoint: String,
    pub token: String,
    /// 未设置时不限时。
    pub timeout: Option<Duration>,
}

/// Warp 10 HTTP 上送器，内部共享一个连接池。
#[derive(Debug, Clone)]
pub struct Warp10Forwarder {
    client: reqwest::Client,
    update_url: String,
    token: String,
}

impl Warp10Forwarder {
    pub fn new(config: Warp10Config) -> Result<Self, ForwardError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ForwardError::Client(err.to_string()))?;
        Ok(Self {
            client,
            update_url: format!("{}{}", config.endpoint.trim_end_matches('/'), UPDATE_PATH),
            token: config.token,
        })
    }

    pub fn update_url(&self) -> &str {
        &self.update_url
    }
}

#[async_trait]
impl RecordForwarder for Warp10Forwarder {
    async fn forward(&self, record: &GtsRecord) -> Result<(), ForwardError> {
        let body = record.to_body();
        debug!(target: "torque.forward", url = %self.update_url, body = %body, "gts_forward");
        let response = self
            .client
            .post(&self.update_url)
            .header(TOKEN_HEADER, &self.token)
            .body(body)
            .send()
            .await
            .map_err(|err| ForwardError::Transport(err.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(ForwardError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
