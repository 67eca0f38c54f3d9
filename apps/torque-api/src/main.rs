//! Torque -> Warp 10 上报适配服务。

mod handlers;
mod middleware;
mod routes;
mod shutdown;

use shutdown::FatalSignal;
use std::sync::Arc;
use std::time::Duration;
use t2w_config::{AppConfig, ForwardErrorPolicy, KeysSource};
use t2w_directory::{DirectoryError, KeyDirectory};
use t2w_forward::{RecordForwarder, Warp10Config, Warp10Forwarder};
use t2w_telemetry::init_tracing;
use t2w_translate::{AllowList, Translator};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
    pub forwarder: Arc<dyn RecordForwarder>,
    pub forward_error_policy: ForwardErrorPolicy,
    pub fatal: FatalSignal,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 字段映射表：加载失败直接退出，不进入监听
    let directory = load_directory(&config.keys_source).await.map_err(|err| {
        error!(target: "torque.directory", error = %err, "directory_load_failed");
        err
    })?;
    if directory.is_empty() {
        warn!(target: "torque.directory", "directory_empty");
    }

    let forwarder = Warp10Forwarder::new(Warp10Config {
        endpoint: config.warp10_endpoint.clone(),
        token: config.warp10_token.clone(),
        timeout: config.warp10_timeout_ms.map(Duration::from_millis),
    })?;
    info!(
        target: "torque.forward",
        update_url = %forwarder.update_url(),
        policy = ?config.forward_error_policy,
        "forwarder_ready"
    );

    let translator = Translator::new(
        Arc::new(directory),
        AllowList::new(config.allowed_users.iter().cloned()),
    );
    let fatal = FatalSignal::default();
    let state = AppState {
        translator: Arc::new(translator),
        forwarder: Arc::new(forwarder),
        forward_error_policy: config.forward_error_policy,
        fatal: fatal.clone(),
    };

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, users = config.allowed_users.len(), "torque-api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fatal.clone()))
        .await?;

    exit_status(&fatal)
}

/// 致命上送错误触发过时以错误返回，进程非零退出。
fn exit_status(fatal: &FatalSignal) -> Result<(), Box<dyn std::error::Error>> {
    match fatal.reason() {
        Some(reason) => Err(format!("stopped after forwarding failure: {reason}").into()),
        None => Ok(()),
    }
}

async fn load_directory(source: &KeysSource) -> Result<KeyDirectory, DirectoryError> {
    match source {
        KeysSource::Url(url) => KeyDirectory::fetch(&reqwest::Client::new(), url).await,
        KeysSource::Path(path) => KeyDirectory::from_path(path).await,
    }
}

/// Ctrl-C 或上送致命错误时停止接收新连接，在途请求照常应答。
async fn shutdown_signal(fatal: FatalSignal) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
        _ = fatal.triggered() => {
            error!(reason = fatal.reason().unwrap_or_default(), "fatal forward error, shutting down");
        }
    }
}
