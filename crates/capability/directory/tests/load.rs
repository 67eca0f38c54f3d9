use axum::{Router, http::StatusCode, routing::get};
use std::io::Write;
use t2w_directory::{DirectoryError, KeyDirectory};

const KEYS_CSV: &str = "Key,MetricName,Tag\n\
kff1005,gps.longitude,\n\
kff1006,gps.latitude,\n\
kc,engine.rpm,unit=rpm\n";

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn fetch_over_http() {
    let base = serve(Router::new().route("/keys.csv", get(|| async { KEYS_CSV }))).await;
    let client = reqwest::Client::new();

    let directory = KeyDirectory::fetch(&client, &format!("{}/keys.csv", base))
        .await
        .expect("fetch");
    assert_eq!(directory.len(), 3);
    let rpm = directory.get("kc").expect("kc");
    assert_eq!(rpm.metric_name, "engine.rpm");
    assert_eq!(rpm.tag, "unit=rpm");
    assert!(directory.get("kff1010").is_none());
}

#[tokio::test]
async fn fetch_fails_on_error_status() {
    let base = serve(Router::new().route(
        "/keys.csv",
        get(|| async { (StatusCode::NOT_FOUND, "gone") }),
    ))
    .await;
    let client = reqwest::Client::new();

    let err = KeyDirectory::fetch(&client, &format!("{}/keys.csv", base))
        .await
        .expect_err("status");
    assert!(matches!(err, DirectoryError::Status { status: 404, .. }));
}

#[tokio::test]
async fn fetch_fails_when_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = reqwest::Client::new();

    let err = KeyDirectory::fetch(&client, &format!("http://{}/keys.csv", addr))
        .await
        .expect_err("unreachable");
    assert!(matches!(err, DirectoryError::Fetch(_)));
}

#[tokio::test]
async fn read_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(KEYS_CSV.as_bytes()).expect("write");

    let directory = KeyDirectory::from_path(file.path()).await.expect("read");
    assert_eq!(directory.len(), 3);
    assert_eq!(
        directory.get("kff1006").map(|entry| entry.metric_name.as_str()),
        Some("gps.latitude")
    );
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let err = KeyDirectory::from_path("/nonexistent/torque/keys.csv")
        .await
        .expect_err("missing");
    assert!(matches!(err, DirectoryError::Io(_)));
}
