use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use catalog_viewer::source::http_source::HttpSource;
use catalog_viewer::source::traits::ResourceSource;

async fn serve_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"a":1}"#,
    )
}

async fn serve_page() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html><body>ALDI online akciós újság</body></html>",
    )
}

async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/site/data/index.json", get(serve_index))
        .route("/page.html", get(serve_page))
        .route("/moved", get(|| async { axum::response::Redirect::temporary("/page.html") }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

#[tokio::test]
async fn test_fetch_relative_to_site_root() {
    let (addr, _handle) = start_server().await;
    let source = HttpSource::new(&format!("http://{}/site", addr)).unwrap();

    let body = source.fetch("data/index.json").await.unwrap();
    assert_eq!(&body[..], br#"{"a":1}"#);
}

#[tokio::test]
async fn test_fetch_rejects_non_success_status() {
    let (addr, _handle) = start_server().await;
    let source = HttpSource::new(&format!("http://{}/", addr)).unwrap();

    let err = source.fetch("data/missing.json").await.unwrap_err();
    assert!(err.to_string().contains("HTTP 404"));
}

#[tokio::test]
async fn test_fetch_text_decodes_utf8() {
    let (addr, _handle) = start_server().await;
    let source = HttpSource::new(&format!("http://{}/", addr)).unwrap();

    let text = source
        .fetch_text(&format!("http://{}/page.html", addr))
        .await
        .unwrap();
    assert!(text.contains("akciós újság"));
}

#[tokio::test]
async fn test_probe_follows_redirects() {
    let (addr, _handle) = start_server().await;
    let source = HttpSource::new(&format!("http://{}/", addr)).unwrap();

    assert_eq!(source.probe("moved").await.unwrap(), 200);
    assert_eq!(source.probe("nowhere").await.unwrap(), 404);
}
