use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use reqwest::Url;
use serde_json::Value;
use tokio::{
    net::TcpListener,
    sync::{mpsc, Notify},
};

use super::ReportingServer;

/// What the throwaway collection server saw.
pub(crate) struct CapturedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Start a collection server on a free local port. Every POST is forwarded to
/// the returned channel; with a `gate`, responses wait until it is notified.
pub(crate) async fn spawn_capture_server(
    gate: Option<Arc<Notify>>,
) -> (Url, mpsc::UnboundedReceiver<CapturedRequest>) {
    spawn_capture_server_answering(gate, StatusCode::OK).await
}

/// Like [`spawn_capture_server`], answering every POST with `status`.
pub(crate) async fn spawn_capture_server_answering(
    gate: Option<Arc<Notify>>,
    status: StatusCode,
) -> (Url, mpsc::UnboundedReceiver<CapturedRequest>) {
    let (sender, receiver) = mpsc::unbounded_channel();

    let handler = move |headers: HeaderMap, body: Bytes| {
        let sender = sender.clone();
        let gate = gate.clone();
        async move {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            };
            let _ = sender.send(CapturedRequest {
                authorization: header("authorization"),
                content_type: header("content-type"),
                body: serde_json::from_slice(&body).unwrap_or(Value::Null),
            });

            if let Some(gate) = gate {
                gate.notified().await;
            }
            (status, "{}")
        }
    };

    let router = Router::new().route(ReportingServer::LOCATION_PATH, post(handler));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let endpoint =
        Url::parse(&format!("http://{address}{}", ReportingServer::LOCATION_PATH)).unwrap();
    (endpoint, receiver)
}
