//! End-to-end tests against an in-process bridge.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use scribe_bridge::{BridgeClient, BridgeEndpoint, BridgeError, StreamLine, record_diagnostic};
use scribe_buffer::ErrorLineSet;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn serve(app: Router) -> BridgeClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    client_for(port)
}

fn client_for(port: u16) -> BridgeClient {
    BridgeClient::new(BridgeEndpoint {
        port,
        probe_timeout: Duration::from_millis(300),
        ..Default::default()
    })
    .unwrap()
}

/// Runs a compile and returns (lines, error set, outcome).
async fn run_compile(
    client: &BridgeClient,
    code: &str,
) -> Result<(Vec<String>, ErrorLineSet, scribe_bridge::CompileOutcome), BridgeError> {
    let mut lines = Vec::new();
    let mut errors = ErrorLineSet::new();
    let outcome = client
        .compile("Main.kt", code, |line| {
            if let Some(text) = line.diagnostic() {
                record_diagnostic(&mut errors, text);
            }
            lines.push(line.text().to_string());
        })
        .await?;
    Ok((lines, errors, outcome))
}

#[tokio::test]
async fn test_compile_failure_marks_error_lines() {
    let app = Router::new().route(
        "/compile",
        post(|Json(req): Json<Value>| async move {
            let filename = req["filename"].as_str().unwrap_or("?").to_string();
            format!("error: {filename}:12: unexpected token\n{{\"ok\":false}}\n")
        }),
    );
    let client = serve(app).await;

    let (lines, errors, outcome) = run_compile(&client, "fun main() {").await.unwrap();
    assert_eq!(lines, vec!["error: Main.kt:12: unexpected token", "{\"ok\":false}"]);
    assert_eq!(errors.iter().collect::<Vec<_>>(), vec![12]);
    assert!(!outcome.ok);
    assert!(outcome.status_seen);
}

#[tokio::test]
async fn test_compile_sends_code_and_reports_success() {
    let app = Router::new().route(
        "/compile",
        post(|Json(req): Json<Value>| async move {
            let code = req["code"].as_str().unwrap_or_default();
            format!("compiled {} bytes\r\n{{\"ok\":true}}", code.len())
        }),
    );
    let client = serve(app).await;

    let (lines, errors, outcome) = run_compile(&client, "val x = 1").await.unwrap();
    assert_eq!(lines, vec!["compiled 9 bytes", "{\"ok\":true}"]);
    assert!(errors.is_empty());
    assert!(outcome.ok);
}

#[tokio::test]
async fn test_compile_without_status_is_not_ok() {
    let app = Router::new().route("/compile", post(|| async { "warning: unused\n" }));
    let client = serve(app).await;

    let (_, _, outcome) = run_compile(&client, "").await.unwrap();
    assert!(!outcome.ok);
    assert!(!outcome.status_seen);
    assert_eq!(outcome.lines, 1);
}

#[tokio::test]
async fn test_compile_error_status_uses_body() {
    let app = Router::new().route(
        "/compile",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kotlinc not found") }),
    );
    let client = serve(app).await;

    let err = run_compile(&client, "x").await.unwrap_err();
    assert!(matches!(err, BridgeError::Status { status, .. } if status.as_u16() == 500));
    assert_eq!(err.reason(), "kotlinc not found");
}

#[tokio::test]
async fn test_compile_error_status_without_body() {
    let app = Router::new().route("/compile", post(|| async { StatusCode::BAD_GATEWAY }));
    let client = serve(app).await;

    let err = run_compile(&client, "x").await.unwrap_err();
    assert_eq!(err.reason(), "HTTP 502 Bad Gateway");
}

#[tokio::test]
async fn test_health_probe() {
    let app = Router::new().route("/health", get(|| async { "ok" }));
    let client = serve(app).await;
    assert!(client.check_liveness().await.is_ok());
}

#[tokio::test]
async fn test_health_probe_requires_200() {
    let app = Router::new().route("/health", get(|| async { StatusCode::NO_CONTENT }));
    let client = serve(app).await;
    assert!(matches!(
        client.check_liveness().await,
        Err(BridgeError::Status { .. })
    ));
}

#[tokio::test]
async fn test_health_probe_times_out() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let client = serve(app).await;
    assert!(matches!(client.check_liveness().await, Err(BridgeError::Timeout)));
}

#[tokio::test]
async fn test_refused_connection() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client_for(port);

    assert!(matches!(client.check_liveness().await, Err(BridgeError::Transport(_))));
    assert!(matches!(run_compile(&client, "x").await, Err(BridgeError::Transport(_))));
}

// Hand-written chunked responses, so the test controls when bytes arrive.

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let body_start = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending a request");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let headers = String::from_utf8_lossy(&buf[..body_start]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0);
        buf.extend_from_slice(&chunk[..n]);
    }
}

async fn write_chunk(socket: &mut TcpStream, data: &str) {
    let framed = format!("{:x}\r\n{}\r\n", data.len(), data);
    socket.write_all(framed.as_bytes()).await.unwrap();
    socket.flush().await.unwrap();
}

const CHUNKED_HEAD: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\n\r\n";

#[tokio::test]
async fn test_lines_are_delivered_as_they_arrive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (first_seen_tx, first_seen_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(CHUNKED_HEAD.as_bytes()).await.unwrap();
        write_chunk(&mut socket, "Main.kt:3: first\nMain.kt:").await;
        // Hold the rest back until the client has handled the first line
        first_seen_rx.await.unwrap();
        write_chunk(&mut socket, "7: second\n{\"ok\":false}").await;
        socket.write_all(b"0\r\n\r\n").await.unwrap();
    });

    let client = client_for(port);
    let mut first_seen_tx = Some(first_seen_tx);
    let mut lines = Vec::new();
    let mut errors = ErrorLineSet::new();
    let outcome = client
        .compile("Main.kt", "code", |line| {
            if let Some(text) = line.diagnostic() {
                record_diagnostic(&mut errors, text);
            }
            lines.push(line.clone());
            if let Some(tx) = first_seen_tx.take() {
                let _ = tx.send(());
            }
        })
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(
        lines,
        vec![
            StreamLine::Diagnostic("Main.kt:3: first".into()),
            StreamLine::Diagnostic("Main.kt:7: second".into()),
            StreamLine::Status {
                raw: "{\"ok\":false}".into(),
                ok: false
            },
        ]
    );
    assert_eq!(errors.iter().collect::<Vec<_>>(), vec![3, 7]);
    assert!(!outcome.ok);
}

#[tokio::test]
async fn test_cancelled_compile_closes_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (closed_tx, closed_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(CHUNKED_HEAD.as_bytes()).await.unwrap();
        write_chunk(&mut socket, "compiling...\n").await;
        // Never finish; wait for the client to hang up
        let mut buf = [0u8; 64];
        while let Ok(n) = socket.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
        let _ = closed_tx.send(());
    });

    let client = client_for(port);
    let (line_tx, line_rx) = oneshot::channel::<String>();
    let task = tokio::spawn(async move {
        let mut line_tx = Some(line_tx);
        client
            .compile("Main.kt", "code", move |line| {
                if let Some(tx) = line_tx.take() {
                    let _ = tx.send(line.text().to_string());
                }
            })
            .await
    });

    assert_eq!(line_rx.await.unwrap(), "compiling...");
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    tokio::time::timeout(Duration::from_secs(5), closed_rx)
        .await
        .expect("connection was not released")
        .unwrap();
}

#[tokio::test]
async fn test_interrupted_stream_keeps_delivered_lines() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(CHUNKED_HEAD.as_bytes()).await.unwrap();
        write_chunk(&mut socket, "x.kt:4: e\n").await;
        // Announce 16 bytes, send 7, hang up
        socket.write_all(b"10\r\npartial").await.unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = client_for(port);
    let mut lines = Vec::new();
    let mut errors = ErrorLineSet::new();
    let result = client
        .compile("x.kt", "code", |line| {
            if let Some(text) = line.diagnostic() {
                record_diagnostic(&mut errors, text);
            }
            lines.push(line.text().to_string());
        })
        .await;

    assert!(matches!(result, Err(BridgeError::Stream(_))), "{result:?}");
    assert_eq!(lines, vec!["x.kt:4: e"]);
    assert_eq!(errors.iter().collect::<Vec<_>>(), vec![4]);
    assert!(!result.unwrap_err().reason().is_empty());
}
