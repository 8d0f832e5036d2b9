//! HTTP client against a one-shot local server

use std::time::Duration;

use pretty_assertions::assert_eq;
use shiftboard_sync::{HttpSolverClient, RemoveAssignmentRequest, SolverApi, SyncError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn client(base: String, timeout: Duration) -> HttpSolverClient {
    let inner = reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .unwrap();
    HttpSolverClient::from_client(inner, base, timeout)
}

/// Read one request (headers and body)
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return text;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serve a single canned response; yields the raw request
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        let _ = tx.send(request);
    });

    (format!("http://{addr}/api"), rx)
}

const RESULT: &str = r#"{
  "schedules": [{
    "workerId": 17,
    "workerName": "Aiko",
    "skills": [{"skillId": 200, "skillName": "Pick Paperless", "skillLevel": 4}],
    "assignments": [
      {"id": 1, "taskId": 8000, "taskName": "Pick Paperless",
       "startTime": "2025-03-10T09:00:00", "endTime": "2025-03-10T11:00:00", "unitsAssigned": 120}
    ]
  }],
  "unassignedTasks": [{"id": "8001", "task_name": "Rebin", "remaining_units": 40}]
}"#;

#[tokio::test]
async fn fetch_current_decodes_result() {
    let (base, request) = serve_once("200 OK", RESULT).await;
    let client = client(base, Duration::from_secs(5));

    let result = client.fetch_current().await.unwrap();

    assert_eq!(result.schedules[0].worker.id, "17");
    assert_eq!(result.schedules[0].assignments[0].task_id.as_deref(), Some("8000"));
    assert_eq!(result.unassigned_tasks[0].remaining_units, 40);
    assert!(request.await.unwrap().starts_with("GET /api/assignments/optimize "));
}

#[tokio::test]
async fn remove_posts_camel_case_body() {
    let (base, request) = serve_once("200 OK", "").await;
    let client = client(base, Duration::from_secs(5));

    client
        .remove_assignment(&RemoveAssignmentRequest {
            assignment_id: 42,
            task_id: "8000".into(),
            units_assigned: 120,
            task_name: "Pick Paperless".into(),
        })
        .await
        .unwrap();

    let raw = request.await.unwrap();
    assert!(raw.starts_with("POST /api/assignments/optimize/remove "));
    let body = raw.split("\r\n\r\n").nth(1).unwrap();
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "assignmentId": 42,
            "taskId": "8000",
            "unitsAssigned": 120,
            "taskName": "Pick Paperless"
        })
    );
}

#[tokio::test]
async fn non_success_status_is_a_server_error() {
    let (base, _request) = serve_once("503 Service Unavailable", "{\"error\":\"solver busy\"}").await;
    let client = client(base, Duration::from_secs(5));

    match client.re_optimize().await {
        Err(SyncError::Server { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("solver busy"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let (base, _request) = serve_once("200 OK", "<html>login</html>").await;
    let client = client(base, Duration::from_secs(5));

    assert!(matches!(
        client.fetch_current().await,
        Err(SyncError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let client = client(format!("http://{addr}/api"), Duration::from_millis(200));

    assert!(matches!(
        client.fetch_current().await,
        Err(SyncError::Timeout(d)) if d == Duration::from_millis(200)
    ));
}
