//! Shared helpers for the client integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use parse_rest_client::*;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Executor that records every request and answers with a canned value.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    requests: Arc<Mutex<Vec<Request>>>,
    response: Value,
}

impl RecordingExecutor {
    pub fn responding(response: Value) -> Self {
        Self {
            requests: Arc::default(),
            response,
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_single(&self) -> RequestDescriptor {
        match self.requests().pop().expect("no request was executed") {
            Request::Single(descriptor) => descriptor,
            Request::Batch(_) => panic!("Expected single request, found batch"),
        }
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, request: &Request) -> ClientResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Routes library logs to the test output; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn test_config(version: &str) -> ClientConfig {
    ClientConfig::new("app-id", "rest-key", "http://localhost:1337")
        .with_server_version(ServerVersion::parse(version).unwrap())
}

pub fn recording_client(version: &str, response: Value) -> (ParseClient<RecordingExecutor>, RecordingExecutor) {
    let executor = RecordingExecutor::responding(response);
    let client = ParseClient::with_executor(test_config(version), executor.clone());
    (client, executor)
}

/// Parses the JSON-encoded `where` param of a descriptor.
pub fn where_param(descriptor: &RequestDescriptor) -> Option<Value> {
    descriptor
        .param("where")
        .and_then(Value::as_str)
        .map(|raw| serde_json::from_str(raw).unwrap())
}

/// A raw HTTP request as seen by [`serve_once`].
#[derive(Debug)]
pub struct CapturedRequest {
    /// request line and headers
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Accepts one connection, captures the request and answers with `body`.
///
/// Returns the base URL of the listener and a handle yielding the captured request.
pub async fn serve_once(
    content_type: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head_end, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request was complete");
            buf.extend_from_slice(&chunk[..n]);

            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .map(|v| v.trim().parse::<usize>().unwrap())
                    .unwrap_or(0);
                break (pos, content_length);
            }
        };

        while buf.len() < head_end + 4 + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the body was complete");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            content_type,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();

        CapturedRequest {
            head: String::from_utf8_lossy(&buf[..head_end]).to_string(),
            body: String::from_utf8_lossy(&buf[head_end + 4..head_end + 4 + content_length]).to_string(),
        }
    });

    (format!("http://{}", addr), handle)
}
