//! End-to-end command flow through the host, with in-memory collaborators.

use itgfetch::dispatch::USAGE;
use itgfetch::prelude::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// A tiny fake internet.
struct FakeWeb;

#[async_trait]
impl Transport for FakeWeb {
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        match request.url.as_str() {
            "https://example.test/users/1" => {
                Ok(FetchResponse::json(&json!({"id": 1})).expect("static json"))
            }
            "https://example.test/fail" => {
                Err(TransportError::Connect("Failed to fetch".to_string()))
            }
            "https://example.test/ping" => Ok(FetchResponse::ok()),
            "https://example.test/ghost" => Ok(FetchResponse::new(StatusCode::NOT_FOUND)
                .body(r#"{"message":"Not Found"}"#)),
            _ => Ok(FetchResponse::new(StatusCode::NOT_FOUND)),
        }
    }
}

/// Extras proxy that echoes the request body and records what it saw.
struct EchoProxy {
    base: String,
    seen: Mutex<Vec<FetchRequest>>,
}

#[async_trait]
impl ExtrasApi for EchoProxy {
    fn api_url(&self) -> String {
        self.base.clone()
    }

    async fn extras_fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut response = FetchResponse::ok();
        if let Some(body) = request.body.clone() {
            response = response.body(body);
        }
        self.seen.lock().unwrap().push(request);
        Ok(response)
    }
}

async fn host() -> (Host, Arc<EchoProxy>) {
    let proxy = Arc::new(EchoProxy {
        base: "http://localhost:5100".to_string(),
        seen: Mutex::new(Vec::new()),
    });
    let host = Host::with_collaborators(HostConfig::new(), Arc::new(FakeWeb), proxy.clone());
    host.install().await.unwrap();
    (host, proxy)
}

#[tokio::test]
async fn test_basic_fetch_prints_pretty_json() {
    let (host, _) = host().await;
    let out = host
        .run_line("/theItGirlyFetch mode=basic url=https://example.test/users/1")
        .await;
    assert_eq!(out, "{\n  \"id\": 1\n}");
}

#[tokio::test]
async fn test_alias_and_default_mode() {
    let (host, _) = host().await;
    let out = host.run_line("/itgfetch url=https://example.test/users/1").await;
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, json!({"id": 1}));
}

#[tokio::test]
async fn test_missing_url() {
    let (host, _) = host().await;
    assert_eq!(
        host.run_line("/itgfetch mode=basic").await,
        "Error: No 'url' provided for basic fetch"
    );
    assert_eq!(
        host.run_line("/itgfetch mode=basic url=").await,
        "Error: No 'url' provided for basic fetch"
    );
}

#[tokio::test]
async fn test_missing_path_sends_nothing() {
    let (host, proxy) = host().await;
    assert_eq!(
        host.run_line(r#"/itgfetch mode=extras body={"msg":"Hello"}"#).await,
        "Error: No 'path' provided for extras PUT request"
    );
    assert!(proxy.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_mode_prints_usage() {
    let (host, _) = host().await;
    assert_eq!(
        host.run_line("/itgfetch mode=gopher url=https://example.test/users/1")
            .await,
        USAGE
    );
    assert_eq!(host.run_line("/itgfetch mode=gopher body={broken").await, USAGE);
}

#[tokio::test]
async fn test_network_fault_prints_error_object() {
    let (host, _) = host().await;
    let out = host.run_line("/itgfetch url=https://example.test/fail").await;
    assert!(out.starts_with("{\n  \"error\": "), "{out}");

    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        value,
        json!({
            "error": "request to https://example.test/fail failed: \
                      connection failed: Failed to fetch"
        })
    );
}

#[tokio::test]
async fn test_not_found_prints_error_object() {
    let (host, _) = host().await;
    let out = host.run_line("/itgfetch url=https://example.test/nothing").await;
    assert_eq!(
        out,
        "{\n  \"error\": \"https://example.test/nothing returned HTTP 404\"\n}"
    );

    let out = host.run_line("/itgfetch url=https://example.test/ghost").await;
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        value["error"],
        r#"https://example.test/ghost returned HTTP 404: {"message":"Not Found"}"#
    );
}

#[tokio::test]
async fn test_head_request_prints_null() {
    let (host, _) = host().await;
    assert_eq!(
        host.run_line("/itgfetch url=https://example.test/ping method=HEAD")
            .await,
        "null"
    );
}

#[tokio::test]
async fn test_extras_put_through_proxy() {
    let (host, proxy) = host().await;
    let out = host
        .run_line(r#"/theItGirlyFetch mode=extras path=/api/test body={"msg":"Hello"}"#)
        .await;
    assert_eq!(out, "{\n  \"msg\": \"Hello\"\n}");

    let seen = proxy.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::Put);
    assert_eq!(seen[0].url, "http://localhost:5100/api/test");
    assert_eq!(
        seen[0].get_header("Content-Type"),
        Some(&"application/json".to_string())
    );
    assert_eq!(seen[0].text().as_deref(), Some(r#"{"msg":"Hello"}"#));
}

#[tokio::test]
async fn test_extras_default_body() {
    let (host, proxy) = host().await;
    assert_eq!(host.run_line("/itgfetch mode=extras path=/api/ping").await, "{}");
    assert_eq!(proxy.seen.lock().unwrap()[0].text().as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_malformed_body() {
    let (host, proxy) = host().await;
    let out = host
        .run_line("/itgfetch mode=extras path=/api/test body={msg:Hello}")
        .await;
    assert!(out.starts_with("Error: invalid JSON in 'body' argument"), "{out}");
    assert!(proxy.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_framework_errors_are_strings() {
    let (host, _) = host().await;
    assert_eq!(
        host.run_line("/itgfetch colour=red").await,
        "Error: /theItGirlyFetch does not take an argument named 'colour'"
    );
    assert_eq!(host.run_line("/nope").await, "Error: Unknown command '/nope'");
    assert_eq!(
        host.run_line("hello").await,
        "Error: Expected a command starting with '/'"
    );
}

#[tokio::test]
async fn test_help() {
    let (host, _) = host().await;
    assert_eq!(
        host.run_line("/help").await,
        "Available commands: /theItGirlyFetch /itgfetch, /help"
    );
    let help = host.run_line("/help /itgfetch").await;
    assert!(help.starts_with("/theItGirlyFetch (aliases: /itgfetch)"), "{help}");
    assert!(help.contains("mode=<string> (default: basic)"));
    assert_eq!(
        host.run_line("/help nope").await,
        "Error: Unknown command '/nope'"
    );
}

#[tokio::test]
async fn test_install_twice_fails() {
    let (host, _) = host().await;
    assert!(host.install().await.is_err());
}

#[tokio::test]
async fn test_line_loop_stops_at_exit() {
    let (host, _) = host().await;

    let input = tokio_test::io::Builder::new()
        .read(b"/itgfetch mode=basic\n\n   \n")
        .read(b"/itgfetch url=https://example.test/users/1\n")
        .read(b"/exit\n/itgfetch url=ignored\n")
        .build();
    let output = tokio_test::io::Builder::new()
        .write(b"Error: No 'url' provided for basic fetch\n")
        .write(b"{\n  \"id\": 1\n}\n")
        .build();

    host.run(tokio::io::BufReader::new(input), output)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_invocations_share_one_host() {
    let (host, _) = host().await;
    let host = Arc::new(host);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let host = host.clone();
            tokio::spawn(async move {
                host.run_line("/itgfetch url=https://example.test/users/1")
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), "{\n  \"id\": 1\n}");
    }
}
