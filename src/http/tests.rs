use std::future::Future;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

use super::test_support::{ScriptedTransport, fail, respond};
use super::*;
use crate::args::HttpMethod;
use crate::catalog::{EndpointCatalog, EndpointSpec, MethodSplit, TemplateBody};
use crate::error::{AppError, HttpError};
use crate::metrics::MetricsAggregator;

const TIMEOUT: Duration = Duration::from_secs(10);

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn endpoint(method: HttpMethod, path: &str) -> Result<EndpointSpec, String> {
    EndpointSpec::new(method, path, 1, TIMEOUT).map_err(|err| err.to_string())
}

fn get_only_catalog(path: &str) -> Result<Arc<EndpointCatalog>, String> {
    let split = MethodSplit {
        get: 1,
        post: 0,
        delete: 0,
    };
    EndpointCatalog::new(split, vec![endpoint(HttpMethod::Get, path)?])
        .map(Arc::new)
        .map_err(|err| err.to_string())
}

fn executor_with<T: Transport>(
    transport: T,
    catalog: Arc<EndpointCatalog>,
) -> RequestExecutor<T> {
    RequestExecutor::new(
        transport,
        "http://localhost:8080",
        catalog,
        Arc::new(MetricsAggregator::new()),
    )
}

#[test]
fn timeout_is_recorded_as_one_get_failure() -> Result<(), String> {
    run_async_test(async {
        let transport = ScriptedTransport::new(|request| {
            if request.url.ends_with("/api/x") {
                fail(ErrorKind::Timeout)
            } else {
                respond(200)
            }
        });
        let catalog = get_only_catalog("/api/x")?;
        let executor = executor_with(transport, Arc::clone(&catalog));
        let before = executor.metrics().snapshot();

        let target = endpoint(HttpMethod::Get, "/api/x")?;
        let outcome = executor.execute(&target).await;

        if outcome.success {
            return Err("Timed out request must not count as success".to_owned());
        }
        if outcome.error_kind.map(ErrorKind::as_str) != Some("timeout") {
            return Err(format!("Unexpected error kind: {:?}", outcome.error_kind));
        }
        if outcome.url != "http://localhost:8080/api/x" {
            return Err(format!("Unexpected url: {}", outcome.url));
        }
        let after = executor.metrics().snapshot();
        let failed_delta = after
            .per_method
            .get
            .failed
            .checked_sub(before.per_method.get.failed);
        if failed_delta != Some(1) {
            return Err(format!("GET failed moved by {:?}", failed_delta));
        }
        if after.total_success() != 0 || after.per_method.post.failed != 0 {
            return Err(format!("Unexpected counters: {:?}", after.per_method));
        }
        Ok(())
    })
}

#[test]
fn server_errors_count_as_success() -> Result<(), String> {
    run_async_test(async {
        let executor = executor_with(ScriptedTransport::always(503), get_only_catalog("/down")?);
        let outcome = executor.execute_next().await;
        if !outcome.success || outcome.status_code != Some(503) {
            return Err(format!("Expected completed 503, got {:?}", outcome));
        }
        let snapshot = executor.metrics().snapshot();
        if snapshot.per_method.get.success != 1 || snapshot.total_failed() != 0 {
            return Err(format!("Unexpected counters: {:?}", snapshot.per_method));
        }
        Ok(())
    })
}

#[test]
fn post_body_is_generated_per_call() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(ScriptedTransport::always(201));
        let split = MethodSplit {
            get: 0,
            post: 1,
            delete: 0,
        };
        let post = endpoint(HttpMethod::Post, "/api/visits")?.with_body(TemplateBody::new(
            json!({ "seq": "{{seq}}", "note": "visit-{{seq}}" }),
        ));
        let catalog = EndpointCatalog::new(split, vec![post]).map_err(|err| err.to_string())?;
        let executor = executor_with(Arc::clone(&transport), Arc::new(catalog));

        executor.execute_next().await;
        executor.execute_next().await;

        let bodies: Vec<Option<Value>> =
            transport.seen().into_iter().map(|request| request.body).collect();
        let expected = vec![
            Some(json!({ "seq": 0, "note": "visit-0" })),
            Some(json!({ "seq": 1, "note": "visit-1" })),
        ];
        if bodies != expected {
            return Err(format!("Unexpected bodies: {:?}", bodies));
        }
        Ok(())
    })
}

#[test]
fn path_and_body_share_the_endpoint_sequence() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(ScriptedTransport::always(200));
        let executor = executor_with(Arc::clone(&transport), get_only_catalog("/unused")?);
        let first = endpoint(HttpMethod::Post, "/a/{{seq}}")?
            .with_body(TemplateBody::new(json!({ "seq": "{{seq}}" })));
        let second = endpoint(HttpMethod::Post, "/b/{{seq}}")?
            .with_body(TemplateBody::new(json!({ "seq": "{{seq}}" })));

        executor.execute(&first).await;
        executor.execute(&first).await;
        executor.execute(&second).await;

        let sent: Vec<(String, Option<Value>)> = transport
            .seen()
            .into_iter()
            .map(|request| (request.url, request.body))
            .collect();
        let expected = vec![
            (
                "http://localhost:8080/a/0".to_owned(),
                Some(json!({ "seq": 0 })),
            ),
            (
                "http://localhost:8080/a/1".to_owned(),
                Some(json!({ "seq": 1 })),
            ),
            (
                "http://localhost:8080/b/0".to_owned(),
                Some(json!({ "seq": 0 })),
            ),
        ];
        if sent != expected {
            return Err(format!("Unexpected requests: {:?}", sent));
        }
        if executor.issued() != 3 || first.calls() != 2 || second.calls() != 1 {
            return Err("Counters out of step with executed requests".to_owned());
        }
        Ok(())
    })
}

#[test]
fn post_without_factory_sends_empty_object_and_get_sends_nothing() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(ScriptedTransport::always(200));
        let executor = executor_with(Arc::clone(&transport), get_only_catalog("/a")?);

        executor.execute(&endpoint(HttpMethod::Post, "/p")?).await;
        executor.execute(&endpoint(HttpMethod::Get, "/g")?).await;
        executor.execute(&endpoint(HttpMethod::Delete, "/d")?).await;

        let seen = transport.seen();
        let bodies: Vec<(HttpMethod, Option<Value>)> = seen
            .into_iter()
            .map(|request| (request.method, request.body))
            .collect();
        let expected = vec![
            (HttpMethod::Post, Some(json!({}))),
            (HttpMethod::Get, None),
            (HttpMethod::Delete, None),
        ];
        if bodies != expected {
            return Err(format!("Unexpected bodies: {:?}", bodies));
        }
        if executor.issued() != 3 {
            return Err(format!("Expected 3 issued, got {}", executor.issued()));
        }
        Ok(())
    })
}

#[test]
fn endpoint_timeout_is_passed_to_transport() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(ScriptedTransport::always(200));
        let executor = executor_with(Arc::clone(&transport), get_only_catalog("/a")?);
        let slow = EndpointSpec::new(HttpMethod::Get, "/slow", 1, Duration::from_secs(30))
            .map_err(|err| err.to_string())?;
        executor.execute(&slow).await;
        let timeouts: Vec<Duration> = transport.seen().iter().map(|r| r.timeout).collect();
        if timeouts != vec![Duration::from_secs(30)] {
            return Err(format!("Unexpected timeouts: {:?}", timeouts));
        }
        Ok(())
    })
}

#[test]
fn parse_base_url_strips_trailing_slash() -> Result<(), String> {
    let parsed = parse_base_url(" http://localhost:8080/ ").map_err(|err| err.to_string())?;
    if parsed != "http://localhost:8080" {
        return Err(format!("Unexpected base url: {}", parsed));
    }
    let prefixed = parse_base_url("https://example.com/gateway/").map_err(|err| err.to_string())?;
    if prefixed != "https://example.com/gateway" {
        return Err(format!("Unexpected base url: {}", prefixed));
    }
    Ok(())
}

#[test]
fn parse_base_url_rejects_bad_input() -> Result<(), String> {
    match parse_base_url("ftp://example.com") {
        Err(AppError::Http(HttpError::UnsupportedScheme { scheme, .. })) if scheme == "ftp" => {}
        other => return Err(format!("Expected unsupported scheme, got {:?}", other)),
    }
    match parse_base_url("not a url") {
        Err(AppError::Http(HttpError::InvalidUrl { .. })) => Ok(()),
        other => Err(format!("Expected invalid url, got {:?}", other)),
    }
}

fn spawn_one_shot_server(reply: &'static [u8]) -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            reply_and_close(stream, reply);
        }
    });
    Ok(format!("http://{}", addr))
}

fn reply_and_close(mut stream: TcpStream, reply: &[u8]) {
    let mut buffer = [0u8; 4096];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    if stream.write_all(reply).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn reqwest_transport() -> Result<ReqwestTransport, String> {
    ReqwestTransport::new(&ClientSettings {
        connect_timeout: Duration::from_secs(2),
        redirect_limit: 0,
        user_agent: "trafficgen-test".to_owned(),
    })
    .map_err(|err| err.to_string())
}

#[test]
fn reqwest_transport_completes_on_error_status() -> Result<(), String> {
    run_async_test(async {
        let base = spawn_one_shot_server(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        )?;
        let transport = reqwest_transport()?;
        let response = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("{}/api/gateway/owners/-1", base),
                body: None,
                timeout: Duration::from_secs(5),
            })
            .await
            .map_err(|err| format!("Expected completion, got {:?}", err))?;
        if response.status != 404 || response.response_bytes != 9 {
            return Err(format!("Unexpected response: {:?}", response));
        }
        Ok(())
    })
}

#[test]
fn reqwest_transport_classifies_refused_connection() -> Result<(), String> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("addr failed: {}", err))?;
        drop(listener);

        let transport = reqwest_transport()?;
        let result = transport
            .send(TransportRequest {
                method: HttpMethod::Delete,
                url: format!("http://{}/api/payments/clean-db", addr),
                body: None,
                timeout: Duration::from_secs(5),
            })
            .await;
        match result {
            Err(err) if err.kind == ErrorKind::Connect && err.status.is_none() => Ok(()),
            other => Err(format!("Expected connect failure, got {:?}", other)),
        }
    })
}

#[test]
fn reqwest_transport_classifies_timeout() -> Result<(), String> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("addr failed: {}", err))?;
        // Accepts and then never answers.
        let holder = thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(2));
                drop(stream);
            }
        });

        let transport = reqwest_transport()?;
        let result = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("http://{}/api/customer/diagnose/owners/1/pets/1", addr),
                body: None,
                timeout: Duration::from_millis(200),
            })
            .await;
        drop(holder);
        match result {
            Err(err) if err.kind == ErrorKind::Timeout => Ok(()),
            other => Err(format!("Expected timeout, got {:?}", other)),
        }
    })
}
