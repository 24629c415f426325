use moments_cache::{CacheConfig, CacheError, CacheResult, ConfigFetcher, FetchOutcome, HttpFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> CacheConfig {
    CacheConfig {
        max_attempts: 3,
        backoff_base_ms: 1,
        timeout_secs: 5,
        ..CacheConfig::default()
    }
}

/// The blocking client must live outside the async runtime.
async fn fetch(url: String, etag: Option<&'static str>) -> CacheResult<FetchOutcome> {
    tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::new(fast_config())?;
        fetcher.fetch(&url, etag)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_returns_body_and_etag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"abc\"")
                .set_body_string("{\"configVersion\":\"v1\"}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = fetch(format!("{}/config.json", server.uri()), None).await.unwrap();
    assert_eq!(
        outcome,
        FetchOutcome::Fetched {
            body: b"{\"configVersion\":\"v1\"}".to_vec(),
            etag: Some("\"abc\"".to_string()),
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn etag_is_sent_and_304_is_not_modified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config.json"))
        .and(header("If-None-Match", "\"abc\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = fetch(format!("{}/config.json", server.uri()), Some("\"abc\""))
        .await
        .unwrap();
    assert_eq!(outcome, FetchOutcome::NotModified);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = fetch(format!("{}/config.json", server.uri()), None).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Fetched { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn persistent_server_errors_exhaust_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = fetch(format!("{}/config.json", server.uri()), None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, CacheError::RetriesExhausted { attempts: 3, .. }),
        "{err}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn client_errors_fail_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetch(format!("{}/missing.json", server.uri()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::HttpStatus { status: 404, .. }), "{err}");
}
