//! End-to-end tests for per-client rate limiting.

use reqwest::StatusCode;
use serde_json::Value;

mod common;
use common::spawn_app_with;

#[tokio::test]
async fn test_limit_per_forwarded_client() {
    let app = spawn_app_with(|config| {
        config.rate_limit.enabled = true;
        config.rate_limit.max_requests = 2;
        config.rate_limit.window_secs = 60;
    })
    .await;

    let get = |client_ip: &'static str| {
        app.client
            .get(app.url("/health"))
            .header("x-forwarded-for", client_ip)
            .send()
    };

    assert_eq!(get("198.51.100.1").await.unwrap().status(), StatusCode::OK);
    assert_eq!(get("198.51.100.1").await.unwrap().status(), StatusCode::OK);

    let limited = get("198.51.100.1").await.unwrap();
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = limited.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!((29..=31).contains(&retry_after));
    assert!(limited.headers().contains_key("x-request-id"));

    let body: Value = limited.json().await.unwrap();
    assert_eq!(body["code"], 429);
    assert_eq!(body["error"], "Too Many Requests");
    assert_eq!(body["expiresIn"], retry_after);
    assert_eq!(
        body["message"],
        format!("Rate limit exceeded, retry in {} seconds", retry_after)
    );

    // A different client is unaffected.
    assert_eq!(get("198.51.100.2").await.unwrap().status(), StatusCode::OK);

    app.stop().await;
}
