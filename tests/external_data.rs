//! End-to-end tests for `GET /external-data`.

use std::time::Duration;

use backend_challenge::config::MissingParamPolicy;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{any, body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{
    graphql_pokemon, mount_wsdl, rest_pokemon, soap_words, spawn_app, spawn_app_with, GRAPHQL_PATH,
    REST_PATH, SOAP_ENDPOINT_PATH,
};

async fn error_body(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_graphql_fetch_is_normalized_and_cached() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "getPokemon",
            "variables": { "name": "charizard" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(graphql_pokemon(6, "charizard", &["fire", "flying"])),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    for _ in 0..2 {
        let response = app.get("/external-data?source=graphql&pokemon=charizard").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "id": 6, "name": "charizard", "types": ["fire", "flying"] })
        );
    }

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_defaults_to_graphql_and_pikachu() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "name": "pikachu" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(graphql_pokemon(25, "pikachu", &["electric"])),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app.get("/external-data").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "pikachu");

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_rest_fetch_flattens_types() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/bulbasaur", REST_PATH)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(rest_pokemon(1, "bulbasaur", &["grass", "poison"])),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app.get("/external-data?source=rest&pokemon=bulbasaur").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": 1, "name": "bulbasaur", "types": ["grass", "poison"] })
    );

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_cached_entry_expires_after_ttl() {
    let app = spawn_app_with(|config| config.upstream.cache_ttl_ms = 200).await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(graphql_pokemon(7, "squirtle", &["water"])),
        )
        .expect(2)
        .mount(&app.upstream)
        .await;

    let query = "/external-data?source=graphql&pokemon=squirtle";
    assert_eq!(app.get(query).await.status(), StatusCode::OK);
    assert_eq!(app.get(query).await.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let response = app.get(query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap()["name"], "squirtle");

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_rest_cache_is_per_pokemon() {
    let app = spawn_app().await;
    for (id, name, kind) in [(4, "charmander", "fire"), (1, "bulbasaur", "grass")] {
        Mock::given(method("GET"))
            .and(path(format!("{}/{}", REST_PATH, name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(rest_pokemon(id, name, &[kind])))
            .expect(1)
            .mount(&app.upstream)
            .await;
    }

    for _ in 0..2 {
        for (id, name) in [(4, "charmander"), (1, "bulbasaur")] {
            let response = app.get(&format!("/external-data?source=rest&pokemon={}", name)).await;
            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["id"], id);
            assert_eq!(body["name"], name);
        }
    }

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_soap_number_to_words() {
    let app = spawn_app().await;
    mount_wsdl(&app.upstream, 1).await;
    Mock::given(method("POST"))
        .and(path(SOAP_ENDPOINT_PATH))
        .and(header("content-type", "text/xml; charset=utf-8"))
        .and(body_string_contains("<ubiNum>42</ubiNum>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_words("forty two")))
        .expect(1)
        .mount(&app.upstream)
        .await;

    // The second call is served from cache: no WSDL fetch, no conversion call.
    for _ in 0..2 {
        let response = app.get("/external-data?source=soap&number=42").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "result": "forty two" }));
    }

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_invalid_source_makes_no_upstream_call() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.upstream)
        .await;

    let response = app.get("/external-data?source=carrier-pigeon&pokemon=pikachu").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_body(response).await,
        "Bad Request: Invalid external data source specified."
    );

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_upstream_statuses_are_classified() {
    let cases = [
        (404, "Not Found: No matching data found for your query."),
        (429, "Too Many Requests: API rate limit exceeded. Try again later."),
        (503, "Service Unavailable: External API is down."),
        (401, "Unauthorized: API key missing or invalid."),
        (418, "I'm a teapot"),
    ];

    let app = spawn_app().await;
    for (status, message) in cases {
        let name = format!("status{}", status);
        Mock::given(method("GET"))
            .and(path(format!("{}/{}", REST_PATH, name)))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream detail"))
            .mount(&app.upstream)
            .await;

        let response = app.get(&format!("/external-data?source=rest&pokemon={}", name)).await;
        assert_eq!(response.status().as_u16(), status);
        assert_eq!(error_body(response).await, message);
    }

    app.stop().await;
}

#[tokio::test]
async fn test_graphql_empty_result_is_internal_error() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "pokemon_v2_pokemon": [] }
        })))
        .mount(&app.upstream)
        .await;

    let response = app.get("/external-data?pokemon=missingno").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await, "Internal server error");

    app.stop().await;
}

#[tokio::test]
async fn test_timeout_is_gateway_timeout() {
    let app = spawn_app_with(|config| config.upstream.fetch_timeout_ms = 100).await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(graphql_pokemon(25, "pikachu", &["electric"]))
                .set_delay(Duration::from_millis(1000)),
        )
        .mount(&app.upstream)
        .await;

    let response = app.get("/external-data?source=graphql&pokemon=pikachu").await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(error_body(response).await, "Timeout accessing the external service");

    app.stop().await;
}

#[tokio::test]
async fn test_unexpected_failures_hide_detail() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "secret resolver stack trace" }]
        })))
        .mount(&app.upstream)
        .await;
    mount_wsdl(&app.upstream, 1).await;
    Mock::given(method("POST"))
        .and(path(SOAP_ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>internal db password rejected</faultstring></soap:Fault></soap:Body></soap:Envelope>"#,
        ))
        .mount(&app.upstream)
        .await;

    for query in ["/external-data?pokemon=pikachu", "/external-data?source=soap&number=7"] {
        let response = app.get(query).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = response.text().await.unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({ "error": "Internal server error" })
        );
        assert!(!text.contains("secret") && !text.contains("password"));
    }

    app.stop().await;
}

#[tokio::test]
async fn test_connection_refused_is_internal_error() {
    let app = spawn_app_with(|config| {
        config.upstream.rest_base_url = "http://127.0.0.1:1/api/v2/pokemon".to_string();
    })
    .await;

    let response = app.get("/external-data?source=rest&pokemon=pikachu").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await, "Internal server error");

    app.stop().await;
}

#[tokio::test]
async fn test_reject_policy_requires_parameters() {
    let app =
        spawn_app_with(|config| config.upstream.missing_params = MissingParamPolicy::Reject).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.upstream)
        .await;

    let response = app.get("/external-data?source=rest").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await, "Bad Request: Missing \"pokemon\" parameter.");

    let response = app.get("/external-data?source=soap").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await, "Bad Request: Missing \"number\" parameter.");

    app.upstream.verify().await;
    app.stop().await;
}

#[tokio::test]
async fn test_invalid_number() {
    let app = spawn_app().await;

    let response = app.get("/external-data?source=soap&number=twelve").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await, "Bad Request: Invalid \"number\" parameter.");

    app.stop().await;
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");

    let response = app.get("/external-data?source=nope").await;
    let minted = response.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&minted).is_ok());

    app.stop().await;
}
