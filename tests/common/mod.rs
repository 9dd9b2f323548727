//! Shared utilities for integration tests.
//!
//! Each test boots the real server on an ephemeral port, with all three
//! upstreams served by one `wiremock` instance.

#![allow(dead_code)]

use std::time::Duration;

use backend_challenge::config::AppConfig;
use backend_challenge::http::HttpServer;
use backend_challenge::lifecycle::Shutdown;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GRAPHQL_PATH: &str = "/graphql/v1beta";
pub const REST_PATH: &str = "/api/v2/pokemon";
pub const WSDL_PATH: &str = "/webservicesserver/numberconversion.wso";
pub const SOAP_ENDPOINT_PATH: &str = "/webservicesserver/NumberConversion.wso";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub upstream: MockServer,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.address, path_and_query)
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(self.url(path_and_query))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    /// Stop the server and wait for it to drain.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Config pointing every upstream at `upstream`, with rate limiting off.
pub fn test_config(upstream: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.graphql_url = format!("{}{}", upstream.uri(), GRAPHQL_PATH);
    config.upstream.rest_base_url = format!("{}{}", upstream.uri(), REST_PATH);
    config.upstream.soap_wsdl_url = format!("{}{}?WSDL", upstream.uri(), WSDL_PATH);
    config.upstream.fetch_timeout_ms = 1000;
    config.upstream.probe_timeout_ms = 1000;
    config.rate_limit.enabled = false;
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Boot the server after letting the test adjust the config.
pub async fn spawn_app_with(configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let upstream = MockServer::start().await;
    let mut config = test_config(&upstream);
    configure(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .expect("failed to bind");
    let address = format!("http://{}", listener.local_addr().unwrap());

    let server = HttpServer::new(config).expect("failed to build server");
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.expect("server error");
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        upstream,
        shutdown,
        handle,
    }
}

pub fn graphql_pokemon(id: u64, name: &str, types: &[&str]) -> Value {
    json!({
        "data": {
            "pokemon_v2_pokemon": [{
                "id": id,
                "name": name,
                "pokemon_v2_pokemontypes": types
                    .iter()
                    .map(|t| json!({ "pokemon_v2_type": { "name": t } }))
                    .collect::<Vec<_>>()
            }]
        }
    })
}

pub fn rest_pokemon(id: u64, name: &str, types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "types": types
            .iter()
            .enumerate()
            .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": "" } }))
            .collect::<Vec<_>>()
    })
}

pub fn wsdl_document() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             targetNamespace="http://www.dataaccess.com/webservicesserver/">
  <service name="NumberConversion">
    <port name="NumberConversionSoap" binding="tns:NumberConversionSoapBinding">
      <soap:address location="{}"/>
    </port>
  </service>
</definitions>"#,
        SOAP_ENDPOINT_PATH
    )
}

pub fn soap_words(result: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <m:NumberToWordsResponse xmlns:m="http://www.dataaccess.com/webservicesserver/">
      <m:NumberToWordsResult>{} </m:NumberToWordsResult>
    </m:NumberToWordsResponse>
  </soap:Body>
</soap:Envelope>"#,
        result
    )
}

/// Serve the WSDL, `times` times exactly.
pub async fn mount_wsdl(upstream: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path(WSDL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(wsdl_document()))
        .expect(times)
        .mount(upstream)
        .await;
}
