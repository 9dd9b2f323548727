//! SOAP adapter for the number-to-words conversion service.
//!
//! # Responsibilities
//! - Build a client from the service WSDL (endpoint address, namespace)
//! - Invoke `NumberToWords` with a SOAP 1.1 envelope
//! - Extract `NumberToWordsResult` or surface the SOAP fault
//!
//! # Design Decisions
//! - Client construction is itself an upstream call; its failures are
//!   upstream failures, never local bugs
//! - A fresh client is built per cache miss, as the WSDL may move the endpoint

use std::time::Duration;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::external::cache::TtlCache;
use crate::external::error::UpstreamError;
use crate::external::instrument::observe_call;
use crate::external::types::{FetchParams, NumberWords, Source};
use crate::observability::metrics;

const DEFAULT_NAMESPACE: &str = "http://www.dataaccess.com/webservicesserver/";
const OPERATION: &str = "NumberToWords";

/// A constructed SOAP client: where to post and which namespace to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapClient {
    pub endpoint: Url,
    pub namespace: String,
}

/// Converts numbers to words through the SOAP service.
#[derive(Debug, Clone)]
pub struct SoapAdapter {
    http: Client,
    wsdl_url: Url,
    timeout: Duration,
    default_number: u64,
    cache: TtlCache<NumberWords>,
}

impl SoapAdapter {
    pub fn new(
        http: Client,
        wsdl_url: Url,
        timeout: Duration,
        default_number: u64,
        cache: TtlCache<NumberWords>,
    ) -> Self {
        Self {
            http,
            wsdl_url,
            timeout,
            default_number,
            cache,
        }
    }

    /// Convert `params.number` to words, consulting the cache first.
    pub async fn fetch(&self, params: &FetchParams) -> Result<NumberWords, UpstreamError> {
        let number = params.number.unwrap_or(self.default_number);
        let key = number.to_string();

        if let Some(hit) = self.cache.get(&key) {
            metrics::record_cache_lookup(Source::Soap.as_str(), true);
            tracing::debug!(source = %Source::Soap, number, "Cache hit");
            return Ok(hit);
        }
        metrics::record_cache_lookup(Source::Soap.as_str(), false);

        let client = self.connect(self.timeout).await?;
        let words =
            observe_call(Source::Soap, OPERATION, self.number_to_words(&client, number)).await?;

        self.cache.set(key, words.clone());
        Ok(words)
    }

    /// Fetch and parse the WSDL into a usable client.
    pub async fn connect(&self, timeout: Duration) -> Result<SoapClient, UpstreamError> {
        observe_call(Source::Soap, "wsdl", async {
            let timeout_ms = timeout.as_millis() as u64;
            let response = self
                .http
                .get(self.wsdl_url.clone())
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| UpstreamError::from_reqwest(e, timeout_ms))?;
            UpstreamError::check_status(&response)?;

            let wsdl = response
                .text()
                .await
                .map_err(|e| UpstreamError::from_reqwest(e, timeout_ms))?;
            parse_wsdl(&wsdl, &self.wsdl_url)
        })
        .await
    }

    async fn number_to_words(
        &self,
        client: &SoapClient,
        number: u64,
    ) -> Result<NumberWords, UpstreamError> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let response = self
            .http
            .post(client.endpoint.clone())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(build_envelope(&client.namespace, number))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout_ms))?;
        UpstreamError::check_status(&response)?;

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout_ms))?;
        let result = parse_number_to_words(&body)?;
        Ok(NumberWords { result })
    }
}

/// SOAP 1.1 request envelope for `NumberToWords`.
pub fn build_envelope(namespace: &str, number: u64) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><{op} xmlns="{ns}"><ubiNum>{number}</ubiNum></{op}></soap:Body>"#,
            r#"</soap:Envelope>"#
        ),
        op = OPERATION,
        ns = escape(namespace),
        number = number,
    )
}

fn attribute(element: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, UpstreamError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| UpstreamError::Decode(format!("bad XML attribute: {}", e)))?;
        if attr.key.local_name().as_ref() == local {
            let value = attr
                .unescape_value()
                .map_err(|e| UpstreamError::Decode(format!("bad XML attribute: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Extract the service endpoint and target namespace from a WSDL document.
/// A relative endpoint address is resolved against `wsdl_url`.
pub fn parse_wsdl(wsdl: &str, wsdl_url: &Url) -> Result<SoapClient, UpstreamError> {
    let mut reader = Reader::from_str(wsdl);
    reader.config_mut().trim_text(true);

    let mut namespace = None;
    let mut location = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"definitions" => namespace = attribute(&e, b"targetNamespace")?,
                b"address" if location.is_none() => location = attribute(&e, b"location")?,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(UpstreamError::Decode(format!(
                    "invalid WSDL at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    let location = location
        .ok_or_else(|| UpstreamError::Decode("WSDL declares no SOAP endpoint".to_string()))?;
    let endpoint = wsdl_url
        .join(&location)
        .map_err(|e| UpstreamError::Endpoint(format!("{}: {}", location, e)))?;

    Ok(SoapClient {
        endpoint,
        namespace: namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
    })
}

/// Read the conversion text out of a `NumberToWordsResponse` envelope.
pub fn parse_number_to_words(xml: &str) -> Result<String, UpstreamError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Vec<u8> = Vec::new();
    let mut result: Option<String> = None;
    let mut fault: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = e.local_name().as_ref().to_vec();
                if current == b"NumberToWordsResult" {
                    result.get_or_insert_with(String::new);
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"NumberToWordsResult" {
                    result.get_or_insert_with(String::new);
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| UpstreamError::Decode(format!("bad XML text: {}", e)))?;
                match current.as_slice() {
                    b"NumberToWordsResult" => {
                        result.get_or_insert_with(String::new).push_str(&text)
                    }
                    b"faultstring" => fault.get_or_insert_with(String::new).push_str(&text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current.clear(),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(UpstreamError::Decode(format!(
                    "invalid SOAP response at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    if let Some(fault) = fault {
        return Err(UpstreamError::Remote(format!("SOAP fault: {}", fault)));
    }

    result
        .map(|text| text.trim().to_string())
        .ok_or_else(|| UpstreamError::Decode("response carried no NumberToWordsResult".to_string()))
}
