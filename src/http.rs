use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::appcommand::{request_body, AppCommand, APPCOMMAND_PATH};
use crate::error::{AvrError, Result};
use crate::transport::HttpTransport;

/// Path of the simple command endpoint; the command is the query string
pub const COMMAND_PATH: &str = "/goform/formiPhoneAppDirect.xml";

/// HTTP client for one receiver
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for `host:port` with a per-request timeout
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url(host, port),
        })
    }

    /// Base URL of the receiver, e.g. `http://192.168.1.20:8080`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path on the receiver and return the body
    pub async fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(map_timeout)?;
        let body = response.error_for_status()?.text().await?;
        Ok(body)
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn get_command(&self, command: &str) -> Result<String> {
        self.get(&format!("{}?{}", COMMAND_PATH, encode_command(command)))
            .await
    }

    async fn post_appcommand(&self, commands: &[AppCommand]) -> Result<String> {
        let url = format!("{}{}", self.base_url, APPCOMMAND_PATH);
        let body = request_body(commands);
        tracing::debug!("POST {}: {}", url, body);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(map_timeout)?;
        Ok(response.error_for_status()?.text().await?)
    }
}

fn base_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

fn map_timeout(e: reqwest::Error) -> AvrError {
    if e.is_timeout() {
        AvrError::Timeout
    } else {
        AvrError::Http(e)
    }
}

/// Percent-encode the characters the command endpoint cannot take raw
fn encode_command(command: &str) -> String {
    let mut encoded = String::with_capacity(command.len());
    for c in command.chars() {
        match c {
            ' ' => encoded.push_str("%20"),
            '+' => encoded.push_str("%2B"),
            '&' => encoded.push_str("%26"),
            '#' => encoded.push_str("%23"),
            '/' => encoded.push_str("%2F"),
            other => encoded.push(other),
        }
    }
    encoded
}
