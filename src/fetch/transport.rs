//! Default network transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, Method};
use url::Url;

use crate::fetch::response::FetchResponse;
use crate::traits::transport::{TransportError, TransportFactory, TransportRequest};

/// Opens requests on a shared `reqwest` client with connection pooling.
#[derive(Clone)]
pub struct ReqwestTransportFactory {
    client: reqwest::Client,
}

impl ReqwestTransportFactory {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn create(&self, uri: &str, method: Method) -> Result<Box<dyn TransportRequest>, TransportError> {
        let url = Url::parse(uri).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Box::new(ReqwestRequest {
            client: self.client.clone(),
            uri: uri.to_string(),
            url,
            method,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }))
    }
}

struct ReqwestRequest {
    client: reqwest::Client,
    uri: String,
    url: Url,
    method: Method,
    headers: HeaderMap,
    body: Vec<u8>,
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else {
        TransportError::Io(error.to_string())
    }
}

#[async_trait]
impl TransportRequest for ReqwestRequest {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn method(&self) -> &Method {
        &self.method
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn body_mut(&mut self) -> &mut Vec<u8> {
        &mut self.body
    }

    async fn execute(&mut self) -> Result<FetchResponse, TransportError> {
        let mut builder = self
            .client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());
        if !self.body.is_empty() {
            builder = builder.body(self.body.clone());
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(FetchResponse::new(status, reason, headers, body))
    }
}
