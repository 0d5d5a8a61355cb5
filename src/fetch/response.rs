use http::{HeaderMap, StatusCode};

/// A retrieved resource: status line, headers, and body bytes.
///
/// Responses synthesized by the data and file resolvers always report
/// `200 OK`.
#[derive(Debug)]
pub struct FetchResponse {
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, reason: String, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { status, reason, headers, body }
    }

    pub(crate) fn synthetic_ok(headers: HeaderMap, body: Vec<u8>) -> Self {
        Self::new(StatusCode::OK, "OK".to_string(), headers, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}
