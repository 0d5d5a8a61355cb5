use std::sync::Arc;

use http::{HeaderMap, Method};

use crate::errors::FetchError;
use crate::fetch::factory::FactoryInner;
use crate::fetch::mdc::ContextSwap;
use crate::fetch::response::FetchResponse;
use crate::fetch::{config_file, data_uri, retry};
use crate::traits::transport::TransportRequest;

/// URI schemes served through the configuration's file loaders.
const LOCAL_SCHEMES: [&str; 4] = ["file", "", "classpath", "servlet"];

/// A single-use request for a logical URI.
///
/// Execution dispatches on the URI scheme: `data:` URIs are decoded inline,
/// local schemes go through the configuration lookup chain, everything else
/// hits the network transport with bounded retry.
pub struct ResolvingRequest {
    factory: Arc<FactoryInner>,
    uri: String,
    method: Method,
    headers: HeaderMap,
    prepared: Option<Box<dyn TransportRequest>>,
}

impl ResolvingRequest {
    pub(crate) fn new(factory: Arc<FactoryInner>, uri: String, method: Method) -> Self {
        Self {
            factory,
            uri,
            method,
            headers: HeaderMap::new(),
            prepared: None,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Headers merged into the transport request when it is materialised.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Body of the underlying transport request.
    ///
    /// Materialises the transport request early, merging the pending
    /// headers; execution reuses it. May be called at most once.
    pub fn body_mut(&mut self) -> Result<&mut Vec<u8>, FetchError> {
        if self.prepared.is_some() {
            return Err(FetchError::BodyAlreadyRequested);
        }
        let mut request = self
            .factory
            .transport
            .create(&self.uri, self.method.clone())
            .map_err(|cause| FetchError::PrepareFailed {
                uri: self.uri.clone(),
                cause,
            })?;
        request.headers_mut().extend(self.headers.clone());
        self.prepared = Some(request);
        Ok(self.prepared.as_mut().expect("request just prepared").body_mut())
    }

    /// Execute the request. Consumes the request: a logical request runs at
    /// most once.
    pub async fn execute(self) -> Result<FetchResponse, FetchError> {
        let _swap = ContextSwap::swap_in(&self.factory.mdc_snapshot);

        match scheme_of(&self.uri) {
            Some("data") => data_uri::resolve(&self.uri),
            scheme if is_local(scheme) => config_file::resolve(&self.factory, &self.uri),
            _ => {
                retry::execute_with_retry(
                    &self.factory,
                    &self.uri,
                    &self.method,
                    &self.headers,
                    self.prepared,
                )
                .await
            }
        }
    }
}

fn is_local(scheme: Option<&str>) -> bool {
    match scheme {
        None => true,
        Some(scheme) => LOCAL_SCHEMES.contains(&scheme),
    }
}

/// Extract the scheme of a raw URI string, without a general URL parse: the
/// payload of a `data:` URI is not a legal authority/path.
fn scheme_of(uri: &str) -> Option<&str> {
    let colon = uri.find(':')?;
    let candidate = &uri[..colon];
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return None,
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_extraction() {
        assert_eq!(scheme_of("http://host/x"), Some("http"));
        assert_eq!(scheme_of("data:text/plain,hi"), Some("data"));
        assert_eq!(scheme_of("classpath:img/logo.png"), Some("classpath"));
        assert_eq!(scheme_of("img/logo.png"), None);
        assert_eq!(scheme_of("c:relative"), Some("c"));
        assert_eq!(scheme_of("1http://host"), None);
    }

    #[test]
    fn local_scheme_classification() {
        assert!(is_local(None));
        assert!(is_local(Some("file")));
        assert!(is_local(Some("classpath")));
        assert!(is_local(Some("servlet")));
        assert!(is_local(Some("")));
        assert!(!is_local(Some("http")));
        assert!(!is_local(Some("ftp")));
    }
}
