use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use http::Method;
use tokio_util::sync::CancellationToken;

use crate::config::FetchConfig;
use crate::fetch::mdc;
use crate::fetch::request::ResolvingRequest;
use crate::traits::configuration::Configuration;
use crate::traits::transport::{RequestConfigurator, TransportFactory};

/// Factory for config-resolving requests.
///
/// Captures a snapshot of the task's diagnostic context at creation time;
/// every request created by this factory swaps that snapshot in around its
/// execution and injects the matching correlation headers before each
/// transport attempt.
#[derive(Clone)]
pub struct ClientRequestFactory {
    inner: Arc<FactoryInner>,
}

pub(crate) struct FactoryInner {
    pub(crate) configuration: Arc<dyn Configuration>,
    pub(crate) transport: Arc<dyn TransportFactory>,
    pub(crate) callbacks: RwLock<Vec<Arc<dyn RequestConfigurator>>>,
    pub(crate) mdc_snapshot: HashMap<String, String>,
    pub(crate) max_attempts: u32,
    pub(crate) retry_interval: Duration,
    pub(crate) cancellation: CancellationToken,
}

impl ClientRequestFactory {
    pub fn new(
        configuration: Arc<dyn Configuration>,
        transport: Arc<dyn TransportFactory>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            inner: Arc::new(FactoryInner {
                configuration,
                transport,
                callbacks: RwLock::new(Vec::new()),
                mdc_snapshot: mdc::copy_of_context(),
                max_attempts: config.max_attempts.max(1),
                retry_interval: config.retry_interval(),
                cancellation: CancellationToken::new(),
            }),
        }
    }

    /// Register a callback applied to every prepared request before each
    /// dispatch. Callbacks run in registration order.
    pub fn register_callback(&self, callback: Arc<dyn RequestConfigurator>) {
        self.inner
            .callbacks
            .write()
            .expect("callback registry poisoned")
            .push(callback);
    }

    /// Open a request for a logical URI. The URI decides the retrieval
    /// strategy at execution time.
    pub fn create(&self, uri: impl Into<String>, method: Method) -> ResolvingRequest {
        ResolvingRequest::new(Arc::clone(&self.inner), uri.into(), method)
    }

    pub fn configuration(&self) -> &Arc<dyn Configuration> {
        &self.inner.configuration
    }

    /// Token cancelling the interruptible wait between retry attempts.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancellation.clone()
    }
}

impl fmt::Debug for ClientRequestFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRequestFactory")
            .field("max_attempts", &self.inner.max_attempts)
            .field("retry_interval", &self.inner.retry_interval)
            .field("mdc_snapshot", &self.inner.mdc_snapshot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::{HeaderMap, StatusCode};

    use crate::errors::FetchError;
    use crate::fetch::FetchResponse;
    use crate::traits::configuration::ConfigResolveError;
    use crate::traits::transport::{TransportError, TransportRequest};

    struct StaticConfiguration;

    impl Configuration for StaticConfiguration {
        fn load(&self, uri: &str) -> Result<Vec<u8>, ConfigResolveError> {
            if uri.ends_with("known.txt") {
                Ok(b"local bytes".to_vec())
            } else {
                Err(ConfigResolveError::NotFound(uri.to_string()))
            }
        }

        fn locate(&self, _uri: &str) -> Option<PathBuf> {
            None
        }
    }

    /// Transport answering 200 and counting how often it is used.
    struct CountingTransport {
        uses: AtomicUsize,
    }

    impl CountingTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self { uses: AtomicUsize::new(0) })
        }
    }

    impl TransportFactory for Arc<CountingTransport> {
        fn create(
            &self,
            uri: &str,
            method: Method,
        ) -> Result<Box<dyn TransportRequest>, TransportError> {
            Ok(Box::new(CountingRequest {
                transport: Arc::clone(self),
                uri: uri.to_string(),
                method,
                headers: HeaderMap::new(),
                body: Vec::new(),
            }))
        }
    }

    struct CountingRequest {
        transport: Arc<CountingTransport>,
        uri: String,
        method: Method,
        headers: HeaderMap,
        body: Vec<u8>,
    }

    #[async_trait]
    impl TransportRequest for CountingRequest {
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
            self.transport.uses.fetch_add(1, Ordering::SeqCst);
            Ok(FetchResponse::new(
                StatusCode::OK,
                "OK".to_string(),
                HeaderMap::new(),
                b"remote".to_vec(),
            ))
        }
    }

    fn factory(transport: Arc<CountingTransport>) -> ClientRequestFactory {
        ClientRequestFactory::new(
            Arc::new(StaticConfiguration),
            Arc::new(transport),
            &FetchConfig::default(),
        )
    }

    #[tokio::test]
    async fn data_uris_never_touch_the_transport() {
        let transport = CountingTransport::new();
        let factory = factory(Arc::clone(&transport));

        let response = factory
            .create("data:text/plain;base64,SGk=", Method::GET)
            .execute()
            .await
            .unwrap();

        assert_eq!(response.body(), b"Hi");
        assert_eq!(transport.uses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn local_schemes_resolve_through_the_configuration() {
        let transport = CountingTransport::new();
        let factory = factory(Arc::clone(&transport));

        for uri in [
            "file:///report/known.txt",
            "classpath:report/known.txt",
            "servlet:report/known.txt",
            "report/known.txt",
        ] {
            let response = factory.create(uri, Method::GET).execute().await.unwrap();
            assert_eq!(response.body(), b"local bytes", "uri: {}", uri);
        }
        assert_eq!(transport.uses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn other_schemes_hit_the_transport() {
        let transport = CountingTransport::new();
        let factory = factory(Arc::clone(&transport));

        let response = factory
            .create("http://svc/resource", Method::GET)
            .execute()
            .await
            .unwrap();

        assert_eq!(response.body(), b"remote");
        assert_eq!(transport.uses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn body_can_only_be_requested_once() {
        let transport = CountingTransport::new();
        let factory = factory(Arc::clone(&transport));

        let mut request = factory.create("http://svc/upload", Method::POST);
        request.body_mut().unwrap().extend_from_slice(b"payload");
        let err = request.body_mut().unwrap_err();
        assert!(matches!(err, FetchError::BodyAlreadyRequested));

        // Execution reuses the request the body was written to.
        let response = request.execute().await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(transport.uses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn execute_leaves_the_caller_context_untouched() {
        let transport = CountingTransport::new();

        let factory = mdc::scope(
            [(mdc::JOB_ID_KEY.to_string(), "job-7".to_string())].into(),
            async { factory(Arc::clone(&transport)) },
        )
        .await;

        let caller_context: std::collections::HashMap<String, String> =
            [(mdc::JOB_ID_KEY.to_string(), "caller-job".to_string())].into();
        mdc::scope(caller_context.clone(), async {
            // success path
            factory
                .create("data:,ok", Method::GET)
                .execute()
                .await
                .unwrap();
            assert_eq!(mdc::copy_of_context(), caller_context);

            // failure path
            factory
                .create("data:broken", Method::GET)
                .execute()
                .await
                .unwrap_err();
            assert_eq!(mdc::copy_of_context(), caller_context);
        })
        .await;
    }
}
