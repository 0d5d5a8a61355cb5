//! Bounded retry over the network transport.
//!
//! Responses below 500 are terminal, success and client errors alike.
//! Responses at or above 500 and transport errors are retried up to the
//! factory's attempt limit, sleeping the configured interval between
//! attempts. The sleep races the factory's cancellation token; cancellation
//! surfaces as a dedicated interrupted error, distinct from exhaustion.

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};

use crate::errors::FetchError;
use crate::fetch::factory::FactoryInner;
use crate::fetch::mdc;
use crate::fetch::response::FetchResponse;
use crate::observability::messages::fetch::{FetchCompleted, FetchRetrying};
use crate::observability::messages::StructuredLog;
use crate::traits::transport::{TransportError, TransportRequest};

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_JOB_ID: HeaderName = HeaderName::from_static("x-job-id");
const X_APPLICATION_ID: HeaderName = HeaderName::from_static("x-application-id");

pub(crate) async fn execute_with_retry(
    factory: &FactoryInner,
    uri: &str,
    method: &Method,
    pending_headers: &HeaderMap,
    mut prepared: Option<Box<dyn TransportRequest>>,
) -> Result<FetchResponse, FetchError> {
    let max_attempts = factory.max_attempts;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match attempt_fetch(factory, uri, method, pending_headers, &mut prepared).await {
            Ok(response) if response.status().as_u16() < 500 => {
                FetchCompleted { uri, status: response.status().as_u16() }.log();
                return Ok(response);
            }
            Ok(response) => {
                FetchRetrying {
                    uri,
                    attempt,
                    max_attempts,
                    status: Some(response.status().as_u16()),
                }
                .log();
                if attempt >= max_attempts {
                    return Err(FetchError::RetryExhausted5xx {
                        uri: uri.to_string(),
                        status: response.status(),
                        attempts: attempt,
                    });
                }
            }
            Err(cause) => {
                FetchRetrying { uri, attempt, max_attempts, status: None }.log();
                if attempt >= max_attempts {
                    return Err(FetchError::RetryExhaustedTransport {
                        uri: uri.to_string(),
                        attempts: attempt,
                        cause,
                    });
                }
            }
        }

        tokio::select! {
            _ = factory.cancellation.cancelled() => {
                return Err(FetchError::InterruptedDuringRetry { uri: uri.to_string() });
            }
            _ = tokio::time::sleep(factory.retry_interval) => {}
        }
    }
}

/// One transport attempt: materialise the request if needed, re-apply the
/// registered configurators and the context headers, then dispatch.
async fn attempt_fetch(
    factory: &FactoryInner,
    uri: &str,
    method: &Method,
    pending_headers: &HeaderMap,
    prepared: &mut Option<Box<dyn TransportRequest>>,
) -> Result<FetchResponse, TransportError> {
    if prepared.is_none() {
        let mut request = factory.transport.create(uri, method.clone())?;
        request.headers_mut().extend(pending_headers.clone());
        *prepared = Some(request);
    }
    let request = prepared.as_mut().expect("request just prepared");

    let callbacks: Vec<_> = factory
        .callbacks
        .read()
        .expect("callback registry poisoned")
        .clone();
    for callback in &callbacks {
        callback.configure(request.as_mut());
    }

    inject_context_headers(request.as_mut(), &factory.mdc_snapshot);

    request.execute().await
}

fn inject_context_headers(
    request: &mut dyn TransportRequest,
    snapshot: &std::collections::HashMap<String, String>,
) {
    if let Some(job_id) = snapshot.get(mdc::JOB_ID_KEY) {
        if let Ok(value) = HeaderValue::from_str(job_id) {
            request.headers_mut().insert(X_REQUEST_ID, value.clone());
            request.headers_mut().insert(X_JOB_ID, value);
        }
    }
    if let Some(application_id) = snapshot.get(mdc::APPLICATION_ID_KEY) {
        if let Ok(value) = HeaderValue::from_str(application_id) {
            request.headers_mut().insert(X_APPLICATION_ID, value);
        }
    }
}
