//! Local resource resolution through the active configuration.

use std::path::Path;

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};

use crate::errors::FetchError;
use crate::fetch::factory::FactoryInner;
use crate::fetch::response::FetchResponse;
use crate::observability::messages::fetch::ResolvedConfigFile;
use crate::observability::messages::StructuredLog;

/// Load a logical URI through the configuration's lookup chain and wrap the
/// bytes in a synthetic `200 OK` response.
///
/// `Content-Length` always carries the body byte count; when the
/// configuration can point at a concrete file, a best-effort `Content-Type`
/// derived from the file extension is attached.
pub(crate) fn resolve(factory: &FactoryInner, uri: &str) -> Result<FetchResponse, FetchError> {
    let bytes = factory
        .configuration
        .load(uri)
        .map_err(|cause| FetchError::ConfigFileLoadFailed {
            uri: uri.to_string(),
            cause,
        })?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len() as u64));
    if let Some(path) = factory.configuration.locate(uri) {
        if let Some(media_type) = content_type_for(&path) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(media_type));
        }
    }

    ResolvedConfigFile { uri }.log();
    Ok(FetchResponse::synthetic_ok(headers, bytes))
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "tif" | "tiff" => Some("image/tiff"),
        "txt" => Some("text/plain"),
        "yaml" | "yml" => Some("application/yaml"),
        _ => None,
    }
}
