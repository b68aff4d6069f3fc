//! Request builder
//!
//! Combines the encoded body with the method, URL and caller headers into a
//! [`reqwest::blocking::Request`] ready to hand to a client.

use reqwest::blocking::Request;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use super::encode::encode_payload;
use super::spec::{HeaderValues, RequestSpec};
use crate::errors::{Result, RikuesutoError};
use crate::http;

/// Build a request for `method` from `spec`.
///
/// Caller headers only travel with a body: when the payload encodes to a
/// non-empty content type they are applied first, then `Content-Type` is set
/// unless the caller already supplied one. Body-less requests carry no
/// caller headers.
pub fn build_request(method: &str, spec: RequestSpec) -> Result<Request> {
    let RequestSpec {
        url,
        headers: caller_headers,
        payload,
    } = spec;
    let method = http::parse(method)?;
    let url = Url::parse(&url)?;

    let encoded = encode_payload(payload)?;

    let mut headers = HeaderMap::new();
    if !encoded.content_type.is_empty() {
        headers = to_header_map(&caller_headers)?;
        if !headers.contains_key(CONTENT_TYPE) {
            let value = HeaderValue::try_from(encoded.content_type.as_str()).map_err(|e| {
                RikuesutoError::InvalidHeader {
                    name: CONTENT_TYPE.to_string(),
                    message: e.to_string(),
                }
            })?;
            headers.insert(CONTENT_TYPE, value);
        }
    } else if !caller_headers.is_empty() {
        debug!(
            headers = caller_headers.len(),
            "No payload, caller headers not applied"
        );
    }

    debug!(
        method = %method,
        url = %url,
        content_type = ?headers.get(CONTENT_TYPE),
        "Built request"
    );

    let mut request = Request::new(method, url);
    *request.headers_mut() = headers;
    *request.body_mut() = encoded.body.map(Into::into);
    Ok(request)
}

/// Convert caller headers to a [`HeaderMap`], keeping every value
pub fn to_header_map(headers: &HeaderValues) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, values) in headers {
        let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
            RikuesutoError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            }
        })?;
        for value in values {
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                RikuesutoError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                }
            })?;
            map.append(header_name.clone(), header_value);
        }
    }
    Ok(map)
}

/// Build a request, panicking on failure
pub fn must_build_request(method: &str, spec: RequestSpec) -> Request {
    build_request(method, spec)
        .unwrap_or_else(|e| panic!("failed to build {method} request: {e}"))
}

pub fn get(spec: RequestSpec) -> Result<Request> {
    build_request(http::GET, spec)
}

pub fn must_get(spec: RequestSpec) -> Request {
    must_build_request(http::GET, spec)
}

pub fn post(spec: RequestSpec) -> Result<Request> {
    build_request(http::POST, spec)
}

pub fn must_post(spec: RequestSpec) -> Request {
    must_build_request(http::POST, spec)
}

pub fn put(spec: RequestSpec) -> Result<Request> {
    build_request(http::PUT, spec)
}

pub fn must_put(spec: RequestSpec) -> Request {
    must_build_request(http::PUT, spec)
}

pub fn patch(spec: RequestSpec) -> Result<Request> {
    build_request(http::PATCH, spec)
}

pub fn must_patch(spec: RequestSpec) -> Request {
    must_build_request(http::PATCH, spec)
}

pub fn head(spec: RequestSpec) -> Result<Request> {
    build_request(http::HEAD, spec)
}

pub fn must_head(spec: RequestSpec) -> Request {
    must_build_request(http::HEAD, spec)
}

pub fn options(spec: RequestSpec) -> Result<Request> {
    build_request(http::OPTIONS, spec)
}

pub fn must_options(spec: RequestSpec) -> Request {
    must_build_request(http::OPTIONS, spec)
}

pub fn delete(spec: RequestSpec) -> Result<Request> {
    build_request(http::DELETE, spec)
}

pub fn must_delete(spec: RequestSpec) -> Request {
    must_build_request(http::DELETE, spec)
}

pub fn trace(spec: RequestSpec) -> Result<Request> {
    build_request(http::TRACE, spec)
}

pub fn must_trace(spec: RequestSpec) -> Request {
    must_build_request(http::TRACE, spec)
}

pub fn connect(spec: RequestSpec) -> Result<Request> {
    build_request(http::CONNECT, spec)
}

pub fn must_connect(spec: RequestSpec) -> Request {
    must_build_request(http::CONNECT, spec)
}
