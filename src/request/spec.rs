//! Request description
//!
//! A [`RequestSpec`] carries the URL, caller headers and at most one
//! [`Payload`]. The payload is a closed enum, so a spec can never hold two
//! bodies at once. [`RequestSpecBuilder`] is the configuration-style way to
//! fill one in; setting a second payload there is reported by
//! [`RequestSpecBuilder::build`] instead of silently replacing the first.

use std::fmt;
use std::io::Read;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::errors::{Result, RikuesutoError};
use crate::mime::ContentTypeKind;
use crate::uploads::MultipartSpec;

/// Single-use byte stream owned by whoever encodes it
pub type ByteStream = Box<dyn Read + Send + 'static>;

/// Header name -> values (supports multiple values per name)
pub type HeaderValues = IndexMap<String, Vec<String>>;

/// Request body variants
pub enum Payload {
    /// JSON object body
    Json(JsonMap<String, JsonValue>),
    /// Form-urlencoded body
    Form(IndexMap<String, String>),
    /// Multipart form data
    Multipart(MultipartSpec),
    /// Plain text body
    Text(String),
    /// Raw stream, passed through without buffering
    Binary(ByteStream),
}

impl Payload {
    pub fn kind(&self) -> ContentTypeKind {
        match self {
            Payload::Json(_) => ContentTypeKind::Json,
            Payload::Form(_) => ContentTypeKind::Form,
            Payload::Multipart(_) => ContentTypeKind::Multipart,
            Payload::Text(_) => ContentTypeKind::Text,
            Payload::Binary(_) => ContentTypeKind::Binary,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(map) => f.debug_tuple("Json").field(map).finish(),
            Payload::Form(fields) => f.debug_tuple("Form").field(fields).finish(),
            Payload::Multipart(spec) => f.debug_tuple("Multipart").field(spec).finish(),
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Payload::Binary(_) => f.write_str("Binary(..)"),
        }
    }
}

/// Everything needed to build one outbound request
#[derive(Debug)]
pub struct RequestSpec {
    pub url: String,
    /// Caller headers, applied before the derived `Content-Type`
    pub headers: HeaderValues,
    pub payload: Option<Payload>,
}

impl RequestSpec {
    /// Spec with no headers and no body
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: IndexMap::new(),
            payload: None,
        }
    }

    pub fn builder(url: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(url)
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn content_type_kind(&self) -> ContentTypeKind {
        self.payload
            .as_ref()
            .map(Payload::kind)
            .unwrap_or(ContentTypeKind::None)
    }
}

/// Accumulates a [`RequestSpec`], deferring errors to [`build`](Self::build)
#[derive(Debug)]
pub struct RequestSpecBuilder {
    url: String,
    headers: HeaderValues,
    payload: Option<Payload>,
    error: Option<RikuesutoError>,
}

impl RequestSpecBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: IndexMap::new(),
            payload: None,
            error: None,
        }
    }

    /// Append a header value
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Append every value of every header in `headers`
    pub fn headers(mut self, headers: HeaderValues) -> Self {
        for (name, values) in headers {
            self.headers.entry(name).or_default().extend(values);
        }
        self
    }

    pub fn json(self, body: JsonMap<String, JsonValue>) -> Self {
        self.set_payload(Payload::Json(body))
    }

    /// JSON body from any serializable value that serializes to an object
    pub fn json_value<T: Serialize + ?Sized>(self, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(JsonValue::Object(map)) => self.json(map),
            Ok(other) => self.fail(RikuesutoError::Encoding(format!(
                "JSON body must be an object, got {}",
                json_type_name(&other)
            ))),
            Err(e) => self.fail(RikuesutoError::Json(e)),
        }
    }

    pub fn form<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.set_payload(Payload::Form(fields))
    }

    pub fn multipart(self, multipart: MultipartSpec) -> Self {
        self.set_payload(Payload::Multipart(multipart))
    }

    /// Plain text body. An empty string leaves the body unset.
    pub fn text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        self.set_payload(Payload::Text(text))
    }

    pub fn binary(self, stream: impl Read + Send + 'static) -> Self {
        self.set_payload(Payload::Binary(Box::new(stream)))
    }

    /// Finish the spec, reporting the first recorded error
    pub fn build(self) -> Result<RequestSpec> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(RequestSpec {
            url: self.url,
            headers: self.headers,
            payload: self.payload,
        })
    }

    fn set_payload(mut self, payload: Payload) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.payload.as_ref().map(Payload::kind) {
            Some(first) => {
                self.error = Some(RikuesutoError::ConflictingPayloads {
                    first,
                    second: payload.kind(),
                });
            }
            None => self.payload = Some(payload),
        }
        self
    }

    fn fail(mut self, err: RikuesutoError) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
