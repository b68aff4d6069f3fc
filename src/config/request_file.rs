//! Request files
//!
//! A request file is a TOML document describing one request:
//!
//! ```toml
//! method = "POST"
//! url = "https://discord.com/api/webhooks/0/A"
//!
//! [headers]
//! authorization = "token"
//! accept = ["application/json", "text/plain"]
//!
//! [multipart]
//! boundary = "END_OF_PART"
//! files = { "hello.txt" = "fixtures/hello.txt" }
//! fields = { content = "hello multipart" }
//!
//! [[multipart.parts]]
//! headers = { "Content-Type" = "application/json" }
//! body = '{"embeds": []}'
//! ```
//!
//! At most one of `json`, `form`, `multipart`, `text` and `binary` may be
//! present. Paths are resolved against the file's directory.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use reqwest::blocking::Request;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use crate::errors::{Result, RikuesutoError};
use crate::http;
use crate::request::{build_request, HeaderValues, RequestSpec};
use crate::uploads::{MultipartSpec, Part};

/// A header given either as one value or as a list of values
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    One(String),
    Many(Vec<String>),
}

impl HeaderEntry {
    fn into_values(self) -> Vec<String> {
        match self {
            HeaderEntry::One(value) => vec![value],
            HeaderEntry::Many(values) => values,
        }
    }
}

/// Declarative description of one request
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestFile {
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: IndexMap<String, HeaderEntry>,
    pub json: Option<JsonMap<String, JsonValue>>,
    pub form: Option<IndexMap<String, String>>,
    pub multipart: Option<MultipartFile>,
    pub text: Option<String>,
    /// Path of a file sent as `application/octet-stream`
    pub binary: Option<PathBuf>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultipartFile {
    pub boundary: Option<String>,
    /// Filename -> path
    #[serde(default)]
    pub files: IndexMap<String, PathBuf>,
    #[serde(default)]
    pub parts: Vec<PartFile>,
    /// Field name -> inline value
    #[serde(default)]
    pub fields: IndexMap<String, String>,
}

/// A custom part; the body is inline text or read from `path`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartFile {
    #[serde(default)]
    pub headers: IndexMap<String, HeaderEntry>,
    pub body: Option<String>,
    pub path: Option<PathBuf>,
}

fn default_method() -> String {
    http::GET.to_string()
}

impl RequestFile {
    /// Parse a request file; relative paths resolve against the current directory
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| RikuesutoError::Config(format!("Invalid request file TOML: {}", e)))
    }

    /// Load a request file from disk; relative paths resolve against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RikuesutoError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut file = Self::from_toml_str(&content)?;
        file.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(path = %path.display(), method = %file.method, url = %file.url, "Loaded request file");
        Ok(file)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Open every referenced file and produce the request spec
    pub fn into_spec(self) -> Result<RequestSpec> {
        let base_dir = self.base_dir;
        let mut builder = RequestSpec::builder(self.url).headers(header_values(self.headers));

        if let Some(json) = self.json {
            builder = builder.json(json);
        }
        if let Some(form) = self.form {
            builder = builder.form(form);
        }
        if let Some(multipart) = self.multipart {
            builder = builder.multipart(multipart.into_spec(&base_dir)?);
        }
        if let Some(text) = self.text {
            builder = builder.text(text);
        }
        if let Some(path) = self.binary {
            builder = builder.binary(open(&base_dir, &path)?);
        }

        builder.build()
    }

    /// Build the transport request described by this file
    pub fn into_request(self) -> Result<Request> {
        let method = self.method.clone();
        build_request(&method, self.into_spec()?)
    }
}

impl MultipartFile {
    fn into_spec(self, base_dir: &Path) -> Result<MultipartSpec> {
        let mut spec = MultipartSpec::new();
        for (filename, path) in self.files {
            spec = spec.file(filename, open(base_dir, &path)?);
        }
        for part in self.parts {
            let headers = header_values(part.headers);
            let part = match (part.body, part.path) {
                (Some(_), Some(_)) => {
                    return Err(RikuesutoError::Config(
                        "multipart part cannot have both `body` and `path`".to_string(),
                    ))
                }
                (Some(body), None) => Part::new(headers, Cursor::new(body.into_bytes())),
                (None, Some(path)) => Part::new(headers, open(base_dir, &path)?),
                (None, None) => Part::new(headers, io::empty()),
            };
            spec = spec.part(part);
        }
        for (name, value) in self.fields {
            spec = spec.text_field(name, value);
        }
        if let Some(boundary) = self.boundary {
            spec = spec.with_boundary(boundary);
        }
        Ok(spec)
    }
}

fn header_values(headers: IndexMap<String, HeaderEntry>) -> HeaderValues {
    headers
        .into_iter()
        .map(|(name, entry)| (name, entry.into_values()))
        .collect()
}

fn open(base_dir: &Path, path: &Path) -> Result<File> {
    let full_path = base_dir.join(path);
    File::open(&full_path).map_err(|e| {
        RikuesutoError::Config(format!("Failed to open {}: {}", full_path.display(), e))
    })
}
