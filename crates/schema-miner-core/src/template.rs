//! JSON template loader.
//!
//! Two entry points: [`read_json_file`] returns a tagged [`TemplateError`] so callers can
//! decide between substituting, retrying or aborting; [`read_json_file_or_report`] keeps the
//! best-effort contract (log one diagnostic, return nothing, never fail the caller).

use crate::error::{TemplateError, TemplateResult};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding used to decode a template file before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// UTF-8 with an optional leading byte-order mark, which is stripped.
    Utf8Sig,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    Ascii,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Decode raw file bytes. `None` means the bytes are not valid in this encoding.
    fn decode(self, bytes: Vec<u8>) -> Option<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes).ok(),
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    String::from_utf8(bytes).ok()
                } else {
                    None
                }
            }
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    /// Case-insensitive; `_` and `-` are interchangeable (`UTF_8`, `utf-8`, `utf8`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(TextEncoding::Utf8Sig),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read `path`, decode it with `encoding`, and parse it as JSON.
pub fn read_json_file(path: impl AsRef<Path>, encoding: TextEncoding) -> TemplateResult<Value> {
    let path = path.as_ref();
    // fs::read owns the handle for the duration of the call; it is closed on every path.
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TemplateError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let text = encoding.decode(bytes).ok_or_else(|| TemplateError::Decode {
        path: path.to_path_buf(),
        encoding: encoding.label(),
    })?;

    serde_json::from_str(&text).map_err(|source| TemplateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Best-effort variant of [`read_json_file`]: every failure is logged once and turned into `None`.
pub fn read_json_file_or_report(path: impl AsRef<Path>, encoding: TextEncoding) -> Option<Value> {
    match read_json_file(path, encoding) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    }
}

/// Serialize with 4-space indentation. Output is stable for a given value.
pub fn to_pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

/// Where the schema template lives and how to decode it. Every call to [`TemplateSource::load`]
/// reads the file again; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub path: PathBuf,
    pub encoding: TextEncoding,
}

impl TemplateSource {
    pub fn new(path: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }

    pub fn load(&self) -> TemplateResult<Value> {
        read_json_file(&self.path, self.encoding)
    }

    /// Load and render for a read-only output area.
    pub fn placeholder(&self) -> TemplatePlaceholder {
        TemplatePlaceholder::from_load(self.load())
    }
}

/// Text shown in a read-only output area before any schema has been generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlaceholder {
    pub text: String,
    pub available: bool,
}

impl TemplatePlaceholder {
    /// A failed load becomes a visible diagnostic line instead of the text `null`.
    pub fn from_load(result: TemplateResult<Value>) -> Self {
        match result {
            Ok(value) => Self {
                text: to_pretty_json(&value),
                available: true,
            },
            Err(e) => {
                tracing::warn!("schema template placeholder falls back to diagnostic: {}", e);
                Self {
                    text: format!("Schema template unavailable: {}", e),
                    available: false,
                }
            }
        }
    }
}
