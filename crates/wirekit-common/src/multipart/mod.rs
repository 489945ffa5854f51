//! Streaming `multipart/form-data` request bodies.
//!
//! A [`Form`] is an ordered list of named fields, each either text or a
//! reference to a file on disk. [`write_form_data`] (or an [`Encoder`] when
//! the buffer should be reused or sized explicitly) frames the fields with a
//! [`Boundary`] and streams file contents through a fixed-size buffer, so
//! memory use does not grow with file size.

mod encode;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub use encode::{DEFAULT_BUFFER_SIZE, Encoder, write_form_data};

/// Number of random bytes in a generated boundary (hex-encoded to 32 chars).
const BOUNDARY_BYTES: usize = 16;
/// RFC 2046 upper bound on boundary length.
const MAX_BOUNDARY_LEN: usize = 70;

/// The value of one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Sent as-is, without `filename` or content-type headers.
    Text(String),
    /// Streamed from disk as `application/octet-stream`.
    File { path: PathBuf },
}

/// Ordered form fields. Part order on the wire is insertion order, and
/// repeated names each produce their own part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, FieldValue)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field rendered through `Display`.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push(name, FieldValue::Text(value.to_string()));
        self
    }

    /// Add a file field whose body is read from `path` at encode time.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.push(name, FieldValue::File { path: path.into() });
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Exact number of bytes [`write_form_data`] will produce for this form,
    /// using the current on-disk size of every file field.
    ///
    /// Useful for a `Content-Length` header. The figure is only accurate if
    /// no file changes size between this call and encoding.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::FileRead`] if a file's metadata cannot be read.
    pub fn content_length(&self, boundary: &Boundary) -> Result<u64, MultipartError> {
        let mut total = 0u64;
        for (name, value) in &self.fields {
            total += part_header(boundary, name, value).len() as u64;
            total += match value {
                FieldValue::Text(text) => text.len() as u64,
                FieldValue::File { path } => std::fs::metadata(path)
                    .map_err(|e| MultipartError::file_read(path, e))?
                    .len(),
            };
            total += CRLF.len() as u64;
        }
        total += closing_delimiter(boundary).len() as u64;
        Ok(total)
    }
}

const CRLF: &[u8] = b"\r\n";

/// Header block of one part, from the opening delimiter through the blank line.
fn part_header(boundary: &Boundary, name: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Text(_) => {
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
        }
        FieldValue::File { path } => format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\
             Content-Transfer-Encoding: binary\r\n\
             \r\n",
            path.display()
        ),
    }
}

fn closing_delimiter(boundary: &Boundary) -> String {
    format!("--{boundary}--\r\n")
}

/// A multipart boundary token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// 16 random bytes, hex-encoded (32 lowercase hex chars).
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut buf = [0u8; BOUNDARY_BYTES];
        rand::thread_rng().fill_bytes(&mut buf);
        Self(hex::encode(buf))
    }

    /// Use a caller-chosen boundary, e.g. for reproducible output.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundaryError`] unless `value` is 1–70 RFC 2046 `bchars`
    /// and does not end in a space.
    pub fn new(value: impl Into<String>) -> Result<Self, BoundaryError> {
        let value = value.into();
        if value.is_empty() {
            return Err(BoundaryError::Empty);
        }
        if value.len() > MAX_BOUNDARY_LEN {
            return Err(BoundaryError::TooLong(value.len()));
        }
        if let Some(c) = value.chars().find(|&c| !is_bchar(c)) {
            return Err(BoundaryError::InvalidChar(c));
        }
        if value.ends_with(' ') {
            return Err(BoundaryError::TrailingSpace);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Content-Type` header value announcing this boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.0)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const fn is_bchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '\'' | '(' | ')' | '+' | '_' | ',' | '-' | '.' | '/' | ':' | '=' | '?' | ' '
        )
}

/// Error returned by [`Boundary::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    Empty,
    TooLong(usize),
    InvalidChar(char),
    TrailingSpace,
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "boundary must not be empty"),
            Self::TooLong(len) => {
                write!(f, "boundary is {len} chars, at most {MAX_BOUNDARY_LEN} allowed")
            }
            Self::InvalidChar(c) => write!(f, "boundary contains invalid character {c:?}"),
            Self::TrailingSpace => write!(f, "boundary must not end with a space"),
        }
    }
}

impl std::error::Error for BoundaryError {}

/// Error returned while encoding a [`Form`].
///
/// When encoding fails the sink may already hold a truncated body; treat the
/// whole request as failed.
#[derive(Debug)]
pub enum MultipartError {
    /// A file field could not be opened, inspected, or read.
    FileRead { path: PathBuf, source: io::Error },
    /// The sink rejected a write or flush.
    Sink(io::Error),
}

impl MultipartError {
    fn file_read(path: &Path, source: io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for MultipartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileRead { path, .. } => {
                write!(f, "could not read {}", path.display())
            }
            Self::Sink(_) => f.write_str("could not write multipart body"),
        }
    }
}

impl std::error::Error for MultipartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileRead { source, .. } => Some(source),
            Self::Sink(e) => Some(e),
        }
    }
}
