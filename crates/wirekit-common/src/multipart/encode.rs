use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use super::{Boundary, CRLF, FieldValue, Form, MultipartError, closing_delimiter, part_header};

/// Default streaming buffer capacity (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Encode `form` into `sink` with a default [`Encoder`].
///
/// Returns the number of bytes written. The sink is flushed after the closing
/// delimiter.
///
/// # Errors
///
/// See [`Encoder::encode`].
pub fn write_form_data<W: Write>(
    sink: W,
    boundary: &Boundary,
    form: &Form,
) -> Result<u64, MultipartError> {
    Encoder::new().encode(sink, boundary, form)
}

/// Multipart encoder owning a fixed-size buffer for file bodies.
///
/// Peak memory is the buffer capacity regardless of file size. The buffer is
/// reused across parts and across [`encode`](Self::encode) calls.
#[derive(Debug)]
pub struct Encoder {
    buf: Box<[u8]>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// A zero capacity is raised to one byte.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Write every field of `form` to `sink`, then the closing delimiter,
    /// then flush.
    ///
    /// Parts are written strictly in field order; a file's bytes reach the
    /// sink in file-offset order. A form with no fields still produces the
    /// closing delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::FileRead`] if a file cannot be opened or
    /// read, and [`MultipartError::Sink`] if the sink fails. In both cases the
    /// sink may already contain a partial body.
    pub fn encode<W: Write>(
        &mut self,
        sink: W,
        boundary: &Boundary,
        form: &Form,
    ) -> Result<u64, MultipartError> {
        let mut sink = CountingSink::new(sink);
        for (name, value) in form.fields() {
            sink.put(part_header(boundary, name, value).as_bytes())?;
            match value {
                FieldValue::Text(text) => {
                    sink.put(text.as_bytes())?;
                    tracing::debug!(field = %name, bytes = text.len(), "wrote text part");
                }
                FieldValue::File { path } => {
                    let bytes = self.stream_file(&mut sink, path)?;
                    tracing::debug!(field = %name, path = %path.display(), bytes, "wrote file part");
                }
            }
            sink.put(CRLF)?;
        }
        sink.put(closing_delimiter(boundary).as_bytes())?;
        sink.finish()?;
        tracing::debug!(parts = form.len(), bytes = sink.written, "multipart body complete");
        Ok(sink.written)
    }

    fn stream_file<W: Write>(
        &mut self,
        sink: &mut CountingSink<W>,
        path: &Path,
    ) -> Result<u64, MultipartError> {
        let file = File::open(path).map_err(|e| MultipartError::file_read(path, e))?;
        self.stream_body(sink, file, path)
    }

    /// Copy `reader` to `sink` one buffer at a time. `reader` is dropped
    /// before this returns, on success and on error alike.
    fn stream_body<W: Write, R: Read>(
        &mut self,
        sink: &mut CountingSink<W>,
        mut reader: R,
        path: &Path,
    ) -> Result<u64, MultipartError> {
        let capacity = self.buf.len();
        let mut total = 0u64;
        loop {
            let filled =
                fill_buf(&mut reader, &mut self.buf).map_err(|e| MultipartError::file_read(path, e))?;
            if filled > 0 {
                sink.put(&self.buf[..filled])?;
                total += filled as u64;
            }
            if filled < capacity {
                return Ok(total);
            }
            tracing::trace!(path = %path.display(), offset = total, "flushed full buffer");
        }
    }
}

/// Read until `buf` is full or the reader reports end of input.
/// Returns the number of bytes filled.
fn fill_buf<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

struct CountingSink<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingSink<W> {
    const fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), MultipartError> {
        self.inner.write_all(bytes).map_err(MultipartError::Sink)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), MultipartError> {
        self.inner.flush().map_err(MultipartError::Sink)
    }
}
