//! Request-building and command-parsing primitives shared by the `wirekit`
//! CLI: a quote-aware argument tokenizer and a streaming
//! `multipart/form-data` encoder.

pub mod args;
pub mod multipart;

pub use args::{ParseError, tokenize, unquote};
pub use multipart::{
    Boundary, BoundaryError, DEFAULT_BUFFER_SIZE, Encoder, FieldValue, Form, MultipartError,
    write_form_data,
};
