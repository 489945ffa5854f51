use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use tempfile::NamedTempFile;

use wirekit::config::FormConfig;
use wirekit::form_spec;
use wirekit_common::{Boundary, Encoder, FieldValue, Form};

#[derive(Args)]
pub struct FormArgs {
    /// Field as name=value, or name=@path to stream a file (@@ for a literal @)
    #[arg(short = 'F', long = "field", value_name = "SPEC")]
    fields: Vec<String>,

    /// More field specs in one quoted, whitespace-separated line (appended after -F fields)
    #[arg(long, value_name = "LINE")]
    line: Option<String>,

    /// Write the body to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use a fixed boundary instead of a random one
    #[arg(long)]
    boundary: Option<String>,

    /// Streaming buffer size in bytes (overrides config)
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Print Content-Type and Content-Length headers to stderr
    #[arg(long)]
    print_headers: bool,
}

pub fn cmd_form(args: &FormArgs, config: &FormConfig) -> anyhow::Result<i32> {
    let mut specs = args.fields.clone();
    if let Some(line) = &args.line {
        specs.extend(form_spec::split_line(line)?);
    }
    let form = form_spec::build_form(&specs)?;

    let boundary = match &args.boundary {
        Some(b) => Boundary::new(b.as_str()).context("invalid --boundary")?,
        None => Boundary::generate(),
    };
    let buffer_size = args.buffer_size.unwrap_or(config.buffer_size);
    if buffer_size == 0 {
        bail!("--buffer-size must be greater than zero");
    }

    if args.print_headers || config.print_headers {
        let len = form.content_length(&boundary)?;
        eprintln!("Content-Type: {}", boundary.content_type());
        eprintln!("Content-Length: {len}");
    }

    let mut encoder = Encoder::with_capacity(buffer_size);
    let written = if let Some(path) = &args.output {
        reject_output_as_input(path, &form)?;
        encode_to_file(&mut encoder, path, &boundary, &form)?
    } else {
        encoder.encode(std::io::stdout().lock(), &boundary, &form)?
    };

    tracing::debug!(
        parts = form.len(),
        bytes = written,
        buffer_size,
        "encoded multipart body"
    );
    Ok(0)
}

/// Fail if `output` is one of the form's file fields; it would be replaced
/// before or while it is read.
fn reject_output_as_input(output: &Path, form: &Form) -> anyhow::Result<()> {
    let Ok(output) = fs::canonicalize(output) else {
        return Ok(());
    };
    for (name, value) in form.fields() {
        if let FieldValue::File { path } = value
            && fs::canonicalize(path).is_ok_and(|p| p == output)
        {
            bail!(
                "output {} is also the input of field {name:?}",
                path.display()
            );
        }
    }
    Ok(())
}

/// Encode into a temp file beside `path` and move it into place only once
/// the whole body is written, so a failed encode leaves `path` untouched.
fn encode_to_file(
    encoder: &mut Encoder,
    path: &Path,
    boundary: &Boundary,
    form: &Form,
) -> anyhow::Result<u64> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("could not create temp file in {}", dir.display()))?;
    let written = encoder.encode(BufWriter::new(tmp.as_file()), boundary, form)?;
    tmp.persist(path)
        .with_context(|| format!("could not write {}", path.display()))?;
    Ok(written)
}
