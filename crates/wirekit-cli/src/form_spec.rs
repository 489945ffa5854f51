//! Parsing of `name=value` / `name=@path` field specs into a [`Form`].
//!
//! A value starting with `@` names a file; `@@` escapes a literal leading
//! `@` and is taken verbatim. Text values and file paths are passed through
//! [`unquote`], so `name='  padded  '` keeps its spaces and
//! `file=@"my report.pdf"` names a path containing a space.

use anyhow::{Context, bail};
use wirekit_common::{FieldValue, Form, tokenize, unquote};

/// Parse one field spec.
///
/// # Errors
///
/// Returns an error if the spec has no `=`, an empty name, mismatched quotes
/// around the value, or an empty file path.
pub fn parse_field(spec: &str) -> anyhow::Result<(String, FieldValue)> {
    let Some((name, raw)) = spec.split_once('=') else {
        bail!("invalid field {spec:?}: expected name=value or name=@path");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid field {spec:?}: empty name");
    }
    let raw = raw.trim();
    let context = || format!("invalid field {spec:?}");

    if let Some(rest) = raw.strip_prefix("@@") {
        return Ok((name.to_string(), FieldValue::Text(format!("@{rest}"))));
    }
    if let Some(path) = raw.strip_prefix('@') {
        let path = unquote(path).with_context(context)?;
        if path.is_empty() {
            bail!("invalid field {spec:?}: empty file path");
        }
        return Ok((name.to_string(), FieldValue::File { path: path.into() }));
    }
    let value = unquote(raw).with_context(context)?;
    Ok((name.to_string(), FieldValue::Text(value)))
}

/// Build a form from field specs, preserving their order.
///
/// # Errors
///
/// Returns the first spec error encountered.
pub fn build_form<S: AsRef<str>>(specs: &[S]) -> anyhow::Result<Form> {
    let mut form = Form::new();
    for spec in specs {
        let (name, value) = parse_field(spec.as_ref())?;
        form.push(name, value);
    }
    Ok(form)
}

/// Split a single line of field specs with the quote-aware tokenizer, e.g.
/// `'title=Quarterly report' file=@report.pdf`.
///
/// A token that directly follows a closing quote becomes its own spec, so a
/// quoted value must be written as part of one token: `'title=Quarterly
/// report'` rather than `title='Quarterly report'`.
///
/// # Errors
///
/// Returns an error if the line has an unmatched quote.
pub fn split_line(line: &str) -> anyhow::Result<Vec<String>> {
    tokenize(line).with_context(|| format!("invalid field line {line:?}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn file(s: &str) -> FieldValue {
        FieldValue::File {
            path: PathBuf::from(s),
        }
    }

    #[test]
    fn plain_text_field() {
        assert_eq!(
            parse_field("title=hello").unwrap(),
            ("title".to_string(), text("hello"))
        );
    }

    #[test]
    fn value_may_contain_equals() {
        assert_eq!(parse_field("q=a=b").unwrap().1, text("a=b"));
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(parse_field("flag=").unwrap().1, text(""));
    }

    #[test]
    fn file_field() {
        assert_eq!(
            parse_field("upload=@/tmp/x.bin").unwrap(),
            ("upload".to_string(), file("/tmp/x.bin"))
        );
    }

    #[test]
    fn quoted_file_path() {
        assert_eq!(
            parse_field("doc=@'my report.pdf'").unwrap().1,
            file("my report.pdf")
        );
    }

    #[test]
    fn double_at_escapes_literal_at() {
        assert_eq!(parse_field("handle=@@wirekit").unwrap().1, text("@wirekit"));
    }

    #[test]
    fn quoted_value_keeps_inner_whitespace() {
        assert_eq!(parse_field("pad='  x  '").unwrap().1, text("  x  "));
    }

    #[test]
    fn missing_equals_is_rejected() {
        let err = parse_field("nonsense").unwrap_err();
        assert!(err.to_string().contains("expected name=value"));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn empty_file_path_is_rejected() {
        let err = parse_field("f=@").unwrap_err();
        assert!(err.to_string().contains("empty file path"));
    }

    #[test]
    fn mismatched_value_quotes_are_rejected() {
        let err = parse_field("q='oops").unwrap_err();
        assert!(format!("{err:#}").contains("mismatched quotes"));
    }

    #[test]
    fn build_form_preserves_order_and_duplicates() {
        let form = build_form(&["b=2", "a=1", "b=3", "f=@x.bin"]).unwrap();
        let names: Vec<&str> = form.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "b", "f"]);
        assert_eq!(form.fields()[3].1, file("x.bin"));
    }

    #[test]
    fn build_form_stops_at_first_error() {
        assert!(build_form(&["a=1", "broken", "c=3"]).is_err());
    }

    #[test]
    fn split_line_honours_quotes() {
        assert_eq!(
            split_line("a=1 'title=Quarterly report' file=@x.bin").unwrap(),
            vec!["a=1", "title=Quarterly report", "file=@x.bin"]
        );
    }

    #[test]
    fn split_line_unmatched_quote() {
        let err = split_line("a=1 'b=2").unwrap_err();
        assert!(format!("{err:#}").contains("unmatched"));
    }
}
