//! Quote-aware splitting of command-line-like strings.
//!
//! Only ASCII space and tab separate tokens, and only `'` and `"` quote.
//! There are no backslash escapes: inside a quoted run every character other
//! than the opening quote is taken literally, including the other quote
//! character.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';

/// Error returned by [`tokenize`] and [`unquote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input ended while the quote opened at byte `offset` was still open.
    UnmatchedQuote { quote: char, offset: usize },
    /// Exactly one end of the input is quoted, or the two ends use different
    /// quote characters.
    MismatchedQuote { input: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedQuote { quote, offset } => {
                write!(f, "unmatched {quote} quote opened at offset {offset}")
            }
            Self::MismatchedQuote { input } => write!(f, "mismatched quotes in {input:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

const fn is_quote(c: char) -> bool {
    matches!(c, SINGLE_QUOTE | DOUBLE_QUOTE)
}

#[derive(Debug, Clone, Copy)]
enum State {
    Unquoted,
    Quoted { quote: char, offset: usize },
}

/// Split `input` into tokens, resolving single and double quotes.
///
/// Every token is trimmed before it is pushed. Quoted content keeps its
/// internal whitespace, and `""` produces an empty token. A closing quote
/// directly followed by more text starts a new token, so `'hello'abc`
/// yields `["hello", "abc"]`. Text directly followed by an opening quote is
/// likewise flushed first: `abc'def'` yields `["abc", "def"]`.
///
/// # Errors
///
/// Returns [`ParseError::UnmatchedQuote`] if the input ends inside a quote.
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = State::Unquoted;
    let mut chars = input.char_indices().peekable();

    skip_separators(&mut chars);
    while let Some((offset, c)) = chars.next() {
        match state {
            State::Unquoted if is_separator(c) => {
                flush(&mut tokens, &mut current);
                skip_separators(&mut chars);
            }
            State::Unquoted if is_quote(c) => {
                flush(&mut tokens, &mut current);
                state = State::Quoted { quote: c, offset };
            }
            State::Quoted { quote, .. } if c == quote => {
                tokens.push(current.trim().to_string());
                current.clear();
                state = State::Unquoted;
                skip_separators(&mut chars);
            }
            State::Unquoted | State::Quoted { .. } => current.push(c),
        }
    }

    if let State::Quoted { quote, offset } = state {
        return Err(ParseError::UnmatchedQuote { quote, offset });
    }
    flush(&mut tokens, &mut current);
    Ok(tokens)
}

/// Push the accumulated unquoted run (trimmed) unless it is empty.
fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(current.trim().to_string());
        current.clear();
    }
}

fn skip_separators(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|&(_, c)| is_separator(c)).is_some() {}
}

/// Strip one pair of matching quotes from a trimmed string.
///
/// - `"  'hello'  "` → `"hello"` (inner text returned verbatim)
/// - `"hello"` → `"hello"` (no quotes, just trimmed)
/// - `"'"` → `"'"` (a lone quote character is not a quoted string)
///
/// # Errors
///
/// Returns [`ParseError::MismatchedQuote`] when only one end is a quote
/// character, or both ends are quotes of different kinds.
pub fn unquote(s: &str) -> Result<String, ParseError> {
    let trimmed = s.trim();
    let mut chars = trimmed.chars();
    let first = chars.next();
    // `None` for single-character input, so a lone quote passes through.
    let last = chars.next_back();

    if !first.is_some_and(is_quote) && !last.is_some_and(is_quote) {
        return Ok(trimmed.to_string());
    }
    match (first, last) {
        (Some(open), Some(close)) if open == close => Ok(chars.as_str().to_string()),
        (Some(_), None) => Ok(trimmed.to_string()),
        _ => Err(ParseError::MismatchedQuote {
            input: trimmed.to_string(),
        }),
    }
}
