//! Reading key tables.
//!
//! A key table is plain text with one key and one integer value per line,
//! separated by whitespace:
//!
//! ```text
//! cat 1
//! car 2
//!
//! dog 3
//! ```
//!
//! Blank lines are skipped. Tokens after the value are ignored. Values may
//! have a sign, and single underscores between digits, like `-1_000`.

use crate::Error;
use itertools::Itertools;
use std::fs;
use std::num::ParseIntError;
use std::path::Path;

/// One line of a key table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number.
    pub line: usize,

    /// The key.
    pub key: String,

    /// The value.
    pub value: i64,
}

/// Parse a key table.
///
/// ```rust
/// let records = triegen::table::parse("cat 1\n\n  dog\t-3 \n").unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].key, "dog");
/// assert_eq!(records[1].value, -3);
/// assert_eq!(records[1].line, 3);
/// ```
///
/// # Errors
///
/// Returns an error for the first line that is missing a value, has a value
/// that isn’t an integer, or has a key containing a NUL byte.
pub fn parse(text: &str) -> Result<Vec<Record>, Error> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(index.saturating_add(1), line))
        .collect()
}

/// Read and parse a key table from a file.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file can’t be read or isn’t UTF-8, and
/// otherwise the same errors as [`parse()`].
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })?;

    let records = parse(&text)?;
    tracing::debug!(path = ?path, records = records.len(), "read key table");
    Ok(records)
}

/// Parse a single non-blank line.
fn parse_line(line: usize, text: &str) -> Result<Record, Error> {
    let mut tokens = text.split_whitespace();
    let (key, value) = match tokens.next_tuple() {
        Some(pair) => pair,
        None => {
            return Err(Error::MissingValue {
                line,
                key: text.trim().to_owned(),
            })
        }
    };

    if key.contains('\0') {
        return Err(Error::NulInKey {
            line: Some(line),
            key: key.to_owned(),
        });
    }

    let rest = tokens.join(" ");
    if !rest.is_empty() {
        tracing::warn!(line, key, ignored = %rest, "ignoring extra tokens");
    }

    let parsed = parse_value(value).map_err(|source| Error::InvalidValue {
        line,
        key: key.to_owned(),
        value: value.to_owned(),
        source,
    })?;

    Ok(Record {
        line,
        key: key.to_owned(),
        value: parsed,
    })
}

/// Parse an integer, allowing single underscores between digits.
///
/// Misplaced underscores are left in, so parsing fails.
fn parse_value(value: &str) -> Result<i64, ParseIntError> {
    let is_digit = |c: char| c.is_ascii_digit();
    let separators_ok = value
        .split('_')
        .tuple_windows::<(&str, &str)>()
        .all(|(before, after)| {
            before.ends_with(is_digit) && after.starts_with(is_digit)
        });

    if separators_ok {
        value.replace('_', "").parse()
    } else {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    fn record(line: usize, key: &str, value: i64) -> Record {
        Record {
            line,
            key: key.to_owned(),
            value,
        }
    }

    #[test]
    fn scenario() {
        check!(
            parse("cat 1\ncar 2\ndog 3\n").unwrap()
                == [record(1, "cat", 1), record(2, "car", 2), record(3, "dog", 3)]
        );
    }

    #[test]
    fn blank_lines_and_whitespace() {
        check!(
            parse("\n  \t\n  hello    42  \r\n\n").unwrap()
                == [record(3, "hello", 42)]
        );
    }

    #[test]
    fn empty_input() {
        check!(parse("").unwrap().is_empty());
        check!(parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn signed_values() {
        check!(
            parse("a +5\nb -7\n").unwrap()
                == [record(1, "a", 5), record(2, "b", -7)]
        );
    }

    #[test]
    fn underscores_between_digits() {
        check!(
            parse("a 1_000\nb -2_147_483_648\nc +1_2_3\n").unwrap()
                == [
                    record(1, "a", 1000),
                    record(2, "b", -2_147_483_648),
                    record(3, "c", 123),
                ]
        );

        for value in ["_1", "1_", "1__0", "-_1", "_", "1_x"] {
            let_assert!(
                Err(Error::InvalidValue { value: token, .. }) =
                    parse(&format!("a {value}"))
            );
            check!(token == value);
        }
    }

    #[test]
    fn extra_tokens_are_ignored() {
        check!(parse("a 1 2 3").unwrap() == [record(1, "a", 1)]);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        check!(
            parse("a 1\na 2").unwrap() == [record(1, "a", 1), record(2, "a", 2)]
        );
    }

    #[test]
    fn missing_value() {
        let_assert!(Err(error) = parse("cat 1\n\n  dog  \n"));
        let_assert!(Error::MissingValue { line, key } = error);
        check!(line == 3);
        check!(key == "dog");
    }

    #[test]
    fn invalid_value() {
        let_assert!(Err(error) = parse("cat one"));
        let_assert!(Error::InvalidValue { line, key, value, .. } = error);
        check!(line == 1);
        check!(key == "cat");
        check!(value == "one");

        check!(let Err(Error::InvalidValue { .. }) = parse("cat 1.5"));
        check!(let Err(Error::InvalidValue { .. }) = parse("cat 99999999999999999999"));
    }

    #[test]
    fn nul_in_key() {
        let_assert!(
            Err(Error::NulInKey { line, key }) = parse("a 1\n\na\0b 1")
        );
        check!(line == Some(3));
        check!(key == "a\0b");
    }

    #[test]
    fn read_missing_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("missing.txt");
        let_assert!(Err(Error::Read { path: error_path, .. }) = read(&path));
        check!(error_path == path);
    }

    #[test]
    fn read_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("table.txt");
        fs::write(&path, "hello 42\n").unwrap();
        check!(read(&path).unwrap() == [record(1, "hello", 42)]);
    }
}
