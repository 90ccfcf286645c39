//! Errors produced while loading a key table or building a generator.

use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Everything that can go wrong before rendering starts.
///
/// Rendering otherwise only fails on write errors, which are returned as plain
/// [`io::Error`]s. A generator with values that don’t fit its return type
/// refuses to render with an [`io::ErrorKind::InvalidInput`] error wrapping
/// [`Error::ValueOutOfRange`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-blank line in the key table had only one token.
    #[error("line {line}: expected a key and a value, found only {key:?}")]
    MissingValue {
        /// 1-based line number in the table.
        line: usize,
        /// The lone token that was found.
        key: String,
    },

    /// The value token could not be parsed as an integer.
    #[error("line {line}: invalid value {value:?} for key {key:?}")]
    InvalidValue {
        /// 1-based line number in the table.
        line: usize,
        /// The key on that line.
        key: String,
        /// The value token as it appeared.
        value: String,
        /// Why parsing failed.
        #[source]
        source: ParseIntError,
    },

    /// A key contained a NUL byte.
    ///
    /// NUL is the string terminator in the generated code, so it cannot
    /// appear inside a key.
    #[error("{}key {key:?} contains a NUL byte", LinePrefix(.line))]
    NulInKey {
        /// 1-based line number in the table, if the key came from one.
        line: Option<usize>,
        /// The offending key, lossily decoded for display.
        key: String,
    },

    /// A value doesn’t fit in the return type of the generated function.
    ///
    /// The C compiler would silently truncate it, and a truncated value may
    /// even collide with the not found result.
    #[error(
        "value {value} for key {key:?} does not fit in the return type \
        {return_type:?}"
    )]
    ValueOutOfRange {
        /// The key, lossily decoded for display.
        key: String,
        /// The value that was added.
        value: i64,
        /// The C return type it was checked against.
        return_type: String,
    },

    /// The key table could not be read.
    #[error("could not read {path:?}")]
    Read {
        /// Path to the table.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Formats an optional line number as a message prefix, e.g. `line 3: `.
struct LinePrefix<'a>(&'a Option<usize>);

impl fmt::Display for LinePrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, "line {line}: "),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let error = Error::MissingValue {
            line: 3,
            key: "cat".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            r#"line 3: expected a key and a value, found only "cat""#
        );

        let error = Error::NulInKey {
            line: None,
            key: "a\0b".to_owned(),
        };
        assert_eq!(error.to_string(), r#"key "a\0b" contains a NUL byte"#);

        let error = Error::NulInKey {
            line: Some(4),
            key: "a\0b".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            r#"line 4: key "a\0b" contains a NUL byte"#
        );

        let error = Error::ValueOutOfRange {
            key: "big".to_owned(),
            value: 4_294_967_295,
            return_type: "int".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            r#"value 4294967295 for key "big" does not fit in the return type "int""#
        );
    }

    #[test]
    fn invalid_value_has_source() {
        use std::error::Error as _;

        let source = "x1".parse::<i64>().unwrap_err();
        let error = Error::InvalidValue {
            line: 1,
            key: "cat".to_owned(),
            value: "x1".to_owned(),
            source,
        };
        assert_eq!(error.to_string(), r#"line 1: invalid value "x1" for key "cat""#);
        assert!(error.source().is_some());
    }
}
