//! Code for the [`SwitchGenerator`].

use crate::trie::{Entry, TrieNode};
use crate::Error;
use itertools::Itertools;
use std::env;
use std::fmt::{self, Write as _};
use std::fs;
use std::io::{self, Write};
use std::ops::RangeInclusive;
use std::path::Path;

/// The value the generated function returns when a key is not found.
pub const NOT_FOUND: i64 = -1;

/// Build a C function with nested `switch` statements to look up string keys.
///
/// The generated function takes a NUL-terminated `const char*` and returns
/// the value stored for it, or `-1` ([`NOT_FOUND`]) if the key isn’t in the
/// table. It checks one byte at a time, except where the rest of a key can’t
/// branch anymore: those tails are checked with a single comparison.
///
/// # Example build script
///
/// ```rust
/// use std::error::Error;
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     # let tmp_dir = temp_dir::TempDir::new().unwrap();
///     # std::env::set_var("OUT_DIR", tmp_dir.path());
///     triegen::SwitchGenerator::new()
///         .fn_name("keyword_id")
///         .add("if", 1)?
///         .add("else", 2)?
///         .add("while", 3)?
///         .write_to_out_dir("keywords.c")?;
///
///     Ok(())
/// }
/// ```
///
/// Then compile `$OUT_DIR/keywords.c` with your C sources, and call
/// `keyword_id("else")`.
#[derive(Clone, Debug)]
pub struct SwitchGenerator {
    /// The name of the generated function. Defaults to `"trie_get"`.
    pub fn_name: String,

    /// The C return type of the generated function. Defaults to `"int"`.
    ///
    /// It must be a signed integer type that can hold every value, and `-1`.
    /// For `int`, `short`, `signed char` and the exact-width `intN_t` types
    /// this is checked before rendering; see [`Self::check()`].
    pub return_type: String,

    /// Headers to include after `<string.h>`, as they should appear after
    /// `#include `. Defaults to `["\"trie.h\""]`.
    pub includes: Vec<String>,

    /// The root of the key tree.
    pub root: TrieNode,
}

impl Default for SwitchGenerator {
    fn default() -> Self {
        Self {
            fn_name: "trie_get".to_owned(),
            return_type: "int".to_owned(),
            includes: vec!["\"trie.h\"".to_owned()],
            root: TrieNode::default(),
        }
    }
}

impl SwitchGenerator {
    /// Create a new generator with the default function name, return type
    /// and includes.
    ///
    /// You can add keys to it with [`Self::add()`] and/or
    /// [`Self::try_extend()`], then turn it into code with [`Self::render()`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the generated function.
    #[allow(clippy::needless_pass_by_value)] // ToString can borrow.
    pub fn fn_name<N: ToString>(&mut self, fn_name: N) -> &mut Self {
        self.fn_name = fn_name.to_string();
        self
    }

    /// Set the C return type of the generated function.
    ///
    /// # Example
    ///
    /// ```rust
    /// let mut out = Vec::new();
    /// triegen::SwitchGenerator::new()
    ///     .return_type("long")
    ///     .render(&mut out)
    ///     .unwrap();
    ///
    /// use bstr::ByteVec;
    /// pretty_assertions::assert_str_eq!(
    ///     r#"#include <string.h>
    /// #include "trie.h"
    ///
    /// /* auto-generated by triegen */
    ///
    /// long trie_get(const char* key) {
    ///   (void)key;
    ///   return -1;
    /// }
    /// "#,
    ///     out.into_string().unwrap(),
    /// );
    /// ```
    #[allow(clippy::needless_pass_by_value)] // ToString can borrow.
    pub fn return_type<R: ToString>(&mut self, return_type: R) -> &mut Self {
        self.return_type = return_type.to_string();
        self
    }

    /// Add a header to include, e.g. `"<stdint.h>"` or `"\"lookup.h\""`.
    #[allow(clippy::needless_pass_by_value)] // ToString can borrow.
    pub fn include<H: ToString>(&mut self, header: H) -> &mut Self {
        self.includes.push(header.to_string());
        self
    }

    /// Remove all includes except `<string.h>`, which is always present.
    ///
    /// # Example
    ///
    /// ```rust
    /// let mut out = Vec::new();
    /// triegen::SwitchGenerator::new()
    ///     .remove_includes()
    ///     .add("hello", 42)
    ///     .unwrap()
    ///     .render(&mut out)
    ///     .unwrap();
    ///
    /// use bstr::ByteVec;
    /// pretty_assertions::assert_str_eq!(
    ///     r#"#include <string.h>
    ///
    /// /* auto-generated by triegen */
    ///
    /// int trie_get(const char* key) {
    ///   if(strcmp(key, "hello") == 0) { return 42; }
    ///   return -1;
    /// }
    /// "#,
    ///     out.into_string().unwrap(),
    /// );
    /// ```
    pub fn remove_includes(&mut self) -> &mut Self {
        self.includes.clear();
        self
    }

    /// Add a key.
    ///
    /// If the key was already added its value is replaced, but it keeps its
    /// place in the generated code.
    ///
    /// ```rust
    /// let mut generator = triegen::SwitchGenerator::new();
    /// generator.add("a", 1).unwrap().add(b"b", 2).unwrap();
    /// assert_eq!(generator.root.len(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::NulInKey`] if the key contains a NUL byte, since the
    /// generated code treats NUL as the end of the key.
    pub fn add<K: AsRef<[u8]>>(
        &mut self,
        key: K,
        value: i64,
    ) -> Result<&mut Self, Error> {
        let key = key.as_ref();
        if key.contains(&0) {
            return Err(Error::NulInKey {
                line: None,
                key: String::from_utf8_lossy(key).into_owned(),
            });
        }

        if value == NOT_FOUND {
            tracing::warn!(
                key = %String::from_utf8_lossy(key),
                "value {NOT_FOUND} is the same as the not found result"
            );
        }

        if let Some(old) = self.root.insert(key, value) {
            tracing::warn!(
                key = %String::from_utf8_lossy(key),
                old,
                new = value,
                "duplicate key; keeping the last value"
            );
        }

        Ok(self)
    }

    /// Add keys from an iterator or collection.
    ///
    /// ```rust
    /// let mut generator = triegen::SwitchGenerator::new();
    /// generator.try_extend([("cat", 1), ("car", 2)]).unwrap();
    /// assert_eq!(generator.root.get(b"car"), Some(2));
    /// ```
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from [`Self::add()`]. Keys before
    /// it will have been added.
    pub fn try_extend<I, K>(&mut self, iter: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<[u8]>,
    {
        for (key, value) in iter {
            self.add(key, value)?;
        }
        Ok(self)
    }

    /// Check that every value fits in the return type.
    ///
    /// The range is only known for `int`, `short`, `signed char`, and
    /// `int8_t` through `int64_t`. Any other return type, like `long`, is
    /// assumed to hold every value.
    ///
    /// This is called by [`Self::render()`], so it’s only needed to find out
    /// about the problem before writing anything.
    ///
    /// ```rust
    /// let mut generator = triegen::SwitchGenerator::new();
    /// generator.add("big", 3_000_000_000).unwrap();
    /// assert!(generator.check().is_err());
    /// assert!(generator.return_type("long long").check().is_ok());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] for the first key whose value
    /// doesn’t fit.
    pub fn check(&self) -> Result<(), Error> {
        let Some(range) = value_range(&self.return_type) else {
            return Ok(());
        };

        self.root
            .pairs()
            .into_iter()
            .find(|(_, value)| !range.contains(value))
            .map_or(Ok(()), |(key, value)| {
                Err(Error::ValueOutOfRange {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    value,
                    return_type: self.return_type.clone(),
                })
            })
    }

    /// Write the generated C as a file in `$OUT_DIR`.
    ///
    /// This is what you want if you’re using this in `build.rs`. See the
    /// [`SwitchGenerator`] for a full example.
    ///
    /// This will overwrite the file if it already exists, or create a new file
    /// if it does not.
    ///
    /// # Errors
    ///
    /// This can return [`io::Error`] if there is a problem writing the file, or
    /// if `$OUT_DIR` isn’t set to a UTF-8 string.
    pub fn write_to_out_dir<P: AsRef<Path>>(
        &self,
        sub_path: P,
    ) -> io::Result<()> {
        let out_dir = &env::var("OUT_DIR").map_err(io::Error::other)?;
        self.write_to_path(Path::new(out_dir).join(sub_path))
    }

    /// Write the generated C as a file at `path`.
    ///
    /// This will overwrite the file if it already exists, or create a new file
    /// if it does not. If writing fails partway through, the file may be left
    /// truncated. If [`Self::check()`] fails, the file isn’t touched.
    ///
    /// # Example
    ///
    /// ```rust
    /// # let tmp_dir = temp_dir::TempDir::new().unwrap();
    /// # let path = tmp_dir.child("trie.c");
    /// triegen::SwitchGenerator::new()
    ///     .add("a", 1)
    ///     .unwrap()
    ///     .write_to_path(&path)
    ///     .unwrap();
    /// assert!(std::fs::read_to_string(path).unwrap().contains("trie_get"));
    /// ```
    ///
    /// # Errors
    ///
    /// This can return [`io::Error`] if there is a problem writing to `path`,
    /// or if a value doesn’t fit in the return type.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        self.check().map_err(invalid_input)?;
        let mut out = io::BufWriter::new(fs::File::create(path)?);
        self.render(&mut out)?;
        out.flush()
    }

    /// Render the generated C.
    ///
    /// # Example
    ///
    /// ```rust
    /// let mut out = Vec::new();
    /// triegen::SwitchGenerator::new()
    ///     .try_extend([("cat", 1), ("car", 2), ("dog", 3)])
    ///     .unwrap()
    ///     .render(&mut out)
    ///     .unwrap();
    ///
    /// use bstr::ByteVec;
    /// pretty_assertions::assert_str_eq!(
    ///     r#"#include <string.h>
    /// #include "trie.h"
    ///
    /// /* auto-generated by triegen */
    ///
    /// int trie_get(const char* key) {
    ///   switch(key[0]) {
    ///     case 'c': switch(key[1]) {
    ///       case 'a': switch(key[2]) {
    ///         case 't': switch(key[3]) {
    ///           case 0: return 1;
    ///         } break;
    ///         case 'r': switch(key[3]) {
    ///           case 0: return 2;
    ///         } break;
    ///       } break;
    ///     } break;
    ///     case 'd': if(strcmp(key + 1, "og") == 0) { return 3; } break;
    ///   }
    ///   return -1;
    /// }
    /// "#,
    ///     out.into_string().unwrap(),
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// This can return [`io::Error`] if there is a problem writing to `writer`.
    /// If a value doesn’t fit in the return type it returns an error of kind
    /// [`io::ErrorKind::InvalidInput`] wrapping [`Error::ValueOutOfRange`]
    /// before writing anything.
    pub fn render<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.check().map_err(invalid_input)?;

        tracing::debug!(
            fn_name = %self.fn_name,
            keys = self.root.len(),
            "rendering lookup function"
        );

        writeln!(writer, "#include <string.h>")?;
        for header in &self.includes {
            writeln!(writer, "#include {header}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "/* auto-generated by triegen */")?;
        writeln!(writer)?;
        write!(
            writer,
            "{} {}(const char* key) {{\n  ",
            self.return_type, self.fn_name
        )?;

        if self.root.is_empty() {
            // Nothing to look up.
            writeln!(writer, "(void)key;")?;
        } else {
            render_node(&self.root, writer, 0)?;
        }

        writeln!(writer, "  return {NOT_FOUND};\n}}")
    }
}

/// The values a C return type can hold, if it has a fixed size we know.
fn value_range(return_type: &str) -> Option<RangeInclusive<i64>> {
    let range = |min: i64, max: i64| Some(min..=max);
    match return_type.split_whitespace().join(" ").as_str() {
        "signed char" | "int8_t" => range(i8::MIN.into(), i8::MAX.into()),
        "short" | "short int" | "signed short" | "signed short int"
        | "int16_t" => range(i16::MIN.into(), i16::MAX.into()),
        "int" | "signed" | "signed int" | "int32_t" => {
            range(i32::MIN.into(), i32::MAX.into())
        }
        _ => None,
    }
}

/// Wrap an [`Error`] for functions that return [`io::Result`].
fn invalid_input(error: Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

/// Render a node as either a single comparison or a `switch` statement.
///
/// The caller has already written the indentation for the first line. Nested
/// statements end with `break;` so they don’t fall through to the next case.
fn render_node<W: io::Write>(
    node: &TrieNode,
    writer: &mut W,
    depth: usize,
) -> io::Result<()> {
    let brk = if depth > 0 { " break;" } else { "" };

    if let Some(chain) = node.chain() {
        return if let [byte] = chain.bytes[..] {
            // Also check that the key ends after this byte.
            writeln!(
                writer,
                "if(key[{depth}] == {byte} && key[{next}] == 0) \
                {{ return {value}; }}{brk}",
                byte = CharLiteral(byte),
                next = depth.saturating_add(1),
                value = chain.value,
            )
        } else {
            writeln!(
                writer,
                "if(strcmp({key}, {bytes}) == 0) {{ return {value}; }}{brk}",
                key = KeyFrom(depth),
                bytes = StrLiteral(&chain.bytes),
                value = chain.value,
            )
        };
    }

    let indent = "  ".repeat(depth.saturating_add(2));
    writeln!(writer, "switch(key[{depth}]) {{")?;
    for entry in &node.entries {
        match entry {
            Entry::End(value) => {
                writeln!(writer, "{indent}case 0: return {value};")?;
            }
            Entry::Byte(byte, child) => {
                write!(writer, "{indent}case {}: ", CharLiteral(*byte))?;
                render_node(child, writer, depth.saturating_add(1))?;
            }
        }
    }
    writeln!(writer, "{}}}{brk}", "  ".repeat(depth.saturating_add(1)))
}

/// Formats the remainder of `key` starting at an index, e.g. `key + 2`.
struct KeyFrom(usize);

impl fmt::Display for KeyFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "key + {}", self.0)
        } else {
            f.write_str("key")
        }
    }
}

/// Formats a byte as a C character literal, e.g. `'a'` or `'\303'`.
struct CharLiteral(u8);

impl fmt::Display for CharLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('\'')?;
        write_escaped(f, self.0, b'\'')?;
        f.write_char('\'')
    }
}

/// Formats bytes as a C string literal, e.g. `"og"`.
struct StrLiteral<'a>(&'a [u8]);

impl fmt::Display for StrLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for &byte in self.0 {
            write_escaped(f, byte, b'"')?;
        }
        f.write_char('"')
    }
}

/// Write a byte as it should appear inside a C literal delimited by `quote`.
///
/// Printable ASCII is written as is. Everything else is written as a three
/// digit octal escape, which can’t run into a following digit the way `\x`
/// escapes can. `?` is escaped in strings to avoid trigraphs.
fn write_escaped(
    f: &mut fmt::Formatter<'_>,
    byte: u8,
    quote: u8,
) -> fmt::Result {
    match byte {
        b'\\' => f.write_str("\\\\"),
        b'?' if quote == b'"' => f.write_str("\\?"),
        _ if byte == quote => write!(f, "\\{}", char::from(byte)),
        b' '..=b'~' => f.write_char(char::from(byte)),
        _ => write!(f, "\\{byte:03o}"),
    }
}
