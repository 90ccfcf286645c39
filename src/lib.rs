//! # Generate C functions that look up string keys
//!
//! `triegen` turns a static table of string keys and integer values into a C
//! function made of nested `switch` statements. Each `switch` looks at one
//! byte of the key, so a lookup touches every byte at most once and never
//! hashes or allocates. Where the rest of a key can’t branch anymore, the
//! generated code compares the remainder with a single `strcmp()` instead.
//!
//! The generated function returns the value for any key in the table and
//! `-1` for anything else.
//!
//! ```rust
//! let mut out = Vec::new();
//! triegen::SwitchGenerator::new()
//!     .remove_includes()
//!     .try_extend([("cat", 1), ("car", 2), ("dog", 3)])
//!     .unwrap()
//!     .render(&mut out)
//!     .unwrap();
//!
//! let code = String::from_utf8(out).unwrap();
//! assert!(code.contains("int trie_get(const char* key) {"));
//! assert!(code.contains(r#"case 'd': if(strcmp(key + 1, "og") == 0)"#));
//! ```
//!
//! The `triegen` binary does the same from the command line, reading a table
//! with one `key value` pair per line (see [`table`]):
//!
//! ```sh
//! triegen keywords.txt keywords.c
//! ```
//!
//! # Minimum supported Rust version
//!
//! Currently the minimum supported Rust version (MSRV) is **1.74**.

mod error;
pub use error::*;

mod switch;
pub use switch::*;

pub mod table;

mod trie;
pub use trie::*;
