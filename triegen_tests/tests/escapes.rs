//! Test keys that need escaping in C literals.

#![allow(clippy::missing_docs_in_private_items)]

use assert2::check;
use paste::paste;
use triegen_tests::escapes;

macro_rules! test {
    ($name:ident, $input:expr, $result:expr) => {
        paste! {
            #[test]
            fn [<escapes_ $name>]() {
                check!(escapes($input) == $result);
            }
        }
    };
}

test!(single_quote, "it's", 1);
test!(double_quotes, "\"quoted\"", 2);
test!(backslash, "back\\slash", 3);
test!(trigraph, "what??=", 4);
test!(utf8, "café", 5);
test!(utf8_prefix, "caf", 6);
test!(utf8_middle, "naïve", 7);
test!(percent, "%d", 8);

test!(single_quote_prefix, "it", -1);
test!(double_quotes_partial, "\"quoted", -1);
test!(backslash_prefix, "back\\", -1);
test!(trigraph_expanded, "what#", -1);
test!(trigraph_prefix, "what??", -1);
test!(utf8_suffix, "cafés", -1);
test!(utf8_decomposed, "cafe\u{301}", -1);
test!(ascii_lookalike, "naive", -1);
