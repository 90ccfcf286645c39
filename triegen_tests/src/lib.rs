//! Safe wrappers around the lookup functions generated by `build.rs`.
//!
//! Each `tables/<table>.txt` becomes a C function `<table>_get()`, wrapped
//! here as `<table>()`.

use std::ffi::CString;
use std::os::raw::{c_char, c_long};

macro_rules! lookup {
    ($table:ident) => {
        paste::paste! {
            extern "C" {
                fn [<$table _get>](key: *const c_char) -> c_long;
            }

            /// Look up `key` in the table of the same name.
            ///
            /// # Panics
            ///
            /// If `key` contains a NUL byte.
            #[must_use]
            pub fn $table(key: &str) -> i64 {
                let key = CString::new(key).expect("key contains NUL");
                // SAFETY: `key` is NUL-terminated and outlives the call, and
                // the generated function only reads up to the first NUL.
                i64::from(unsafe { [<$table _get>](key.as_ptr()) })
            }
        }
    };
}

lookup!(duplicates);
lookup!(empty);
lookup!(escapes);
lookup!(hello);
lookup!(keywords);
lookup!(prefixes);
lookup!(scenario);
lookup!(single);
