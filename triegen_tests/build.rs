#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use triegen::{table, SwitchGenerator};

/// Generate `<table>_get()` in C for every `tables/<table>.txt`, and compile
/// them all into one static library.
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=tables");

    let out_dir = env::var("OUT_DIR")?;
    let mut tables: Vec<_> = fs::read_dir("tables")?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    tables.retain(|path| path.extension().map_or(false, |ext| ext == "txt"));
    tables.sort();

    let mut build = cc::Build::new();
    for path in &tables {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("bad table name: {path:?}"))?;
        println!("cargo:rerun-if-changed={}", path.display());

        let records = table::read(path)?;
        let c_file = Path::new(&out_dir).join(format!("{name}.c"));
        SwitchGenerator::new()
            .fn_name(format!("{name}_get"))
            .return_type("long")
            .remove_includes()
            .try_extend(records.iter().map(|r| (&r.key, r.value)))?
            .write_to_path(&c_file)?;

        build.file(c_file);
    }

    build.warnings(true).compile("tables");
    Ok(())
}
