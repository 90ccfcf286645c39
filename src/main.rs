//! Generate a C lookup function from a key table.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::filter::LevelFilter;
use triegen::{table, SwitchGenerator};

/// Generate a C function that looks up string keys with nested switch
/// statements.
#[derive(Debug, clap::Parser)]
#[clap(version, about)]
struct Params {
    /// Key table: one `key value` pair per line
    input: PathBuf,

    /// Where to write the generated C
    output: PathBuf,

    /// Name of the generated function
    #[clap(long, default_value = "trie_get")]
    fn_name: String,

    /// C return type of the generated function
    #[clap(long, default_value = "int")]
    return_type: String,

    /// Extra header to include, e.g. '<stdint.h>' (may be repeated)
    #[clap(long = "include", value_name = "HEADER")]
    includes: Vec<String>,

    /// Don’t include "trie.h"
    #[clap(long)]
    no_default_includes: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = cli(Params::parse()) {
        eprintln!("Error: {error:#}");
        exit(1);
    }
}

/// Read the table, build the generator, and write the output.
fn cli(params: Params) -> anyhow::Result<()> {
    let records = table::read(&params.input)
        .with_context(|| format!("Loading {:?}", params.input))?;

    let mut generator = SwitchGenerator::new();
    generator
        .fn_name(&params.fn_name)
        .return_type(&params.return_type);
    if params.no_default_includes {
        generator.remove_includes();
    }
    for header in &params.includes {
        generator.include(header);
    }

    for record in &records {
        generator
            .add(&record.key, record.value)
            .with_context(|| format!("Line {}", record.line))?;
    }

    generator.check()?;

    tracing::info!(
        records = records.len(),
        keys = generator.root.len(),
        output = ?params.output,
        "writing lookup function"
    );

    generator
        .write_to_path(&params.output)
        .with_context(|| format!("Writing {:?}", params.output))
}
