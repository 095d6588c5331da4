//! Generate command: sherpadoc in, TypeScript out

use std::io::{Read, Write};

use anyhow::{Context, Result};
use sherpats_core::{BaseUrl, GenerateOptions, generate_from_json};
use tracing::debug;

/// Read a sherpadoc document from `input` and write the client module to `output`.
///
/// Nothing is written unless generation succeeds.
pub fn run(
    target: &str,
    options: &GenerateOptions,
    mut input: impl Read,
    mut output: impl Write,
) -> Result<()> {
    let base_url = BaseUrl::parse(target);
    debug!(?base_url, ?options, "generating");

    let mut doc = Vec::new();
    input
        .read_to_end(&mut doc)
        .context("Failed to read sherpadoc from stdin")?;

    let module = generate_from_json(&doc, &base_url, options)?;

    output
        .write_all(module.as_bytes())
        .and_then(|()| output.flush())
        .context("Failed to write generated code")?;
    Ok(())
}
