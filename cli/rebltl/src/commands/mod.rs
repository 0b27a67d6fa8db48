//! CLI command implementations.

pub mod check;
pub mod convert;

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use rebltl_core::{ComparatorPolicy, DocumentReader, Root, Validator};

use crate::config::RebltlConfig;

/// Path meaning stdin for inputs and stdout for outputs.
pub const STDIO: &str = "-";

/// Read and parse a document from a file, or from stdin for `-`.
pub fn read_document(input: Option<&str>) -> Result<Root> {
    let input = input.unwrap_or(STDIO);
    let bytes = if input == STDIO {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("reading document from stdin")?;
        buf
    } else {
        fs::read(input).with_context(|| format!("reading {input}"))?
    };
    let root = DocumentReader::new()
        .read_slice(&bytes)
        .with_context(|| format!("parsing {}", display_name(input)))?;
    debug!(
        "read {} definition(s) from {}",
        root.definition_count(),
        display_name(input)
    );
    Ok(root)
}

/// Read every input in order and merge them into one document. No inputs
/// means stdin.
///
/// Definitions keep their input order. A repeated definition name is kept and
/// reported.
pub fn read_documents(inputs: &[&str]) -> Result<Root> {
    if inputs.is_empty() {
        return read_document(None);
    }
    let mut merged = Root::default();
    for input in inputs {
        let root = read_document(Some(input))?;
        merged.definitions.extend(root.definitions);
        merged.assertion_definitions.extend(root.assertion_definitions);
    }
    let mut seen = HashSet::new();
    for name in merged.definition_names() {
        if !seen.insert(name) {
            warn!("definition `{name}` appears more than once");
        }
    }
    if inputs.len() > 1 {
        debug!(
            "merged {} definition(s) from {} inputs",
            merged.definition_count(),
            inputs.len()
        );
    }
    Ok(merged)
}

/// Write text to a file, or to stdout for `-`.
pub fn write_output(output: Option<&str>, text: &str) -> Result<()> {
    match output.unwrap_or(STDIO) {
        STDIO => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        path => fs::write(path, text).with_context(|| format!("writing {path}"))?,
    }
    Ok(())
}

/// Resolve the comparator (CLI flag > config > exact).
pub fn resolve_policy(
    flag: Option<&str>,
    config: Option<&RebltlConfig>,
) -> Result<ComparatorPolicy> {
    match flag {
        Some(name) => match ComparatorPolicy::parse(name) {
            Some(policy) => Ok(policy),
            None => bail!("unknown comparator: {name} (valid: exact, castable)"),
        },
        None => Ok(config
            .and_then(|c| c.validate.comparator)
            .unwrap_or_default()),
    }
}

/// Build a validator from the resolved comparator and configured proposition type.
pub fn build_validator(
    policy: ComparatorPolicy,
    config: Option<&RebltlConfig>,
) -> Result<Validator> {
    let validator = Validator::new(policy);
    match config {
        Some(config) => match config.proposition_type()? {
            Some(ty) => Ok(validator.with_proposition_type(ty)),
            None => Ok(validator),
        },
        None => Ok(validator),
    }
}

fn display_name(path: &str) -> &str {
    if path == STDIO {
        "<stdin>"
    } else {
        path
    }
}
