//! `rebltl convert`: turn every definition of a document into an LTL formula.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use rebltl_core::Root;
use rebltl_ltl::{Converter, NamedFormula};

use crate::commands::{build_validator, read_documents, resolve_policy, write_output};
use crate::config::{OutputFormat, RebltlConfig, TimeUnit};

/// Flags of `rebltl convert`. Unset flags fall back to the configuration.
#[derive(Debug, Default)]
pub struct ConvertArgs<'a> {
    /// Input documents, merged in order. Empty means stdin.
    pub inputs: &'a [&'a str],
    pub output: Option<&'a str>,
    pub format: Option<&'a str>,
    pub keep_going: bool,
    pub validate: bool,
    pub comparator: Option<&'a str>,
    pub diagnostics: bool,
    pub time_unit: Option<&'a str>,
}

/// Result of converting a whole document.
#[derive(Debug)]
pub struct Conversion {
    pub formulas: Vec<NamedFormula>,
    /// Names and messages of skipped definitions (only with `keep_going`).
    pub failures: Vec<(String, String)>,
    pub elapsed: Duration,
}

pub fn run(config: Option<&RebltlConfig>, args: &ConvertArgs<'_>) -> Result<()> {
    let format = resolve_format(args.format, config)?;
    let keep_going = args.keep_going || config.is_some_and(|c| c.convert.keep_going);
    let validate = args.validate || config.is_some_and(|c| c.validate.enabled);
    let time_unit = resolve_time_unit(args.time_unit, config)?;

    let root = read_documents(args.inputs)?;

    if validate {
        let policy = resolve_policy(args.comparator, config)?;
        let report = build_validator(policy, config)?.validate(&root);
        for issue in &report.issues {
            eprintln!("{issue}");
        }
        if report.has_errors() {
            bail!(
                "validation failed: {} error(s), {} warning(s)",
                report.error_count(),
                report.warning_count()
            );
        }
    }

    let conversion = convert(&root, keep_going)?;
    for (name, message) in &conversion.failures {
        eprintln!("warning: skipped definition `{name}`: {message}");
    }
    if args.diagnostics {
        eprint!("{}", diagnostics(&conversion, time_unit)?);
    }

    write_output(args.output, &render(&conversion.formulas, format)?)?;

    if !conversion.failures.is_empty() {
        bail!(
            "{} of {} definition(s) failed to convert",
            conversion.failures.len(),
            root.definition_count()
        );
    }
    Ok(())
}

/// Convert every definition, either stopping at the first failure or
/// skipping failing definitions.
pub fn convert(root: &Root, keep_going: bool) -> Result<Conversion> {
    let converter = Converter::new();
    let start = Instant::now();

    let (formulas, failures) = if keep_going {
        let mut formulas = Vec::new();
        let mut failures = Vec::new();
        for (name, result) in converter.convert_each(root) {
            match result {
                Ok(formula) => formulas.push(NamedFormula { name, formula }),
                Err(e) => {
                    warn!("skipping definition `{name}`: {e}");
                    failures.push((name, e.to_string()));
                }
            }
        }
        (formulas, failures)
    } else {
        let formulas = converter
            .convert_document(root)
            .context("converting document")?;
        (formulas, Vec::new())
    };

    let elapsed = start.elapsed();
    debug!(
        "converted {} definition(s) in {elapsed:?}, {} skipped",
        formulas.len(),
        failures.len()
    );
    Ok(Conversion {
        formulas,
        failures,
        elapsed,
    })
}

/// Render formulas as `name: formula` lines or as a JSON array.
pub fn render(formulas: &[NamedFormula], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for named in formulas {
                writeln!(out, "{}: {}", named.name, named.formula)?;
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(formulas)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Per-definition proposition count, formula size and height, plus runtime.
pub fn diagnostics(conversion: &Conversion, unit: TimeUnit) -> Result<String> {
    let mut out = String::new();
    for named in &conversion.formulas {
        writeln!(
            out,
            "{}: {} proposition(s), size {}, height {}",
            named.name,
            named.formula.atomic_propositions.len(),
            named.formula.formula.size(),
            named.formula.formula.height()
        )?;
    }
    writeln!(
        out,
        "converted {} definition(s) in {:.3} {}",
        conversion.formulas.len(),
        unit.measure(conversion.elapsed),
        unit.name()
    )?;
    Ok(out)
}

/// Resolve the output format (CLI flag > config > text).
fn resolve_format(flag: Option<&str>, config: Option<&RebltlConfig>) -> Result<OutputFormat> {
    match flag {
        Some(name) => match OutputFormat::parse(name) {
            Some(format) => Ok(format),
            None => bail!("unknown format: {name} (valid: text, json)"),
        },
        None => Ok(config.and_then(|c| c.convert.format).unwrap_or_default()),
    }
}

/// Resolve the diagnostics time unit (CLI flag > config > ms).
fn resolve_time_unit(flag: Option<&str>, config: Option<&RebltlConfig>) -> Result<TimeUnit> {
    match flag {
        Some(name) => match TimeUnit::parse(name) {
            Some(unit) => Ok(unit),
            None => bail!("unknown time unit: {name} (valid: ns, us, ms, s)"),
        },
        None => Ok(config.and_then(|c| c.convert.time_unit).unwrap_or_default()),
    }
}
