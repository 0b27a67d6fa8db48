//! `rebltl check`: validate types and dry-run conversion without writing formulas.

use anyhow::{bail, Result};
use rebltl_core::{Root, ValidationReport, Validator};
use rebltl_ltl::{ConvertError, Converter};

use crate::commands::{build_validator, read_documents, resolve_policy};
use crate::config::RebltlConfig;

/// Everything `check` found in one document.
#[derive(Debug)]
pub struct CheckReport {
    pub validation: ValidationReport,
    pub conversion_errors: Vec<ConvertError>,
    pub definitions: usize,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.validation.error_count() + self.conversion_errors.len()
    }
}

pub fn run(
    config: Option<&RebltlConfig>,
    inputs: &[&str],
    comparator: Option<&str>,
) -> Result<()> {
    let root = read_documents(inputs)?;
    let policy = resolve_policy(comparator, config)?;
    let validator = build_validator(policy, config)?;
    let report = check(&root, &validator);

    for issue in &report.validation.issues {
        println!("{issue}");
    }
    for err in &report.conversion_errors {
        println!("error: {err}");
    }

    let errors = report.error_count();
    let warnings = report.validation.warning_count();
    if errors > 0 {
        bail!(
            "check failed: {errors} error(s), {warnings} warning(s) in {} definition(s)",
            report.definitions
        );
    }
    println!(
        "{} definition(s) ok ({} comparison), {warnings} warning(s)",
        report.definitions,
        policy.name()
    );
    Ok(())
}

/// Validate every definition and convert each one, collecting all problems.
pub fn check(root: &Root, validator: &Validator) -> CheckReport {
    let validation = validator.validate(root);
    let conversion_errors = Converter::new()
        .convert_each(root)
        .into_iter()
        .filter_map(|(_, result)| result.err())
        .collect();
    CheckReport {
        validation,
        conversion_errors,
        definitions: root.definition_count(),
    }
}
