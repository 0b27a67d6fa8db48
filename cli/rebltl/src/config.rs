//! `rebltl.toml` configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rebltl_core::{ComparatorPolicy, Type};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "rebltl.toml";

/// The top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebltlConfig {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub validate: ValidateConfig,
}

/// Defaults for `rebltl convert`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Output format (text, json).
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Skip definitions that fail to convert instead of aborting.
    #[serde(default)]
    pub keep_going: bool,
    /// Unit of the runtime printed by `--diagnostics` (ns, us, ms, s).
    #[serde(default)]
    pub time_unit: Option<TimeUnit>,
}

/// Type checks run before conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// Validate before every conversion.
    #[serde(default)]
    pub enabled: bool,
    /// Comparator used for proposition types (exact, castable).
    #[serde(default)]
    pub comparator: Option<ComparatorPolicy>,
    /// Expected type of atomic propositions, e.g. `boolean` or `boolean[]`.
    #[serde(default)]
    pub proposition_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Ns,
    Us,
    #[default]
    Ms,
    S,
}

impl TimeUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ns" => Some(TimeUnit::Ns),
            "us" => Some(TimeUnit::Us),
            "ms" => Some(TimeUnit::Ms),
            "s" => Some(TimeUnit::S),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }

    /// `elapsed` expressed in this unit.
    pub fn measure(&self, elapsed: Duration) -> f64 {
        let nanos = elapsed.as_nanos() as f64;
        match self {
            TimeUnit::Ns => nanos,
            TimeUnit::Us => nanos / 1e3,
            TimeUnit::Ms => nanos / 1e6,
            TimeUnit::S => nanos / 1e9,
        }
    }
}

impl RebltlConfig {
    /// Search upward from `start_dir` for a `rebltl.toml` file, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a configuration file at an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing rebltl.toml")
    }

    /// The configured proposition type, if any.
    pub fn proposition_type(&self) -> Result<Option<Type>> {
        self.validate
            .proposition_type
            .as_deref()
            .map(parse_type)
            .transpose()
    }
}

/// Parse a type name such as `int`, `boolean[]` or `byte[3][]`.
///
/// An empty bracket pair is an unbound dimension.
pub fn parse_type(s: &str) -> Result<Type> {
    let s = s.trim();
    let (name, mut rest) = match s.find('[') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        bail!("invalid type name `{s}`");
    }
    if rest.is_empty() {
        return Ok(Type::primitive(name));
    }

    let mut dimensions = Vec::new();
    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('[') else {
            bail!("invalid array dimensions in `{s}`");
        };
        let Some(end) = body.find(']') else {
            bail!("unclosed `[` in `{s}`");
        };
        let bound = &body[..end];
        let dim = if bound.is_empty() {
            0
        } else {
            bound
                .parse::<u32>()
                .with_context(|| format!("invalid dimension `{bound}` in `{s}`"))?
        };
        dimensions.push(dim);
        rest = &body[end + 1..];
    }
    Ok(Type::array(name, dimensions))
}
