//! TOML parser with helpful error messages

use std::path::Path;

use super::schema::GeneratorConfig;
use crate::error::{Error, Result};

/// Parse dwgen.toml with detailed error messages
pub fn parse_config(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    parse_config_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Parse dwgen.toml content from string
pub fn parse_config_str(content: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Point TOML errors at the offending line of dwgen.toml
fn enhance_toml_error(error: toml::de::Error, content: &str) -> Error {
    let Some(span) = error.span() else {
        return Error::Config(format!("Invalid dwgen.toml: {}", error.message()));
    };
    let line = content[..span.start.min(content.len())].lines().count().max(1);

    Error::Config(format!(
        "Invalid dwgen.toml at line {}: {}\n{}",
        line,
        error.message(),
        surrounding_lines(content, line)
    ))
}

/// One line either side of `line` (1-based), the line itself marked with `>`.
fn surrounding_lines(content: &str, line: usize) -> String {
    let first = line.saturating_sub(1).max(1);
    content
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text))
        .skip(first - 1)
        .take(line + 1 - first + 1)
        .map(|(number, text)| {
            let marker = if number == line { '>' } else { ' ' };
            format!("{} {:>3} | {}", marker, number, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &GeneratorConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration to TOML: {}", e)))
}
