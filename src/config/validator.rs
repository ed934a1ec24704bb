use crate::output;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Knows which configuration keys wmxdgmenu reads
pub struct ConfigValidator {
    /// Dotted paths of every recognized key and section
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "menu",
            "menu.file",
            "menu.locale",
            "menu.show_empty",
            "output",
            "output.indent",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// Prints a warning for every unknown key of a configuration file
    ///
    /// Missing or unparsable files are left to [`super::Config::load`],
    /// which reports them as errors.
    pub fn warn_unknown_fields(&self, config_path: &Path) {
        let Ok(content) = std::fs::read_to_string(config_path) else {
            return;
        };
        let Ok(parsed) = toml::from_str::<toml::Value>(&content) else {
            return;
        };

        let unknown = self.unknown_fields(&parsed);
        if unknown.is_empty() {
            debug!(path = %config_path.display(), "configuration has no unknown keys");
            return;
        }

        output::warning(&format!(
            "Configuration warnings in {}:",
            config_path.display()
        ));
        for field in &unknown {
            eprintln!("  Unknown configuration field: {}", field.yellow());
        }
    }

    /// Dotted paths of keys that are not recognized
    #[must_use]
    pub fn unknown_fields(&self, parsed: &toml::Value) -> Vec<String> {
        let mut unknown = Vec::new();
        self.check_table(parsed, "", &mut unknown);
        unknown
    }

    /// Recursively checks a TOML table for unknown fields
    ///
    /// An unknown section is reported once, without descending into it.
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if !self.known_fields.contains(full_key.as_str()) {
                unknown.push(full_key);
            } else if let toml::Value::Table(_) = value {
                self.check_table(value, &full_key, unknown);
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
