use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Reads and parses a configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parses configuration text and checks its values
///
/// # Errors
///
/// Returns an error if the text is not valid TOML for [`Config`], the menu
/// file is empty, or the locale is empty, contains whitespace, or names the
/// `C`/`POSIX` locale.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse TOML config")?;

    // Range errors come back unwrapped so the message names the key
    validate_config(&config)?;
    Ok(config)
}

/// Rejects values that parse but cannot be used
fn validate_config(config: &Config) -> Result<()> {
    if let Some(file) = &config.menu.file
        && file.trim().is_empty()
    {
        anyhow::bail!("menu.file must not be empty");
    }

    if let Some(locale) = &config.menu.locale
        && !is_usable_locale(locale)
    {
        anyhow::bail!("menu.locale is not a usable locale name: {locale:?}");
    }

    Ok(())
}

/// A `lang[_COUNTRY][.encoding][@modifier]` name that selects translations
fn is_usable_locale(locale: &str) -> bool {
    let name = locale.split(['.', '@']).next().unwrap_or_default();
    !name.is_empty()
        && !locale.contains(char::is_whitespace)
        && !locale.contains(['[', ']', '='])
        && name != "C"
        && name != "POSIX"
}
