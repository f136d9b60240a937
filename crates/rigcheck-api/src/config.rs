use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rigcheck_core::SortDirection;
use serde::{Deserialize, Serialize};

pub const AUTO_FILTER_ENV: &str = "RIGCHECK_AUTO_FILTER";
pub const CONFIG_PATH_ENV: &str = "RIGCHECK_CONFIG";

/// User-adjustable engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub auto_compatibility_filter: bool,
    /// Sort key applied when a browse request names none. Categories without
    /// this key keep catalog order.
    pub default_sort: Option<String>,
    pub default_direction: SortDirection,
}

impl Default for Settings {
    fn default() -> Self {
        Self { auto_compatibility_filter: true, default_sort: None, default_direction: SortDirection::Asc }
    }
}

impl Settings {
    /// # Errors
    /// Returns an error when `input` is not a valid settings document.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).context("invalid settings document")
    }

    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}

/// Where each setting may come from, strongest first: `auto_filter_flag`, then
/// `auto_filter_env`, then the file at `config_path`, then defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsSources<'a> {
    pub config_path: Option<&'a Path>,
    pub auto_filter_flag: Option<bool>,
    pub auto_filter_env: Option<&'a str>,
}

/// Merge settings from every source.
///
/// # Errors
/// Returns an error when the settings file is unreadable or invalid, or the
/// environment override is not a recognised switch value.
pub fn resolve_settings(sources: SettingsSources<'_>) -> Result<Settings> {
    let mut settings = match sources.config_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut origin = if sources.config_path.is_some() { "file" } else { "default" };
    if let Some(raw) = sources.auto_filter_env {
        settings.auto_compatibility_filter =
            parse_switch(raw).with_context(|| format!("invalid {AUTO_FILTER_ENV}"))?;
        origin = "env";
    }
    if let Some(flag) = sources.auto_filter_flag {
        settings.auto_compatibility_filter = flag;
        origin = "flag";
    }

    tracing::info!(
        auto_filter = settings.auto_compatibility_filter,
        auto_filter_origin = origin,
        default_sort = settings.default_sort.as_deref().unwrap_or("-"),
        "resolved settings"
    );
    Ok(settings)
}

/// Parse an on/off switch as accepted in environment variables.
///
/// # Errors
/// Returns an error for anything other than `1/true/yes/on` or `0/false/no/off`.
pub fn parse_switch(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected one of 1/true/yes/on or 0/false/no/off, got `{other}`")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_settings_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rigcheck-{name}-{}.yaml", std::process::id()));
        if let Err(err) = std::fs::write(&path, contents) {
            panic!("failed to write settings fixture: {err}");
        }
        path
    }

    #[test]
    fn defaults_enable_auto_filter() {
        let settings = match resolve_settings(SettingsSources::default()) {
            Ok(settings) => settings,
            Err(err) => panic!("defaults should resolve: {err}"),
        };
        assert_eq!(settings, Settings::default());
        assert!(settings.auto_compatibility_filter);
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        assert!(Settings::from_yaml_str("auto_compatibility_filter: false\ncolour: blue\n").is_err());
        let parsed = Settings::from_yaml_str("default_sort: price\ndefault_direction: desc\n");
        match parsed {
            Ok(settings) => {
                assert_eq!(settings.default_sort.as_deref(), Some("price"));
                assert_eq!(settings.default_direction, SortDirection::Desc);
                assert!(settings.auto_compatibility_filter);
            }
            Err(err) => panic!("partial settings should parse: {err}"),
        }
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let path = temp_settings_file("precedence", "auto_compatibility_filter: false\n");

        let from_file = resolve_settings(SettingsSources { config_path: Some(&path), ..SettingsSources::default() });
        assert!(matches!(from_file, Ok(ref settings) if !settings.auto_compatibility_filter));

        let from_env = resolve_settings(SettingsSources {
            config_path: Some(&path),
            auto_filter_env: Some("on"),
            ..SettingsSources::default()
        });
        assert!(matches!(from_env, Ok(ref settings) if settings.auto_compatibility_filter));

        let from_flag = resolve_settings(SettingsSources {
            config_path: Some(&path),
            auto_filter_flag: Some(false),
            auto_filter_env: Some("yes"),
        });
        assert!(matches!(from_flag, Ok(ref settings) if !settings.auto_compatibility_filter));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_env_value_is_an_error() {
        let result = resolve_settings(SettingsSources { auto_filter_env: Some("maybe"), ..SettingsSources::default() });
        match result {
            Ok(settings) => panic!("expected an error, got {settings:?}"),
            Err(err) => assert!(format!("{err:#}").contains(AUTO_FILTER_ENV)),
        }
    }

    #[test]
    fn switch_values_are_case_insensitive() {
        assert!(matches!(parse_switch(" TRUE "), Ok(true)));
        assert!(matches!(parse_switch("Off"), Ok(false)));
        assert!(parse_switch("").is_err());
    }
}
