//! Runtime configuration: cache location, lookup backend, reading and
//! lyrics substitutions.
//!
//! The built-in TOML is compiled in and checked by `build.rs`. A replacement
//! may be installed with [`init_custom`], but only until something has read
//! [`settings`]; after that the configuration is frozen for the process.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static OVERRIDE: OnceLock<String> = OnceLock::new();
static ACTIVE: OnceLock<Settings> = OnceLock::new();

/// Install `toml_content` in place of the built-in configuration.
///
/// The content is validated first. Fails once settings have been read or an
/// override is already installed.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    if ACTIVE.get().is_some() {
        return Err(SettingsError::AlreadyInitialized);
    }
    OVERRIDE
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// The active configuration; the override if one was installed.
pub fn settings() -> &'static Settings {
    ACTIVE.get_or_init(|| {
        let source = OVERRIDE.get().map_or(DEFAULT_SETTINGS_TOML, String::as_str);
        // both sources were validated: the override by init_custom, the
        // built-in file by build.rs
        parse_settings_toml(source).expect("validated settings TOML")
    })
}

/// The built-in configuration, for `settings-export`.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings are already in use or overridden")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cache: CacheSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub readings: BTreeMap<String, String>,
    #[serde(default)]
    pub lyrics: BTreeMap<String, String>,
}

impl Settings {
    /// Replace every `[readings]` key in `text` with its reading.
    pub fn apply_readings(&self, text: &str) -> String {
        substitute_all(text, &self.readings)
    }

    /// Replace every `[lyrics]` key in `text` with its sung substitute.
    pub fn apply_lyrics(&self, text: &str) -> String {
        substitute_all(text, &self.lyrics)
    }
}

fn substitute_all(text: &str, table: &BTreeMap<String, String>) -> String {
    table
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub file_name: String,
    pub env_var: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Table,
    Command,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub cantonese_scheme: String,
    pub pinyin_scheme: String,
    #[serde(default)]
    pub command: Vec<String>,
    /// scheme id → TSV reading table path
    #[serde(default)]
    pub tables: BTreeMap<String, PathBuf>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_non_empty!(cache.file_name);
    check_non_empty!(cache.env_var);
    check_non_empty!(backend.cantonese_scheme);
    check_non_empty!(backend.pinyin_scheme);

    match s.backend.kind {
        BackendKind::Command => check_non_empty!(backend.command),
        BackendKind::Table => {
            for scheme in [&s.backend.cantonese_scheme, &s.backend.pinyin_scheme] {
                if !s.backend.tables.contains_key(scheme) {
                    return Err(SettingsError::InvalidValue {
                        field: format!("backend.tables.{scheme}"),
                        reason: "table backend needs a reading table for every scheme"
                            .to_string(),
                    });
                }
            }
        }
    }

    for (section, table) in [("readings", &s.readings), ("lyrics", &s.lyrics)] {
        if let Some(key) = table.keys().find(|k| k.is_empty()) {
            return Err(SettingsError::InvalidValue {
                field: format!("{section}.{key:?}"),
                reason: "key must not be empty".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.cache.file_name, ".jyutping-cache");
        assert_eq!(s.cache.env_var, "JYUTPING_CACHE");
        assert_eq!(s.backend.kind, BackendKind::Table);
        assert_eq!(s.backend.cantonese_scheme, "zhy");
        assert_eq!(s.backend.pinyin_scheme, "zh");
        assert!(s.backend.command.is_empty());
        assert_eq!(s.readings["\u{9C85}"], "bat3");
        assert_eq!(s.lyrics["使"], "\u{38C8}");
    }

    #[test]
    fn apply_readings_and_lyrics() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.apply_readings("\u{9C85}魚"), "bat3魚");
        assert_eq!(s.apply_lyrics("使用"), "\u{38C8}用");
        assert_eq!(s.apply_lyrics("你好"), "你好");
    }

    #[test]
    fn parse_command_backend() {
        let toml = r#"
[cache]
file_name = "cache.bin"
env_var = "MY_CACHE"

[backend]
kind = "command"
cantonese_scheme = "yue"
pinyin_scheme = "cmn"
command = ["lookup", "--scheme", "{scheme}"]
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.backend.kind, BackendKind::Command);
        assert_eq!(s.backend.command.len(), 3);
        assert!(s.readings.is_empty());
        assert!(s.lyrics.is_empty());
    }

    #[test]
    fn error_command_backend_without_command() {
        let toml = r#"
[cache]
file_name = "cache.bin"
env_var = "MY_CACHE"

[backend]
kind = "command"
cantonese_scheme = "zhy"
pinyin_scheme = "zh"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("backend.command"));
    }

    #[test]
    fn error_table_backend_missing_scheme() {
        let toml = r#"
[cache]
file_name = "cache.bin"
env_var = "MY_CACHE"

[backend]
kind = "table"
cantonese_scheme = "zhy"
pinyin_scheme = "zh"

[backend.tables]
zhy = "canto.tsv"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("backend.tables.zh"));
    }

    #[test]
    fn error_empty_file_name() {
        let toml = r#"
[cache]
file_name = ""
env_var = "MY_CACHE"

[backend]
kind = "command"
cantonese_scheme = "zhy"
pinyin_scheme = "zh"
command = ["lookup"]
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("cache.file_name"));
    }

    #[test]
    fn error_unknown_backend_kind() {
        let toml = r#"
[cache]
file_name = "cache.bin"
env_var = "MY_CACHE"

[backend]
kind = "network"
cantonese_scheme = "zhy"
pinyin_scheme = "zh"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[cache]
file_name = "cache.bin"
env_var = "MY_CACHE"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
