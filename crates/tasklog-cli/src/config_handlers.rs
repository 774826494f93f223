//! Handlers for `tasklog config` subcommands.
//!
//! Values are addressed by dotted keys (`sheets.target_column`) into the
//! TOML form of [`TasklogConfig`].

use std::path::PathBuf;

use tasklog_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::{PROJECT_NAME, TasklogConfig};

/// Dispatch a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Set { key, value } => cmd_config_set(config_path, &key, &value),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
        ConfigAction::Export { docker_env } => {
            let config = TasklogConfig::load(config_path)?;
            cmd_config_export(&config, docker_env)
        }
    }
}

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    let path = TasklogConfig::resolve_config_path(config_path).ok_or_else(|| {
        Error::config("Could not determine config directory for this platform")
    })?;
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(file does not exist; run `{PROJECT_NAME} config init` to create it)");
    }
    Ok(())
}

/// Print a configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<()> {
    println!("{}", config_value(config_path, key)?);
    Ok(())
}

/// A resolved configuration value by dotted key, formatted for display.
pub fn config_value(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = TasklogConfig::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Set a configuration value by dotted key in the config file.
pub fn cmd_config_set(config_path: Option<&str>, key: &str, value: &str) -> Result<()> {
    let path = TasklogConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;

    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `{PROJECT_NAME} config init` first.",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
    let mut doc: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    set_nested_value(&mut doc, key, parse_value(value))?;

    // Reject edits that no longer deserialize, e.g. text in a numeric field.
    let toml_str = toml::to_string_pretty(&doc).map_err(|e| Error::config(e.to_string()))?;
    TasklogConfig::from_toml_str(&toml_str)
        .map_err(|e| Error::config(format!("Invalid value for '{key}': {e}")))?;
    std::fs::write(&path, toml_str)
        .map_err(|e| Error::config(format!("Failed to write {}: {e}", path.display())))?;

    println!("Set {key} = {value} in {}", path.display());
    Ok(())
}

/// Create a configuration file holding the defaults.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => TasklogConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {}: {e}", parent.display())))?;
    }

    let toml_str = TasklogConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str)
        .map_err(|e| Error::config(format!("Failed to write {}: {e}", path.display())))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

/// Print configuration as environment variables.
pub fn cmd_config_export(config: &TasklogConfig, docker_env: bool) -> Result<()> {
    for line in export_lines(config, docker_env) {
        println!("{line}");
    }
    Ok(())
}

/// `KEY=value` lines, or `--env KEY=value` for `docker run`.
pub fn export_lines(config: &TasklogConfig, docker_env: bool) -> Vec<String> {
    config
        .to_env_vars()
        .into_iter()
        .map(|(key, value)| {
            if docker_env {
                format!("--env {key}={value}")
            } else {
                format!("{key}={value}")
            }
        })
        .collect()
}

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Set a value at a dotted key path, creating intermediate tables as needed.
pub fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let mut parts = key.split('.').peekable();
    let mut current = root;

    while let Some(part) = parts.next() {
        if part.is_empty() {
            return Err(Error::config(format!("Invalid key '{key}'")));
        }
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config(format!("Cannot set '{key}': not a table")))?;
        if parts.peek().is_none() {
            table.insert(part.to_string(), value);
            return Ok(());
        }
        current = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    Err(Error::config("Empty key path"))
}

/// Parse a string value into a TOML value, auto-detecting the type.
///
/// Priority: bool → integer → float → string.
pub fn parse_value(s: &str) -> toml::Value {
    match s {
        "true" => return toml::Value::Boolean(true),
        "false" => return toml::Value::Boolean(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(s.to_string())
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_default(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, TasklogConfig::default().to_toml_string().unwrap()).unwrap();
        path
    }

    // ------------------------------------------------------------------------
    // path / get
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_path_explicit() {
        assert!(cmd_config_path(Some("/explicit/config.toml")).is_ok());
    }

    #[test]
    fn test_config_value_nested_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let value = config_value(Some(path.to_str().unwrap()), "sheets.target_column").unwrap();
        assert_eq!(value, "E");
    }

    #[test]
    fn test_config_value_missing_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let err = config_value(Some(path.to_str().unwrap()), "sheets.nonexistent").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    // ------------------------------------------------------------------------
    // set
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_set_number() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);

        cmd_config_set(Some(path.to_str().unwrap()), "sync.lookback_days", "14").unwrap();

        let config = TasklogConfig::from_file(&path).unwrap();
        assert_eq!(config.sync.lookback_days, 14);
    }

    #[test]
    fn test_cmd_config_set_string() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);

        cmd_config_set(Some(path.to_str().unwrap()), "todoist.project_name", "Journal").unwrap();

        let config = TasklogConfig::from_file(&path).unwrap();
        assert_eq!(config.todoist.project_name, "Journal");
    }

    #[test]
    fn test_cmd_config_set_rejects_wrong_type() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let before = std::fs::read_to_string(&path).unwrap();

        let result = cmd_config_set(Some(path.to_str().unwrap()), "sync.lookback_days", "weekly");
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_cmd_config_set_missing_file() {
        let err = cmd_config_set(Some("/nonexistent/config.toml"), "sync.lookback_days", "3")
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    // ------------------------------------------------------------------------
    // init
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_init_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tasklog").join("config.toml");

        cmd_config_init(Some(path.to_str().unwrap()), false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[todoist]"));
        assert!(content.contains("[sheets]"));
        assert!(content.contains("lookback_days = 7"));
    }

    #[test]
    fn test_cmd_config_init_no_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();

        let err = cmd_config_init(Some(path.to_str().unwrap()), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }

    #[test]
    fn test_cmd_config_init_force_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "old content").unwrap();

        cmd_config_init(Some(path.to_str().unwrap()), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("target_column"));
    }

    // ------------------------------------------------------------------------
    // export
    // ------------------------------------------------------------------------

    #[test]
    fn test_export_lines() {
        let mut config = TasklogConfig::default();
        config.todoist.project_name = "Journal".into();

        let plain = export_lines(&config, false);
        assert!(plain.contains(&"TODOIST_PROJECT_NAME=Journal".to_string()));
        assert!(plain.contains(&"TASKLOG_LOOKBACK_DAYS=7".to_string()));

        let docker = export_lines(&config, true);
        assert!(docker.contains(&"--env TODOIST_PROJECT_NAME=Journal".to_string()));
    }

    // ------------------------------------------------------------------------
    // TOML helpers
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_nested_value() {
        let val: toml::Value = toml::from_str("[sync]\nlookback_days = 7").unwrap();
        assert_eq!(
            get_nested_value(&val, "sync.lookback_days"),
            Some(&toml::Value::Integer(7))
        );
        assert!(get_nested_value(&val, "sync.nonexistent").is_none());
        assert!(get_nested_value(&val, "sync.lookback_days.deeper").is_none());
    }

    #[test]
    fn test_set_nested_value_creates_section() {
        let mut val = toml::Value::Table(toml::map::Map::new());
        set_nested_value(&mut val, "sheets.target_column", parse_value("F")).unwrap();
        assert_eq!(
            get_nested_value(&val, "sheets.target_column"),
            Some(&toml::Value::String("F".into()))
        );
    }

    #[test]
    fn test_set_nested_value_through_scalar_fails() {
        let mut val: toml::Value = toml::from_str("[sync]\nlookback_days = 7").unwrap();
        assert!(set_nested_value(&mut val, "sync.lookback_days.x", parse_value("1")).is_err());
        assert!(set_nested_value(&mut val, "sync..x", parse_value("1")).is_err());
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("true"), toml::Value::Boolean(true));
        assert_eq!(parse_value("42"), toml::Value::Integer(42));
        assert_eq!(parse_value("2.5"), toml::Value::Float(2.5));
        assert_eq!(parse_value("E"), toml::Value::String("E".to_string()));
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::String("E".into())), "E");
        assert_eq!(format_toml_value(&toml::Value::Integer(7)), "7");
        assert_eq!(format_toml_value(&toml::Value::Boolean(false)), "false");
    }
}
