//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, SimulateConfig};
use crate::domain::error::ConfigError;
use crate::domain::time::Duration;
use crate::infrastructure::notification::VALID_NOTIFIERS;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = get_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Read a key as displayed by `get` and `list`
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    let simulate = config.simulate.as_ref();
    match key {
        "store_dir" => config.store_dir.clone(),
        "retention" => config.retention.map(|n| n.to_string()),
        "default_duration" => config.default_duration.clone(),
        "native" => config.native.map(|b| b.to_string()),
        "notifier" => config.notifier.clone(),
        "native_timeout" => config.native_timeout.clone(),
        "assume_focused" => config.assume_focused.map(|b| b.to_string()),
        "simulate.enabled" => simulate.and_then(|s| s.enabled).map(|b| b.to_string()),
        "simulate.interval" => simulate.and_then(|s| s.interval.clone()),
        "simulate.probability" => simulate.and_then(|s| s.probability).map(|p| p.to_string()),
        _ => None,
    }
}

/// Validate and store a value
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "store_dir" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Value must not be empty"));
            }
            config.store_dir = Some(value.to_string());
        }
        "retention" => {
            let retention = value
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| invalid(key, "Value must be a positive integer"))?;
            config.retention = Some(retention);
        }
        "default_duration" => config.default_duration = Some(parse_duration(key, value)?),
        "native" => config.native = Some(parse_bool_value(key, value)?),
        "notifier" => {
            let lower = value.to_lowercase();
            if !VALID_NOTIFIERS.contains(&lower.as_str()) {
                return Err(invalid(
                    key,
                    &format!(
                        "Invalid value '{}'. Valid options: {}",
                        value,
                        VALID_NOTIFIERS.join(", ")
                    ),
                ));
            }
            config.notifier = Some(lower);
        }
        "native_timeout" => config.native_timeout = Some(parse_duration(key, value)?),
        "assume_focused" => config.assume_focused = Some(parse_bool_value(key, value)?),
        "simulate.enabled" => {
            simulate_mut(config).enabled = Some(parse_bool_value(key, value)?);
        }
        "simulate.interval" => {
            simulate_mut(config).interval = Some(parse_duration(key, value)?);
        }
        "simulate.probability" => {
            let probability = value
                .parse::<f64>()
                .ok()
                .filter(|p| (0.0..=1.0).contains(p))
                .ok_or_else(|| invalid(key, "Value must be a number between 0 and 1"))?;
            simulate_mut(config).probability = Some(probability);
        }
        _ => unreachable!(), // Already validated
    }
    Ok(())
}

fn simulate_mut(config: &mut AppConfig) -> &mut SimulateConfig {
    config.simulate.get_or_insert_with(SimulateConfig::default)
}

fn parse_duration(key: &str, value: &str) -> Result<String, ConfigError> {
    value
        .parse::<Duration>()
        .map(|d| d.to_string())
        .map_err(|e| invalid(key, &e.to_string()))
}

fn parse_bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn set_and_get_every_key() {
        let mut config = AppConfig::empty();
        let cases = [
            ("store_dir", "/tmp/notes", "/tmp/notes"),
            ("retention", "50", "50"),
            ("default_duration", "1500ms", "1500ms"),
            ("native", "no", "false"),
            ("notifier", "Notify-Send", "notify-send"),
            ("native_timeout", "10s", "10s"),
            ("assume_focused", "yes", "true"),
            ("simulate.enabled", "true", "true"),
            ("simulate.interval", "90s", "1m30s"),
            ("simulate.probability", "0.5", "0.5"),
        ];

        for (key, value, expected) in cases {
            set_value(&mut config, key, value).unwrap();
            assert_eq!(get_value(&config, key).as_deref(), Some(expected), "key {}", key);
        }
        assert_eq!(cases.len(), VALID_CONFIG_KEYS.len());
    }

    #[test]
    fn unset_keys_read_as_none() {
        let config = AppConfig::empty();
        for key in VALID_CONFIG_KEYS {
            assert!(get_value(&config, key).is_none());
        }
    }

    #[test]
    fn validate_duration_invalid() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "default_duration", "soon").is_err());
        assert!(set_value(&mut config, "simulate.interval", "0s").is_err());
    }

    #[test]
    fn validate_notifier_invalid() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "notifier", "growl").is_err());
    }

    #[test]
    fn validate_probability_range() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "simulate.probability", "1.5").is_err());
        assert!(set_value(&mut config, "simulate.probability", "-0.1").is_err());
        assert!(set_value(&mut config, "simulate.probability", "abc").is_err());
    }

    #[test]
    fn validate_retention_invalid() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "retention", "-1").is_err());
        assert!(set_value(&mut config, "retention", "0").is_err());
        assert!(config.retention.is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(check_key("api_key").is_err());
        assert!(check_key("retention").is_ok());
    }
}
