//! TOML configuration file parsing and loading
//!
//! Handles loading of the configuration file, default config file discovery,
//! and mapping of TOML keys (the long option names) onto `Args`.

use crate::core::validation::ValidationError;
use std::path::{Path, PathBuf};

use super::args::Args;

/// Keys accepted in the configuration file
pub const CONFIG_KEYS: &[&str] = &[
    "zap-url",
    "api-key",
    "target",
    "report-file",
    "report-format",
    "prime-wait",
    "wait-passive",
    "poll-interval",
    "scan-timeout",
    "max-polls",
    "request-timeout",
    "connect-attempts",
    "color",
    "no-color",
    "log-level",
    "log-format",
    "log-file",
];

/// Values accepted for `log-level`, matching the command line
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Values accepted for `log-format`, matching the command line
pub const LOG_FORMATS: &[&str] = &["text", "ext", "json"];

/// Default configuration file location, e.g. `~/.config/Zapscan/zapscan.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Zapscan").join("zapscan.toml"))
}

impl Args {
    /// Load the configuration file into a fresh `Args`
    ///
    /// An explicitly named file must exist. Without one the default location
    /// is used when present; otherwise an empty `Args` is returned.
    pub async fn load_config_file(config_file: Option<&Path>) -> Result<Args, ValidationError> {
        let config_path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ValidationError::new(&format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        let mut args = Args::new();
        let Some(path) = config_path else {
            return Ok(args);
        };

        log::debug!("Loading configuration from {}", path.display());
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ValidationError::new(&format!(
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = toml::from_str::<toml::Table>(&contents).map_err(|e| {
            ValidationError::new(&format!(
                "Error parsing configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::apply_toml_values(&mut args, &config).map_err(|e| {
            ValidationError::new(&format!(
                "Error in configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(args)
    }

    /// Apply TOML configuration values to Args
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ValidationError> {
        for key in config.keys() {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                return Err(ValidationError::new(&format!(
                    "unknown key '{}'",
                    key
                )));
            }
        }

        if let Some(v) = string_field(config, "zap-url")? {
            args.zap_url = Some(v);
        }
        if let Some(v) = string_field(config, "api-key")? {
            args.api_key = Some(v);
        }
        if let Some(v) = string_field(config, "target")? {
            args.target = Some(v);
        }
        if let Some(v) = string_field(config, "report-file")? {
            args.report_file = Some(PathBuf::from(v));
        }
        if let Some(v) = string_field(config, "report-format")? {
            args.report_format = Some(v);
        }
        if let Some(v) = integer_field(config, "prime-wait")? {
            args.prime_wait = Some(v);
        }
        if let Some(v) = bool_field(config, "wait-passive")? {
            args.wait_passive = v;
            args.no_wait_passive = !v;
        }
        if let Some(v) = integer_field(config, "poll-interval")? {
            args.poll_interval = Some(v);
        }
        if let Some(v) = integer_field(config, "scan-timeout")? {
            args.scan_timeout = Some(v);
        }
        if let Some(v) = integer_field(config, "max-polls")? {
            args.max_polls = Some(u32::try_from(v).map_err(|_| {
                ValidationError::new("'max-polls' is too large")
            })?);
        }
        if let Some(v) = integer_field(config, "request-timeout")? {
            args.request_timeout = Some(v);
        }
        if let Some(v) = integer_field(config, "connect-attempts")? {
            args.connect_attempts = Some(v as usize);
        }
        if let Some(v) = bool_field(config, "color")? {
            args.color = Some(v);
        }
        if let Some(v) = bool_field(config, "no-color")? {
            args.color = Some(!v);
        }
        if let Some(v) = string_field(config, "log-level")? {
            args.log_level = Some(one_of("log-level", v, LOG_LEVELS)?);
        }
        if let Some(v) = string_field(config, "log-format")? {
            args.log_format = Some(one_of("log-format", v, LOG_FORMATS)?);
        }
        if let Some(v) = string_field(config, "log-file")? {
            args.log_file = Some(PathBuf::from(v));
        }

        Ok(())
    }
}

fn type_error(key: &str, expected: &str) -> ValidationError {
    ValidationError::new(&format!("'{}' must be {}", key, expected))
}

fn one_of(key: &str, value: String, allowed: &[&str]) -> Result<String, ValidationError> {
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ValidationError::new(&format!(
            "'{}' must be one of {}, not '{}'",
            key,
            allowed.join(", "),
            value
        )))
    }
}

fn string_field(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| type_error(key, "a string")),
    }
}

fn integer_field(config: &toml::Table, key: &str) -> Result<Option<u64>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|i| u64::try_from(i).ok())
            .map(Some)
            .ok_or_else(|| type_error(key, "a non-negative integer")),
    }
}

fn bool_field(config: &toml::Table, key: &str) -> Result<Option<bool>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| type_error(key, "true or false")),
    }
}
