use std::{env, path::PathBuf, str::FromStr};

use chrono::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub store_dir: PathBuf,
    /// Header carrying the id of the user the upstream proxy authenticated.
    pub identity_header: String,
    pub max_avatar_bytes: usize,
    pub editor_idle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            store_dir: PathBuf::from("store"),
            identity_header: "x-employer-id".to_string(),
            max_avatar_bytes: 2 * 1024 * 1024,
            editor_idle: Duration::minutes(30),
        }
    }
}

fn number<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::NotANumber { name, value }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError> where F: Fn(&str) -> Option<String> {
        let default = Self::default();
        let idle_minutes = number("PROFILE_EDITOR_IDLE_MINUTES", var("PROFILE_EDITOR_IDLE_MINUTES"), default.editor_idle.num_minutes())?;
        Ok(Self {
            bind_addr: var("PROFILE_BIND_ADDR").unwrap_or(default.bind_addr),
            port: number("PROFILE_PORT", var("PROFILE_PORT"), default.port)?,
            store_dir: var("PROFILE_STORE_DIR").map_or(default.store_dir, PathBuf::from),
            identity_header: var("PROFILE_IDENTITY_HEADER").unwrap_or(default.identity_header).to_lowercase(),
            max_avatar_bytes: number("PROFILE_MAX_AVATAR_BYTES", var("PROFILE_MAX_AVATAR_BYTES"), default.max_avatar_bytes)?,
            editor_idle: Duration::minutes(idle_minutes),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_dir, PathBuf::from("store"));
        assert_eq!(config.identity_header, "x-employer-id");
        assert_eq!(config.editor_idle, Duration::minutes(30));
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_vars(vars(&[
            ("PROFILE_PORT", "9000"),
            ("PROFILE_STORE_DIR", "/var/lib/profiles"),
            ("PROFILE_IDENTITY_HEADER", "X-Remote-User"),
            ("PROFILE_MAX_AVATAR_BYTES", "1024"),
            ("PROFILE_EDITOR_IDLE_MINUTES", "5"),
        ])).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.store_dir, PathBuf::from("/var/lib/profiles"));
        assert_eq!(config.identity_header, "x-remote-user");
        assert_eq!(config.max_avatar_bytes, 1024);
        assert_eq!(config.editor_idle, Duration::minutes(5));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let result = Config::from_vars(vars(&[("PROFILE_PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::NotANumber { name: "PROFILE_PORT", .. })));
    }
}
