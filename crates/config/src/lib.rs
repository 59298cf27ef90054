use std::{env, time::Duration};

use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request deadline. `None` disables the timeout layer.
    pub request_timeout: Option<Duration>,
    pub shutdown_timeout: Duration,
    /// Fixed seed for reviewer selection; entropy-seeded when unset.
    pub store_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            store_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|name| env::var(name).ok())
    }

    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = read_env_string("HOST", &defaults.host, &get_env);
        let port = read_env_parsed("PORT", defaults.port, &get_env);
        let request_timeout_secs = read_env_parsed(
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
            &get_env,
        );
        let shutdown_timeout_secs = read_env_parsed(
            "SHUTDOWN_TIMEOUT_SECS",
            DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            &get_env,
        );
        let store_seed = get_env("REVIEW_STORE_SEED")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .and_then(|value| match value.parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(err) => {
                    warn!("Invalid REVIEW_STORE_SEED='{value}': {err}. Seeding from entropy.");
                    None
                }
            });

        Self {
            host,
            port,
            request_timeout: (request_timeout_secs > 0)
                .then(|| Duration::from_secs(request_timeout_secs)),
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            store_seed,
        }
    }

    /// `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_env_string<F>(name: &str, default: &str, get_env: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match get_env(name) {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        Some(_) => {
            warn!("{name} is set but empty; using default {default}");
            default.to_string()
        }
        None => default.to_string(),
    }
}

fn read_env_parsed<T, F>(name: &str, default: T, get_env: &F) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match get_env(name) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Invalid {name}='{value}': {err}. Using default {default}.");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_used_without_env() {
        let cfg = ServerConfig::from_env_with(|_| None);

        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(
            cfg.request_timeout,
            Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
        assert_eq!(cfg.store_seed, None);
        assert_eq!(cfg.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn overrides_apply() {
        let mut envs = HashMap::new();
        envs.insert("HOST", "127.0.0.1".to_string());
        envs.insert("PORT", " 9090 ".to_string());
        envs.insert("REQUEST_TIMEOUT_SECS", "0".to_string());
        envs.insert("SHUTDOWN_TIMEOUT_SECS", "3".to_string());
        envs.insert("REVIEW_STORE_SEED", "42".to_string());

        let cfg = ServerConfig::from_env_with(|key| envs.get(key).cloned());

        assert_eq!(cfg.bind_address(), "127.0.0.1:9090");
        assert_eq!(cfg.request_timeout, None);
        assert_eq!(cfg.shutdown_timeout, Duration::from_secs(3));
        assert_eq!(cfg.store_seed, Some(42));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let mut envs = HashMap::new();
        envs.insert("HOST", "   ".to_string());
        envs.insert("PORT", "eighty".to_string());
        envs.insert("REQUEST_TIMEOUT_SECS", "-1".to_string());
        envs.insert("REVIEW_STORE_SEED", "not-a-seed".to_string());

        let cfg = ServerConfig::from_env_with(|key| envs.get(key).cloned());

        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(
            cfg.request_timeout,
            Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
        assert_eq!(cfg.store_seed, None);
    }
}
