use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SLASH_JWT_SECRET is unset or still a placeholder; set it in your .env file")]
    InsecureSecret,

    #[error("invalid {name} '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("SLASH_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            return Err(ConfigError::InsecureSecret);
        }

        let db_path = lookup("SLASH_DB_PATH").unwrap_or_else(|| "slash.db".into());
        let host = lookup("SLASH_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("SLASH_PORT").unwrap_or_else(|| "5231".into());

        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            name: "SLASH_PORT",
            value: port.clone(),
        })?;

        let addr = format!("{}:{}", host, port);
        let addr = addr.parse().map_err(|_| ConfigError::Invalid {
            name: "SLASH_HOST",
            value: host,
        })?;

        Ok(Self {
            jwt_secret,
            db_path: db_path.into(),
            addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("SLASH_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("slash.db"));
        assert_eq!(config.addr, "0.0.0.0:5231".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn placeholder_secret_is_rejected() {
        assert!(matches!(load(&[]), Err(ConfigError::InsecureSecret)));
        assert!(matches!(
            load(&[("SLASH_JWT_SECRET", "dev-secret-change-me")]),
            Err(ConfigError::InsecureSecret)
        ));
    }

    #[test]
    fn bad_port_is_reported() {
        let err = load(&[("SLASH_JWT_SECRET", "s3cret"), ("SLASH_PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid SLASH_PORT 'http'");
    }
}
