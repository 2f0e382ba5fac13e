use std::{collections::HashSet, env, net::SocketAddr};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env`, when present)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub oidc_issuer_url: String,
    /// JWT subjects granted the admin role
    pub admin_subjects: HashSet<String>,
    pub auto_migrate: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_addr.clone(),
            })?;

        let admin_subjects = lookup("ADMIN_SUBJECTS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let auto_migrate = match lookup("AUTO_MIGRATE").as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    name: "AUTO_MIGRATE",
                    value: v.to_string(),
                });
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            admin_subjects,
            auto_migrate,
        })
    }

    pub fn is_admin(&self, subject: &str) -> bool {
        self.admin_subjects.contains(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/school"),
        ("OIDC_ISSUER_URL", "https://idp.example.org"),
    ];

    #[test]
    fn test_defaults() {
        let config = config(&REQUIRED).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert!(config.admin_subjects.is_empty());
        assert!(!config.auto_migrate);
    }

    #[test]
    fn test_missing_database_url() {
        let err = config(&[("OIDC_ISSUER_URL", "https://idp.example.org")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_admin_subjects_and_flags() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("ADMIN_SUBJECTS", " registrar, ,dean "),
            ("AUTO_MIGRATE", "TRUE"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ]);
        let config = config(&vars).unwrap();

        assert!(config.is_admin("registrar"));
        assert!(config.is_admin("dean"));
        assert!(!config.is_admin("student"));
        assert!(config.auto_migrate);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("AUTO_MIGRATE", "sometimes"));
        assert_eq!(
            config(&vars).unwrap_err(),
            ConfigError::Invalid {
                name: "AUTO_MIGRATE",
                value: "sometimes".to_string()
            }
        );

        let mut vars = REQUIRED.to_vec();
        vars.push(("BIND_ADDR", "localhost"));
        assert!(matches!(
            config(&vars).unwrap_err(),
            ConfigError::Invalid { name: "BIND_ADDR", .. }
        ));
    }
}
