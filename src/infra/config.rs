//! Centralized configuration (environment variables + defaults).
//!
//! Everything is resolved once at startup into [`Config`] and passed down; nothing
//! downstream reads the environment again.

use sqlx::mysql::MySqlConnectOptions;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_MYSQL_HOST: &str = "mysql:3306";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_SCHEMA: &str = "shipped";
pub const DEFAULT_MYSQL_USER: &str = "root";
pub const DEFAULT_MYSQL_PASSWORD: &str = "shipped";
pub const DEFAULT_LISTEN_PORT: u16 = 8888;
pub const DEFAULT_SEED_PATH: &str = "catalog.json";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required environment variable not found: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Which store implementation backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

/// MySQL connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub schema: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Connect options for an arbitrary database on the same server.
    ///
    /// Credentials are passed as fields, never spliced into a URL, so any byte is allowed
    /// in the user or password.
    pub fn options_for(&self, database: &str) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(database)
    }

    /// Connect options scoped to the catalog schema.
    pub fn schema_options(&self) -> MySqlConnectOptions {
        self.options_for(&self.schema)
    }

    /// `user:********@host:port/schema`, safe to log.
    pub fn redacted(&self) -> String {
        format!(
            "{}:********@{}:{}/{}",
            self.user, self.host, self.port, self.schema
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("schema", &self.schema)
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub listen_port: u16,
    pub seed_path: PathBuf,
    pub templates_dir: PathBuf,
    pub backend: StoreBackend,
}

impl Config {
    /// Loads `.env` (if any) and resolves the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let strict = get("SHIPPED_CONFIG_STRICT").as_deref() == Some("true");

        let var = |name: &'static str, default: &str| -> Result<String, ConfigError> {
            match get(name) {
                Some(v) => Ok(v),
                None if strict => Err(ConfigError::Missing(name)),
                None => Ok(default.to_string()),
            }
        };

        let raw_host = var("SHIPPED_MYSQL_HOST", DEFAULT_MYSQL_HOST)?;
        let (host, port) = split_host(&raw_host).ok_or_else(|| ConfigError::Invalid {
            name: "SHIPPED_MYSQL_HOST",
            value: raw_host.clone(),
        })?;
        let schema = var("SHIPPED_MYSQL_SCHEMA", DEFAULT_MYSQL_SCHEMA)?;
        if !validate_ident(&schema) {
            return Err(ConfigError::Invalid {
                name: "SHIPPED_MYSQL_SCHEMA",
                value: schema,
            });
        }
        let user = var("SHIPPED_MYSQL_USER", DEFAULT_MYSQL_USER)?;
        let password = var("SHIPPED_MYSQL_PASSWORD", DEFAULT_MYSQL_PASSWORD)?;

        let (port_name, port_value) = match get("LISTEN_PORT") {
            Some(v) => ("LISTEN_PORT", Some(v)),
            None => (
                "SHIPPED_CATALOG_LISTEN_PORT",
                get("SHIPPED_CATALOG_LISTEN_PORT"),
            ),
        };
        let listen_port = match port_value {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: port_name,
                value: v,
            })?,
            None => DEFAULT_LISTEN_PORT,
        };

        let backend = match get("SHIPPED_CATALOG_STORE").as_deref() {
            None | Some("mysql") => StoreBackend::MySql,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "SHIPPED_CATALOG_STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            db: DbConfig {
                host,
                port,
                schema,
                user,
                password,
            },
            listen_port,
            seed_path: get("SHIPPED_CATALOG_SEED")
                .unwrap_or_else(|| DEFAULT_SEED_PATH.to_string())
                .into(),
            templates_dir: get("SHIPPED_TEMPLATES_DIR")
                .unwrap_or_else(|| DEFAULT_TEMPLATES_DIR.to_string())
                .into(),
            backend,
        })
    }
}

/// Splits `host[:port]` into its parts. Go-driver style `tcp(host:port)` is unwrapped first.
fn split_host(raw: &str) -> Option<(String, u16)> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("tcp(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw);
    let (host, port) = match raw.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().ok()?),
        None => (raw, DEFAULT_MYSQL_PORT),
    };
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}

/// Plain SQL identifier: ASCII letter or `_`, then alphanumerics or `_`.
pub fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = resolve(&[]).unwrap();
        assert_eq!(cfg.db.host, "mysql");
        assert_eq!(cfg.db.port, 3306);
        assert_eq!(cfg.db.schema, "shipped");
        assert_eq!(cfg.db.user, "root");
        assert_eq!(cfg.db.password, "shipped");
        assert_eq!(cfg.listen_port, 8888);
        assert_eq!(cfg.seed_path, PathBuf::from("catalog.json"));
        assert_eq!(cfg.backend, StoreBackend::MySql);
    }

    #[test]
    fn go_style_host_is_unwrapped() {
        let cfg = resolve(&[("SHIPPED_MYSQL_HOST", "tcp(db.local:3307)")]).unwrap();
        assert_eq!(cfg.db.host, "db.local");
        assert_eq!(cfg.db.port, 3307);

        let cfg = resolve(&[("SHIPPED_MYSQL_HOST", "db.local")]).unwrap();
        assert_eq!((cfg.db.host.as_str(), cfg.db.port), ("db.local", 3306));

        for bad in ["db.local:port", ":3306", "tcp(:1)"] {
            assert!(matches!(
                resolve(&[("SHIPPED_MYSQL_HOST", bad)]),
                Err(ConfigError::Invalid { name: "SHIPPED_MYSQL_HOST", .. })
            ));
        }
    }

    #[test]
    fn credentials_with_url_metacharacters_stay_intact() {
        let cfg = resolve(&[
            ("SHIPPED_MYSQL_USER", "ops:admin"),
            ("SHIPPED_MYSQL_PASSWORD", "p@ss/w#rd%3A"),
        ])
        .unwrap();
        let options = format!("{:?}", cfg.db.options_for("information_schema"));
        assert!(options.contains(r#"host: "mysql""#), "{}", options);
        assert!(options.contains("port: 3306"), "{}", options);
        assert!(options.contains(r#"username: "ops:admin""#), "{}", options);
        assert!(options.contains(r#"password: Some("p@ss/w#rd%3A")"#), "{}", options);
        assert!(options.contains(r#"database: Some("information_schema")"#), "{}", options);

        let schema = format!("{:?}", cfg.db.schema_options());
        assert!(schema.contains(r#"database: Some("shipped")"#), "{}", schema);
    }

    #[test]
    fn strict_mode_requires_mysql_vars() {
        let err = resolve(&[("SHIPPED_CONFIG_STRICT", "true")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SHIPPED_MYSQL_HOST"));

        let cfg = resolve(&[
            ("SHIPPED_CONFIG_STRICT", "true"),
            ("SHIPPED_MYSQL_HOST", "h"),
            ("SHIPPED_MYSQL_SCHEMA", "s"),
            ("SHIPPED_MYSQL_USER", "u"),
            ("SHIPPED_MYSQL_PASSWORD", "p"),
        ])
        .unwrap();
        assert_eq!(cfg.db.redacted(), "u:********@h:3306/s");
    }

    #[test]
    fn listen_port_fallback_and_validation() {
        let cfg = resolve(&[("SHIPPED_CATALOG_LISTEN_PORT", "8000")]).unwrap();
        assert_eq!(cfg.listen_port, 8000);

        let cfg = resolve(&[
            ("LISTEN_PORT", "9000"),
            ("SHIPPED_CATALOG_LISTEN_PORT", "8000"),
        ])
        .unwrap();
        assert_eq!(cfg.listen_port, 9000);

        assert!(matches!(
            resolve(&[("LISTEN_PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "LISTEN_PORT", .. })
        ));
    }

    #[test]
    fn schema_must_be_an_identifier() {
        assert!(matches!(
            resolve(&[("SHIPPED_MYSQL_SCHEMA", "shipped; DROP TABLE x")]),
            Err(ConfigError::Invalid { name: "SHIPPED_MYSQL_SCHEMA", .. })
        ));
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = resolve(&[("SHIPPED_MYSQL_PASSWORD", "hunter2")]).unwrap();
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("hunter2"));
        assert_eq!(cfg.db.redacted(), "root:********@mysql:3306/shipped");
    }
}
