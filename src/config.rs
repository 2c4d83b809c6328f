use serde::Deserialize;

/// Connection string that selects the in-process store instead of Postgres.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let server = ServerConfig {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
        };
        Ok(Self {
            database_url,
            max_connections,
            server,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/users",
        )]))
        .expect("config should load");

        assert_eq!(cfg.database_url, "postgres://localhost/users");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.uses_memory_store());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory"),
            ("DB_MAX_CONNECTIONS", "3"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "5000"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.max_connections, 3);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert!(cfg.uses_memory_store());
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory"),
            ("DB_MAX_CONNECTIONS", "lots"),
            ("APP_PORT", "http"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
