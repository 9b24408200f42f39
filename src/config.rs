use std::env;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "mongodb://localhost:27017/test";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Overrides the database named in `database_url`.
    pub database_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("⚠️ Invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: get("DATABASE_URL")
                .or_else(|| get("MONGO_URL"))
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_name: get("MONGODB_DATABASE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            config(&[]),
            Config {
                host: "0.0.0.0".into(),
                port: 3000,
                database_url: DEFAULT_DATABASE_URL.into(),
                database_name: None,
            }
        );
    }

    #[test]
    fn test_reads_all_variables() {
        let cfg = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "mongodb://db:27017/people"),
            ("MONGODB_DATABASE", "staff"),
        ]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.database_url, "mongodb://db:27017/people");
        assert_eq!(cfg.database_name.as_deref(), Some("staff"));
    }

    #[test]
    fn test_mongo_url_alias() {
        let cfg = config(&[("MONGO_URL", "mongodb://alias:27017/x")]);
        assert_eq!(cfg.database_url, "mongodb://alias:27017/x");

        let cfg = config(&[
            ("DATABASE_URL", "mongodb://primary:27017/x"),
            ("MONGO_URL", "mongodb://alias:27017/x"),
        ]);
        assert_eq!(cfg.database_url, "mongodb://primary:27017/x");
    }

    #[test]
    fn test_bad_or_empty_port_falls_back() {
        assert_eq!(config(&[("PORT", "http")]).port, DEFAULT_PORT);
        assert_eq!(config(&[("PORT", "70000")]).port, DEFAULT_PORT);
        assert_eq!(config(&[("PORT", "")]).port, DEFAULT_PORT);
        assert_eq!(config(&[("PORT", " 4000 ")]).port, 4000);
    }
}
