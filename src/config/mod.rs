// Configuration module entry point
// Loads layered configuration and holds the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig,
    StoreConfig,
};

/// Default config file name (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `TRACKER_STORE__PATH`
const ENV_PREFIX: &str = "TRACKER";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest precedence first: struct defaults, the config file,
    /// `TRACKER_*` environment variables, then a bare `PORT` variable.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse::<u16>().ok());

        config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port.map(i64::from))?
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let cfg = from_toml("");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.store.path.is_none());
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.static_files.index_file, "views/index.html");
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let cfg = from_toml(
            r#"
            [server]
            port = 8080

            [store]
            path = "data/tracker.json"

            [logging]
            access_log_format = "json"
            "#,
        );
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.store.path.as_deref(), Some("data/tracker.json"));
        assert_eq!(cfg.logging.access_log_format, "json");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.performance.read_timeout, 30);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3000);

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
