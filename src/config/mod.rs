// Configuration module entry point
// Loads the immutable process configuration from file, environment, and defaults

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StaticConfig};

impl Config {
    /// Load configuration from the default `config.toml` (if present)
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, later ones winning: code defaults, the config file, then
    /// `SERVER_*` environment variables (`SERVER_STATIC_FILES__ROOT_DIR` etc.).
    /// The result is constructed once at startup and never mutated.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("static_files.root_dir", "dist")?
            .set_default("static_files.url_prefix", "")?
            .set_default("static_files.show_index", true)?
            .set_default(
                "static_files.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .build()?;

        settings.try_deserialize()
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

    #[test]
    fn test_defaults() {
        // A config file name that does not exist falls back to code defaults
        let cfg = Config::load_from("no-such-config-file").expect("defaults should load");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.static_files.root_dir, "dist");
        assert_eq!(cfg.static_files.url_prefix, "");
        assert!(cfg.static_files.show_index);
        assert_eq!(
            cfg.static_files.index_files,
            vec!["index.html".to_string(), "index.htm".to_string()]
        );
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("no-such-config-file").expect("defaults should load");
        let addr = cfg.get_socket_addr().expect("valid address");
        assert_eq!(addr.port(), 8080);
    }
}
