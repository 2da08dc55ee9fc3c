use std::env;
use std::path::PathBuf;

/// Default listen port when neither the CLI flag nor the environment
/// variable supplies one.
pub const DEFAULT_PORT: &str = "8080";

/// Environment variable consulted when `--port` is not given.
pub const PORT_ENV: &str = "MOCKBIRD_PORT";

/// Server configuration: where to listen and which document to serve.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port, a string of decimal digits.
    pub port: String,
    /// Path to the OpenAPI document.
    pub spec_path: PathBuf,
}

impl Config {
    /// Build a configuration from CLI arguments with environment fallback.
    pub fn new(spec_path: PathBuf, port: Option<String>) -> anyhow::Result<Self> {
        let port = port
            .or_else(|| env::var(PORT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_PORT.to_string());
        anyhow::ensure!(
            !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
            "invalid port {port:?}: expected decimal digits"
        );
        Ok(Self { port, spec_path })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let config = Config::new(PathBuf::from("api.yaml"), None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_explicit_port() {
        let config = Config::new(PathBuf::from("api.yaml"), Some("4000".to_string())).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:4000");
    }

    #[test]
    fn test_non_numeric_port_rejected() {
        assert!(Config::new(PathBuf::from("api.yaml"), Some("http".to_string())).is_err());
        assert!(Config::new(PathBuf::from("api.yaml"), Some("".to_string())).is_err());
    }
}
