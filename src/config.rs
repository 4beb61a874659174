use std::path::PathBuf;

const PINS_FILE: &str = "pins.json";
const CHANNEL_BUFFER: usize = 64;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub pins_file: PathBuf,
    pub channel_buffer: usize,
}

impl AppConfig {
    /// Reads `PINS_FILE` and `FEED_CHANNEL_BUFFER`, falling back to defaults.
    /// A `.env` file is honoured in debug builds.
    pub fn from_env() -> Self {
        if cfg!(debug_assertions) {
            dotenv::dotenv().ok();
        }

        let pins_file = std::env::var("PINS_FILE").unwrap_or_else(|_| PINS_FILE.to_string());
        let channel_buffer = std::env::var("FEED_CHANNEL_BUFFER")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|buffer| *buffer > 0)
            .unwrap_or(CHANNEL_BUFFER);

        Self {
            pins_file: PathBuf::from(pins_file),
            channel_buffer,
        }
    }

    pub async fn read_pins_file(&self) -> Result<String, ConfigError> {
        tokio::fs::read_to_string(&self.pins_file)
            .await
            .map_err(|e| ConfigError::Io(format!("{}: {}", self.pins_file.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        std::env::remove_var("PINS_FILE");
        std::env::remove_var("FEED_CHANNEL_BUFFER");

        let config = AppConfig::from_env();
        assert_eq!(config.pins_file, PathBuf::from(PINS_FILE));
        assert_eq!(config.channel_buffer, CHANNEL_BUFFER);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        std::env::set_var("PINS_FILE", "/tmp/other-pins.json");
        std::env::set_var("FEED_CHANNEL_BUFFER", "8");

        let config = AppConfig::from_env();
        assert_eq!(config.pins_file, PathBuf::from("/tmp/other-pins.json"));
        assert_eq!(config.channel_buffer, 8);

        std::env::set_var("FEED_CHANNEL_BUFFER", "0");
        assert_eq!(AppConfig::from_env().channel_buffer, CHANNEL_BUFFER);

        std::env::remove_var("PINS_FILE");
        std::env::remove_var("FEED_CHANNEL_BUFFER");
    }

    #[tokio::test]
    async fn test_read_missing_pins_file() {
        let config = AppConfig {
            pins_file: PathBuf::from("/nonexistent/pins.json"),
            channel_buffer: 1,
        };
        assert!(matches!(config.read_pins_file().await, Err(ConfigError::Io(_))));
    }
}
