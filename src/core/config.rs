use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Host the subscriber server listens on
    pub host: String,
    /// Port the subscriber server listens on (0 picks an ephemeral port)
    pub port: u16,
    /// Frames that must agree before the stable gesture changes
    pub history_length: usize,
    /// Thumb-to-index distance below which a frame counts as a pinch
    pub pinch_threshold: f32,
    /// Palm-to-fingertip distance every fingertip must exceed for an open palm
    pub open_palm_threshold: f32,
    /// Maximum hands requested from the landmark model
    pub max_hands: usize,
    /// JPEG quality of the preview image (1-100)
    pub jpeg_quality: u8,
    /// Pause between frames of the producer loop, in milliseconds
    pub frame_interval_ms: u64,
    /// Messages buffered per subscriber before it is considered backlogged
    pub subscriber_queue_capacity: usize,
    /// Upper bound on a single write to a subscriber, in milliseconds
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8765,
            history_length: 5,
            pinch_threshold: 0.06,
            open_palm_threshold: 0.15,
            max_hands: 1,
            jpeg_quality: 50,
            frame_interval_ms: 10, // Keeps an idle source from spinning a core
            subscriber_queue_capacity: 16,
            write_timeout_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it with defaults if missing
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a file, creating it with defaults if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a file
    pub fn save_to(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.host.trim().is_empty() {
            return Err("Host cannot be empty".into());
        }

        if self.history_length == 0 || self.history_length > 120 {
            return Err(format!(
                "Invalid history length: {}. Must be between 1 and 120 frames",
                self.history_length
            )
            .into());
        }

        if !(self.pinch_threshold > 0.0 && self.pinch_threshold <= 1.0) {
            return Err(format!(
                "Invalid pinch threshold: {}. Must be in (0.0, 1.0]",
                self.pinch_threshold
            )
            .into());
        }

        if !(self.open_palm_threshold > 0.0 && self.open_palm_threshold <= 1.0) {
            return Err(format!(
                "Invalid open palm threshold: {}. Must be in (0.0, 1.0]",
                self.open_palm_threshold
            )
            .into());
        }

        if self.max_hands == 0 || self.max_hands > 4 {
            return Err(format!(
                "Invalid max hands: {}. Must be between 1 and 4",
                self.max_hands
            )
            .into());
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!(
                "Invalid JPEG quality: {}. Must be between 1 and 100",
                self.jpeg_quality
            )
            .into());
        }

        if self.frame_interval_ms > 1000 {
            return Err(format!(
                "Invalid frame interval: {}ms. Must be at most 1000ms",
                self.frame_interval_ms
            )
            .into());
        }

        if self.subscriber_queue_capacity == 0 || self.subscriber_queue_capacity > 1024 {
            return Err(format!(
                "Invalid subscriber queue capacity: {}. Must be between 1 and 1024",
                self.subscriber_queue_capacity
            )
            .into());
        }

        if self.write_timeout_ms == 0 || self.write_timeout_ms > 60_000 {
            return Err(format!(
                "Invalid write timeout: {}ms. Must be between 1 and 60000ms",
                self.write_timeout_ms
            )
            .into());
        }

        Ok(())
    }

    /// Reset the default config file to defaults
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    /// Address the subscriber server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".handcast");
        path.push("settings.json");

        Ok(path)
    }
}
