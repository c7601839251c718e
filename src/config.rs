use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub intervals: IntervalConfig,
    pub grafana: GrafanaConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub directory: String,
    pub debug_file: String,
    pub info_file: String,
    pub warn_file: String,
    pub error_file: String,
    pub console_level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub pin: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IntervalConfig {
    pub poll_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GrafanaConfig {
    pub base_url: String,
    pub dashboard_path: String,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_example(path: &str) -> Result<()> {
        let example_config = Config {
            logging: LoggingConfig {
                directory: "./logs".to_string(),
                debug_file: "log_debug.log".to_string(),
                info_file: "log_info.log".to_string(),
                warn_file: "log_warn.log".to_string(),
                error_file: "log_error.log".to_string(),
                console_level: "warn".to_string(),
            },
            server: ServerConfig {
                base_url: "http://localhost:8000".to_string(),
                pin: "REPLACE_WITH_YOUR_OPERATOR_PIN".to_string(),
            },
            intervals: IntervalConfig { poll_seconds: 1 },
            grafana: GrafanaConfig {
                base_url: "http://localhost:3000".to_string(),
                dashboard_path: "/d-solo/iot-dashboard/iot-system-dashboard".to_string(),
            },
        };

        let toml_content = toml::to_string_pretty(&example_config)?;
        fs::write(path, toml_content)?;
        Ok(())
    }
}
