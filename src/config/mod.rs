//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::game::SimConfig;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Human readable or JSON log lines
    pub log_format: LogFormat,

    /// Allowed client origins for CORS (comma-separated, `*` for any)
    pub client_origin: String,
    /// Built client directory served at `/` when set
    pub static_dir: Option<PathBuf>,

    /// Max inbound frames per second per connection
    pub input_rate_limit: u32,
    /// Capacity of the relay broadcast channel
    pub relay_buffer: usize,

    /// Run the in-process headless display session
    pub headless_display: bool,
    /// Simulation parameters for the headless display
    pub sim: SimConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string())
        };

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        let mut sim = SimConfig::default();
        sim.world_width = world_dimension("WORLD_WIDTH", sim.world_width)?;
        sim.world_height = world_dimension("WORLD_HEIGHT", sim.world_height)?;
        sim.seed = parse_opt("SIM_SEED")?;

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format,

            client_origin: env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),

            input_rate_limit: parse_or("INPUT_RATE_LIMIT", 120)?,
            relay_buffer: parse_or("RELAY_BUFFER", 256)?,

            headless_display: parse_or("HEADLESS_DISPLAY", true)?,
            sim,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            client_origin: "*".to_string(),
            static_dir: None,
            input_rate_limit: 120,
            relay_buffer: 256,
            headless_display: true,
            sim: SimConfig::default(),
        }
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_opt(name)?.unwrap_or(default))
}

/// World sizes must be finite and positive; `f32` parsing accepts `inf` and `NaN`
fn world_dimension(name: &'static str, default: f32) -> Result<f32, ConfigError> {
    let value: f32 = parse_or(name, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid(name));
    }
    Ok(value)
}

fn parse_opt<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
