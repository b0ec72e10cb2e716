//! Climate API Core Library
//!
//! Shared pieces for the climate service:
//! - Configuration loading (XDG-compliant)
//! - File system checks for the dataset

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::is_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_PORT: u16 = 9900;

/// Default location of the pre-populated dataset
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Default read pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
