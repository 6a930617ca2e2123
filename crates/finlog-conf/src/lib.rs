//! # finlog-conf
//!
//! Settings are assembled from layered sources, lowest priority first:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. a TOML file (missing file is tolerated)
//! 3. environment variables with the `FINLOG_` prefix
//!
//! ```rust,no_run
//! use finlog_conf::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .toml_file("finlog.toml")
//!     .env_prefix("FINLOG_")
//!     .build()
//!     .unwrap();
//! println!("listening on {}", settings.bind_address);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{LogFormat, Settings, SettingsBuilder, SettingsError};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};

/// Environment variable prefix used by the binary.
pub const ENV_PREFIX: &str = "FINLOG_";

/// Environment variable naming the TOML settings file.
pub const CONFIG_PATH_ENV: &str = "FINLOG_CONFIG";
