//! Typed settings and the builder that merges sources into them

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};

/// Minimum length of the session signing secret, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Invalid(String),
}

impl From<SettingsError> for finlog_core::Error {
	fn from(err: SettingsError) -> Self {
		finlog_core::Error::Internal(err.to_string())
	}
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Address the HTTP server binds to
	pub bind_address: String,
	/// SQLite connection URL
	pub database_url: String,
	/// Directory holding file-origin posts
	pub content_dir: PathBuf,
	/// HMAC key for admin session tokens
	pub session_secret: Option<String>,
	/// Bearer secret expected by the auto-post endpoint
	pub auto_post_secret: Option<String>,
	/// Turns on the `Secure` cookie flag
	#[serde(deserialize_with = "deserialize_flag")]
	pub production: bool,
	/// Admin account provisioned when the user table is empty
	pub admin_username: String,
	pub admin_password: String,
	pub admin_display_name: String,
	/// Endpoint notified after content changes
	pub revalidate_url: Option<String>,
	pub revalidate_secret: Option<String>,
	/// Default tracing filter when `RUST_LOG` is unset
	pub log_level: String,
	pub log_format: LogFormat,
	/// Public base URL of the site
	pub site_url: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			bind_address: "127.0.0.1:3000".to_string(),
			database_url: "sqlite://finlog.db?mode=rwc".to_string(),
			content_dir: PathBuf::from("content/posts"),
			session_secret: None,
			auto_post_secret: None,
			production: false,
			admin_username: "admin".to_string(),
			admin_password: "admin1234".to_string(),
			admin_display_name: "관리자".to_string(),
			revalidate_url: None,
			revalidate_secret: None,
			log_level: "info".to_string(),
			log_format: LogFormat::Pretty,
			site_url: "http://localhost:3000".to_string(),
		}
	}
}

impl Settings {
	/// Checks the settings the server cannot run without.
	///
	/// # Examples
	///
	/// ```
	/// use finlog_conf::Settings;
	///
	/// let mut settings = Settings::default();
	/// assert!(settings.validate_for_serve().is_err());
	///
	/// settings.session_secret = Some("x".repeat(32));
	/// assert!(settings.validate_for_serve().is_ok());
	/// ```
	pub fn validate_for_serve(&self) -> Result<(), SettingsError> {
		let secret = self
			.session_secret
			.as_deref()
			.map(str::trim)
			.unwrap_or_default();
		if secret.is_empty() {
			return Err(SettingsError::Invalid(
				"session_secret must be set".to_string(),
			));
		}
		if secret.len() < MIN_SESSION_SECRET_LEN {
			return Err(SettingsError::Invalid(format!(
				"session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
			)));
		}
		if self.bind_address.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"bind_address must not be empty".to_string(),
			));
		}
		Ok(())
	}

	/// The session secret as bytes; empty when unset.
	pub fn session_secret_bytes(&self) -> &[u8] {
		self.session_secret.as_deref().unwrap_or_default().as_bytes()
	}
}

/// A boolean given either natively (TOML) or as text (environment)
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Flag {
		Bool(bool),
		Text(String),
	}

	match Flag::deserialize(deserializer)? {
		Flag::Bool(value) => Ok(value),
		Flag::Text(text) => match text.trim().to_lowercase().as_str() {
			"true" | "yes" | "on" | "1" => Ok(true),
			"false" | "no" | "off" | "0" => Ok(false),
			other => Err(de::Error::custom(format!("expected a boolean, got {other:?}"))),
		},
	}
}

/// Merges configuration sources into [`Settings`]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Start from the built-in defaults
	pub fn new() -> Self {
		Self {
			sources: vec![Box::new(DefaultSource::new())],
		}
	}

	/// Add an arbitrary source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Layer a TOML file (ignored if missing)
	pub fn toml_file(self, path: impl Into<PathBuf>) -> Self {
		self.add_source(TomlFileSource::new(path))
	}

	/// Layer process environment variables with the given prefix
	pub fn env_prefix(self, prefix: impl Into<String>) -> Self {
		self.add_source(EnvSource::new(prefix))
	}

	/// Merge every source by priority and deserialize.
	pub fn build(self) -> Result<Settings, SettingsError> {
		let mut sources = self.sources;
		sources.sort_by_key(|s| s.priority());

		let mut merged: IndexMap<String, Value> = IndexMap::new();
		for source in &sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "loaded settings source");
			merged.extend(values);
		}

		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		serde_json::from_value(Value::Object(object))
			.map_err(|e| SettingsError::Invalid(e.to_string()))
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}
