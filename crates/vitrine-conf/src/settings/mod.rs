//! Typed application settings
//!
//! Every section carries defaults so that an empty configuration produces a
//! working development setup (console mail backend, `info` logging).

pub mod builder;
pub mod sources;

use serde::{Deserialize, Serialize};
use std::path::Path;

use builder::{SettingsBuilder, SettingsError};
use sources::{EnvSource, TomlFileSource};

/// Environment variable prefix read by [`Settings::load`].
pub const ENV_PREFIX: &str = "VITRINE_";

/// Root settings object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Development mode flag
	pub debug: bool,

	/// Default site served by this deployment
	pub site: SiteConfig,

	/// Outgoing email configuration
	pub email: EmailSettings,

	/// Log output configuration
	pub logging: LoggingSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: false,
			site: SiteConfig::default(),
			email: EmailSettings::default(),
			logging: LoggingSettings::default(),
		}
	}
}

impl Settings {
	/// Load settings from defaults, an optional TOML file and `VITRINE_*`
	/// environment variables.
	///
	/// A missing file is not an error; a malformed one is.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut builder = SettingsBuilder::new();
		if let Some(path) = path {
			builder = builder.add_source(TomlFileSource::optional(path));
		}
		builder
			.add_source(EnvSource::new().with_prefix(ENV_PREFIX))
			.build()
	}

	/// Check cross-field constraints that serde cannot express.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.site.hostname.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"site.hostname must not be empty".to_string(),
			));
		}
		if self.email.backend.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"email.backend must not be empty".to_string(),
			));
		}
		if !self.email.default_from_email.contains('@') {
			return Err(SettingsError::Invalid(format!(
				"email.default_from_email is not an address: {}",
				self.email.default_from_email
			)));
		}
		if self.logging.filter.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"logging.filter must not be empty".to_string(),
			));
		}
		Ok(())
	}
}

/// Default site served by this deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
	pub hostname: String,
	pub port: u16,
	pub site_name: String,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			hostname: "localhost".to_string(),
			port: 80,
			site_name: "Femmes Solidaires".to_string(),
		}
	}
}

/// How contact-form emails are handed to the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
	/// Send while the submission request waits
	#[default]
	Inline,
	/// Queue on the async runtime once the submission is stored
	Background,
}

/// Outgoing email configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
	/// Backend name: `console` or `memory`
	pub backend: String,

	/// Sender used when a message has no explicit from address
	pub default_from_email: String,

	pub dispatch: DispatchMode,
}

impl Default for EmailSettings {
	fn default() -> Self {
		Self {
			backend: "console".to_string(),
			default_from_email: "noreply@monsite.com".to_string(),
			dispatch: DispatchMode::Inline,
		}
	}
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// `EnvFilter` directive used when `RUST_LOG` is unset
	pub filter: String,

	/// Colored output
	pub ansi: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			ansi: true,
		}
	}
}
