//! Configuration sources for the layered settings system
//!
//! Each source yields a map of top-level keys to JSON values. The builder
//! merges them in priority order (environment variables > TOML file >
//! defaults).

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

use super::Settings;

/// Separator for nested keys in environment variable names
/// (`VITRINE_EMAIL__BACKEND` targets `email.backend`).
const NESTING_SEPARATOR: &str = "__";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Missing configuration file: {0}")]
	MissingFile(PathBuf),
}

/// Built-in defaults of [`Settings`]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create a source holding the defaults of [`Settings`]
	pub fn new() -> Self {
		let values = match serde_json::to_value(Settings::default()) {
			Ok(Value::Object(map)) => map.into_iter().collect(),
			_ => IndexMap::new(),
		};
		Self { values }
	}

	/// Override a single top-level value
	///
	/// # Examples
	///
	/// ```
	/// use vitrine_conf::{ConfigSource, DefaultSource};
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new().with_value("debug", Value::Bool(true));
	/// assert_eq!(source.load().unwrap()["debug"], Value::Bool(true));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// A file that must exist
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	/// A file that is skipped when absent
	pub fn optional(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			if self.required {
				return Err(SourceError::MissingFile(self.path.clone()));
			}
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable configuration source
///
/// With prefix `VITRINE_`, `VITRINE_DEBUG=true` sets `debug` and
/// `VITRINE_EMAIL__BACKEND=memory` sets `email.backend`.
pub struct EnvSource {
	prefix: Option<String>,
}

impl EnvSource {
	/// Create a source reading every environment variable
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Only read variables starting with `prefix`, which is stripped
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn parse_value(raw: &str) -> Value {
		match raw.trim().to_lowercase().as_str() {
			"true" | "yes" | "on" => return Value::Bool(true),
			"false" | "no" | "off" => return Value::Bool(false),
			_ => {}
		}
		if let Ok(num) = raw.trim().parse::<i64>() {
			return Value::Number(num.into());
		}
		Value::String(raw.to_string())
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config: IndexMap<String, Value> = IndexMap::new();

		for (key, value) in std::env::vars() {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(stripped) => stripped,
					None => continue,
				},
				None => key.as_str(),
			};
			if clean_key.is_empty() {
				continue;
			}

			let path: Vec<String> = clean_key
				.to_lowercase()
				.split(NESTING_SEPARATOR)
				.map(str::to_string)
				.collect();
			insert_path(&mut config, &path, Self::parse_value(&value));
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

fn insert_path(config: &mut IndexMap<String, Value>, path: &[String], value: Value) {
	match path {
		[] => {}
		[key] => {
			config.insert(key.clone(), value);
		}
		[head, rest @ ..] => {
			let entry = config
				.entry(head.clone())
				.or_insert_with(|| Value::Object(Map::new()));
			insert_nested(entry, rest, value);
		}
	}
}

fn insert_nested(target: &mut Value, path: &[String], value: Value) {
	if !target.is_object() {
		*target = Value::Object(Map::new());
	}
	let Value::Object(map) = target else {
		return;
	};
	match path {
		[] => {}
		[key] => {
			map.insert(key.clone(), value);
		}
		[head, rest @ ..] => {
			let entry = map
				.entry(head.clone())
				.or_insert_with(|| Value::Object(Map::new()));
			insert_nested(entry, rest, value);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("true", Value::Bool(true))]
	#[case("off", Value::Bool(false))]
	#[case("8080", Value::Number(8080.into()))]
	#[case("memory", Value::String("memory".to_string()))]
	fn test_env_value_parsing(#[case] raw: &str, #[case] expected: Value) {
		// Act
		let parsed = EnvSource::parse_value(raw);

		// Assert
		assert_eq!(parsed, expected);
	}

	#[rstest]
	fn test_insert_path_builds_nested_objects() {
		// Arrange
		let mut config = IndexMap::new();

		// Act
		insert_path(
			&mut config,
			&["email".to_string(), "backend".to_string()],
			Value::String("memory".to_string()),
		);
		insert_path(
			&mut config,
			&["email".to_string(), "dispatch".to_string()],
			Value::String("background".to_string()),
		);

		// Assert
		assert_eq!(
			config["email"],
			serde_json::json!({ "backend": "memory", "dispatch": "background" })
		);
	}

	#[rstest]
	fn test_default_source_mirrors_settings_defaults() {
		// Act
		let values = DefaultSource::new().load().unwrap();

		// Assert
		assert_eq!(values["email"]["backend"], "console");
		assert_eq!(values["logging"]["filter"], "info");
	}
}
