//! Merge configuration sources into [`Settings`]

use serde_json::{Map, Value};

use super::Settings;
use super::sources::{ConfigSource, DefaultSource, SourceError};

/// Errors raised while assembling settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("{description}: {source}")]
	Source {
		description: String,
		#[source]
		source: SourceError,
	},

	#[error("Invalid settings value: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid settings: {0}")]
	Invalid(String),
}

/// Builder merging sources by priority, lowest first
///
/// A [`DefaultSource`] is always present, so sources only need to carry the
/// keys they override. Objects are merged key by key; any other value
/// replaces what a lower-priority source provided.
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self {
			sources: vec![Box::new(DefaultSource::new())],
		}
	}

	/// Add a configuration source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge every source into a single JSON object
	pub fn merged(&self) -> Result<Value, SettingsError> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		ordered.sort_by_key(|s| s.priority());

		let mut merged = Value::Object(Map::new());
		for source in ordered {
			let values = source.load().map_err(|source_error| SettingsError::Source {
				description: source.description(),
				source: source_error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "merging settings source");
			for (key, value) in values {
				let mut layer = Map::new();
				layer.insert(key, value);
				merge_values(&mut merged, Value::Object(layer));
			}
		}
		Ok(merged)
	}

	/// Build and validate the settings
	pub fn build(self) -> Result<Settings, SettingsError> {
		let merged = self.merged()?;
		let settings: Settings = serde_json::from_value(merged)?;
		settings.validate()?;
		Ok(settings)
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn merge_values(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base_map), Value::Object(overlay_map)) => {
			for (key, value) in overlay_map {
				match base_map.get_mut(&key) {
					Some(existing) => merge_values(existing, value),
					None => {
						base_map.insert(key, value);
					}
				}
			}
		}
		(base, overlay) => *base = overlay,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_merge_values_is_deep() {
		// Arrange
		let mut base = json!({ "email": { "backend": "console", "dispatch": "inline" } });

		// Act
		merge_values(&mut base, json!({ "email": { "backend": "memory" } }));

		// Assert
		assert_eq!(base, json!({ "email": { "backend": "memory", "dispatch": "inline" } }));
	}

	#[rstest]
	fn test_builder_with_only_defaults() {
		// Act
		let settings = SettingsBuilder::new().build().unwrap();

		// Assert
		assert_eq!(settings, Settings::default());
	}

	#[rstest]
	fn test_higher_priority_source_wins_regardless_of_insertion_order() {
		// Arrange
		struct Fixed(u8, &'static str);
		impl ConfigSource for Fixed {
			fn load(&self) -> Result<indexmap::IndexMap<String, Value>, SourceError> {
				let mut map = indexmap::IndexMap::new();
				map.insert("site".to_string(), json!({ "site_name": self.1 }));
				Ok(map)
			}
			fn priority(&self) -> u8 {
				self.0
			}
			fn description(&self) -> String {
				format!("fixed {}", self.0)
			}
		}

		// Act
		let settings = SettingsBuilder::new()
			.add_source(Fixed(90, "high"))
			.add_source(Fixed(10, "low"))
			.build()
			.unwrap();

		// Assert
		assert_eq!(settings.site.site_name, "high");
	}
}
