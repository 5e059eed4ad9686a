//! Field schema of content entities
//!
//! Each page type and site setting declares its fields once. The admin
//! builds its edit forms from the schema, and [`validate_record`] checks a
//! serialized entity against it before anything is stored.

use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;
use vitrine_forms::validators::{validate_email, validate_email_list, validate_max_length};

use crate::blocks::{BlockLibrary, StreamField};
use crate::error::ValidationErrors;
use crate::rich_text::RichText;

static SLUG_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[-\w]+$").expect("SLUG_REGEX: invalid regex pattern"));

const REQUIRED: &str = "This field is required.";

/// Entity a foreign key points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationTarget {
	Image,
	Page,
}

/// What happens to the referencing field when the target is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
	Cascade,
	SetNull,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
	Char { max_length: usize },
	Text,
	RichText,
	Email,
	/// Comma-separated email addresses
	EmailList { max_length: usize },
	Slug { max_length: usize },
	ForeignKey { target: RelationTarget, on_delete: OnDelete },
	Stream { block_types: Vec<&'static str> },
}

/// Declaration of one entity field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
	pub name: &'static str,
	pub verbose_name: &'static str,
	#[serde(flatten)]
	pub kind: FieldKind,
	/// Whether an empty value is accepted
	pub blank: bool,
	pub default: Option<&'static str>,
	pub help_text: &'static str,
}

impl FieldSchema {
	fn new(name: &'static str, verbose_name: &'static str, kind: FieldKind) -> Self {
		Self {
			name,
			verbose_name,
			kind,
			blank: false,
			default: None,
			help_text: "",
		}
	}

	pub fn char(name: &'static str, verbose_name: &'static str, max_length: usize) -> Self {
		Self::new(name, verbose_name, FieldKind::Char { max_length })
	}

	pub fn text(name: &'static str, verbose_name: &'static str) -> Self {
		Self::new(name, verbose_name, FieldKind::Text)
	}

	pub fn rich_text(name: &'static str, verbose_name: &'static str) -> Self {
		Self::new(name, verbose_name, FieldKind::RichText)
	}

	pub fn email(name: &'static str, verbose_name: &'static str) -> Self {
		Self::new(name, verbose_name, FieldKind::Email)
	}

	pub fn email_list(name: &'static str, verbose_name: &'static str, max_length: usize) -> Self {
		Self::new(name, verbose_name, FieldKind::EmailList { max_length })
	}

	pub fn slug(name: &'static str, verbose_name: &'static str, max_length: usize) -> Self {
		Self::new(name, verbose_name, FieldKind::Slug { max_length })
	}

	/// Nullable link to an image, unset when the image is deleted
	pub fn image(name: &'static str, verbose_name: &'static str) -> Self {
		Self::new(
			name,
			verbose_name,
			FieldKind::ForeignKey {
				target: RelationTarget::Image,
				on_delete: OnDelete::SetNull,
			},
		)
		.blank()
	}

	/// Nullable link to a page, unset when the page is deleted
	pub fn page(name: &'static str, verbose_name: &'static str) -> Self {
		Self::new(
			name,
			verbose_name,
			FieldKind::ForeignKey {
				target: RelationTarget::Page,
				on_delete: OnDelete::SetNull,
			},
		)
		.blank()
	}

	pub fn stream(
		name: &'static str,
		verbose_name: &'static str,
		block_types: Vec<&'static str>,
	) -> Self {
		Self::new(name, verbose_name, FieldKind::Stream { block_types })
	}

	pub fn blank(mut self) -> Self {
		self.blank = true;
		self
	}

	pub fn with_default(mut self, default: &'static str) -> Self {
		self.default = Some(default);
		self
	}

	pub fn with_help_text(mut self, help_text: &'static str) -> Self {
		self.help_text = help_text;
		self
	}

	/// Check one value; messages are returned in the order found
	pub fn check(&self, value: Option<&JsonValue>, library: &BlockLibrary) -> ValidationErrors {
		let mut errors = ValidationErrors::new();
		let value = value.unwrap_or(&JsonValue::Null);

		match &self.kind {
			FieldKind::ForeignKey { .. } => {
				if value.is_null() && !self.blank {
					errors.add(self.name, REQUIRED);
				}
			}
			FieldKind::Stream { block_types } => {
				self.check_stream(value, block_types, library, &mut errors);
			}
			kind => {
				let Some(text) = value.as_str().or(value.is_null().then_some("")) else {
					errors.add(self.name, "Expected a text value.");
					return errors;
				};
				let empty = match kind {
					FieldKind::RichText => RichText::new(text).is_blank(),
					_ => text.trim().is_empty(),
				};
				if empty {
					if !self.blank {
						errors.add(self.name, REQUIRED);
					}
					return errors;
				}
				self.check_text(kind, text, &mut errors);
			}
		}
		errors
	}

	fn check_text(&self, kind: &FieldKind, text: &str, errors: &mut ValidationErrors) {
		let max_length = match kind {
			FieldKind::Char { max_length }
			| FieldKind::EmailList { max_length }
			| FieldKind::Slug { max_length } => Some(*max_length),
			_ => None,
		};
		if let Some(max_length) = max_length
			&& let Err(e) = validate_max_length(text, max_length)
		{
			errors.add(self.name, e.to_string());
		}
		if matches!(kind, FieldKind::Char { .. }) && text.contains(['\r', '\n']) {
			errors.add(self.name, "Line breaks are not allowed.");
		}

		let format = match kind {
			FieldKind::Email => validate_email(text.trim()).map_err(|e| e.to_string()),
			FieldKind::EmailList { .. } => validate_email_list(text).map_err(|e| e.to_string()),
			FieldKind::Slug { .. } if !SLUG_REGEX.is_match(text) => Err(
				"Enter a valid slug consisting of letters, numbers, underscores or hyphens."
					.to_string(),
			),
			_ => Ok(()),
		};
		if let Err(message) = format {
			errors.add(self.name, message);
		}
	}

	fn check_stream(
		&self,
		value: &JsonValue,
		block_types: &[&'static str],
		library: &BlockLibrary,
		errors: &mut ValidationErrors,
	) {
		let stream: StreamField = if value.is_null() {
			StreamField::new()
		} else {
			match serde_json::from_value(value.clone()) {
				Ok(stream) => stream,
				Err(e) => {
					errors.add(self.name, format!("Invalid stream data: {}", e));
					return;
				}
			}
		};

		if stream.is_empty() {
			if !self.blank {
				errors.add(self.name, REQUIRED);
			}
			return;
		}

		for (index, block) in stream.blocks().iter().enumerate() {
			if !block_types.contains(&block.block_type.as_str()) {
				errors.add(
					format!("{}.{}", self.name, index),
					format!("Block type not allowed here: {}", block.block_type),
				);
			}
		}
		if let Err(block_errors) = stream.validate(library) {
			for (index, block) in block_errors {
				errors.extend_prefixed(&format!("{}.{}", self.name, index), block);
			}
		}
	}
}

/// Validate a serialized record against its schema
///
/// Every field is checked; errors are collected rather than stopping at the
/// first one.
pub fn validate_record(
	fields: &[FieldSchema],
	record: &JsonValue,
	library: &BlockLibrary,
) -> Result<(), ValidationErrors> {
	let mut errors = ValidationErrors::new();
	for field in fields {
		errors.merge(field.check(record.get(field.name), library));
	}
	errors.into_result()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::formation::formation_library;
	use rstest::rstest;
	use serde_json::json;

	fn check(field: &FieldSchema, value: JsonValue) -> ValidationErrors {
		field.check(Some(&value), &formation_library())
	}

	#[rstest]
	fn test_char_field_required_and_max_length() {
		// Arrange
		let field = FieldSchema::char("hero_title", "Titre principal", 5);

		// Act & Assert
		assert!(check(&field, json!("")).contains("hero_title"));
		assert!(check(&field, json!(null)).contains("hero_title"));
		assert!(check(&field, json!("abcde")).is_empty());
		assert!(check(&field, json!("abcdef")).contains("hero_title"));
	}

	#[rstest]
	#[case("Nouveau message\nBcc: tous@exemple.com")]
	#[case("Nouveau message\r")]
	fn test_char_field_rejects_line_breaks(#[case] value: &str) {
		// Arrange
		let field = FieldSchema::char("subject", "Sujet", 255);

		// Act
		let errors = check(&field, json!(value));

		// Assert
		assert!(errors.contains("subject"));
	}

	#[rstest]
	fn test_blank_field_accepts_empty() {
		let field = FieldSchema::char("hero_kicker", "Petit texte", 150).blank();
		assert!(check(&field, json!("")).is_empty());
	}

	#[rstest]
	#[case("contact@exemple.com", true)]
	#[case("a@exemple.com, b@exemple.com", true)]
	#[case("a@exemple.com, b", false)]
	fn test_email_list(#[case] value: &str, #[case] valid: bool) {
		let field = FieldSchema::email_list("to_address", "Destinataires", 255);
		assert_eq!(check(&field, json!(value)).is_empty(), valid);
	}

	#[rstest]
	#[case("nos-formations", true)]
	#[case("à-propos", true)]
	#[case("nos formations", false)]
	fn test_slug(#[case] value: &str, #[case] valid: bool) {
		let field = FieldSchema::slug("slug", "Slug", 255);
		assert_eq!(check(&field, json!(value)).is_empty(), valid);
	}

	#[rstest]
	fn test_required_rich_text_rejects_empty_markup() {
		let field = FieldSchema::rich_text("body", "Texte");
		assert!(check(&field, json!("<p><br/></p>")).contains("body"));
	}

	#[rstest]
	fn test_stream_errors_are_keyed_by_block_index() {
		// Arrange
		let field = FieldSchema::stream("formations", "Formations", vec!["formation"]).blank();
		let value = json!([
			{ "type": "formation", "value": { "title": "Couture" }, "id": "a" },
			{ "type": "formation", "value": { "title": "" }, "id": "b" },
		]);

		// Act
		let errors = check(&field, value);

		// Assert
		assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["formations.1.title"]);
	}

	#[rstest]
	fn test_validate_record_collects_all_fields() {
		// Arrange
		let fields = vec![
			FieldSchema::char("title", "Titre", 255),
			FieldSchema::email("from_address", "Expéditeur"),
		];
		let record = json!({ "title": "", "from_address": "nope" });

		// Act
		let errors = validate_record(&fields, &record, &BlockLibrary::new()).unwrap_err();

		// Assert
		assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["title", "from_address"]);
	}
}
