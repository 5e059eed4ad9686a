//! Editor-side description of a form field
//!
//! A definition is what the admin stores; it says nothing about widgets or
//! how values are cleaned. [`crate::FormBuilder`] derives those from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::field::FieldType;

/// Maximum length of a field label and of its help text
pub const LABEL_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
	#[error("The field label is required.")]
	EmptyLabel,
	#[error("Label \"{0}\" is longer than 255 characters.")]
	LabelTooLong(String),
	#[error("Help text of \"{0}\" is longer than 255 characters.")]
	HelpTextTooLong(String),
	#[error("Label \"{0}\" does not produce a usable field name.")]
	UnusableLabel(String),
	#[error("Field \"{0}\" needs at least one choice.")]
	MissingChoices(String),
	#[error("There is another field with the label \"{0}\", please change one of them.")]
	DuplicateName(String),
}

/// One field of an editor-defined form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFieldDefinition {
	pub label: String,
	pub field_type: FieldType,
	#[serde(default = "default_required")]
	pub required: bool,
	/// Comma- or newline-separated options for choice fields
	#[serde(default)]
	pub choices: String,
	#[serde(default)]
	pub default_value: String,
	#[serde(default)]
	pub help_text: String,
}

fn default_required() -> bool {
	true
}

impl FormFieldDefinition {
	/// A required field with no choices, default or help text
	pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			label: label.into(),
			field_type,
			required: true,
			choices: String::new(),
			default_value: String::new(),
			help_text: String::new(),
		}
	}

	pub fn optional(mut self) -> Self {
		self.required = false;
		self
	}

	pub fn with_choices(mut self, choices: impl Into<String>) -> Self {
		self.choices = choices.into();
		self
	}

	pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
		self.default_value = default_value.into();
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = help_text.into();
		self
	}

	/// Machine name derived from the label; key of submitted data
	pub fn clean_name(&self) -> String {
		clean_name(&self.label)
	}

	pub fn choice_list(&self) -> Vec<String> {
		parse_choices(&self.choices)
	}

	/// Check this definition on its own
	pub fn validate(&self) -> Result<(), DefinitionError> {
		let label = self.label.trim();
		if label.is_empty() {
			return Err(DefinitionError::EmptyLabel);
		}
		if label.chars().count() > LABEL_MAX_LENGTH {
			return Err(DefinitionError::LabelTooLong(label.to_string()));
		}
		if self.help_text.chars().count() > LABEL_MAX_LENGTH {
			return Err(DefinitionError::HelpTextTooLong(label.to_string()));
		}
		if self.clean_name().is_empty() {
			return Err(DefinitionError::UnusableLabel(label.to_string()));
		}
		if self.field_type.uses_choices() && self.choice_list().is_empty() {
			return Err(DefinitionError::MissingChoices(label.to_string()));
		}
		Ok(())
	}
}

/// Check a whole form: every definition, and no two sharing a clean name
pub fn validate_definitions(definitions: &[FormFieldDefinition]) -> Result<(), DefinitionError> {
	let mut seen = HashSet::new();
	for definition in definitions {
		definition.validate()?;
		if !seen.insert(definition.clean_name()) {
			return Err(DefinitionError::DuplicateName(
				definition.label.trim().to_string(),
			));
		}
	}
	Ok(())
}

/// Split choice text into options
///
/// Newlines separate options when present, commas otherwise. Options are
/// trimmed and blank ones dropped.
///
/// # Examples
///
/// ```
/// use vitrine_forms::parse_choices;
///
/// assert_eq!(parse_choices("Oui, Non"), vec!["Oui", "Non"]);
/// assert_eq!(parse_choices("Lundi, matin\nMardi"), vec!["Lundi, matin", "Mardi"]);
/// assert!(parse_choices("  ").is_empty());
/// ```
pub fn parse_choices(text: &str) -> Vec<String> {
	let separator = if text.contains('\n') { '\n' } else { ',' };
	text.split(separator)
		.map(str::trim)
		.filter(|c| !c.is_empty())
		.map(str::to_string)
		.collect()
}

/// Snake-case machine name of a label
///
/// Accented Latin letters are folded to ASCII, every run of other
/// non-alphanumeric characters becomes a single `_`.
///
/// # Examples
///
/// ```
/// use vitrine_forms::clean_name;
///
/// assert_eq!(clean_name("Prénom"), "prenom");
/// assert_eq!(clean_name("Votre e-mail"), "votre_e_mail");
/// assert_eq!(clean_name("  Téléphone (optionnel) "), "telephone_optionnel");
/// ```
pub fn clean_name(label: &str) -> String {
	let mut name = String::with_capacity(label.len());
	let mut pending_separator = false;
	for c in label.chars().flat_map(fold_char) {
		if c.is_alphanumeric() {
			if pending_separator && !name.is_empty() {
				name.push('_');
			}
			pending_separator = false;
			name.extend(c.to_lowercase());
		} else {
			pending_separator = true;
		}
	}
	name
}

fn fold_char(c: char) -> Vec<char> {
	let folded: &str = match c {
		'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
		'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
		'æ' => "ae",
		'Æ' => "AE",
		'ç' => "c",
		'Ç' => "C",
		'è' | 'é' | 'ê' | 'ë' => "e",
		'È' | 'É' | 'Ê' | 'Ë' => "E",
		'ì' | 'í' | 'î' | 'ï' => "i",
		'Ì' | 'Í' | 'Î' | 'Ï' => "I",
		'ñ' => "n",
		'Ñ' => "N",
		'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
		'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
		'œ' => "oe",
		'Œ' => "OE",
		'ù' | 'ú' | 'û' | 'ü' => "u",
		'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
		'ý' | 'ÿ' => "y",
		'Ý' | 'Ÿ' => "Y",
		'ß' => "ss",
		_ => return vec![c],
	};
	folded.chars().collect()
}
