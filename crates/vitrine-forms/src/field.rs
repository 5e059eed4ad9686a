//! Field types offered to editors and field-level errors

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::widget::WidgetKind;

/// Maximum length of single-line answers
pub const SINGLE_LINE_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("This field is required.")]
	Required,
	#[error("{0}")]
	Validation(String),
	#[error("Select a valid choice. {0} is not one of the available choices.")]
	InvalidChoice(String),
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Kind of input an editor can add to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	SingleLine,
	MultiLine,
	Email,
	Number,
	Url,
	Checkbox,
	Checkboxes,
	Dropdown,
	MultiSelect,
	Radio,
	Date,
	DateTime,
	Hidden,
}

impl FieldType {
	pub const ALL: [FieldType; 13] = [
		FieldType::SingleLine,
		FieldType::MultiLine,
		FieldType::Email,
		FieldType::Number,
		FieldType::Url,
		FieldType::Checkbox,
		FieldType::Checkboxes,
		FieldType::Dropdown,
		FieldType::MultiSelect,
		FieldType::Radio,
		FieldType::Date,
		FieldType::DateTime,
		FieldType::Hidden,
	];

	/// Stored identifier, e.g. `singleline`
	pub fn as_str(&self) -> &'static str {
		match self {
			FieldType::SingleLine => "singleline",
			FieldType::MultiLine => "multiline",
			FieldType::Email => "email",
			FieldType::Number => "number",
			FieldType::Url => "url",
			FieldType::Checkbox => "checkbox",
			FieldType::Checkboxes => "checkboxes",
			FieldType::Dropdown => "dropdown",
			FieldType::MultiSelect => "multiselect",
			FieldType::Radio => "radio",
			FieldType::Date => "date",
			FieldType::DateTime => "datetime",
			FieldType::Hidden => "hidden",
		}
	}

	/// Label shown in the field-type picker of the admin
	pub fn label(&self) -> &'static str {
		match self {
			FieldType::SingleLine => "Single line text",
			FieldType::MultiLine => "Multi-line text",
			FieldType::Email => "Email",
			FieldType::Number => "Number",
			FieldType::Url => "URL",
			FieldType::Checkbox => "Checkbox",
			FieldType::Checkboxes => "Checkboxes",
			FieldType::Dropdown => "Drop down",
			FieldType::MultiSelect => "Multiple select",
			FieldType::Radio => "Radio buttons",
			FieldType::Date => "Date",
			FieldType::DateTime => "Date/time",
			FieldType::Hidden => "Hidden field",
		}
	}

	/// Whether the field draws its values from `choices`
	pub fn uses_choices(&self) -> bool {
		matches!(
			self,
			FieldType::Checkboxes | FieldType::Dropdown | FieldType::MultiSelect | FieldType::Radio
		)
	}

	/// Whether the cleaned value is a list
	pub fn is_multiple(&self) -> bool {
		matches!(self, FieldType::Checkboxes | FieldType::MultiSelect)
	}

	pub fn widget_kind(&self) -> WidgetKind {
		match self {
			FieldType::SingleLine => WidgetKind::TextInput,
			FieldType::MultiLine => WidgetKind::Textarea,
			FieldType::Email => WidgetKind::EmailInput,
			FieldType::Number => WidgetKind::NumberInput,
			FieldType::Url => WidgetKind::UrlInput,
			FieldType::Checkbox => WidgetKind::CheckboxInput,
			FieldType::Checkboxes => WidgetKind::CheckboxSelectMultiple,
			FieldType::Dropdown => WidgetKind::Select,
			FieldType::MultiSelect => WidgetKind::SelectMultiple,
			FieldType::Radio => WidgetKind::RadioSelect,
			FieldType::Date => WidgetKind::DateInput,
			FieldType::DateTime => WidgetKind::DateTimeInput,
			FieldType::Hidden => WidgetKind::HiddenInput,
		}
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
