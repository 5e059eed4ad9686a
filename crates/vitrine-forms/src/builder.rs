//! Turn field definitions into concrete form fields
//!
//! Building runs in two steps: every definition is mapped to a
//! [`BuiltField`] (widget, choices, initial value), then each registered
//! transform is applied in order. Transforms only touch presentation; the
//! cleaning rules of a field come from its [`FieldType`] alone.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::definition::{FormFieldDefinition, parse_choices};
use crate::field::{FieldError, FieldResult, FieldType, SINGLE_LINE_MAX_LENGTH};
use crate::form::Form;
use crate::validators::{validate_email, validate_max_length, validate_url};
use crate::widget::Widget;

const DATE_INPUT_FORMATS: [&str; 2] = [
	"%Y-%m-%d", // 2025-01-15
	"%d/%m/%Y", // 15/01/2025
];

const DATETIME_INPUT_FORMATS: [&str; 6] = [
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%d %H:%M",
	"%d/%m/%Y %H:%M:%S",
	"%d/%m/%Y %H:%M",
];

/// A post-processing step applied to every built field
pub type FieldTransform = Box<dyn Fn(BuiltField) -> BuiltField + Send + Sync>;

/// A field ready for rendering and validation
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltField {
	/// Key of the submitted value
	pub name: String,
	pub label: String,
	pub field_type: FieldType,
	pub required: bool,
	pub choices: Vec<String>,
	pub initial: Option<Value>,
	pub help_text: String,
	pub widget: Widget,
}

impl BuiltField {
	pub fn from_definition(definition: &FormFieldDefinition) -> Self {
		let field_type = definition.field_type;
		let mut widget = Widget::new(field_type.widget_kind());
		if field_type == FieldType::SingleLine {
			widget.set_attr("maxlength", SINGLE_LINE_MAX_LENGTH.to_string());
		}
		if definition.required && field_type != FieldType::Checkboxes {
			widget.set_attr("required", "required");
		}

		Self {
			name: definition.clean_name(),
			label: definition.label.trim().to_string(),
			field_type,
			required: definition.required,
			choices: definition.choice_list(),
			initial: initial_value(field_type, &definition.default_value),
			help_text: definition.help_text.clone(),
			widget,
		}
	}

	/// Validate and normalize a submitted value
	///
	/// Missing optional values clean to an empty string, `false`, an empty
	/// list or `null` depending on the field type.
	pub fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		match self.field_type {
			FieldType::SingleLine | FieldType::Hidden => {
				let text = self.clean_text(value)?;
				validate_max_length(&text, SINGLE_LINE_MAX_LENGTH)?;
				Ok(Value::String(text))
			}
			FieldType::MultiLine => Ok(Value::String(self.clean_text(value)?)),
			FieldType::Email => {
				let text = self.clean_text(value)?;
				if !text.is_empty() {
					validate_email(&text)?;
				}
				Ok(Value::String(text))
			}
			FieldType::Url => {
				let text = self.clean_text(value)?;
				if !text.is_empty() {
					validate_url(&text)?;
				}
				Ok(Value::String(text))
			}
			FieldType::Number => self.clean_number(value),
			FieldType::Checkbox => self.clean_checkbox(value),
			FieldType::Dropdown | FieldType::Radio => {
				let text = self.clean_text(value)?;
				if !text.is_empty() && !self.choices.contains(&text) {
					return Err(FieldError::InvalidChoice(text));
				}
				Ok(Value::String(text))
			}
			FieldType::Checkboxes | FieldType::MultiSelect => self.clean_multiple(value),
			FieldType::Date => self.clean_temporal(value, |s| {
				DATE_INPUT_FORMATS
					.iter()
					.find_map(|f| NaiveDate::parse_from_str(s, f).ok())
					.map(|d| d.format("%Y-%m-%d").to_string())
					.ok_or_else(|| FieldError::Validation("Enter a valid date.".to_string()))
			}),
			FieldType::DateTime => self.clean_temporal(value, |s| {
				DATETIME_INPUT_FORMATS
					.iter()
					.find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
					.map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
					.ok_or_else(|| FieldError::Validation("Enter a valid date/time.".to_string()))
			}),
		}
	}

	fn clean_text(&self, value: Option<&Value>) -> FieldResult<String> {
		let text = match value {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.trim().to_string(),
			Some(Value::Number(n)) => n.to_string(),
			Some(Value::Bool(b)) => b.to_string(),
			Some(_) => {
				return Err(FieldError::Validation(
					"Value must be a string".to_string(),
				));
			}
		};
		if text.is_empty() && self.required {
			return Err(FieldError::Required);
		}
		Ok(text)
	}

	fn clean_number(&self, value: Option<&Value>) -> FieldResult<Value> {
		let number = match value {
			Some(Value::Number(n)) => n.as_f64(),
			Some(Value::String(s)) if !s.trim().is_empty() => {
				Some(s.trim().parse::<f64>().map_err(|_| {
					FieldError::Validation("Enter a number.".to_string())
				})?)
			}
			None | Some(Value::Null) | Some(Value::String(_)) => None,
			Some(_) => return Err(FieldError::Validation("Enter a number.".to_string())),
		};
		match number {
			Some(n) if n.is_finite() => Ok(serde_json::Number::from_f64(n)
				.map(Value::Number)
				.unwrap_or(Value::Null)),
			Some(_) => Err(FieldError::Validation("Enter a number.".to_string())),
			None if self.required => Err(FieldError::Required),
			None => Ok(Value::Null),
		}
	}

	fn clean_checkbox(&self, value: Option<&Value>) -> FieldResult<Value> {
		let checked = match value {
			Some(Value::Bool(b)) => *b,
			Some(Value::String(s)) => {
				matches!(s.trim().to_lowercase().as_str(), "on" | "true" | "1" | "yes")
			}
			Some(Value::Number(n)) => n.as_i64() == Some(1),
			_ => false,
		};
		if !checked && self.required {
			return Err(FieldError::Required);
		}
		Ok(Value::Bool(checked))
	}

	fn clean_multiple(&self, value: Option<&Value>) -> FieldResult<Value> {
		let selected: Vec<String> = match value {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
			Some(Value::String(s)) => vec![s.trim().to_string()],
			Some(Value::Array(items)) => items
				.iter()
				.map(|item| match item {
					Value::String(s) => Ok(s.trim().to_string()),
					other => Err(FieldError::InvalidChoice(other.to_string())),
				})
				.collect::<FieldResult<_>>()?,
			Some(_) => {
				return Err(FieldError::Validation(
					"Enter a list of values.".to_string(),
				));
			}
		};
		if selected.is_empty() && self.required {
			return Err(FieldError::Required);
		}
		if let Some(invalid) = selected.iter().find(|s| !self.choices.contains(s)) {
			return Err(FieldError::InvalidChoice(invalid.clone()));
		}
		Ok(Value::Array(selected.into_iter().map(Value::String).collect()))
	}

	fn clean_temporal<F>(&self, value: Option<&Value>, parse: F) -> FieldResult<Value>
	where
		F: Fn(&str) -> FieldResult<String>,
	{
		let text = self.clean_text(value)?;
		if text.is_empty() {
			return Ok(Value::Null);
		}
		parse(&text).map(Value::String)
	}
}

fn initial_value(field_type: FieldType, default_value: &str) -> Option<Value> {
	let default_value = default_value.trim();
	if default_value.is_empty() {
		return None;
	}
	let value = match field_type {
		FieldType::Checkboxes | FieldType::MultiSelect => Value::Array(
			parse_choices(default_value)
				.into_iter()
				.map(Value::String)
				.collect(),
		),
		FieldType::Checkbox => Value::Bool(matches!(
			default_value.to_lowercase().as_str(),
			"on" | "true" | "1" | "yes"
		)),
		_ => Value::String(default_value.to_string()),
	};
	Some(value)
}

/// Use a field's help text as the placeholder of its input
///
/// Fields without help text are returned unchanged.
pub fn help_text_as_placeholder(mut field: BuiltField) -> BuiltField {
	if !field.help_text.is_empty() {
		let help_text = field.help_text.clone();
		field.widget.set_attr("placeholder", help_text);
	}
	field
}

/// Builds a [`Form`] from stored definitions
pub struct FormBuilder<'a> {
	definitions: &'a [FormFieldDefinition],
	transforms: Vec<FieldTransform>,
}

impl<'a> FormBuilder<'a> {
	pub fn new(definitions: &'a [FormFieldDefinition]) -> Self {
		Self {
			definitions,
			transforms: Vec::new(),
		}
	}

	/// Append a transform; transforms run in registration order
	pub fn with_transform<F>(mut self, transform: F) -> Self
	where
		F: Fn(BuiltField) -> BuiltField + Send + Sync + 'static,
	{
		self.transforms.push(Box::new(transform));
		self
	}

	pub fn build_fields(&self) -> Vec<BuiltField> {
		self.definitions
			.iter()
			.map(BuiltField::from_definition)
			.map(|field| self.transforms.iter().fold(field, |f, t| t(f)))
			.collect()
	}

	pub fn build(self) -> Form {
		Form::new(self.build_fields())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::widget::WidgetKind;
	use rstest::rstest;
	use serde_json::json;

	fn field(definition: FormFieldDefinition) -> BuiltField {
		BuiltField::from_definition(&definition)
	}

	#[rstest]
	fn test_single_line_required_and_length() {
		// Arrange
		let f = field(FormFieldDefinition::new("Nom", FieldType::SingleLine));

		// Act & Assert
		assert_eq!(f.clean(None), Err(FieldError::Required));
		assert_eq!(f.clean(Some(&json!("   "))), Err(FieldError::Required));
		assert_eq!(f.clean(Some(&json!(" Alice "))), Ok(json!("Alice")));
		assert!(f.clean(Some(&json!("a".repeat(256)))).is_err());
		assert_eq!(f.widget.attr("maxlength"), Some("255"));
	}

	#[rstest]
	fn test_optional_empty_values_per_type() {
		// Arrange
		let cases = [
			(FieldType::SingleLine, json!("")),
			(FieldType::Email, json!("")),
			(FieldType::Number, Value::Null),
			(FieldType::Checkbox, json!(false)),
			(FieldType::Date, Value::Null),
		];

		for (field_type, expected) in cases {
			let f = field(FormFieldDefinition::new("Champ", field_type).optional());

			// Act
			let cleaned = f.clean(None);

			// Assert
			assert_eq!(cleaned, Ok(expected), "field type {}", field_type);
		}
	}

	#[rstest]
	#[case(json!("marie@exemple.com"), true)]
	#[case(json!("marie@"), false)]
	fn test_email_field(#[case] value: Value, #[case] valid: bool) {
		let f = field(FormFieldDefinition::new("Email", FieldType::Email));
		assert_eq!(f.clean(Some(&value)).is_ok(), valid);
	}

	#[rstest]
	#[case(json!(42), Ok(json!(42.0)))]
	#[case(json!("3.5"), Ok(json!(3.5)))]
	#[case(json!("trois"), Err(FieldError::Validation("Enter a number.".to_string())))]
	fn test_number_field(#[case] value: Value, #[case] expected: FieldResult<Value>) {
		let f = field(FormFieldDefinition::new("Âge", FieldType::Number));
		assert_eq!(f.clean(Some(&value)), expected);
	}

	#[rstest]
	fn test_required_checkbox_must_be_checked() {
		// Arrange
		let f = field(FormFieldDefinition::new("J'accepte", FieldType::Checkbox));

		// Act & Assert
		assert_eq!(f.clean(Some(&json!("on"))), Ok(json!(true)));
		assert_eq!(f.clean(None), Err(FieldError::Required));
	}

	#[rstest]
	fn test_dropdown_membership() {
		// Arrange
		let f = field(
			FormFieldDefinition::new("Formation", FieldType::Dropdown)
				.with_choices("Couture, Informatique"),
		);

		// Act & Assert
		assert_eq!(f.clean(Some(&json!("Couture"))), Ok(json!("Couture")));
		assert_eq!(
			f.clean(Some(&json!("Cuisine"))),
			Err(FieldError::InvalidChoice("Cuisine".to_string()))
		);
		assert_eq!(f.widget.kind, WidgetKind::Select);
	}

	#[rstest]
	fn test_checkboxes_accept_subset_and_reject_unknown() {
		// Arrange
		let f = field(
			FormFieldDefinition::new("Disponibilités", FieldType::Checkboxes)
				.with_choices("Lundi\nMardi\nMercredi"),
		);

		// Act & Assert
		assert_eq!(
			f.clean(Some(&json!(["Lundi", "Mercredi"]))),
			Ok(json!(["Lundi", "Mercredi"]))
		);
		assert_eq!(f.clean(Some(&json!("Mardi"))), Ok(json!(["Mardi"])));
		assert!(matches!(
			f.clean(Some(&json!(["Dimanche"]))),
			Err(FieldError::InvalidChoice(_))
		));
		assert_eq!(f.clean(Some(&json!([]))), Err(FieldError::Required));
	}

	#[rstest]
	#[case(json!("2025-03-08"), Ok(json!("2025-03-08")))]
	#[case(json!("08/03/2025"), Ok(json!("2025-03-08")))]
	#[case(json!("2025-02-30"), Err(FieldError::Validation("Enter a valid date.".to_string())))]
	fn test_date_field(#[case] value: Value, #[case] expected: FieldResult<Value>) {
		let f = field(FormFieldDefinition::new("Date", FieldType::Date));
		assert_eq!(f.clean(Some(&value)), expected);
	}

	#[rstest]
	fn test_datetime_field_normalizes() {
		let f = field(FormFieldDefinition::new("Rendez-vous", FieldType::DateTime));
		assert_eq!(
			f.clean(Some(&json!("2025-03-08 14:30"))),
			Ok(json!("2025-03-08T14:30:00"))
		);
	}

	#[rstest]
	fn test_initial_value_from_default() {
		// Arrange
		let multi = field(
			FormFieldDefinition::new("Jours", FieldType::MultiSelect)
				.with_choices("Lundi, Mardi")
				.with_default("Lundi, Mardi"),
		);
		let text = field(FormFieldDefinition::new("Ville", FieldType::SingleLine).with_default("Lyon"));

		// Assert
		assert_eq!(multi.initial, Some(json!(["Lundi", "Mardi"])));
		assert_eq!(text.initial, Some(json!("Lyon")));
	}

	#[rstest]
	fn test_placeholder_transform_only_touches_fields_with_help_text() {
		// Arrange
		let with_help =
			field(FormFieldDefinition::new("Nom", FieldType::SingleLine).with_help_text("Votre nom"));
		let without_help = field(FormFieldDefinition::new("Email", FieldType::Email));

		// Act
		let with_help = help_text_as_placeholder(with_help);
		let unchanged = help_text_as_placeholder(without_help.clone());

		// Assert
		assert_eq!(with_help.widget.attr("placeholder"), Some("Votre nom"));
		assert_eq!(unchanged, without_help);
	}
}
