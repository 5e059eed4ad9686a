use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

use crate::builder::BuiltField;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
	#[error("Form has not been bound to any data")]
	Unbound,
	#[error("Form is invalid: {} field(s) with errors", errors.len())]
	Invalid { errors: IndexMap<String, Vec<String>> },
}

pub type FormResult<T> = Result<T, FormError>;

/// Special key for form-level (non-field-specific) errors.
pub const ALL_FIELDS_KEY: &str = "_all";

/// A built form, optionally bound to submitted data
///
/// Cleaned data and errors are keyed by field name and kept in field order.
#[derive(Debug, Clone)]
pub struct Form {
	fields: Vec<BuiltField>,
	data: HashMap<String, Value>,
	cleaned_data: IndexMap<String, Value>,
	errors: IndexMap<String, Vec<String>>,
	is_bound: bool,
}

impl Form {
	pub fn new(fields: Vec<BuiltField>) -> Self {
		Self {
			fields,
			data: HashMap::new(),
			cleaned_data: IndexMap::new(),
			errors: IndexMap::new(),
			is_bound: false,
		}
	}

	/// Bind submitted data; previous validation results are discarded
	pub fn bind(&mut self, data: HashMap<String, Value>) {
		self.data = data;
		self.cleaned_data.clear();
		self.errors.clear();
		self.is_bound = true;
	}

	/// Validate the bound data and return true if every field is valid
	///
	/// # Examples
	///
	/// ```
	/// use vitrine_forms::{FieldType, FormBuilder, FormFieldDefinition};
	/// use std::collections::HashMap;
	///
	/// let definitions = vec![FormFieldDefinition::new("Nom", FieldType::SingleLine)];
	/// let mut form = FormBuilder::new(&definitions).build();
	/// assert!(!form.is_valid());
	///
	/// form.bind(HashMap::new());
	/// assert!(!form.is_valid());
	/// assert_eq!(form.errors()["nom"], vec!["This field is required."]);
	/// ```
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}

		self.cleaned_data.clear();
		self.errors.clear();

		for field in &self.fields {
			match field.clean(self.data.get(&field.name)) {
				Ok(cleaned) => {
					self.cleaned_data.insert(field.name.clone(), cleaned);
				}
				Err(e) => {
					self.errors
						.entry(field.name.clone())
						.or_default()
						.push(e.to_string());
				}
			}
		}

		self.errors.is_empty()
	}

	/// Validate and hand back the cleaned data, or the collected errors
	pub fn validate(&mut self) -> FormResult<&IndexMap<String, Value>> {
		if !self.is_bound {
			return Err(FormError::Unbound);
		}
		if self.is_valid() {
			Ok(&self.cleaned_data)
		} else {
			Err(FormError::Invalid {
				errors: self.errors.clone(),
			})
		}
	}

	pub fn cleaned_data(&self) -> &IndexMap<String, Value> {
		&self.cleaned_data
	}
	pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
		&self.errors
	}
	pub fn is_bound(&self) -> bool {
		self.is_bound
	}
	pub fn fields(&self) -> &[BuiltField] {
		&self.fields
	}
	pub fn field(&self, name: &str) -> Option<&BuiltField> {
		self.fields.iter().find(|f| f.name == name)
	}
}

/// Human-readable rendering of a cleaned value
///
/// Lists are joined with `", "`, booleans render as `True`/`False` and
/// `null` as an empty string.
///
/// # Examples
///
/// ```
/// use vitrine_forms::form::display_value;
/// use serde_json::json;
///
/// assert_eq!(display_value(&json!(["Lundi", "Mardi"])), "Lundi, Mardi");
/// assert_eq!(display_value(&json!(true)), "True");
/// assert_eq!(display_value(&json!("Bonjour")), "Bonjour");
/// ```
pub fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(true) => "True".to_string(),
		Value::Bool(false) => "False".to_string(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items
			.iter()
			.map(display_value)
			.collect::<Vec<_>>()
			.join(", "),
		other => other.to_string(),
	}
}
