//! Form processing and validation for vitrine
//!
//! Editors describe a form as an ordered list of [`FormFieldDefinition`]s
//! (label, type, required flag, choices, default value, help text). At
//! request time a [`FormBuilder`] turns those definitions into concrete
//! fields with widgets, runs any presentation transforms such as
//! [`help_text_as_placeholder`], and yields a [`Form`] that validates
//! submitted data.
//!
//! ```
//! use vitrine_forms::{FieldType, FormBuilder, FormFieldDefinition, help_text_as_placeholder};
//! use std::collections::HashMap;
//! use serde_json::json;
//!
//! let definitions = vec![
//!     FormFieldDefinition::new("Votre nom", FieldType::SingleLine).with_help_text("Marie Curie"),
//!     FormFieldDefinition::new("Email", FieldType::Email),
//! ];
//!
//! let mut form = FormBuilder::new(&definitions)
//!     .with_transform(help_text_as_placeholder)
//!     .build();
//! assert_eq!(form.fields()[0].widget.attr("placeholder"), Some("Marie Curie"));
//!
//! let mut data = HashMap::new();
//! data.insert("votre_nom".to_string(), json!("Marie"));
//! data.insert("email".to_string(), json!("marie@exemple.com"));
//! form.bind(data);
//! assert!(form.is_valid());
//! ```

pub mod builder;
pub mod definition;
pub mod field;
pub mod form;
pub mod validators;
pub mod widget;

pub use builder::{BuiltField, FieldTransform, FormBuilder, help_text_as_placeholder};
pub use definition::{DefinitionError, FormFieldDefinition, clean_name, parse_choices, validate_definitions};
pub use field::{FieldError, FieldResult, FieldType};
pub use form::{ALL_FIELDS_KEY, Form, FormError, FormResult, display_value};
pub use widget::{Widget, WidgetKind};
