//! Form building tests
//!
//! Definitions go in, a validating form comes out.

use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};
use std::collections::HashMap;
use vitrine_forms::{
	FieldType, FormBuilder, FormFieldDefinition, WidgetKind, clean_name, display_value,
	help_text_as_placeholder, validate_definitions,
};

fn inscription_definitions() -> Vec<FormFieldDefinition> {
	vec![
		FormFieldDefinition::new("Prénom", FieldType::SingleLine).with_help_text("Votre prénom"),
		FormFieldDefinition::new("Adresse e-mail", FieldType::Email)
			.with_help_text("nom@exemple.com"),
		FormFieldDefinition::new("Atelier", FieldType::Radio).with_choices("Couture\nCuisine"),
		FormFieldDefinition::new("Disponibilités", FieldType::Checkboxes)
			.with_choices("Matin, Après-midi")
			.optional(),
		FormFieldDefinition::new("J'ai lu la charte", FieldType::Checkbox),
	]
}

fn data(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), v.clone()))
		.collect()
}

#[rstest]
fn test_built_fields_keep_definition_order_and_names() {
	// Arrange
	let definitions = inscription_definitions();

	// Act
	let form = FormBuilder::new(&definitions).build();

	// Assert
	let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
	assert_eq!(
		names,
		vec![
			"prenom",
			"adresse_e_mail",
			"atelier",
			"disponibilites",
			"j_ai_lu_la_charte"
		]
	);
	assert_eq!(form.field("atelier").map(|f| f.widget.kind), Some(WidgetKind::RadioSelect));
	assert!(validate_definitions(&definitions).is_ok());
}

#[rstest]
fn test_placeholder_transform_applies_to_every_field_with_help_text() {
	// Arrange
	let definitions = inscription_definitions();

	// Act
	let form = FormBuilder::new(&definitions)
		.with_transform(help_text_as_placeholder)
		.build();

	// Assert
	let placeholders: Vec<Option<&str>> = form
		.fields()
		.iter()
		.map(|f| f.widget.attr("placeholder"))
		.collect();
	assert_eq!(
		placeholders,
		vec![
			Some("Votre prénom"),
			Some("nom@exemple.com"),
			None,
			None,
			None
		]
	);
}

#[rstest]
fn test_transforms_run_in_registration_order() {
	// Arrange
	let definitions = vec![
		FormFieldDefinition::new("Nom", FieldType::SingleLine).with_help_text("Votre nom"),
	];

	// Act
	let form = FormBuilder::new(&definitions)
		.with_transform(help_text_as_placeholder)
		.with_transform(|mut field| {
			let upper = field.widget.attr("placeholder").map(str::to_uppercase);
			if let Some(upper) = upper {
				field.widget.set_attr("placeholder", upper);
			}
			field
		})
		.build();

	// Assert
	assert_eq!(form.fields()[0].widget.attr("placeholder"), Some("VOTRE NOM"));
}

#[rstest]
fn test_valid_submission_cleans_every_field() {
	// Arrange
	let definitions = inscription_definitions();
	let mut form = FormBuilder::new(&definitions).build();
	form.bind(data(&[
		("prenom", json!("  Fatou ")),
		("adresse_e_mail", json!("fatou@exemple.com")),
		("atelier", json!("Cuisine")),
		("disponibilites", json!(["Matin", "Après-midi"])),
		("j_ai_lu_la_charte", json!("on")),
	]));

	// Act
	let valid = form.is_valid();

	// Assert
	assert!(valid, "errors: {:?}", form.errors());
	let cleaned = form.cleaned_data();
	assert_eq!(cleaned["prenom"], json!("Fatou"));
	assert_eq!(display_value(&cleaned["disponibilites"]), "Matin, Après-midi");
	assert_eq!(display_value(&cleaned["j_ai_lu_la_charte"]), "True");
}

#[rstest]
fn test_invalid_submission_collects_one_error_per_field() {
	// Arrange
	let definitions = inscription_definitions();
	let mut form = FormBuilder::new(&definitions).build();
	form.bind(data(&[
		("adresse_e_mail", json!("fatou")),
		("atelier", json!("Jardinage")),
	]));

	// Act
	let valid = form.is_valid();

	// Assert
	assert!(!valid);
	let mut fields: Vec<&str> = form.errors().keys().map(String::as_str).collect();
	fields.sort_unstable();
	assert_eq!(
		fields,
		vec!["adresse_e_mail", "atelier", "j_ai_lu_la_charte", "prenom"]
	);
	assert!(form.cleaned_data().contains_key("disponibilites"));
}

proptest! {
	#[test]
	fn prop_clean_name_is_snake_case_and_idempotent(label in "[A-Za-zéèàçÉ0-9 ?'-]{1,40}") {
		// Act
		let name = clean_name(&label);

		// Assert
		prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
		prop_assert!(!name.starts_with('_') && !name.ends_with('_'));
		prop_assert!(!name.contains("__"));
		prop_assert_eq!(clean_name(&name), name);
	}

	#[test]
	fn prop_single_line_accepts_up_to_255_characters(len in 1usize..400) {
		// Arrange
		let definitions = vec![FormFieldDefinition::new("Nom", FieldType::SingleLine)];
		let mut form = FormBuilder::new(&definitions).build();
		form.bind(data(&[("nom", json!("é".repeat(len)))]));

		// Act
		let valid = form.is_valid();

		// Assert
		prop_assert_eq!(valid, len <= 255);
	}
}
