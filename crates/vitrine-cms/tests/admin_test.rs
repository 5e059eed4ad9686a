//! Tests for admin page type metadata

use rstest::rstest;
use vitrine_cms::admin::{AdminPageRegistry, Panel, PageTypeDescriptor};
use vitrine_cms::error::CmsError;
use vitrine_cms::formation::{FORMATION_BLOCK_TYPE, formation_library};
use vitrine_cms::schema::FieldSchema;

#[rstest]
fn test_default_registry_has_four_page_types() {
	let registry = AdminPageRegistry::with_default_page_types().unwrap();

	let names: Vec<&str> = registry.type_names().collect();

	assert_eq!(
		names,
		vec!["home_page", "formations_page", "about_page", "contact_page"]
	);
}

#[rstest]
fn test_home_edit_schema_groups_hero_fields() {
	// Arrange
	let registry = AdminPageRegistry::with_default_page_types().unwrap();

	// Act
	let schema = registry.edit_schema("home_page").unwrap();

	// Assert
	assert_eq!(schema.label, "Page d'accueil");
	assert_eq!(schema.fields[0].name, "title");
	assert_eq!(schema.fields[1].name, "slug");
	let Panel::MultiField { heading, children } = &schema.content_panels[1] else {
		panic!("expected the hero group");
	};
	assert_eq!(*heading, "Section hero (bandeau principal)");
	assert_eq!(children.len(), 8);
	assert_eq!(children[5], Panel::page_chooser("hero_primary_button_page"));
	assert_eq!(schema.promote_panels, vec![Panel::field("slug")]);
	assert!(schema.submissions_panels.is_empty());
}

#[rstest]
fn test_contact_edit_schema_has_form_fields_and_submissions() {
	// Arrange
	let registry = AdminPageRegistry::with_default_page_types().unwrap();

	// Act
	let schema = registry.edit_schema("contact_page").unwrap();

	// Assert
	assert!(
		schema
			.content_panels
			.contains(&Panel::inline("form_fields", "Champs du formulaire"))
	);
	assert_eq!(schema.submissions_panels, vec![Panel::FormSubmissions]);
}

#[rstest]
fn test_edit_schema_serializes_for_the_admin() {
	// Arrange
	let registry = AdminPageRegistry::with_default_page_types().unwrap();
	let schema = registry.edit_schema("formations_page").unwrap();

	// Act
	let json = serde_json::to_value(&schema).unwrap();

	// Assert
	let stream = json["fields"]
		.as_array()
		.unwrap()
		.iter()
		.find(|f| f["name"] == "formations")
		.unwrap();
	assert_eq!(stream["kind"], "stream");
	assert_eq!(stream["block_types"][0], FORMATION_BLOCK_TYPE);
	assert_eq!(json["content_panels"][0]["panel"], "field");
}

#[rstest]
fn test_unknown_type_has_no_schema() {
	let registry = AdminPageRegistry::with_default_page_types().unwrap();

	assert!(registry.edit_schema("blog_page").is_none());
	assert!(registry.get("blog_page").is_none());
}

struct BrokenPageType {
	panels: Vec<Panel>,
}

impl PageTypeDescriptor for BrokenPageType {
	fn type_name(&self) -> &str {
		"broken_page"
	}

	fn label(&self) -> &str {
		"Broken"
	}

	fn icon(&self) -> &str {
		"warning"
	}

	fn fields(&self) -> Vec<FieldSchema> {
		vec![FieldSchema::char("title", "Titre", 255)]
	}

	fn content_panels(&self) -> Vec<Panel> {
		self.panels.clone()
	}

	fn promote_panels(&self) -> Vec<Panel> {
		Vec::new()
	}

	fn submissions_panels(&self) -> Vec<Panel> {
		Vec::new()
	}

	fn relations(&self) -> Vec<&'static str> {
		Vec::new()
	}
}

#[rstest]
#[case(vec![Panel::field("subtitle")])]
#[case(vec![Panel::field("title"), Panel::multi("Groupe", vec![Panel::field("title")])])]
#[case(vec![Panel::inline("form_fields", "Champs")])]
fn test_register_rejects_inconsistent_layout(#[case] panels: Vec<Panel>) {
	// Arrange
	let mut registry = AdminPageRegistry::new();

	// Act
	let result = registry.register(BrokenPageType { panels });

	// Assert
	assert!(matches!(result, Err(CmsError::Generic(_))));
	assert!(registry.get("broken_page").is_none());
}

#[rstest]
fn test_formation_block_metadata() {
	let library = formation_library();

	let meta = library.meta(FORMATION_BLOCK_TYPE).unwrap();

	assert_eq!(meta.label, "Formation");
	assert_eq!(meta.icon, "cog");
	assert_eq!(
		meta.help_text,
		"Bloc réutilisable pour présenter une formation avec une image."
	);
}
