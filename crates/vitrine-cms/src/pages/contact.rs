use serde::{Deserialize, Serialize};
use vitrine_mail::validation::split_addresses;

use super::{AnyPage, ContentEntity, PageMeta};
use crate::admin::Panel;
use crate::rich_text::RichText;
use crate::schema::FieldSchema;

const INTRO_TITLE: &str = "Contact";
const INTRO_SUBTITLE: &str = "Un exemple de page contact avec un formulaire simple.";
const CONTACT_EMAIL: &str = "contact@exemple.com";
const CONTACT_ADDRESS: &str = "Adresse de votre entreprise";
const TO_ADDRESS: &str = "contact@exemple.com";
const FROM_ADDRESS: &str = "noreply@monsite.com";
const SUBJECT: &str = "Nouveau message depuis votre site vitrine";
const THANK_YOU_TEXT: &str = "Merci ! Votre message a bien été envoyé.";

/// Name of the inline form field collection
pub const FORM_FIELDS_RELATION: &str = "form_fields";

/// Contact details and an editor-defined form whose submissions are
/// stored and emailed
///
/// The form fields themselves are child records held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPage {
	#[serde(flatten)]
	pub meta: PageMeta,

	pub intro_title: String,
	pub intro_subtitle: String,
	pub contact_email: String,
	pub contact_phone: String,
	pub contact_address: String,
	/// Text shown above the form
	pub contact_text: RichText,

	/// Recipients, comma-separated
	pub to_address: String,
	pub from_address: String,
	pub subject: String,
	pub thank_you_text: RichText,
}

impl ContactPage {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			meta: PageMeta::new(title),
			intro_title: INTRO_TITLE.to_string(),
			intro_subtitle: INTRO_SUBTITLE.to_string(),
			contact_email: CONTACT_EMAIL.to_string(),
			contact_phone: String::new(),
			contact_address: CONTACT_ADDRESS.to_string(),
			contact_text: RichText::default(),
			to_address: TO_ADDRESS.to_string(),
			from_address: FROM_ADDRESS.to_string(),
			subject: SUBJECT.to_string(),
			thank_you_text: RichText::new(THANK_YOU_TEXT),
		}
	}

	/// Addresses listed in `to_address`
	pub fn recipients(&self) -> Vec<String> {
		split_addresses(&self.to_address)
	}
}

impl Default for ContactPage {
	fn default() -> Self {
		Self::new("")
	}
}

impl ContentEntity for ContactPage {
	const PAGE_TYPE: &'static str = "contact_page";
	const VERBOSE_NAME: &'static str = "Page Contact";
	const ICON: &'static str = "mail";

	fn meta(&self) -> &PageMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut PageMeta {
		&mut self.meta
	}

	fn fields() -> Vec<FieldSchema> {
		vec![
			FieldSchema::char("intro_title", "Titre principal", 150).with_default(INTRO_TITLE),
			FieldSchema::text("intro_subtitle", "Texte d’intro")
				.blank()
				.with_default(INTRO_SUBTITLE),
			FieldSchema::email("contact_email", "Email de contact")
				.blank()
				.with_default(CONTACT_EMAIL),
			FieldSchema::char("contact_phone", "Téléphone", 50).blank(),
			FieldSchema::char("contact_address", "Adresse", 255)
				.blank()
				.with_default(CONTACT_ADDRESS),
			FieldSchema::rich_text("contact_text", "Texte au-dessus du formulaire")
				.blank()
				.with_help_text("Ex : \"Utilisez ce formulaire comme base...\""),
			FieldSchema::email_list("to_address", "Adresse email qui recevra les messages", 255)
				.with_default(TO_ADDRESS)
				.with_help_text(
					"Les messages du formulaire seront envoyés à cette adresse. \
					 Séparez plusieurs adresses par une virgule.",
				),
			FieldSchema::email("from_address", "Adresse expéditeur")
				.with_default(FROM_ADDRESS)
				.with_help_text("Adresse utilisée comme expéditeur des emails."),
			FieldSchema::char("subject", "Sujet de l’email", 255).with_default(SUBJECT),
			FieldSchema::rich_text("thank_you_text", "Message de remerciement après envoi")
				.blank()
				.with_default(THANK_YOU_TEXT),
		]
	}

	fn content_panels() -> Vec<Panel> {
		vec![
			Panel::field("title"),
			Panel::multi(
				"Introduction",
				vec![
					Panel::field("intro_title"),
					Panel::field("intro_subtitle"),
					Panel::field("contact_text"),
				],
			),
			Panel::multi(
				"Coordonnées affichées",
				vec![
					Panel::field("contact_email"),
					Panel::field("contact_phone"),
					Panel::field("contact_address"),
				],
			),
			Panel::multi(
				"Configuration des emails",
				vec![
					Panel::field("to_address"),
					Panel::field("from_address"),
					Panel::field("subject"),
				],
			),
			Panel::inline(FORM_FIELDS_RELATION, "Champs du formulaire"),
			Panel::field("thank_you_text"),
		]
	}

	fn submissions_panels() -> Vec<Panel> {
		vec![Panel::FormSubmissions]
	}

	fn relations() -> Vec<&'static str> {
		vec![FORM_FIELDS_RELATION]
	}

	fn into_any(self) -> AnyPage {
		AnyPage::Contact(self)
	}

	fn from_any(page: AnyPage) -> Option<Self> {
		match page {
			AnyPage::Contact(page) => Some(page),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::blocks::BlockLibrary;
	use crate::error::CmsError;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		// Act
		let page = ContactPage::new("Contact");

		// Assert
		assert_eq!(page.to_address, "contact@exemple.com");
		assert_eq!(page.from_address, "noreply@monsite.com");
		assert_eq!(page.subject, "Nouveau message depuis votre site vitrine");
		assert_eq!(
			page.thank_you_text.as_html(),
			"Merci ! Votre message a bien été envoyé."
		);
		assert!(page.full_clean(&BlockLibrary::new()).is_ok());
	}

	#[rstest]
	fn test_recipients_split_on_commas() {
		// Arrange
		let mut page = ContactPage::new("Contact");
		page.to_address = "a@exemple.com, b@exemple.com".to_string();

		// Act & Assert
		assert_eq!(page.recipients(), vec!["a@exemple.com", "b@exemple.com"]);
	}

	#[rstest]
	#[case("to_address", "pas-une-adresse")]
	#[case("to_address", "")]
	#[case("from_address", "a@exemple.com, b@exemple.com")]
	#[case("contact_email", "contact(at)exemple.com")]
	fn test_address_fields_are_validated(#[case] field: &str, #[case] value: &str) {
		// Arrange
		let mut page = ContactPage::new("Contact");
		match field {
			"to_address" => page.to_address = value.to_string(),
			"from_address" => page.from_address = value.to_string(),
			_ => page.contact_email = value.to_string(),
		}

		// Act
		let result = page.full_clean(&BlockLibrary::new());

		// Assert
		match result {
			Err(CmsError::Validation(errors)) => assert!(errors.contains(field)),
			other => panic!("expected validation error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_blank_contact_email_is_allowed() {
		let mut page = ContactPage::new("Contact");
		page.contact_email = String::new();
		assert!(page.full_clean(&BlockLibrary::new()).is_ok());
	}
}
