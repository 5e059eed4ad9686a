use serde::{Deserialize, Serialize};

use super::{AnyPage, ContentEntity, PageMeta};
use crate::admin::Panel;
use crate::blocks::StreamField;
use crate::formation::FORMATION_BLOCK_TYPE;
use crate::references::{ImageId, PageId, WeakRef};
use crate::schema::FieldSchema;

const HERO_KICKER: &str = "Bienvenue";
const HERO_TITLE: &str = "Titre de la page d’accueil";
const HERO_SUBTITLE: &str = "Sous-titre de présentation pour la page d’accueil.";
const HERO_PRIMARY_BUTTON_TEXT: &str = "En savoir plus sur nous";
const HERO_SECONDARY_BUTTON_TEXT: &str = "Discutons de votre projet";
const FORMATIONS_PREVIEW_TITLE: &str = "Nos formations";
const FORMATIONS_PREVIEW_INTRO: &str = "Un aperçu rapide de nos formations.";

/// Landing page: hero banner and a preview of a few formations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomePage {
	#[serde(flatten)]
	pub meta: PageMeta,

	pub hero_kicker: String,
	pub hero_title: String,
	pub hero_subtitle: String,
	pub hero_background_image: WeakRef<ImageId>,
	pub hero_primary_button_text: String,
	pub hero_primary_button_page: WeakRef<PageId>,
	pub hero_secondary_button_text: String,
	pub hero_secondary_button_page: WeakRef<PageId>,

	pub formations_preview_title: String,
	pub formations_preview_intro: String,
	pub formations_preview: StreamField,
}

impl HomePage {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			meta: PageMeta::new(title),
			hero_kicker: HERO_KICKER.to_string(),
			hero_title: HERO_TITLE.to_string(),
			hero_subtitle: HERO_SUBTITLE.to_string(),
			hero_background_image: WeakRef::unset(),
			hero_primary_button_text: HERO_PRIMARY_BUTTON_TEXT.to_string(),
			hero_primary_button_page: WeakRef::unset(),
			hero_secondary_button_text: HERO_SECONDARY_BUTTON_TEXT.to_string(),
			hero_secondary_button_page: WeakRef::unset(),
			formations_preview_title: FORMATIONS_PREVIEW_TITLE.to_string(),
			formations_preview_intro: FORMATIONS_PREVIEW_INTRO.to_string(),
			formations_preview: StreamField::new(),
		}
	}
}

impl Default for HomePage {
	fn default() -> Self {
		Self::new("")
	}
}

impl ContentEntity for HomePage {
	const PAGE_TYPE: &'static str = "home_page";
	const VERBOSE_NAME: &'static str = "Page d'accueil";
	const ICON: &'static str = "home";

	fn meta(&self) -> &PageMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut PageMeta {
		&mut self.meta
	}

	fn fields() -> Vec<FieldSchema> {
		vec![
			FieldSchema::char("hero_kicker", "Petit texte au-dessus du titre", 150)
				.blank()
				.with_default(HERO_KICKER)
				.with_help_text("Ex : 'Association locale · Formation et emploi'"),
			FieldSchema::char("hero_title", "Titre principal", 200)
				.with_default(HERO_TITLE)
				.with_help_text("Ex : 'Créez un site vitrine moderne, clair et efficace.'"),
			FieldSchema::text("hero_subtitle", "Texte sous le titre")
				.blank()
				.with_default(HERO_SUBTITLE)
				.with_help_text("Quelques phrases qui expliquent le site."),
			FieldSchema::image("hero_background_image", "Image de fond du hero")
				.with_help_text("Grande image plein écran affichée en haut de la page."),
			FieldSchema::char("hero_primary_button_text", "Texte du bouton principal", 50)
				.with_default(HERO_PRIMARY_BUTTON_TEXT),
			FieldSchema::page("hero_primary_button_page", "Page du bouton principal")
				.with_help_text("Page vers laquelle le bouton principal redirige (ex : À propos)."),
			FieldSchema::char("hero_secondary_button_text", "Texte du bouton secondaire", 50)
				.blank()
				.with_default(HERO_SECONDARY_BUTTON_TEXT),
			FieldSchema::page("hero_secondary_button_page", "Page du bouton secondaire")
				.with_help_text("Page vers laquelle le bouton secondaire redirige (ex : Contact)."),
			FieldSchema::char(
				"formations_preview_title",
				"Titre de la section formations (accueil)",
				150,
			)
			.with_default(FORMATIONS_PREVIEW_TITLE),
			FieldSchema::text(
				"formations_preview_intro",
				"Texte d’intro de la section formations (accueil)",
			)
			.blank()
			.with_default(FORMATIONS_PREVIEW_INTRO)
			.with_help_text("Petite phrase pour introduire les formations."),
			FieldSchema::stream(
				"formations_preview",
				"Formations à afficher sur l’accueil (aperçu)",
				vec![FORMATION_BLOCK_TYPE],
			)
			.blank(),
		]
	}

	fn content_panels() -> Vec<Panel> {
		vec![
			Panel::field("title"),
			Panel::multi(
				"Section hero (bandeau principal)",
				vec![
					Panel::field("hero_kicker"),
					Panel::field("hero_title"),
					Panel::field("hero_subtitle"),
					Panel::field("hero_background_image"),
					Panel::field("hero_primary_button_text"),
					Panel::page_chooser("hero_primary_button_page"),
					Panel::field("hero_secondary_button_text"),
					Panel::page_chooser("hero_secondary_button_page"),
				],
			),
			Panel::multi(
				"Aperçu des formations sur la page d’accueil",
				vec![
					Panel::field("formations_preview_title"),
					Panel::field("formations_preview_intro"),
					Panel::field("formations_preview"),
				],
			),
		]
	}

	fn image_refs_mut(&mut self) -> Vec<&mut WeakRef<ImageId>> {
		vec![&mut self.hero_background_image]
	}

	fn page_refs_mut(&mut self) -> Vec<&mut WeakRef<PageId>> {
		vec![
			&mut self.hero_primary_button_page,
			&mut self.hero_secondary_button_page,
		]
	}

	fn into_any(self) -> AnyPage {
		AnyPage::Home(self)
	}

	fn from_any(page: AnyPage) -> Option<Self> {
		match page {
			AnyPage::Home(page) => Some(page),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::formation::formation_library;
	use rstest::rstest;

	#[rstest]
	fn test_fresh_home_page_is_valid_with_defaults() {
		// Arrange
		let page = HomePage::new("Accueil");

		// Act
		let result = page.full_clean(&formation_library());

		// Assert
		assert!(result.is_ok(), "{:?}", result);
		assert_eq!(page.hero_title, "Titre de la page d’accueil");
		assert_eq!(page.hero_primary_button_text, "En savoir plus sur nous");
		assert!(page.formations_preview.is_empty());
	}

	#[rstest]
	fn test_schema_defaults_match_constructor() {
		// Arrange
		let page = serde_json::to_value(HomePage::new("Accueil")).unwrap();

		// Act & Assert
		for field in HomePage::fields() {
			if let Some(default) = field.default {
				assert_eq!(page[field.name], default, "field {}", field.name);
			}
		}
	}

	#[rstest]
	fn test_required_hero_title() {
		// Arrange
		let mut page = HomePage::new("Accueil");
		page.hero_title = "  ".to_string();
		page.hero_kicker = String::new();

		// Act
		let result = page.full_clean(&formation_library());

		// Assert
		match result {
			Err(crate::error::CmsError::Validation(errors)) => {
				assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["hero_title"]);
			}
			other => panic!("expected validation error, got {:?}", other),
		}
	}
}
