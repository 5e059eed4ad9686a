use serde::{Deserialize, Serialize};

use super::{AnyPage, ContentEntity, PageMeta};
use crate::admin::Panel;
use crate::references::{ImageId, WeakRef};
use crate::rich_text::RichText;
use crate::schema::FieldSchema;

const INTRO_TITLE: &str = "À propos";
const INTRO_SUBTITLE: &str = "En savoir plus sur nous.";

/// Presentation of the association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutPage {
	#[serde(flatten)]
	pub meta: PageMeta,

	pub intro_title: String,
	pub intro_subtitle: String,
	/// History, mission, values
	pub body: RichText,
	pub image: WeakRef<ImageId>,
	pub image_caption: String,
}

impl AboutPage {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			meta: PageMeta::new(title),
			intro_title: INTRO_TITLE.to_string(),
			intro_subtitle: INTRO_SUBTITLE.to_string(),
			body: RichText::default(),
			image: WeakRef::unset(),
			image_caption: String::new(),
		}
	}
}

impl Default for AboutPage {
	fn default() -> Self {
		Self::new("")
	}
}

impl ContentEntity for AboutPage {
	const PAGE_TYPE: &'static str = "about_page";
	const VERBOSE_NAME: &'static str = "Page À propos";
	const ICON: &'static str = "group";

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
				.with_default(INTRO_SUBTITLE)
				.with_help_text("Une petite phrase pour introduire la page."),
			FieldSchema::rich_text("body", "Texte de présentation")
				.blank()
				.with_help_text("Contenu principal : histoire, mission, valeurs..."),
			FieldSchema::image("image", "Image de la section À propos")
				.with_help_text("Photo d’équipe ou image illustrative."),
			FieldSchema::char("image_caption", "Légende de l’image", 255).blank(),
		]
	}

	fn content_panels() -> Vec<Panel> {
		vec![
			Panel::field("title"),
			Panel::field("intro_title"),
			Panel::field("intro_subtitle"),
			Panel::field("body"),
			Panel::field("image"),
			Panel::field("image_caption"),
		]
	}

	fn image_refs_mut(&mut self) -> Vec<&mut WeakRef<ImageId>> {
		vec![&mut self.image]
	}

	fn into_any(self) -> AnyPage {
		AnyPage::About(self)
	}

	fn from_any(page: AnyPage) -> Option<Self> {
		match page {
			AnyPage::About(page) => Some(page),
			_ => None,
		}
	}
}
