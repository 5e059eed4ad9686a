use serde::{Deserialize, Serialize};

use super::{AnyPage, ContentEntity, PageMeta};
use crate::admin::Panel;
use crate::blocks::StreamField;
use crate::formation::FORMATION_BLOCK_TYPE;
use crate::schema::FieldSchema;

const INTRO_TITLE: &str = "Nos formations";
const INTRO_SUBTITLE: &str = "Voici un exemple de section formations que vous pouvez adapter.";

/// Full list of formations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationsPage {
	#[serde(flatten)]
	pub meta: PageMeta,

	pub intro_title: String,
	pub intro_subtitle: String,
	pub formations: StreamField,
}

impl FormationsPage {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			meta: PageMeta::new(title),
			intro_title: INTRO_TITLE.to_string(),
			intro_subtitle: INTRO_SUBTITLE.to_string(),
			formations: StreamField::new(),
		}
	}
}

impl Default for FormationsPage {
	fn default() -> Self {
		Self::new("")
	}
}

impl ContentEntity for FormationsPage {
	const PAGE_TYPE: &'static str = "formations_page";
	const VERBOSE_NAME: &'static str = "Page des formations";
	const ICON: &'static str = "list-ul";

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
				.with_help_text("Ex : 'Voici un exemple de section formations...'"),
			FieldSchema::stream("formations", "Formations", vec![FORMATION_BLOCK_TYPE])
				.blank()
				.with_help_text("Liste complète des formations proposées."),
		]
	}

	fn content_panels() -> Vec<Panel> {
		vec![
			Panel::field("title"),
			Panel::field("intro_title"),
			Panel::field("intro_subtitle"),
			Panel::field("formations"),
		]
	}

	fn into_any(self) -> AnyPage {
		AnyPage::Formations(self)
	}

	fn from_any(page: AnyPage) -> Option<Self> {
		match page {
			AnyPage::Formations(page) => Some(page),
			_ => None,
		}
	}
}
