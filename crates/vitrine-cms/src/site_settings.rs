//! Per-site settings
//!
//! A [`SiteSettingsRegistry`] holds at most one record of a settings type
//! per site. Reading a site's record creates it with its defaults on first
//! access, so every site always has exactly one.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::admin::Panel;
use crate::blocks::BlockLibrary;
use crate::error::{CmsError, CmsResult};
use crate::references::{ImageId, SiteId, WeakRef};
use crate::schema::{FieldSchema, validate_record};

/// A settings record kept once per site
pub trait SiteSetting: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
	const NAME: &'static str;
	const VERBOSE_NAME: &'static str;

	fn fields() -> Vec<FieldSchema>;

	fn panels() -> Vec<Panel>;

	fn image_refs_mut(&mut self) -> Vec<&mut WeakRef<ImageId>> {
		Vec::new()
	}

	fn full_clean(&self) -> CmsResult<()> {
		let record = serde_json::to_value(self)?;
		validate_record(&Self::fields(), &record, &BlockLibrary::new()).map_err(CmsError::Validation)
	}
}

/// One `T` per site
pub struct SiteSettingsRegistry<T: SiteSetting> {
	rows: RwLock<IndexMap<SiteId, T>>,
}

impl<T: SiteSetting> SiteSettingsRegistry<T> {
	pub fn new() -> Self {
		Self {
			rows: RwLock::new(IndexMap::new()),
		}
	}

	/// Settings of `site`, created with defaults on first access
	pub fn for_site(&self, site: SiteId) -> T {
		if let Some(row) = self.rows.read().get(&site) {
			return row.clone();
		}
		self.rows.write().entry(site).or_default().clone()
	}

	/// Replace the settings of `site` after validation
	pub fn update(&self, site: SiteId, settings: T) -> CmsResult<()> {
		settings.full_clean()?;
		self.rows.write().insert(site, settings);
		tracing::debug!(site = %site, setting = T::NAME, "site settings updated");
		Ok(())
	}

	/// Unset references to a deleted image; returns how many were unset
	pub fn clear_image(&self, image: ImageId) -> usize {
		let mut rows = self.rows.write();
		rows.values_mut()
			.flat_map(|row| row.image_refs_mut())
			.filter_map(|reference| reference.clear_if(image).then_some(()))
			.count()
	}

	/// Drop the settings of a removed site
	pub fn remove_site(&self, site: SiteId) -> Option<T> {
		self.rows.write().shift_remove(&site)
	}

	/// Number of sites with a settings record
	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}
}

impl<T: SiteSetting> Default for SiteSettingsRegistry<T> {
	fn default() -> Self {
		Self::new()
	}
}

const ASSOCIATION_NAME: &str = "Femmes Solidaires";
const SLOGAN: &str = "Formation · Emploi · Solidarité";
const DESCRIPTION: &str = "Association locale engagée pour l’émancipation des femmes par la \
	formation et l’emploi. Ensemble, construisons votre avenir.";
const YEAR: &str = "2025";

/// Content of the footer shown on every page of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterSettings {
	pub logo: WeakRef<ImageId>,
	pub association_name: String,
	pub slogan: String,
	pub description: String,
	pub year: String,
}

impl Default for FooterSettings {
	fn default() -> Self {
		Self {
			logo: WeakRef::unset(),
			association_name: ASSOCIATION_NAME.to_string(),
			slogan: SLOGAN.to_string(),
			description: DESCRIPTION.to_string(),
			year: YEAR.to_string(),
		}
	}
}

impl SiteSetting for FooterSettings {
	const NAME: &'static str = "footer_settings";
	const VERBOSE_NAME: &'static str = "Pied de page";

	fn fields() -> Vec<FieldSchema> {
		vec![
			FieldSchema::image("logo", "Logo de l'association"),
			FieldSchema::char("association_name", "Nom de l'association", 100)
				.with_default(ASSOCIATION_NAME),
			FieldSchema::char("slogan", "Slogan", 100).with_default(SLOGAN),
			FieldSchema::text("description", "Texte de présentation").with_default(DESCRIPTION),
			FieldSchema::char("year", "Année affichée en bas", 4).with_default(YEAR),
		]
	}

	fn panels() -> Vec<Panel> {
		vec![
			Panel::field("logo"),
			Panel::field("association_name"),
			Panel::field("slogan"),
			Panel::field("description"),
			Panel::field("year"),
		]
	}

	fn image_refs_mut(&mut self) -> Vec<&mut WeakRef<ImageId>> {
		vec![&mut self.logo]
	}
}
