//! Page base and page types
//!
//! Every page carries a [`PageMeta`] (identity, tree position, title, slug,
//! lifecycle) plus the fields of its type. Page types share behavior through
//! the [`ContentEntity`] trait rather than a common base struct; the store
//! keeps them as [`AnyPage`].

mod about;
mod contact;
mod formations;
mod home;

pub use about::AboutPage;
pub use contact::ContactPage;
pub use formations::FormationsPage;
pub use home::HomePage;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vitrine_forms::clean_name;

use crate::admin::Panel;
use crate::blocks::BlockLibrary;
use crate::error::{CmsError, CmsResult};
use crate::references::{ImageId, PageId, WeakRef};
use crate::schema::{FieldSchema, validate_record};

/// Maximum length of page titles and slugs
pub const TITLE_MAX_LENGTH: usize = 255;

/// Publication state of a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageState {
	#[default]
	Draft,
	Live,
}

/// Fields common to every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
	pub id: PageId,
	pub title: String,
	pub slug: String,
	/// Parent in the page tree, `None` for a root page
	#[serde(default)]
	pub parent: Option<PageId>,
	#[serde(default)]
	pub state: PageState,
	#[serde(default)]
	pub first_published_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub last_published_at: Option<DateTime<Utc>>,
}

impl PageMeta {
	/// Draft page metadata with a slug derived from the title
	pub fn new(title: impl Into<String>) -> Self {
		let title = title.into();
		Self {
			id: PageId::new(),
			slug: slugify(&title),
			title,
			parent: None,
			state: PageState::Draft,
			first_published_at: None,
			last_published_at: None,
		}
	}

	pub fn is_live(&self) -> bool {
		self.state == PageState::Live
	}

	/// Make the page live; the first publication time is kept across
	/// republishing
	pub fn publish(&mut self, at: DateTime<Utc>) {
		self.state = PageState::Live;
		self.first_published_at.get_or_insert(at);
		self.last_published_at = Some(at);
	}

	pub fn unpublish(&mut self) {
		self.state = PageState::Draft;
	}
}

impl Default for PageMeta {
	fn default() -> Self {
		Self::new("")
	}
}

/// URL slug derived from a title
///
/// ```
/// use vitrine_cms::pages::slugify;
///
/// assert_eq!(slugify("Nos formations"), "nos-formations");
/// assert_eq!(slugify("À propos"), "a-propos");
/// ```
pub fn slugify(title: &str) -> String {
	clean_name(title).replace('_', "-")
}

/// Schema of the fields every page has
pub fn base_fields() -> Vec<FieldSchema> {
	vec![
		FieldSchema::char("title", "Titre", TITLE_MAX_LENGTH),
		FieldSchema::slug("slug", "Slug", TITLE_MAX_LENGTH),
	]
}

/// Capabilities shared by the page types
///
/// A type declares its schema and admin layout once; validation, weak
/// reference maintenance and storage build on those declarations.
pub trait ContentEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
	/// Stored type name
	const PAGE_TYPE: &'static str;

	/// Human-readable type name
	const VERBOSE_NAME: &'static str;

	/// Admin icon
	const ICON: &'static str = "doc-full";

	fn meta(&self) -> &PageMeta;

	fn meta_mut(&mut self) -> &mut PageMeta;

	/// Fields of this type, excluding [`base_fields`]
	fn fields() -> Vec<FieldSchema>;

	/// Layout of the content tab
	fn content_panels() -> Vec<Panel>;

	/// Layout of the promote tab
	fn promote_panels() -> Vec<Panel> {
		vec![Panel::field("slug")]
	}

	/// Layout of the submissions tab, if the type collects submissions
	fn submissions_panels() -> Vec<Panel> {
		Vec::new()
	}

	/// Child record collections edited inline with the page
	fn relations() -> Vec<&'static str> {
		Vec::new()
	}

	/// Image references held by the page, for on-delete handling
	fn image_refs_mut(&mut self) -> Vec<&mut WeakRef<ImageId>> {
		Vec::new()
	}

	/// Page references held by the page, for on-delete handling
	fn page_refs_mut(&mut self) -> Vec<&mut WeakRef<PageId>> {
		Vec::new()
	}

	/// Base fields followed by the type's own fields
	fn all_fields() -> Vec<FieldSchema> {
		let mut fields = base_fields();
		fields.extend(Self::fields());
		fields
	}

	/// Validate every field; nothing should be stored unless this passes
	fn full_clean(&self, library: &BlockLibrary) -> CmsResult<()> {
		let record = serde_json::to_value(self)?;
		validate_record(&Self::all_fields(), &record, library).map_err(CmsError::Validation)
	}

	fn into_any(self) -> AnyPage;

	fn from_any(page: AnyPage) -> Option<Self>;
}

/// A page of any type, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page_type")]
pub enum AnyPage {
	#[serde(rename = "home_page")]
	Home(HomePage),
	#[serde(rename = "formations_page")]
	Formations(FormationsPage),
	#[serde(rename = "about_page")]
	About(AboutPage),
	#[serde(rename = "contact_page")]
	Contact(ContactPage),
}

macro_rules! each_page {
	($page:expr, $p:ident => $body:expr) => {
		match $page {
			AnyPage::Home($p) => $body,
			AnyPage::Formations($p) => $body,
			AnyPage::About($p) => $body,
			AnyPage::Contact($p) => $body,
		}
	};
}

fn page_type_of<T: ContentEntity>(_: &T) -> &'static str {
	T::PAGE_TYPE
}

impl AnyPage {
	pub fn page_type(&self) -> &'static str {
		each_page!(self, p => page_type_of(p))
	}

	pub fn meta(&self) -> &PageMeta {
		each_page!(self, p => p.meta())
	}

	pub fn meta_mut(&mut self) -> &mut PageMeta {
		each_page!(self, p => p.meta_mut())
	}

	pub fn id(&self) -> PageId {
		self.meta().id
	}

	pub fn title(&self) -> &str {
		&self.meta().title
	}

	pub fn full_clean(&self, library: &BlockLibrary) -> CmsResult<()> {
		each_page!(self, p => p.full_clean(library))
	}

	pub fn image_refs_mut(&mut self) -> Vec<&mut WeakRef<ImageId>> {
		each_page!(self, p => p.image_refs_mut())
	}

	pub fn page_refs_mut(&mut self) -> Vec<&mut WeakRef<PageId>> {
		each_page!(self, p => p.page_refs_mut())
	}

	/// Downcast to a concrete page type
	pub fn downcast<T: ContentEntity>(self) -> CmsResult<T> {
		let id = self.id();
		let actual = self.page_type();
		T::from_any(self).ok_or_else(|| CmsError::PageTypeMismatch {
			id: id.to_string(),
			expected: T::PAGE_TYPE,
			actual,
		})
	}
}
