//! Admin UI integration
//!
//! The admin renders edit forms from a page type's field schema and panel
//! layout. This module describes that layout and keeps a registry of page
//! types; drawing the forms is left to the admin itself.

use crate::error::{CmsError, CmsResult};
use crate::pages::{AboutPage, ContactPage, ContentEntity, FormationsPage, HomePage};
use crate::schema::FieldSchema;
use indexmap::IndexMap;
use serde::Serialize;
use std::marker::PhantomData;

/// Layout element of an edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
	/// Default widget of a field
	Field { name: &'static str },
	/// Page tree chooser for a page reference
	PageChooser { name: &'static str },
	/// Group of panels under a heading
	MultiField {
		heading: &'static str,
		children: Vec<Panel>,
	},
	/// Inline editor for a child record collection
	Inline {
		relation: &'static str,
		label: &'static str,
	},
	/// Listing of stored form submissions
	FormSubmissions,
}

impl Panel {
	pub fn field(name: &'static str) -> Self {
		Panel::Field { name }
	}

	pub fn page_chooser(name: &'static str) -> Self {
		Panel::PageChooser { name }
	}

	pub fn multi(heading: &'static str, children: Vec<Panel>) -> Self {
		Panel::MultiField { heading, children }
	}

	pub fn inline(relation: &'static str, label: &'static str) -> Self {
		Panel::Inline { relation, label }
	}

	/// Field names edited by this panel and its children
	pub fn field_names(&self) -> Vec<&'static str> {
		match self {
			Panel::Field { name } | Panel::PageChooser { name } => vec![*name],
			Panel::MultiField { children, .. } => {
				children.iter().flat_map(Panel::field_names).collect()
			}
			Panel::Inline { .. } | Panel::FormSubmissions => Vec::new(),
		}
	}

	/// Relations edited inline by this panel and its children
	pub fn relation_names(&self) -> Vec<&'static str> {
		match self {
			Panel::Inline { relation, .. } => vec![*relation],
			Panel::MultiField { children, .. } => {
				children.iter().flat_map(Panel::relation_names).collect()
			}
			_ => Vec::new(),
		}
	}
}

/// Admin registry of page types
pub struct AdminPageRegistry {
	pages: IndexMap<String, Box<dyn PageTypeDescriptor>>,
}

impl AdminPageRegistry {
	/// Create a new admin page registry
	pub fn new() -> Self {
		Self {
			pages: IndexMap::new(),
		}
	}

	/// Registry with the site's four page types
	pub fn with_default_page_types() -> CmsResult<Self> {
		let mut registry = Self::new();
		registry.register(PageType::<HomePage>::new())?;
		registry.register(PageType::<FormationsPage>::new())?;
		registry.register(PageType::<AboutPage>::new())?;
		registry.register(PageType::<ContactPage>::new())?;
		Ok(registry)
	}

	/// Register a page type after checking its layout
	pub fn register<T: PageTypeDescriptor + 'static>(&mut self, page_type: T) -> CmsResult<()> {
		page_type.check()?;
		tracing::debug!(page_type = page_type.type_name(), "registered admin page type");
		self.pages
			.insert(page_type.type_name().to_string(), Box::new(page_type));
		Ok(())
	}

	/// Get a page type descriptor
	pub fn get(&self, type_name: &str) -> Option<&dyn PageTypeDescriptor> {
		self.pages.get(type_name).map(|b| b.as_ref())
	}

	/// Registered type names, in registration order
	pub fn type_names(&self) -> impl Iterator<Item = &str> {
		self.pages.keys().map(String::as_str)
	}

	/// Everything the admin needs to draw the edit form of a type
	pub fn edit_schema(&self, type_name: &str) -> Option<EditSchema> {
		self.get(type_name).map(|descriptor| EditSchema {
			type_name: descriptor.type_name().to_string(),
			label: descriptor.label().to_string(),
			icon: descriptor.icon().to_string(),
			fields: descriptor.fields(),
			content_panels: descriptor.content_panels(),
			promote_panels: descriptor.promote_panels(),
			submissions_panels: descriptor.submissions_panels(),
		})
	}
}

impl Default for AdminPageRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Serializable description of an edit form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditSchema {
	pub type_name: String,
	pub label: String,
	pub icon: String,
	pub fields: Vec<FieldSchema>,
	pub content_panels: Vec<Panel>,
	pub promote_panels: Vec<Panel>,
	pub submissions_panels: Vec<Panel>,
}

/// Descriptor for a page type in the admin
pub trait PageTypeDescriptor: Send + Sync {
	/// Get the type name
	fn type_name(&self) -> &str;

	/// Get the human-readable label
	fn label(&self) -> &str;

	/// Get the icon class/name
	fn icon(&self) -> &str;

	/// All fields, base fields first
	fn fields(&self) -> Vec<FieldSchema>;

	fn content_panels(&self) -> Vec<Panel>;

	fn promote_panels(&self) -> Vec<Panel>;

	fn submissions_panels(&self) -> Vec<Panel>;

	/// Inline child collections
	fn relations(&self) -> Vec<&'static str>;

	/// Every panel must name a declared field or relation, and no field may
	/// appear twice
	fn check(&self) -> CmsResult<()> {
		let fields = self.fields();
		let relations = self.relations();
		let panels: Vec<Panel> = self
			.content_panels()
			.into_iter()
			.chain(self.promote_panels())
			.chain(self.submissions_panels())
			.collect();

		let mut seen = Vec::new();
		for name in panels.iter().flat_map(Panel::field_names) {
			if !fields.iter().any(|f| f.name == name) {
				return Err(CmsError::Generic(format!(
					"{}: panel refers to unknown field '{}'",
					self.type_name(),
					name
				)));
			}
			if seen.contains(&name) {
				return Err(CmsError::Generic(format!(
					"{}: field '{}' appears in more than one panel",
					self.type_name(),
					name
				)));
			}
			seen.push(name);
		}
		for relation in panels.iter().flat_map(Panel::relation_names) {
			if !relations.contains(&relation) {
				return Err(CmsError::Generic(format!(
					"{}: panel refers to unknown relation '{}'",
					self.type_name(),
					relation
				)));
			}
		}
		Ok(())
	}
}

/// Descriptor of a [`ContentEntity`] type
pub struct PageType<T>(PhantomData<fn() -> T>);

impl<T: ContentEntity> PageType<T> {
	pub fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T: ContentEntity> Default for PageType<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: ContentEntity> PageTypeDescriptor for PageType<T> {
	fn type_name(&self) -> &str {
		T::PAGE_TYPE
	}

	fn label(&self) -> &str {
		T::VERBOSE_NAME
	}

	fn icon(&self) -> &str {
		T::ICON
	}

	fn fields(&self) -> Vec<FieldSchema> {
		T::all_fields()
	}

	fn content_panels(&self) -> Vec<Panel> {
		T::content_panels()
	}

	fn promote_panels(&self) -> Vec<Panel> {
		T::promote_panels()
	}

	fn submissions_panels(&self) -> Vec<Panel> {
		T::submissions_panels()
	}

	fn relations(&self) -> Vec<&'static str> {
		T::relations()
	}
}
