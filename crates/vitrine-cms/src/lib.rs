//! # vitrine CMS
//!
//! Content model of an association's showcase website.
//!
//! ## Features
//!
//! - **Page Types**: home, formations listing, about and contact pages with
//!   presentable defaults
//! - **StreamField Content Blocks**: ordered `formation` blocks shared by the
//!   home page preview and the formations page
//! - **Weak References**: image and page links that degrade to unset when
//!   their target disappears
//! - **Contact Form**: editor-defined fields, submission storage and email
//!   notification
//! - **Site Settings**: one footer record per site
//! - **Admin Metadata**: field schema and panel layout per page type
//!
//! ## Architecture
//!
//! ```text
//! vitrine-cms
//! ├── references    - Typed ids, weak references, resolvers
//! ├── blocks        - StreamField and block library
//! ├── formation     - The formation block
//! ├── schema        - Field schema and record validation
//! ├── pages         - Page base and the four page types
//! ├── admin         - Panels and the admin page registry
//! ├── store         - In-memory content store
//! ├── sites         - Sites and hostname lookup
//! ├── site_settings - Per-site settings registry, footer settings
//! └── contact       - Contact form flow
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use vitrine_cms::prelude::*;
//!
//! let store = ContentStore::new();
//! let mut home = HomePage::new("Accueil");
//! home.formations_preview
//!     .add_block(StreamBlock::from_block(&FormationBlock::new("Couture")).unwrap());
//!
//! let id = store.create_page(None, home).unwrap();
//! let home: HomePage = store.page(id).unwrap();
//! assert_eq!(home.hero_kicker, "Bienvenue");
//! assert_eq!(home.formations_preview.len(), 1);
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod admin;
pub mod blocks;
pub mod contact;
pub mod formation;
pub mod media;
pub mod pages;
pub mod references;
pub mod rich_text;
pub mod schema;
pub mod site_settings;
pub mod sites;
pub mod store;

// Prelude for convenient imports
pub mod prelude {
	//! Convenient re-exports of commonly used items

	// References
	pub use crate::references::{
		FormFieldId, ImageId, PageId, Resolver, SiteId, SubmissionId, WeakRef,
	};

	// Blocks
	pub use crate::blocks::{Block, BlockLibrary, BlockMeta, StreamBlock, StreamField};
	pub use crate::formation::FormationBlock;

	// Pages
	pub use crate::pages::{
		AboutPage, AnyPage, ContactPage, ContentEntity, FormationsPage, HomePage, PageMeta,
		PageState,
	};

	// Media
	pub use crate::media::Image;
	pub use crate::rich_text::RichText;

	// Admin
	pub use crate::admin::{AdminPageRegistry, PageTypeDescriptor, Panel};

	// Storage
	pub use crate::sites::Site;
	pub use crate::site_settings::{FooterSettings, SiteSetting, SiteSettingsRegistry};
	pub use crate::store::{ContentStore, DeletionSummary};

	// Contact
	pub use crate::contact::{
		ContactFormService, DispatchReport, FormFieldRecord, FormSubmission, SubmissionOutcome,
	};

	pub use crate::error::{CmsError, CmsResult, ValidationErrors};
}

/// CMS error types
pub mod error {
	use indexmap::IndexMap;
	use std::fmt;
	use thiserror::Error;
	use vitrine_forms::DefinitionError;

	/// CMS-related errors
	#[derive(Error, Debug)]
	pub enum CmsError {
		/// Page not found
		#[error("Page not found: {0}")]
		PageNotFound(String),

		/// Page exists but is of another type than requested
		#[error("Page {id} is a {actual}, not a {expected}")]
		PageTypeMismatch {
			/// Page id
			id: String,
			/// Requested page type
			expected: &'static str,
			/// Stored page type
			actual: &'static str,
		},

		/// Invalid page hierarchy (e.g., circular reference)
		#[error("Invalid page hierarchy: {0}")]
		InvalidHierarchy(String),

		/// Page is a draft and cannot serve public requests
		#[error("Page is not live: {0}")]
		PageNotLive(String),

		/// Image not found
		#[error("Image not found: {0}")]
		ImageNotFound(String),

		/// Site not found
		#[error("Site not found: {0}")]
		SiteNotFound(String),

		/// Block type not registered
		#[error("Block type not registered: {0}")]
		UnknownBlockType(String),

		/// Field-level validation failed; nothing was saved
		#[error("Validation failed: {0}")]
		Validation(ValidationErrors),

		/// Contact form definition rejected
		#[error("Invalid form definition: {0}")]
		FormDefinition(#[from] DefinitionError),

		/// Serialization error
		#[error("Serialization error: {0}")]
		Serialization(#[from] serde_json::Error),

		/// Generic error
		#[error("{0}")]
		Generic(String),
	}

	/// Result type for CMS operations
	pub type CmsResult<T> = Result<T, CmsError>;

	/// Messages per field name, in the order fields were checked
	#[derive(Debug, Clone, Default, PartialEq, Eq)]
	pub struct ValidationErrors(IndexMap<String, Vec<String>>);

	impl ValidationErrors {
		/// Create an empty error set
		pub fn new() -> Self {
			Self::default()
		}

		/// Error set with a single message
		pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
			let mut errors = Self::new();
			errors.add(field, message);
			errors
		}

		/// Record a message against `field`
		pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
			self.0.entry(field.into()).or_default().push(message.into());
		}

		/// Merge another set into this one
		pub fn merge(&mut self, other: ValidationErrors) {
			for (field, messages) in other.0 {
				self.0.entry(field).or_default().extend(messages);
			}
		}

		/// Merge another set, prefixing its field names
		pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
			for (field, messages) in other.0 {
				let key = format!("{}.{}", prefix, field);
				self.0.entry(key).or_default().extend(messages);
			}
		}

		/// Messages recorded for `field`
		pub fn get(&self, field: &str) -> Option<&[String]> {
			self.0.get(field).map(Vec::as_slice)
		}

		/// Whether `field` has at least one message
		pub fn contains(&self, field: &str) -> bool {
			self.0.contains_key(field)
		}

		/// Names of the fields with errors
		pub fn fields(&self) -> impl Iterator<Item = &str> {
			self.0.keys().map(String::as_str)
		}

		/// Whether no message was recorded
		pub fn is_empty(&self) -> bool {
			self.0.is_empty()
		}

		/// Number of fields with errors
		pub fn len(&self) -> usize {
			self.0.len()
		}

		/// `Ok(())` when empty, the set itself otherwise
		pub fn into_result(self) -> Result<(), ValidationErrors> {
			if self.is_empty() { Ok(()) } else { Err(self) }
		}

		/// Underlying map
		pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
			self.0
		}
	}

	impl fmt::Display for ValidationErrors {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			let parts: Vec<String> = self
				.0
				.iter()
				.map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
				.collect();
			f.write_str(&parts.join("; "))
		}
	}

	impl From<ValidationErrors> for CmsError {
		fn from(errors: ValidationErrors) -> Self {
			CmsError::Validation(errors)
		}
	}
}
