//! In-memory content store
//!
//! Holds pages, images, contact form fields, submissions and sites behind a
//! single lock. Every write validates first and applies its changes as a
//! whole, so readers never observe a half-applied delete or an invalid page.
//!
//! Deletion follows the relations declared by the content model:
//!
//! - deleting a page deletes its descendants, its form fields and its
//!   submissions, and unsets page references held elsewhere
//! - deleting an image unsets every image reference to it

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use vitrine_forms::{FormFieldDefinition, validate_definitions};

use crate::blocks::BlockLibrary;
use crate::contact::{FormFieldRecord, FormSubmission};
use crate::error::{CmsError, CmsResult, ValidationErrors};
use crate::formation::formation_library;
use crate::media::Image;
use crate::pages::{AnyPage, ContentEntity};
use crate::references::{FormFieldId, ImageId, PageId, Resolver, SiteId, SubmissionId};
use crate::sites::{Site, match_site};

/// What a page deletion removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSummary {
	/// The page and its descendants
	pub pages: usize,
	pub form_fields: usize,
	pub submissions: usize,
	/// Page references unset in remaining pages and sites
	pub references_cleared: usize,
}

#[derive(Default)]
struct StoreState {
	pages: IndexMap<PageId, AnyPage>,
	images: IndexMap<ImageId, Image>,
	form_fields: IndexMap<FormFieldId, FormFieldRecord>,
	submissions: IndexMap<SubmissionId, FormSubmission>,
	sites: IndexMap<SiteId, Site>,
}

impl StoreState {
	fn require_page(&self, id: PageId) -> CmsResult<&AnyPage> {
		self.pages
			.get(&id)
			.ok_or_else(|| CmsError::PageNotFound(id.to_string()))
	}

	fn require_contact_page(&self, id: PageId) -> CmsResult<()> {
		match self.require_page(id)? {
			AnyPage::Contact(_) => Ok(()),
			other => Err(CmsError::PageTypeMismatch {
				id: id.to_string(),
				expected: "contact_page",
				actual: other.page_type(),
			}),
		}
	}

	fn check_slug(&self, page: &AnyPage) -> CmsResult<()> {
		let meta = page.meta();
		let taken = self.pages.values().any(|other| {
			let other = other.meta();
			other.id != meta.id && other.parent == meta.parent && other.slug == meta.slug
		});
		if taken {
			return Err(CmsError::Validation(ValidationErrors::single(
				"slug",
				format!(
					"The slug '{}' is already in use within the parent page",
					meta.slug
				),
			)));
		}
		Ok(())
	}

	/// `root` and every page below it
	fn subtree(&self, root: PageId) -> HashSet<PageId> {
		let mut found = HashSet::from([root]);
		let mut frontier = vec![root];
		while let Some(parent) = frontier.pop() {
			for page in self.pages.values() {
				let id = page.id();
				if page.meta().parent == Some(parent) && found.insert(id) {
					frontier.push(id);
				}
			}
		}
		found
	}

	/// Unset references to images and pages that are not stored
	fn clear_dangling(&self, page: &mut AnyPage) -> usize {
		let own = page.id();
		let mut cleared = 0;
		for image in page.image_refs_mut() {
			if image.id().is_some_and(|id| !self.images.contains_key(&id)) {
				image.clear();
				cleared += 1;
			}
		}
		for target in page.page_refs_mut() {
			if target
				.id()
				.is_some_and(|id| id != own && !self.pages.contains_key(&id))
			{
				target.clear();
				cleared += 1;
			}
		}
		cleared
	}

	fn form_records(&self, page: PageId) -> Vec<FormFieldRecord> {
		let mut records: Vec<FormFieldRecord> = self
			.form_fields
			.values()
			.filter(|f| f.page == page)
			.cloned()
			.collect();
		records.sort_by_key(|f| f.sort_order);
		records
	}
}

/// Shared store of all content
pub struct ContentStore {
	state: RwLock<StoreState>,
	library: BlockLibrary,
}

impl ContentStore {
	/// Store whose streams accept the formation block
	pub fn new() -> Self {
		Self::with_library(formation_library())
	}

	pub fn with_library(library: BlockLibrary) -> Self {
		Self {
			state: RwLock::new(StoreState::default()),
			library,
		}
	}

	/// Blocks accepted in streams
	pub fn library(&self) -> &BlockLibrary {
		&self.library
	}

	// Pages

	/// Validate and insert a new page under `parent`
	pub fn create_page<T: ContentEntity>(&self, parent: Option<PageId>, mut page: T) -> CmsResult<PageId> {
		page.meta_mut().parent = parent;
		page.full_clean(&self.library)?;
		let mut page = page.into_any();
		let id = page.id();

		let mut state = self.state.write();
		if let Some(parent) = parent {
			state.require_page(parent)?;
		}
		if state.pages.contains_key(&id) {
			return Err(CmsError::Generic(format!("Page already exists: {}", id)));
		}
		state.check_slug(&page)?;
		let dangling = state.clear_dangling(&mut page);
		if dangling > 0 {
			tracing::debug!(page = %id, dangling, "unset references to missing content");
		}
		tracing::debug!(page = %id, page_type = page.page_type(), title = page.title(), "page created");
		state.pages.insert(id, page);
		Ok(id)
	}

	/// Validate and replace the content of an existing page
	///
	/// Tree position and publication state are owned by the store and kept
	/// as stored; use [`ContentStore::move_page`], [`ContentStore::publish`]
	/// and [`ContentStore::unpublish`] to change them. References to images
	/// or pages deleted since the copy was read are unset.
	pub fn save_page<T: ContentEntity>(&self, page: &T) -> CmsResult<()> {
		page.full_clean(&self.library)?;
		let mut page = page.clone().into_any();
		let id = page.id();

		let mut state = self.state.write();
		let stored = state.require_page(id)?;
		if stored.page_type() != T::PAGE_TYPE {
			return Err(CmsError::PageTypeMismatch {
				id: id.to_string(),
				expected: T::PAGE_TYPE,
				actual: stored.page_type(),
			});
		}
		let stored_meta = stored.meta().clone();
		let meta = page.meta_mut();
		meta.parent = stored_meta.parent;
		meta.state = stored_meta.state;
		meta.first_published_at = stored_meta.first_published_at;
		meta.last_published_at = stored_meta.last_published_at;
		state.check_slug(&page)?;
		let dangling = state.clear_dangling(&mut page);
		tracing::debug!(page = %id, page_type = T::PAGE_TYPE, dangling, "page saved");
		state.pages.insert(id, page);
		Ok(())
	}

	/// Typed copy of a page
	pub fn page<T: ContentEntity>(&self, id: PageId) -> CmsResult<T> {
		let page = self.state.read().require_page(id)?.clone();
		page.downcast()
	}

	pub fn any_page(&self, id: PageId) -> Option<AnyPage> {
		self.state.read().pages.get(&id).cloned()
	}

	/// All pages, in creation order
	pub fn pages(&self) -> Vec<AnyPage> {
		self.state.read().pages.values().cloned().collect()
	}

	/// Direct children of `parent`, in creation order
	pub fn children(&self, parent: PageId) -> Vec<AnyPage> {
		self.state
			.read()
			.pages
			.values()
			.filter(|p| p.meta().parent == Some(parent))
			.cloned()
			.collect()
	}

	/// Re-parent a page; a page cannot move below itself
	pub fn move_page(&self, id: PageId, new_parent: Option<PageId>) -> CmsResult<()> {
		let mut state = self.state.write();
		state.require_page(id)?;
		if let Some(parent) = new_parent {
			state.require_page(parent)?;
			if state.subtree(id).contains(&parent) {
				return Err(CmsError::InvalidHierarchy(format!(
					"Cannot move page {} below its own descendant {}",
					id, parent
				)));
			}
		}
		let mut page = state.require_page(id)?.clone();
		page.meta_mut().parent = new_parent;
		state.check_slug(&page)?;
		state.pages.insert(id, page);
		Ok(())
	}

	/// Make a page live now
	pub fn publish(&self, id: PageId) -> CmsResult<()> {
		self.publish_at(id, Utc::now())
	}

	pub fn publish_at(&self, id: PageId, at: DateTime<Utc>) -> CmsResult<()> {
		let mut state = self.state.write();
		let page = state
			.pages
			.get_mut(&id)
			.ok_or_else(|| CmsError::PageNotFound(id.to_string()))?;
		page.meta_mut().publish(at);
		tracing::info!(page = %id, "page published");
		Ok(())
	}

	pub fn unpublish(&self, id: PageId) -> CmsResult<()> {
		let mut state = self.state.write();
		let page = state
			.pages
			.get_mut(&id)
			.ok_or_else(|| CmsError::PageNotFound(id.to_string()))?;
		page.meta_mut().unpublish();
		tracing::info!(page = %id, "page unpublished");
		Ok(())
	}

	/// Delete a page with everything that depends on it
	pub fn delete_page(&self, id: PageId) -> CmsResult<DeletionSummary> {
		let mut state = self.state.write();
		state.require_page(id)?;

		let doomed = state.subtree(id);
		let mut summary = DeletionSummary {
			pages: doomed.len(),
			..DeletionSummary::default()
		};
		state.pages.retain(|page_id, _| !doomed.contains(page_id));

		let before = state.form_fields.len();
		state.form_fields.retain(|_, f| !doomed.contains(&f.page));
		summary.form_fields = before - state.form_fields.len();

		let before = state.submissions.len();
		state.submissions.retain(|_, s| !doomed.contains(&s.page));
		summary.submissions = before - state.submissions.len();

		let is_doomed = |target: Option<PageId>| target.is_some_and(|t| doomed.contains(&t));
		for page in state.pages.values_mut() {
			for reference in page.page_refs_mut() {
				if is_doomed(reference.id()) {
					reference.clear();
					summary.references_cleared += 1;
				}
			}
		}
		for site in state.sites.values_mut() {
			if is_doomed(site.root_page.id()) {
				site.root_page.clear();
				summary.references_cleared += 1;
			}
		}

		tracing::info!(
			page = %id,
			pages = summary.pages,
			form_fields = summary.form_fields,
			submissions = summary.submissions,
			references_cleared = summary.references_cleared,
			"page deleted"
		);
		Ok(summary)
	}

	// Images

	pub fn add_image(&self, image: Image) -> ImageId {
		let id = image.id;
		self.state.write().images.insert(id, image);
		id
	}

	pub fn image(&self, id: ImageId) -> Option<Image> {
		self.state.read().images.get(&id).cloned()
	}

	pub fn images(&self) -> Vec<Image> {
		self.state.read().images.values().cloned().collect()
	}

	/// Delete an image and unset page fields pointing at it
	///
	/// Returns the number of references unset. Images referenced from
	/// stream blocks are left in place and resolve to nothing.
	pub fn delete_image(&self, id: ImageId) -> CmsResult<usize> {
		let mut state = self.state.write();
		state
			.images
			.shift_remove(&id)
			.ok_or_else(|| CmsError::ImageNotFound(id.to_string()))?;

		let mut cleared = 0;
		for page in state.pages.values_mut() {
			for reference in page.image_refs_mut() {
				if reference.clear_if(id) {
					cleared += 1;
				}
			}
		}
		tracing::info!(image = %id, references_cleared = cleared, "image deleted");
		Ok(cleared)
	}

	// Contact form fields

	/// Append a field to a contact page's form
	pub fn add_form_field(&self, page: PageId, definition: FormFieldDefinition) -> CmsResult<FormFieldId> {
		let mut state = self.state.write();
		state.require_contact_page(page)?;

		let records = state.form_records(page);
		let mut definitions: Vec<FormFieldDefinition> =
			records.iter().map(|r| r.definition.clone()).collect();
		definitions.push(definition.clone());
		validate_definitions(&definitions)?;

		let sort_order = records.last().map_or(0, |r| r.sort_order + 1);
		let record = FormFieldRecord::new(page, sort_order, definition);
		let id = record.id;
		state.form_fields.insert(id, record);
		Ok(id)
	}

	/// Replace the whole form of a contact page, keeping the given order
	pub fn set_form_fields(
		&self,
		page: PageId,
		definitions: Vec<FormFieldDefinition>,
	) -> CmsResult<Vec<FormFieldId>> {
		validate_definitions(&definitions)?;

		let mut state = self.state.write();
		state.require_contact_page(page)?;
		state.form_fields.retain(|_, f| f.page != page);

		let mut ids = Vec::with_capacity(definitions.len());
		for (sort_order, definition) in definitions.into_iter().enumerate() {
			let record = FormFieldRecord::new(page, sort_order, definition);
			ids.push(record.id);
			state.form_fields.insert(record.id, record);
		}
		tracing::debug!(page = %page, fields = ids.len(), "contact form fields replaced");
		Ok(ids)
	}

	/// Fields of a page's form, in display order
	pub fn form_fields(&self, page: PageId) -> Vec<FormFieldRecord> {
		self.state.read().form_records(page)
	}

	pub fn form_definitions(&self, page: PageId) -> Vec<FormFieldDefinition> {
		self.form_fields(page)
			.into_iter()
			.map(|r| r.definition)
			.collect()
	}

	pub fn delete_form_field(&self, id: FormFieldId) -> CmsResult<()> {
		self.state
			.write()
			.form_fields
			.shift_remove(&id)
			.map(|_| ())
			.ok_or_else(|| CmsError::Generic(format!("Form field not found: {}", id)))
	}

	// Submissions

	/// Store a validated submission
	pub fn record_submission(
		&self,
		page: PageId,
		form_data: IndexMap<String, JsonValue>,
	) -> CmsResult<FormSubmission> {
		let mut state = self.state.write();
		state.require_contact_page(page)?;
		let submission = FormSubmission::new(page, form_data, Utc::now());
		state.submissions.insert(submission.id, submission.clone());
		Ok(submission)
	}

	/// Submissions of a page, oldest first
	pub fn submissions(&self, page: PageId) -> Vec<FormSubmission> {
		self.state
			.read()
			.submissions
			.values()
			.filter(|s| s.page == page)
			.cloned()
			.collect()
	}

	pub fn submission_count(&self, page: PageId) -> usize {
		self.state
			.read()
			.submissions
			.values()
			.filter(|s| s.page == page)
			.count()
	}

	pub fn delete_submission(&self, id: SubmissionId) -> CmsResult<()> {
		self.state
			.write()
			.submissions
			.shift_remove(&id)
			.map(|_| ())
			.ok_or_else(|| CmsError::Generic(format!("Submission not found: {}", id)))
	}

	// Sites

	/// Register a site; a new default site replaces the previous default
	pub fn add_site(&self, site: Site) -> CmsResult<SiteId> {
		let mut state = self.state.write();
		if let Some(root) = site.root_page.id() {
			state.require_page(root)?;
		}
		if state
			.sites
			.values()
			.any(|s| s.hostname.eq_ignore_ascii_case(&site.hostname) && s.port == site.port)
		{
			return Err(CmsError::Validation(ValidationErrors::single(
				"hostname",
				format!("A site with {}:{} already exists", site.hostname, site.port),
			)));
		}
		if site.is_default {
			for other in state.sites.values_mut() {
				other.is_default = false;
			}
		}
		let id = site.id;
		tracing::info!(site = %id, hostname = %site.hostname, port = site.port, "site added");
		state.sites.insert(id, site);
		Ok(id)
	}

	pub fn site(&self, id: SiteId) -> Option<Site> {
		self.state.read().sites.get(&id).cloned()
	}

	pub fn sites(&self) -> Vec<Site> {
		self.state.read().sites.values().cloned().collect()
	}

	pub fn default_site(&self) -> Option<Site> {
		self.state
			.read()
			.sites
			.values()
			.find(|s| s.is_default)
			.cloned()
	}

	/// Site serving a request to `hostname`, falling back to the default site
	pub fn find_site(&self, hostname: &str, port: Option<u16>) -> Option<Site> {
		let state = self.state.read();
		match_site(state.sites.values(), hostname, port).cloned()
	}

	pub fn delete_site(&self, id: SiteId) -> CmsResult<Site> {
		self.state
			.write()
			.sites
			.shift_remove(&id)
			.ok_or_else(|| CmsError::SiteNotFound(id.to_string()))
	}
}

impl Default for ContentStore {
	fn default() -> Self {
		Self::new()
	}
}

impl Resolver<ImageId> for ContentStore {
	type Target = Image;

	fn resolve(&self, id: ImageId) -> Option<Image> {
		self.image(id)
	}
}

impl Resolver<PageId> for ContentStore {
	type Target = AnyPage;

	fn resolve(&self, id: PageId) -> Option<AnyPage> {
		self.any_page(id)
	}
}
