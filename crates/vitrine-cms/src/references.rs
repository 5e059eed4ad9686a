//! Typed identifiers and weak cross-references
//!
//! Content links to images and other pages without owning them. A
//! [`WeakRef`] holds the target id or nothing; deleting the target sets
//! stored references back to nothing, and resolving a reference whose
//! target is gone yields `None` instead of an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Generate a fresh random id
			pub fn new() -> Self {
				Self(Uuid::new_v4())
			}

			/// Wrap an existing UUID
			pub fn from_uuid(uuid: Uuid) -> Self {
				Self(uuid)
			}

			/// Underlying UUID
			pub fn as_uuid(&self) -> Uuid {
				self.0
			}
		}

		impl Default for $name {
			fn default() -> Self {
				Self::new()
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				fmt::Display::fmt(&self.0, f)
			}
		}
	};
}

entity_id!(
	/// Identifier of a page in the page tree
	PageId
);
entity_id!(
	/// Identifier of an image in the external image library
	ImageId
);
entity_id!(
	/// Identifier of a site
	SiteId
);
entity_id!(
	/// Identifier of a contact form field record
	FormFieldId
);
entity_id!(
	/// Identifier of a stored form submission
	SubmissionId
);

/// Looks up the target of a reference
pub trait Resolver<I> {
	/// What a resolved reference yields
	type Target;

	/// The target, or `None` if it does not exist
	fn resolve(&self, id: I) -> Option<Self::Target>;
}

/// Nullable, non-owning reference to an entity
///
/// Serialized as the target id or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeakRef<I>(Option<I>);

impl<I> Default for WeakRef<I> {
	fn default() -> Self {
		Self(None)
	}
}

impl<I: Copy + PartialEq> WeakRef<I> {
	/// A reference pointing nowhere
	pub fn unset() -> Self {
		Self(None)
	}

	/// A reference to `id`
	pub fn to(id: I) -> Self {
		Self(Some(id))
	}

	pub fn id(&self) -> Option<I> {
		self.0
	}

	pub fn is_set(&self) -> bool {
		self.0.is_some()
	}

	pub fn set(&mut self, id: I) {
		self.0 = Some(id);
	}

	pub fn clear(&mut self) {
		self.0 = None;
	}

	/// Unset the reference if it points at `id`; returns whether it did
	pub fn clear_if(&mut self, id: I) -> bool {
		if self.0 == Some(id) {
			self.0 = None;
			true
		} else {
			false
		}
	}

	/// Resolve through `resolver`; a dangling or unset reference yields `None`
	pub fn resolve<R>(&self, resolver: &R) -> Option<R::Target>
	where
		R: Resolver<I> + ?Sized,
	{
		self.0.and_then(|id| resolver.resolve(id))
	}
}

impl<I> From<Option<I>> for WeakRef<I> {
	fn from(id: Option<I>) -> Self {
		Self(id)
	}
}
