//! The formation block
//!
//! Describes one training course: a small badge, a title, a short
//! description, an illustration and a list of key points. Used by the
//! home page preview and by the formations page.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use vitrine_forms::validators::validate_max_length;

use crate::blocks::{Block, BlockLibrary, BlockMeta, BlockType};
use crate::error::{CmsResult, ValidationErrors};
use crate::references::{ImageId, WeakRef};

/// Stream type name of the block
pub const FORMATION_BLOCK_TYPE: &str = "formation";

/// Maximum title length, in characters
pub const TITLE_MAX_LENGTH: usize = 120;

const REQUIRED: &str = "This field is required.";

/// Admin metadata of the block
pub const FORMATION_BLOCK_META: BlockMeta = BlockMeta {
	label: "Formation",
	icon: "cog",
	help_text: "Bloc réutilisable pour présenter une formation avec une image.",
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationBlock {
	/// Short text above the title, e.g. `01`
	pub badge: String,
	pub title: String,
	pub description: String,
	pub image: WeakRef<ImageId>,
	/// Key points, in display order
	pub features: Vec<String>,
}

impl FormationBlock {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
		self.badge = badge.into();
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_image(mut self, image: ImageId) -> Self {
		self.image = WeakRef::to(image);
		self
	}

	pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
		self.features.push(feature.into());
		self
	}
}

impl Block for FormationBlock {
	fn block_type(&self) -> BlockType {
		FORMATION_BLOCK_TYPE.to_string()
	}

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		if self.title.trim().is_empty() {
			errors.add("title", REQUIRED);
		} else if let Err(e) = validate_max_length(&self.title, TITLE_MAX_LENGTH) {
			errors.add("title", e.to_string());
		}
		for (index, feature) in self.features.iter().enumerate() {
			if feature.trim().is_empty() {
				errors.add(format!("features.{}", index), REQUIRED);
			}
		}
		errors.into_result()
	}

	fn to_json(&self) -> CmsResult<JsonValue> {
		Ok(serde_json::to_value(self)?)
	}

	fn from_json(value: JsonValue) -> CmsResult<Self> {
		Ok(serde_json::from_value(value)?)
	}
}

/// Library of the blocks allowed in formation streams
pub fn formation_library() -> BlockLibrary {
	let mut library = BlockLibrary::new();
	library.register_block::<FormationBlock>(FORMATION_BLOCK_TYPE, FORMATION_BLOCK_META);
	library
}
