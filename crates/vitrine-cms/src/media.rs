//! Images referenced by content
//!
//! Files and renditions are handled by the image library of the hosting
//! environment; the store only keeps what content needs to point at them.

use serde::{Deserialize, Serialize};

use crate::references::ImageId;

/// An image of the external image library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
	/// Image id
	pub id: ImageId,
	/// Title shown in the image chooser, also used as alt text
	pub title: String,
	/// Storage path of the original file
	pub file: String,
}

impl Image {
	pub fn new(title: impl Into<String>, file: impl Into<String>) -> Self {
		Self {
			id: ImageId::new(),
			title: title.into(),
			file: file.into(),
		}
	}
}
