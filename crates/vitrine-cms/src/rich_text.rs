//! Rich text values
//!
//! Editing happens in the admin's rich-text editor; here the value is the
//! HTML it produces.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_REGEX: invalid regex pattern"));

/// HTML produced by the rich-text editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
	pub fn new(html: impl Into<String>) -> Self {
		Self(html.into())
	}

	pub fn as_html(&self) -> &str {
		&self.0
	}

	/// Text content with tags removed and whitespace collapsed
	///
	/// ```
	/// use vitrine_cms::rich_text::RichText;
	///
	/// let text = RichText::new("<p>Merci&nbsp;!</p>\n<p>À bientôt</p>");
	/// assert_eq!(text.plain_text(), "Merci ! À bientôt");
	/// ```
	pub fn plain_text(&self) -> String {
		let stripped = TAG_REGEX.replace_all(&self.0, " ");
		stripped
			.replace("&nbsp;", " ")
			.split_whitespace()
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// True when there is no visible text, e.g. `<p><br/></p>`
	pub fn is_blank(&self) -> bool {
		self.plain_text().is_empty()
	}
}

impl From<&str> for RichText {
	fn from(html: &str) -> Self {
		Self::new(html)
	}
}

impl fmt::Display for RichText {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
