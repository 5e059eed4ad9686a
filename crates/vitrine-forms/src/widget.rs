//! Presentation hints attached to built fields

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
	TextInput,
	Textarea,
	EmailInput,
	NumberInput,
	UrlInput,
	CheckboxInput,
	CheckboxSelectMultiple,
	Select,
	SelectMultiple,
	RadioSelect,
	DateInput,
	DateTimeInput,
	HiddenInput,
}

/// Widget kind plus HTML attributes, consumed by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
	pub kind: WidgetKind,
	pub attrs: IndexMap<String, String>,
}

impl Widget {
	pub fn new(kind: WidgetKind) -> Self {
		Self {
			kind,
			attrs: IndexMap::new(),
		}
	}

	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs.get(name).map(String::as_str)
	}

	pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.attrs.insert(name.into(), value.into());
	}
}
