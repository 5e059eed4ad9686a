//! StreamField-style content blocks
//!
//! A [`StreamField`] is an ordered sequence of typed blocks, stored as
//! `{"type", "value", "id"}` records. Block types are registered in a
//! [`BlockLibrary`]; a stream only accepts the types its library knows.

use crate::error::{CmsError, CmsResult, ValidationErrors};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use uuid::Uuid;
use vitrine_forms::ALL_FIELDS_KEY;

/// Block type identifier
pub type BlockType = String;

/// Errors of a stream, keyed by block position
pub type BlockErrors = BTreeMap<usize, ValidationErrors>;

/// Factory function that creates a block from JSON data
type BlockFactory = Box<dyn Fn(JsonValue) -> CmsResult<Box<dyn Block>> + Send + Sync>;

/// Block trait for all content blocks
pub trait Block: Send + Sync {
	/// Get the block type identifier
	fn block_type(&self) -> BlockType;

	/// Check field constraints, reporting messages per block field
	fn validate(&self) -> Result<(), ValidationErrors>;

	/// Serialize block data to JSON
	fn to_json(&self) -> CmsResult<JsonValue>;

	/// Deserialize block data from JSON
	fn from_json(value: JsonValue) -> CmsResult<Self>
	where
		Self: Sized;
}

/// Admin metadata of a block type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockMeta {
	/// Label in the block picker
	pub label: &'static str,
	/// Icon name
	pub icon: &'static str,
	/// Help text shown above the block form
	pub help_text: &'static str,
}

/// StreamField containing a sequence of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamField {
	/// Ordered list of blocks
	blocks: Vec<StreamBlock>,
}

/// A block instance in a StreamField
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamBlock {
	/// Block type
	#[serde(rename = "type")]
	pub block_type: BlockType,

	/// Block data (JSON)
	pub value: JsonValue,

	/// Stable id used by the editor to track the block
	#[serde(default = "new_block_id")]
	pub id: String,
}

fn new_block_id() -> String {
	Uuid::new_v4().to_string()
}

impl StreamBlock {
	/// Create a block instance with a fresh id
	pub fn new(block_type: impl Into<BlockType>, value: JsonValue) -> Self {
		Self {
			block_type: block_type.into(),
			value,
			id: new_block_id(),
		}
	}

	/// Wrap a typed block
	pub fn from_block(block: &dyn Block) -> CmsResult<Self> {
		Ok(Self::new(block.block_type(), block.to_json()?))
	}
}

impl StreamField {
	/// Create a new empty StreamField
	pub fn new() -> Self {
		Self { blocks: Vec::new() }
	}

	/// Add a block to the field
	pub fn add_block(&mut self, block: StreamBlock) -> &mut Self {
		self.blocks.push(block);
		self
	}

	/// Builder form of [`StreamField::add_block`]
	pub fn with_block(mut self, block: StreamBlock) -> Self {
		self.blocks.push(block);
		self
	}

	/// Get all blocks
	pub fn blocks(&self) -> &[StreamBlock] {
		&self.blocks
	}

	/// Number of blocks
	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	/// Whether the stream has no block
	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	/// Move the block at `from` to position `to`
	pub fn move_block(&mut self, from: usize, to: usize) -> CmsResult<()> {
		if from >= self.blocks.len() || to >= self.blocks.len() {
			return Err(CmsError::Generic(format!(
				"Block position out of range: {} -> {} (stream has {} blocks)",
				from,
				to,
				self.blocks.len()
			)));
		}
		let block = self.blocks.remove(from);
		self.blocks.insert(to, block);
		Ok(())
	}

	/// Validate every block independently
	///
	/// An unknown type or undecodable value is reported against the block
	/// like any other error; the remaining blocks are still checked.
	pub fn validate(&self, library: &BlockLibrary) -> Result<(), BlockErrors> {
		let mut errors = BlockErrors::new();
		for (index, block) in self.blocks.iter().enumerate() {
			let result = library
				.create_block(&block.block_type, block.value.clone())
				.map_err(|e| ValidationErrors::single(ALL_FIELDS_KEY, e.to_string()))
				.and_then(|instance| instance.validate());
			if let Err(block_errors) = result {
				errors.insert(index, block_errors);
			}
		}
		if errors.is_empty() { Ok(()) } else { Err(errors) }
	}

	/// Decode every block of `block_type` into `T`, in stream order
	pub fn typed<T: Block>(&self, block_type: &str) -> CmsResult<Vec<T>> {
		self.blocks
			.iter()
			.filter(|b| b.block_type == block_type)
			.map(|b| T::from_json(b.value.clone()))
			.collect()
	}
}

/// Registry of available block types
pub struct BlockLibrary {
	blocks: IndexMap<BlockType, (BlockMeta, BlockFactory)>,
}

impl BlockLibrary {
	/// Create a new block library
	pub fn new() -> Self {
		Self {
			blocks: IndexMap::new(),
		}
	}

	/// Register a block type
	pub fn register<F>(&mut self, block_type: impl Into<BlockType>, meta: BlockMeta, factory: F)
	where
		F: Fn(JsonValue) -> CmsResult<Box<dyn Block>> + Send + Sync + 'static,
	{
		self.blocks
			.insert(block_type.into(), (meta, Box::new(factory)));
	}

	/// Register a block type decoded by its own [`Block::from_json`]
	pub fn register_block<T>(&mut self, block_type: impl Into<BlockType>, meta: BlockMeta)
	where
		T: Block + 'static,
	{
		self.register(block_type, meta, |value| {
			T::from_json(value).map(|b| Box::new(b) as Box<dyn Block>)
		});
	}

	/// Create a block instance from JSON
	pub fn create_block(&self, block_type: &str, data: JsonValue) -> CmsResult<Box<dyn Block>> {
		let (_, factory) = self
			.blocks
			.get(block_type)
			.ok_or_else(|| CmsError::UnknownBlockType(block_type.to_string()))?;

		factory(data)
	}

	/// Admin metadata of a registered type
	pub fn meta(&self, block_type: &str) -> Option<&BlockMeta> {
		self.blocks.get(block_type).map(|(meta, _)| meta)
	}

	/// Registered types, in registration order
	pub fn block_types(&self) -> impl Iterator<Item = &str> {
		self.blocks.keys().map(String::as_str)
	}

	pub fn contains(&self, block_type: &str) -> bool {
		self.blocks.contains_key(block_type)
	}
}

impl Default for BlockLibrary {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	// Test helper: a block with one required text field
	struct QuoteBlock {
		text: String,
	}

	impl Block for QuoteBlock {
		fn block_type(&self) -> BlockType {
			"quote".to_string()
		}

		fn validate(&self) -> Result<(), ValidationErrors> {
			if self.text.is_empty() {
				Err(ValidationErrors::single("text", "This field is required."))
			} else {
				Ok(())
			}
		}

		fn to_json(&self) -> CmsResult<JsonValue> {
			Ok(json!({ "text": self.text }))
		}

		fn from_json(value: JsonValue) -> CmsResult<Self> {
			Ok(Self {
				text: value["text"].as_str().unwrap_or("").to_string(),
			})
		}
	}

	fn library() -> BlockLibrary {
		let mut library = BlockLibrary::new();
		library.register_block::<QuoteBlock>(
			"quote",
			BlockMeta {
				label: "Quote",
				icon: "openquote",
				help_text: "",
			},
		);
		library
	}

	#[rstest]
	fn test_errors_are_reported_per_block_index() {
		// Arrange
		let stream = StreamField::new()
			.with_block(StreamBlock::new("quote", json!({ "text": "ok" })))
			.with_block(StreamBlock::new("quote", json!({ "text": "" })))
			.with_block(StreamBlock::new("video", json!({})));

		// Act
		let errors = stream.validate(&library()).unwrap_err();

		// Assert
		assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
		assert!(errors[&1].contains("text"));
		assert_eq!(
			errors[&2].get(ALL_FIELDS_KEY),
			Some(&["Block type not registered: video".to_string()][..])
		);
	}

	#[rstest]
	fn test_empty_stream_is_valid() {
		assert!(StreamField::new().validate(&library()).is_ok());
	}

	#[rstest]
	fn test_stream_json_shape() {
		// Arrange
		let block = StreamBlock::new("quote", json!({ "text": "Bonjour" }));
		let id = block.id.clone();
		let stream = StreamField::new().with_block(block);

		// Act
		let value = serde_json::to_value(&stream).unwrap();

		// Assert
		assert_eq!(
			value,
			json!([{ "type": "quote", "value": { "text": "Bonjour" }, "id": id }])
		);
	}

	#[rstest]
	fn test_block_without_id_gets_one_on_load() {
		// Act
		let stream: StreamField =
			serde_json::from_value(json!([{ "type": "quote", "value": { "text": "a" } }])).unwrap();

		// Assert
		assert!(!stream.blocks()[0].id.is_empty());
	}

	#[rstest]
	fn test_move_block() {
		// Arrange
		let mut stream = StreamField::new()
			.with_block(StreamBlock::new("quote", json!({ "text": "a" })))
			.with_block(StreamBlock::new("quote", json!({ "text": "b" })));

		// Act
		stream.move_block(1, 0).unwrap();

		// Assert
		let texts: Vec<&str> = stream
			.blocks()
			.iter()
			.map(|b| b.value["text"].as_str().unwrap())
			.collect();
		assert_eq!(texts, vec!["b", "a"]);
		assert!(stream.move_block(0, 2).is_err());
	}
}
