use crate::constants::{PAGE_BLOCK_TYPE, TITLE_SUPPRESSED_TYPES};
use crate::types::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `type` tag of a block record (`page`, `text`, `divider`, ...).
///
/// The set of tags is open-ended, so the tag is kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(String);

impl BlockType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_page(&self) -> bool {
        self.0 == PAGE_BLOCK_TYPE
    }

    /// Whether titles of this type are always reported as absent.
    pub fn suppresses_title(&self) -> bool {
        TITLE_SUPPRESSED_TYPES.contains(&self.0.as_str())
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A node of the workspace content tree.
///
/// Children are referenced by id only; resolving one means fetching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub title: Option<String>,
    pub block_type: Option<BlockType>,
    pub parent_id: Option<BlockId>,
    pub children: Vec<BlockId>,
}

impl Block {
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the type tag, or `"unknown"` when the record carried none.
    pub fn type_name(&self) -> &str {
        self.block_type
            .as_ref()
            .map(BlockType::as_str)
            .unwrap_or("unknown")
    }

    pub fn is_page(&self) -> bool {
        self.block_type.as_ref().is_some_and(BlockType::is_page)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
