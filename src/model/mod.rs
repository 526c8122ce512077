mod block;

pub use block::{Block, BlockType};

use crate::error::AppError;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A block whose type is `page`; the only kind of root `get_page` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Block", into = "Block")]
pub struct PageBlock(Block);

impl PageBlock {
    pub fn id(&self) -> &BlockId {
        &self.0.id
    }

    /// Get the page title
    pub fn title(&self) -> Option<&str> {
        self.0.title()
    }

    pub fn parent_id(&self) -> Option<&BlockId> {
        self.0.parent_id.as_ref()
    }

    pub fn children(&self) -> &[BlockId] {
        &self.0.children
    }

    pub fn as_block(&self) -> &Block {
        &self.0
    }
}

impl TryFrom<Block> for PageBlock {
    type Error = AppError;

    fn try_from(block: Block) -> Result<Self, Self::Error> {
        if block.is_page() {
            Ok(PageBlock(block))
        } else {
            Err(AppError::NotAPage {
                actual_type: block.type_name().to_string(),
                id: block.id,
            })
        }
    }
}

impl From<PageBlock> for Block {
    fn from(page: PageBlock) -> Self {
        page.0
    }
}

/// A resolved block together with its resolved descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub block: Block,
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    /// Builds the subtree under `block` from already-resolved blocks.
    ///
    /// `discovered` maps a parent to the children fetched through it, in
    /// document order. Each resolved block is placed at most once; ids
    /// missing from `resolved` are left out.
    pub fn assemble(
        block: Block,
        discovered: &HashMap<BlockId, Vec<BlockId>>,
        resolved: &mut HashMap<BlockId, Block>,
    ) -> Self {
        let children = discovered
            .get(&block.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| resolved.remove(id))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into_iter()
            .map(|child| BlockNode::assemble(child, discovered, resolved))
            .collect();
        Self { block, children }
    }

    /// Number of blocks in this subtree, root included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(BlockNode::len).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(BlockNode::depth).max().unwrap_or(0)
    }
}

/// Collection metadata carried by a `collection_view` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub block_id: BlockId,
    pub collection_id: Option<BlockId>,
    pub view_ids: Vec<BlockId>,
    pub title: Option<String>,
}

/// The raw `properties` and `format` objects of a block record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPropsAndFormat {
    pub properties: Value,
    pub format: Value,
}

impl BlockPropsAndFormat {
    /// The value used when the block cannot be loaded: only the caller's
    /// title, stored the way the service stores titles.
    pub fn with_fallback_title(title: &str) -> Self {
        Self {
            properties: serde_json::json!({ "title": [[title]] }),
            format: serde_json::json!({}),
        }
    }
}
