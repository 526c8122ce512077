// src/api/parser.rs
//! Typed field extraction from record snapshots.
//!
//! The service stores records as loosely-typed JSON whose shape varies by
//! block type. Everything here is defensive: a missing category, record,
//! `value` or field degrades to `None` or an empty list and is never an
//! error. The shape of a record is decided once, in [`BlockRecord::read`],
//! and every `extract_*` function goes through it.

use super::types::RecordSnapshot;
use crate::model::{Block, BlockPropsAndFormat, BlockType, CollectionInfo};
use crate::types::BlockId;
use serde_json::{Map, Value};

/// Separator placed between title fragments on every path.
const TITLE_FRAGMENT_SEPARATOR: &str = " ";

/// Where a record keeps its title inside `properties`.
///
/// Text blocks use `title`, media blocks use `source`; anything else falls
/// back to the alphabetically first key of `properties`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TitleStorage<'a> {
    Text(&'a Value),
    Source(&'a Value),
    Other { key: &'a str, value: &'a Value },
    Untitled,
}

impl<'a> TitleStorage<'a> {
    /// Classifies a record's `properties` object.
    pub fn of(properties: Option<&'a Map<String, Value>>) -> Self {
        let Some(properties) = properties else {
            return TitleStorage::Untitled;
        };

        if let Some(value) = properties.get("title") {
            TitleStorage::Text(value)
        } else if let Some(value) = properties.get("source") {
            TitleStorage::Source(value)
        } else if let Some((key, value)) = properties.iter().next() {
            TitleStorage::Other {
                key: key.as_str(),
                value,
            }
        } else {
            TitleStorage::Untitled
        }
    }

    fn raw(&self) -> Option<&'a Value> {
        match *self {
            TitleStorage::Text(value) | TitleStorage::Source(value) => Some(value),
            TitleStorage::Other { value, .. } => Some(value),
            TitleStorage::Untitled => None,
        }
    }

    /// Flattens the stored rich text and joins the fragments with a space.
    pub fn text(&self) -> Option<String> {
        self.raw().map(join_title_fragments)
    }
}

/// One block record, with its shape resolved.
#[derive(Debug, Clone)]
pub struct BlockRecord<'a> {
    id: &'a BlockId,
    value: &'a Map<String, Value>,
}

impl<'a> BlockRecord<'a> {
    /// Looks up `id` in the snapshot's `block` category.
    pub fn read(id: &'a BlockId, snapshot: &'a RecordSnapshot) -> Option<Self> {
        let blocks = filter_nil_blocks(snapshot)?;
        let value = blocks.get(id.as_str())?.get("value")?.as_object()?;
        Some(Self { id, value })
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.value
            .get("type")
            .and_then(Value::as_str)
            .map(BlockType::from)
    }

    pub fn title_storage(&self) -> TitleStorage<'a> {
        TitleStorage::of(self.value.get("properties").and_then(Value::as_object))
    }

    /// The title, honouring the type suppression policy.
    pub fn title(&self) -> Option<String> {
        if self
            .block_type()
            .is_some_and(|block_type| block_type.suppresses_title())
        {
            return None;
        }
        self.title_storage().text()
    }

    pub fn parent_id(&self) -> Option<BlockId> {
        self.id_field("parent_id")
    }

    pub fn children_ids(&self) -> Vec<BlockId> {
        self.id_list("content")
    }

    pub fn collection_id(&self) -> Option<BlockId> {
        self.id_field("collection_id")
    }

    pub fn view_ids(&self) -> Vec<BlockId> {
        self.id_list("view_ids")
    }

    pub fn properties(&self) -> Option<&'a Value> {
        self.value.get("properties")
    }

    pub fn format(&self) -> Option<&'a Value> {
        self.value.get("format")
    }

    /// Materializes the record as a [`Block`].
    pub fn to_block(&self) -> Block {
        Block {
            id: self.id.clone(),
            title: self.title(),
            block_type: self.block_type(),
            parent_id: self.parent_id(),
            children: self.children_ids(),
        }
    }

    fn id_field(&self, field: &str) -> Option<BlockId> {
        let raw = self.value.get(field)?.as_str()?;
        match BlockId::parse(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                log::debug!(
                    "Ignoring malformed {} '{}' on block {}",
                    field,
                    raw,
                    self.id
                );
                None
            }
        }
    }

    fn id_list(&self, field: &str) -> Vec<BlockId> {
        let Some(items) = self.value.get(field).and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let raw = item.as_str()?;
                match BlockId::parse(raw) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!("Skipping {} entry on block {}: {}", field, self.id, e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// The `block` category when the snapshot has one with at least one record.
pub fn filter_nil_blocks(snapshot: &RecordSnapshot) -> Option<&Map<String, Value>> {
    snapshot.blocks()
}

pub fn extract_title(id: &BlockId, snapshot: &RecordSnapshot) -> Option<String> {
    BlockRecord::read(id, snapshot)?.title()
}

pub fn extract_type(id: &BlockId, snapshot: &RecordSnapshot) -> Option<BlockType> {
    BlockRecord::read(id, snapshot)?.block_type()
}

pub fn extract_parent_id(id: &BlockId, snapshot: &RecordSnapshot) -> Option<BlockId> {
    BlockRecord::read(id, snapshot)?.parent_id()
}

pub fn extract_children_ids(id: &BlockId, snapshot: &RecordSnapshot) -> Vec<BlockId> {
    BlockRecord::read(id, snapshot)
        .map(|record| record.children_ids())
        .unwrap_or_default()
}

pub fn extract_collection_id(id: &BlockId, snapshot: &RecordSnapshot) -> Option<BlockId> {
    BlockRecord::read(id, snapshot)?.collection_id()
}

pub fn extract_view_ids(id: &BlockId, snapshot: &RecordSnapshot) -> Vec<BlockId> {
    BlockRecord::read(id, snapshot)
        .map(|record| record.view_ids())
        .unwrap_or_default()
}

/// Reads the `name` of a record in the `collection` category.
pub fn extract_collection_title(
    collection_id: &BlockId,
    snapshot: &RecordSnapshot,
) -> Option<String> {
    snapshot
        .record_value("collection", collection_id.as_str())?
        .get("name")
        .map(join_title_fragments)
}

/// Reads everything about a collection view block in one pass.
pub fn extract_collection_info(id: &BlockId, snapshot: &RecordSnapshot) -> Option<CollectionInfo> {
    let record = BlockRecord::read(id, snapshot)?;
    let collection_id = record.collection_id();
    let title = collection_id
        .as_ref()
        .and_then(|collection_id| extract_collection_title(collection_id, snapshot));

    Some(CollectionInfo {
        block_id: id.clone(),
        collection_id,
        view_ids: record.view_ids(),
        title,
    })
}

pub fn extract_props_and_format(
    id: &BlockId,
    snapshot: &RecordSnapshot,
) -> Option<BlockPropsAndFormat> {
    let record = BlockRecord::read(id, snapshot)?;
    Some(BlockPropsAndFormat {
        properties: record.properties().cloned().unwrap_or(Value::Null),
        format: record.format().cloned().unwrap_or(Value::Null),
    })
}

/// Materializes `id` as a [`Block`], or `None` when the snapshot lacks it.
pub fn parse_block(id: &BlockId, snapshot: &RecordSnapshot) -> Option<Block> {
    BlockRecord::read(id, snapshot).map(|record| record.to_block())
}

/// Flattens a rich-text value into its text fragments and joins them.
pub fn join_title_fragments(value: &Value) -> String {
    let mut fragments = Vec::new();
    collect_fragments(value, &mut fragments);
    fragments.join(TITLE_FRAGMENT_SEPARATOR)
}

// Rich text is a list of segments; a segment is `[text]` or
// `[text, [annotations...]]`. Annotation markers are not text.
fn collect_fragments<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(text) => out.push(text),
        Value::Array(items) => match items.first() {
            Some(Value::String(text)) => out.push(text),
            _ => items.iter().for_each(|item| collect_fragments(item, out)),
        },
        _ => {}
    }
}
