use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Character offsets at which hyphens are inserted into a bare 32-char id,
/// applied left to right so each insertion shifts the ones after it.
const HYPHEN_OFFSETS: [usize; 4] = [8, 13, 18, 23];

const CANONICAL_LENGTH: usize = 36;
const COMPACT_LENGTH: usize = 32;

lazy_static::lazy_static! {
    static ref URL_SCHEME: Regex =
        Regex::new(r"^(http|https)").expect("Failed to compile URL scheme regex - this is a bug in the code");
}

/// A block identifier in canonical hyphenated form (8-4-4-4-12).
///
/// Every `BlockId` has passed through [`normalize`]; no other representation
/// is accepted by the fetcher or the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(String);

impl BlockId {
    /// Parses a page URL, a bare 32-char id, or a canonical id.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize_block_id(input).map(BlockId)
    }

    /// Returns the canonical hyphenated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id without hyphens, the form Notion uses inside page URLs.
    pub fn to_compact(&self) -> String {
        self.0.replace('-', "")
    }

    /// Interprets the id as a UUID when its characters are hexadecimal.
    pub fn as_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.0).ok()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for BlockId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BlockId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalizes a page URL or id into a canonical [`BlockId`].
pub fn normalize(url_or_id: &str) -> Result<BlockId, ValidationError> {
    BlockId::parse(url_or_id)
}

/// Returns true when `id` has the length of an un-hyphenated Notion id.
pub fn check_id_length(id: &str) -> bool {
    id.len() == COMPACT_LENGTH
}

fn normalize_block_id(input: &str) -> Result<String, ValidationError> {
    let is_url = URL_SCHEME.is_match(input);

    // Already canonical
    if input.len() == CANONICAL_LENGTH && input.split('-').count() == 5 && !is_url {
        return Ok(input.to_string());
    }

    // For URLs the id is the last hyphen-separated segment of the slug
    let token = input.rsplit('-').next().unwrap_or(input);
    let shaped = if is_url {
        token.len() == COMPACT_LENGTH
    } else {
        input.len() == COMPACT_LENGTH && token.len() == COMPACT_LENGTH
    };

    if shaped && token.is_ascii() {
        Ok(hyphenate(token))
    } else {
        Err(ValidationError::InvalidIdentifier {
            input: input.to_string(),
        })
    }
}

fn hyphenate(compact: &str) -> String {
    let mut id = String::with_capacity(CANONICAL_LENGTH);
    id.push_str(compact);
    for offset in HYPHEN_OFFSETS {
        id.insert(offset, '-');
    }
    id
}
