//! The editor's atomic content unit and its unified-access trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stable identity for a block, assigned by the external editor.
///
/// Unlike a content hash, this identity is opaque to the core: it is
/// whatever key the editor's block AST already uses, passed through
/// unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlockId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BlockId(s.to_string()))
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

/// The kind of a block as seen by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockKind {
    /// A heading with an explicit level (1-6). The level the editor assigns
    /// may be missing, wrong, or inconsistent with visual styling — the
    /// Structure Engine treats it as one signal among several, not ground
    /// truth.
    Heading { level: u8 },
    Paragraph,
    List,
    Quote,
}

impl BlockKind {
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockKind::Heading { level } => Some(*level),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::List)
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, BlockKind::Quote)
    }
}

/// Text alignment, a style attribute used by the heading scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Style attributes carried by a block, as reported by the editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStyle {
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub alignment: Alignment,
}

impl BlockStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A thin content wrapper. The core only ever needs the plain-text
/// projection of a block's content; richer content (tables, media) is the
/// editor's concern and is represented here only as text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockContent {
    pub text: String,
}

impl BlockContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// An immutable snapshot of one top-level element of the editor's linear
/// block sequence.
///
/// Blocks are owned by the editor; the core treats them as read-only
/// snapshots for the duration of one structure-build pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub content: BlockContent,
    pub style: BlockStyle,
    /// Zero-based position in the document's block sequence.
    pub position: usize,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            kind,
            content: BlockContent::new(text),
            style: BlockStyle::default(),
            position,
        }
    }

    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = style;
        self
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId(s)
    }
}

/// A minimal, host-agnostic view over a block.
///
/// Feature extraction in `docmind-structure` is generic over
/// `T: UnifiedBlock` so it never depends on whether blocks came from the
/// live editor or a persisted AST snapshot — both sources route through
/// this trait. `Block` is the only implementation shipped in this crate;
/// editor adapters living outside this crate provide their own.
pub trait UnifiedBlock {
    fn identity(&self) -> &BlockId;
    fn kind(&self) -> &BlockKind;
    fn text(&self) -> &str;
    fn style(&self) -> &BlockStyle;
    fn position(&self) -> usize;
}

impl UnifiedBlock for Block {
    fn identity(&self) -> &BlockId {
        &self.id
    }

    fn kind(&self) -> &BlockKind {
        &self.kind
    }

    fn text(&self) -> &str {
        &self.content.text
    }

    fn style(&self) -> &BlockStyle {
        &self.style
    }

    fn position(&self) -> usize {
        self.position
    }
}
