//! Paragraph roles: a total function from block identity to a coarse
//! semantic label.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRole {
    DocTitle,
    SectionTitle,
    Body,
    ListItem,
    Quote,
    Meta,
    Unknown,
}

impl Default for ParagraphRole {
    fn default() -> Self {
        ParagraphRole::Unknown
    }
}
