//! Serialized layout of the document
//!
//! Text units and tokens share one record shape and differ only in `type`:
//!
//! ```json
//! { "text": "{{A|B}}", "format": 0, "detail": 0, "mode": "normal",
//!   "style": "", "type": "token", "version": 1 }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{TextAttrs, TextMode};

pub const TEXT_TYPE: &str = "text";
pub const TOKEN_TYPE: &str = "token";
pub const PARAGRAPH_TYPE: &str = "paragraph";
pub const ROOT_TYPE: &str = "root";

/// Current record version
pub const VERSION: u32 = 1;

fn default_version() -> u32 {
    VERSION
}

fn paragraph_type() -> String {
    PARAGRAPH_TYPE.to_string()
}

fn root_type() -> String {
    ROOT_TYPE.to_string()
}

/// Record for a text unit or a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTextNode {
    pub text: String,
    #[serde(default)]
    pub format: u32,
    #[serde(default)]
    pub detail: u32,
    #[serde(default)]
    pub mode: TextMode,
    #[serde(default)]
    pub style: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl SerializedTextNode {
    pub(crate) fn from_parts(text: &str, attrs: &TextAttrs, node_type: &str) -> Self {
        Self {
            text: text.to_string(),
            format: attrs.format,
            detail: attrs.detail,
            mode: attrs.mode,
            style: attrs.style.clone(),
            node_type: node_type.to_string(),
            version: VERSION,
        }
    }
}

/// Record for one line of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedParagraph {
    #[serde(default)]
    pub children: Vec<SerializedTextNode>,
    #[serde(rename = "type", default = "paragraph_type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

/// Record for the document root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedRoot {
    #[serde(default)]
    pub children: Vec<SerializedParagraph>,
    #[serde(rename = "type", default = "root_type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

/// Whole-document record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEditorState {
    pub root: SerializedRoot,
}

impl SerializedEditorState {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
