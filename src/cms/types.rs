//! Wire types of the content service REST API
//!
//! Every field is optional on the wire. Missing values fall back to empty
//! defaults instead of failing the whole page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Repository metadata returned by `GET {endpoint}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

impl ApiInfo {
    /// The ref that points at published content
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// A content release pointer
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// One page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results_per_page: Option<u32>,
    #[serde(default)]
    pub total_results_size: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Cursor of the next page, `None` on the last one
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<Document>,
}

/// A raw document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: DocumentData,
}

/// Custom fields of a `posts` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub title: Option<TextField>,
    #[serde(default)]
    pub subtitle: Option<TextField>,
    #[serde(default)]
    pub author: Option<TextField>,
    /// Minutes, a number or a numeric string
    #[serde(rename = "readTime", default)]
    pub read_time: Option<Value>,
    #[serde(default)]
    pub content: Vec<ContentSection>,
}

/// A text field, either key text or a rich text block list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Rich(Vec<RichTextBlock>),
}

impl TextField {
    /// Plain text of the field, rich blocks joined by spaces
    pub fn as_text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Rich(blocks) => blocks
                .iter()
                .map(|b| b.text.as_str())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// A rich text block (paragraph, heading, list item...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

/// A body section: heading plus rich text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub heading: Option<TextField>,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}
