use serde::{Deserialize, Serialize};

/// Source-specific metadata attached to a document.
///
/// The store mostly holds plain city descriptions; reddit and arxiv
/// variants carry the extra fields their sources provide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Plain,
    Reddit {
        num_comments: u32,
    },
    Arxiv {
        co_authors: Vec<String>,
    },
}

/// One document in a corpus snapshot: a unique identifier (the city name)
/// and its free text. Immutable for the lifetime of an index built from
/// the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub kind: DocumentKind,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            url: None,
            author: None,
            date: None,
            kind: DocumentKind::Plain,
        }
    }
}
