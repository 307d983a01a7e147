use serde::{Deserialize, Serialize};

/// An image attached to a tour or blog post.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MediaFile {
    pub url: String,

    /// Role of the file; the card image is the one tagged `main`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl MediaFile {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: None,
        }
    }

    pub fn main(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: Some("main".to_string()),
        }
    }

    pub fn is_main(&self) -> bool {
        self.kind.as_deref() == Some("main")
    }
}
