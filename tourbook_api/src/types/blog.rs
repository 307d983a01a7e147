use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, Locale, LocalizedText, MediaFile};

pub type BlogID = i64;

/// A blog post as returned by the blog endpoints.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Blog {
    pub id: BlogID,

    #[serde(default, deserialize_with = "de::null_default")]
    pub title: LocalizedText,

    #[serde(default)]
    pub description: Option<LocalizedText>,

    #[serde(default)]
    pub content: Option<LocalizedText>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub files: Vec<MediaFile>,

    /// Older posts carry a single cover URL instead of `files`.
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "de::opt_count")]
    pub views: Option<i64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of the blog create/update endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BlogPayload {
    pub title: BTreeMap<Locale, String>,
    pub description: BTreeMap<Locale, String>,
    pub content: BTreeMap<Locale, String>,
    pub files: Vec<MediaFile>,
}
