use serde::{Deserialize, Serialize};

use super::de;

/// One page of a listing endpoint.
///
/// Tour listings put the records under `data`; the blog listing uses
/// `blogs`. Both land in `items`. A missing or null list is an empty page.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(
    from = "RawListPage<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct ListPage<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawListPage<T> {
    #[serde(default, deserialize_with = "de::null_default")]
    data: Vec<T>,
    #[serde(default, deserialize_with = "de::null_default")]
    blogs: Vec<T>,
    #[serde(default, deserialize_with = "de::null_default")]
    total: i64,
}

impl<T> From<RawListPage<T>> for ListPage<T> {
    fn from(raw: RawListPage<T>) -> Self {
        let items = if raw.data.is_empty() { raw.blogs } else { raw.data };
        Self {
            items,
            total: raw.total,
        }
    }
}

impl<T> ListPage<T> {
    /// Number of records the server returned for this page.
    pub fn returned_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Response<T> {
    pub data: T,
}

/// Body of endpoints that only acknowledge (delete).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by the image upload endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResponse {
    pub url: String,
}
