//! Responses of the Instagram import services. Both are opaque scraping/AI
//! backends; only the fields used to seed a tour draft are typed.

use serde::{Deserialize, Serialize};

use super::{de, LocalizedText};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InstagramPost {
    #[serde(default)]
    pub shortcode: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub images: Vec<String>,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Tour fields extracted from a post caption.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExtractedTour {
    #[serde(default)]
    pub title: Option<LocalizedText>,

    #[serde(default)]
    pub description: Option<LocalizedText>,

    #[serde(default, deserialize_with = "de::opt_price")]
    pub price: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub inclusions: Vec<String>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub route: Vec<ExtractedStop>,

    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExtractedStop {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
