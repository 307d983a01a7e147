//! Tour records and the payload sent by the vendor create/update forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, Locale, LocalizedText, MediaFile};

/// Numeric tour identifier.
pub type TourID = i64;

/// A tour/activity as returned by the listing and detail endpoints.
///
/// Only the fields the client renders are typed; the rest of the payload is
/// kept in `extra` so it round-trips untouched.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Tour {
    pub id: TourID,

    #[serde(default, deserialize_with = "de::null_default")]
    pub title: LocalizedText,

    #[serde(default)]
    pub description: Option<LocalizedText>,

    #[serde(default, deserialize_with = "de::opt_price")]
    pub price: Option<String>,

    #[serde(default, deserialize_with = "de::opt_price")]
    pub sale_price: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub files: Vec<MediaFile>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "de::opt_number")]
    pub rating: Option<f64>,

    #[serde(default, alias = "reviews", deserialize_with = "de::opt_count")]
    pub reviews_count: Option<i64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One stop on a tour route.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Waypoint {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of the tour create/update endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TourPayload {
    pub title: BTreeMap<Locale, String>,
    pub description: BTreeMap<Locale, String>,
    pub price: Option<String>,
    pub sale_price: Option<String>,
    pub currency: String,
    pub duration: Option<String>,
    #[serde(rename = "location")]
    pub location_id: Option<i64>,
    #[serde(rename = "type")]
    pub tour_type: Option<String>,
    pub route: Vec<Waypoint>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub files: Vec<MediaFile>,
}
