//! Instagram import assist: turn a post into a pre-filled tour draft.

use regex::Regex;

use tourbook_api::types::{ExtractedTour, InstagramPost, Locale, LocalizedText, Waypoint};
use tourbook_api::Client;

use crate::draft::{ImageSlot, LocalizedField, TourDraft};
use crate::error::TourbookError;

/// A validated link to an Instagram post, reel or IGTV video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostRef {
    /// `p`, `reel` or `tv`.
    pub kind: String,
    pub shortcode: String,
}

impl PostRef {
    /// Canonical URL sent to the import services.
    pub fn url(&self) -> String {
        format!("https://www.instagram.com/{}/{}/", self.kind, self.shortcode)
    }
}

pub fn parse_post_url(input: &str) -> Result<PostRef, TourbookError> {
    let re = Regex::new(
        r"^https?://(?:www\.|m\.)?instagram\.com/(?P<kind>p|reel|tv)/(?P<code>[A-Za-z0-9_-]+)/?(?:[?#].*)?$",
    )
    .map_err(|e| TourbookError::Config(format!("regex compile error: {}", e)))?;
    let caps = re.captures(input.trim()).ok_or_else(|| {
        TourbookError::InvalidInput(format!("'{}' is not an Instagram post link", input))
    })?;
    Ok(PostRef {
        kind: caps["kind"].to_string(),
        shortcode: caps["code"].to_string(),
    })
}

fn field_or_caption(text: Option<&LocalizedText>, fallback: &str) -> LocalizedField {
    match text {
        // `get` falls back across locales, so any non-blank entry counts.
        Some(text) if text.get(Locale::En).is_some() => LocalizedField::from(text),
        _ => LocalizedField::from(&LocalizedText::Plain(fallback.trim().to_string())),
    }
}

/// Seeds a tour draft from the extraction result and the post it came from.
/// Missing title/description fall back to the caption's first line/full text.
pub fn draft_from_extraction(extracted: &ExtractedTour, post: &InstagramPost) -> TourDraft {
    let caption = post.caption.as_deref().unwrap_or_default();
    let first_line = caption.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();

    let mut draft = TourDraft {
        title: field_or_caption(extracted.title.as_ref(), first_line),
        description: field_or_caption(extracted.description.as_ref(), caption),
        price: extracted.price.clone(),
        duration: extracted.duration.clone(),
        route: extracted
            .route
            .iter()
            .filter(|stop| !stop.title.trim().is_empty())
            .map(|stop| Waypoint {
                title: stop.title.trim().to_string(),
                description: stop.description.clone(),
            })
            .collect(),
        images: post
            .images
            .iter()
            .filter(|url| !url.trim().is_empty())
            .map(|url| ImageSlot::remote(url))
            .collect(),
        ..TourDraft::default()
    };
    if let Some(currency) = extracted.currency.as_deref().filter(|c| !c.trim().is_empty()) {
        draft.currency = currency.trim().to_uppercase();
    }
    for item in &extracted.inclusions {
        draft.add_inclusion(item);
    }
    draft
}

/// Fetches the post, runs the extraction and returns the seeded draft.
pub async fn import_tour(client: &Client, input: &str) -> Result<TourDraft, TourbookError> {
    let post_ref = parse_post_url(input)?;
    let url = post_ref.url();
    tracing::info!("importing Instagram post {}", post_ref.shortcode);

    let post = client.instagram_post(&url).await?.data;
    let extracted = client
        .instagram_to_tour(&url, post.caption.as_deref())
        .await?
        .data;
    Ok(draft_from_extraction(&extracted, &post))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_posts_reels_and_tv() {
        let post = parse_post_url("https://www.instagram.com/p/CxYz_12-a/").unwrap();
        assert_eq!(post.kind, "p");
        assert_eq!(post.shortcode, "CxYz_12-a");

        let reel = parse_post_url("https://instagram.com/reel/Abc123?igsh=xyz").unwrap();
        assert_eq!(reel.url(), "https://www.instagram.com/reel/Abc123/");

        assert!(parse_post_url("http://m.instagram.com/tv/Q1w2e3").is_ok());
    }

    #[test]
    fn rejects_other_links() {
        for bad in [
            "https://www.instagram.com/tourbook_uz/",
            "https://example.com/p/Abc123/",
            "instagram.com/p/Abc123",
            "https://www.instagram.com/stories/tourbook/123/",
            "",
        ] {
            assert!(parse_post_url(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn caption_fills_missing_title() {
        let post: InstagramPost = serde_json::from_value(json!({
            "caption": "\nSunrise over Aydarkul\nTwo days in the desert",
            "images": ["https://cdn.example/1.jpg", ""]
        }))
        .unwrap();
        let extracted: ExtractedTour = serde_json::from_value(json!({
            "price": 850000,
            "currency": "usd",
            "inclusions": ["Yurt stay", " "],
            "route": [{ "title": "Nurata" }, { "title": "" }]
        }))
        .unwrap();

        let draft = draft_from_extraction(&extracted, &post);
        assert_eq!(draft.title.get(Locale::Ru), "Sunrise over Aydarkul");
        assert!(draft.description.get(Locale::En).contains("Two days"));
        assert_eq!(draft.price.as_deref(), Some("850000"));
        assert_eq!(draft.currency, "USD");
        assert_eq!(draft.inclusions, vec!["Yurt stay"]);
        assert_eq!(draft.route.len(), 1);
        assert_eq!(draft.images, vec![ImageSlot::remote("https://cdn.example/1.jpg")]);
    }

    #[test]
    fn extracted_title_wins_over_caption() {
        let post: InstagramPost =
            serde_json::from_value(json!({ "caption": "ignored" })).unwrap();
        let extracted: ExtractedTour = serde_json::from_value(json!({
            "title": { "en": "Fergana crafts", "ru": "Ремёсла Ферганы" }
        }))
        .unwrap();
        let draft = draft_from_extraction(&extracted, &post);
        assert_eq!(draft.title.get(Locale::Ru), "Ремёсла Ферганы");
        assert_eq!(draft.currency, "UZS");
    }
}
