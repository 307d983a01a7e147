//! Card view models for tour and blog lists.
//!
//! Missing optional fields never fail rendering: images fall back to a
//! placeholder, currency to UZS, rating and review count to "0".

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use tourbook_api::types::{Blog, Locale, MediaFile, Tour, TourID};

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";
pub const DEFAULT_CURRENCY: &str = "UZS";
pub const NO_RESULTS: &str = "No results found";

const EXCERPT_CHARS: usize = 120;

/// URL of the card image: the file tagged `main`, else the first file, else the placeholder.
pub fn main_image(files: &[MediaFile]) -> &str {
    files
        .iter()
        .find(|f| f.is_main())
        .or_else(|| files.first())
        .map(|f| f.url.as_str())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

/// Formats a raw API price for display.
///
/// The last three characters are dropped, then the integer part gets `,`
/// thousands separators. Anything three characters or shorter renders as "0".
pub fn format_price(raw: &str) -> String {
    let raw = raw.trim();
    let len = raw.chars().count();
    if len <= 3 {
        return "0".to_string();
    }
    let head: String = raw.chars().take(len - 3).collect();
    let (int_part, frac_part) = match head.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (head.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let grouped = group_thousands(digits);
    let grouped = if grouped.is_empty() { "0".to_string() } else { grouped };
    match frac_part {
        Some(frac) if !frac.is_empty() => format!("{}{}.{}", sign, grouped, frac),
        _ => format!("{}{}", sign, grouped),
    }
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) if r.is_finite() && r > 0.0 => {
            if r.fract() == 0.0 {
                format!("{}", r as i64)
            } else {
                format!("{:.1}", r)
            }
        }
        _ => "0".to_string(),
    }
}

/// Formats an API timestamp (RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date) as `DD.MM.YYYY`.
pub fn format_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|d| d.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|d| d.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%d.%m.%Y").to_string())
}

/// One tour as a list card shows it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TourCard {
    pub id: TourID,
    pub title: String,
    pub image: String,
    pub price: String,
    pub sale_price: Option<String>,
    pub currency: String,
    pub rating: String,
    pub reviews: String,
    pub status: Option<String>,
}

impl TourCard {
    pub fn from_tour(tour: &Tour, locale: Locale) -> Self {
        TourCard {
            id: tour.id,
            title: tour.title.get(locale).unwrap_or_default().to_string(),
            image: main_image(&tour.files).to_string(),
            price: format_price(tour.price.as_deref().unwrap_or_default()),
            sale_price: tour
                .sale_price
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(format_price),
            currency: tour
                .currency
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CURRENCY)
                .to_string(),
            rating: format_rating(tour.rating),
            reviews: tour.reviews_count.unwrap_or(0).to_string(),
            status: tour.status.clone(),
        }
    }
}

/// One blog post as a list card shows it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BlogCard {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub date: Option<String>,
    pub views: String,
}

impl BlogCard {
    pub fn from_blog(blog: &Blog, locale: Locale) -> Self {
        let image = if !blog.files.is_empty() {
            main_image(&blog.files).to_string()
        } else {
            blog.image
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string()
        };
        let excerpt = blog
            .description
            .as_ref()
            .and_then(|d| d.get(locale))
            .map(truncate_excerpt)
            .unwrap_or_default();
        BlogCard {
            id: blog.id,
            title: blog.title.get(locale).unwrap_or_default().to_string(),
            excerpt,
            image,
            date: blog.created_at.as_deref().and_then(format_date),
            views: blog.views.unwrap_or(0).to_string(),
        }
    }
}

fn truncate_excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tour(value: serde_json::Value) -> Tour {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn price_drops_last_three_chars_and_groups() {
        assert_eq!(format_price("150000"), "150");
        assert_eq!(format_price("1500000000"), "1,500,000");
        assert_eq!(format_price("1250000.000"), "1,250,000");
        assert_eq!(format_price("999"), "0");
        assert_eq!(format_price(""), "0");
        assert_eq!(format_price("1000"), "1");
    }

    #[test]
    fn price_strip_counts_decimal_tail() {
        assert_eq!(format_price("150000.50"), "150,000");
        assert_eq!(format_price("1250000.000"), "1,250,000");
        assert_eq!(format_price("-2500000"), "-2,500");
    }

    #[test]
    fn main_image_prefers_tagged_file() {
        let files = vec![MediaFile::new("/a.jpg"), MediaFile::main("/b.jpg")];
        assert_eq!(main_image(&files), "/b.jpg");
        assert_eq!(main_image(&files[..1]), "/a.jpg");
        assert_eq!(main_image(&[]), PLACEHOLDER_IMAGE);
        assert_eq!(main_image(&[MediaFile::new("  ")]), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn card_defaults_for_missing_fields() {
        let card = TourCard::from_tour(&tour(json!({ "id": 5, "title": "Khiva" })), Locale::Ru);
        assert_eq!(card.title, "Khiva");
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
        assert_eq!(card.price, "0");
        assert_eq!(card.sale_price, None);
        assert_eq!(card.currency, "UZS");
        assert_eq!(card.rating, "0");
        assert_eq!(card.reviews, "0");
    }

    #[test]
    fn card_uses_localized_title_and_values() {
        let card = TourCard::from_tour(
            &tour(json!({
                "id": 9,
                "title": { "en": "Desert camp", "ru": "Лагерь в пустыне" },
                "price": 2400000,
                "sale_price": "1900000",
                "currency": "USD",
                "rating": 4.5,
                "reviews_count": 12,
                "files": [{ "url": "/x.jpg" }]
            })),
            Locale::Ru,
        );
        assert_eq!(card.title, "Лагерь в пустыне");
        assert_eq!(card.price, "2,400");
        assert_eq!(card.sale_price.as_deref(), Some("1,900"));
        assert_eq!(card.currency, "USD");
        assert_eq!(card.rating, "4.5");
        assert_eq!(card.reviews, "12");
        assert_eq!(card.image, "/x.jpg");
    }

    #[test]
    fn blog_card_falls_back_to_legacy_image() {
        let blog: Blog = serde_json::from_value(json!({
            "id": 3,
            "title": { "uz": "Buxoro" },
            "description": "x".repeat(200),
            "image": "/cover.jpg",
            "created_at": "2024-03-08T10:00:00Z",
            "views": "41"
        }))
        .unwrap();
        let card = BlogCard::from_blog(&blog, Locale::En);
        assert_eq!(card.title, "Buxoro");
        assert_eq!(card.image, "/cover.jpg");
        assert_eq!(card.date.as_deref(), Some("08.03.2024"));
        assert_eq!(card.views, "41");
        assert_eq!(card.excerpt.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn dates_in_several_shapes() {
        assert_eq!(format_date("2024-01-31").as_deref(), Some("31.01.2024"));
        assert_eq!(format_date("2024-01-31 08:15:00").as_deref(), Some("31.01.2024"));
        assert_eq!(format_date("2024-01-31T08:15:00.000000").as_deref(), Some("31.01.2024"));
        assert_eq!(format_date("yesterday"), None);
    }
}
