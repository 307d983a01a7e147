use chrono::NaiveDate;

use tourbook_api::types::Locale;
use tourbook_api::{BlogSortBy, TourSortBy, TourStatus};

use crate::error::TourbookError;
use crate::filters::PriceRange;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_NAME_LENGTH: usize = 80;

/// Cleans free text typed by a visitor (search box, booking name, tour type):
/// control characters are dropped and the result is trimmed. Text longer than
/// `max_chars` or blank after cleaning is rejected.
pub fn sanitize_text(input: &str, max_chars: usize) -> Result<String, TourbookError> {
    let cleaned: String = input.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.chars().count() > max_chars {
        return Err(TourbookError::InvalidInput(format!(
            "text is longer than {} characters",
            max_chars
        )));
    }
    if cleaned.is_empty() {
        return Err(TourbookError::InvalidInput("text is empty".to_string()));
    }
    Ok(cleaned.to_string())
}

/// Search box text, at most `MAX_SEARCH_LENGTH` characters.
pub fn validate_search(input: &str) -> Result<String, TourbookError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a person's name for contact requests.
pub fn validate_name(input: &str) -> Result<String, TourbookError> {
    sanitize_text(input, MAX_NAME_LENGTH)
}

/// Validate a locale code: en, ru or uz (case-insensitive).
pub fn validate_locale(input: &str) -> Result<Locale, TourbookError> {
    input.parse::<Locale>().map_err(|_| {
        TourbookError::InvalidInput(format!(
            "unknown language '{}'. Valid values: en, ru, uz",
            input
        ))
    })
}

/// Validate a date in YYYY-MM-DD form.
pub fn validate_date(input: &str) -> Result<NaiveDate, TourbookError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        TourbookError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", input))
    })
}

/// Validate that a date range is not inverted.
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), TourbookError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(TourbookError::InvalidInput(format!(
            "start date {} is after end date {}",
            from, to
        ))),
        _ => Ok(()),
    }
}

/// Validate a price dropdown value; the placeholder is accepted as "no filter".
pub fn validate_price(input: &str) -> Result<Option<PriceRange>, TourbookError> {
    let range = PriceRange::parse(input);
    let looks_unset = input.trim().is_empty()
        || input
            .trim()
            .eq_ignore_ascii_case(crate::filters::PRICE_PLACEHOLDER);
    match range {
        None if !looks_unset => Err(TourbookError::InvalidInput(format!(
            "invalid price range '{}', expected FROM-TO, FROM- or -TO",
            input
        ))),
        Some(PriceRange {
            from: Some(from),
            to: Some(to),
        }) if from > to => Err(TourbookError::InvalidInput(format!(
            "price range starts above its end ({} > {})",
            from, to
        ))),
        other => Ok(other),
    }
}

/// Validate a tour status filter; `all` means no filter.
pub fn validate_status(input: &str) -> Result<Option<TourStatus>, TourbookError> {
    if input.trim().eq_ignore_ascii_case(crate::filters::ALL_PLACEHOLDER) {
        return Ok(None);
    }
    input.parse::<TourStatus>().map(Some).map_err(|_| {
        TourbookError::InvalidInput(format!(
            "unknown status '{}'. Valid values: all, active, inactive, pending, draft, rejected",
            input
        ))
    })
}

pub fn validate_tour_sort(input: &str) -> Result<TourSortBy, TourbookError> {
    input.parse::<TourSortBy>().map_err(|_| {
        TourbookError::InvalidInput(format!(
            "unknown sort '{}'. Valid values: newest, oldest, price-asc, price-desc, popular",
            input
        ))
    })
}

pub fn validate_blog_sort(input: &str) -> Result<BlogSortBy, TourbookError> {
    input.parse::<BlogSortBy>().map_err(|_| {
        TourbookError::InvalidInput(format!(
            "unknown sort '{}'. Valid values: newest, oldest, popular",
            input
        ))
    })
}

/// Validate a record ID: must be positive.
pub fn validate_id(id: i64) -> Result<i64, TourbookError> {
    if id < 1 {
        return Err(TourbookError::InvalidInput(format!(
            "id must be a positive number, got {}",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_sanitized() {
        assert_eq!(validate_search("  samar\x07kand ").unwrap(), "samarkand");
        assert!(validate_search("\x01\x02").is_err());
        assert!(validate_search(&"x".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }

    #[test]
    fn names_are_limited_by_characters() {
        let cyrillic = "Ж".repeat(MAX_NAME_LENGTH);
        assert_eq!(validate_name(&cyrillic).unwrap(), cyrillic);
        assert!(validate_name(&"Ж".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert_eq!(validate_name(" Aziz\tKarimov\n").unwrap(), "AzizKarimov");
    }

    #[test]
    fn dates_and_ranges() {
        let from = validate_date("2024-05-01").unwrap();
        let to = validate_date(" 2024-05-31 ").unwrap();
        assert!(validate_date_range(Some(from), Some(to)).is_ok());
        assert!(validate_date_range(Some(to), Some(from)).is_err());
        assert!(validate_date_range(None, Some(from)).is_ok());
        assert!(validate_date("05/01/2024").is_err());
    }

    #[test]
    fn price_values() {
        assert_eq!(validate_price("Price").unwrap(), None);
        assert_eq!(validate_price("").unwrap(), None);
        assert!(validate_price("cheap").is_err());
        assert!(validate_price("500-100").is_err());
        assert_eq!(
            validate_price("100-500").unwrap(),
            Some(PriceRange {
                from: Some(100),
                to: Some(500)
            })
        );
    }

    #[test]
    fn status_values() {
        assert_eq!(validate_status("ALL").unwrap(), None);
        assert_eq!(validate_status("draft").unwrap(), Some(TourStatus::Draft));
        assert!(validate_status("deleted").is_err());
    }

    #[test]
    fn ids_and_locales() {
        assert!(validate_id(0).is_err());
        assert_eq!(validate_id(42).unwrap(), 42);
        assert_eq!(validate_locale("uz").unwrap(), Locale::Uz);
        assert!(validate_locale("de").is_err());
    }
}
