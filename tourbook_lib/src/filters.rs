//! Query builders: translate filter selections as the UI holds them
//! (labels, placeholders, raw text) into listing queries.
//!
//! Any selection equal to its "unset" placeholder becomes `None`, which the
//! query serializes as `null` so the backend applies no filter.

use chrono::NaiveDate;

use tourbook_api::types::Locale;
use tourbook_api::{BlogQuery, BlogSortBy, Query, TourQuery, TourSortBy, TourStatus};

/// Label the price dropdown shows when no range is picked.
pub const PRICE_PLACEHOLDER: &str = "Price";
/// Tour type / status value meaning "all".
pub const ALL_PLACEHOLDER: &str = "all";

/// The different lists; each has a fixed page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Public activity catalogue.
    Activities,
    /// Short tour strips on landing pages.
    Featured,
    /// The vendor dashboard's own tours.
    MyTours,
    /// Blog index.
    Blogs,
}

impl ListKind {
    pub fn page_size(&self) -> i64 {
        match self {
            ListKind::Activities => 12,
            ListKind::MyTours => 10,
            ListKind::Featured | ListKind::Blogs => 8,
        }
    }
}

/// Selected price range. Either bound may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl PriceRange {
    /// Parses the dropdown value: the placeholder or an empty string means
    /// "no filter", otherwise `FROM-TO`, `FROM-` or `-TO`. Digits may carry
    /// spaces or commas as thousands separators.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(PRICE_PLACEHOLDER) {
            return None;
        }
        let (from, to) = label.split_once('-').unwrap_or((label, ""));
        let range = PriceRange {
            from: parse_amount(from),
            to: parse_amount(to),
        };
        if range.is_unset() {
            None
        } else {
            Some(range)
        }
    }

    pub fn is_unset(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_amount(raw: &str) -> Option<i64> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Filter selections of a tour list (public catalogue or vendor dashboard).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TourFilters {
    pub search: String,
    /// Raw price dropdown value (see [`PriceRange::parse`]).
    pub price: String,
    pub tour_type: String,
    pub status: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// `0` means "any location".
    pub location_id: i64,
    pub sort: TourSortBy,
}

impl TourFilters {
    /// Builds the page-1 query for `kind` in `locale`.
    pub fn build(&self, kind: ListKind, locale: Locale) -> TourQuery {
        let price = PriceRange::parse(&self.price).unwrap_or_default();
        let mut query = TourQuery::default()
            .with_limit(kind.page_size())
            .with_page(1)
            .with_search(&self.search)
            .with_language(locale)
            .with_price_range(price.from, price.to)
            .with_date_range(self.from_date, self.to_date)
            .with_sort_by(self.sort);
        if let Some(tour_type) = unless_placeholder(&self.tour_type) {
            query = query.with_tour_type(tour_type);
        }
        if let Some(status) = unless_placeholder(&self.status).and_then(|s| s.parse::<TourStatus>().ok()) {
            query = query.with_status(status);
        }
        if self.location_id > 0 {
            query = query.with_location(self.location_id);
        }
        query
    }
}

/// Filter selections of the blog list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlogFilters {
    pub search: String,
    pub sort: BlogSortBy,
}

impl BlogFilters {
    pub fn build(&self, locale: Locale) -> BlogQuery {
        BlogQuery::default()
            .with_limit(ListKind::Blogs.page_size())
            .with_page(1)
            .with_search(&self.search)
            .with_language(locale)
            .with_sort_by(self.sort)
    }
}

fn unless_placeholder(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_PLACEHOLDER) {
        None
    } else {
        Some(value)
    }
}
