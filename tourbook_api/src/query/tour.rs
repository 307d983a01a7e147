use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::common::{Query, QueryCommon};

/// Request body of the tour listing endpoints (public and vendor).
///
/// Every filter is an `Option`; unset filters are serialized as `null`, which
/// the backend reads as "no filter".
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct TourQuery {
    #[serde(flatten)]
    pub common: QueryCommon,
    pub status: Option<TourStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    #[serde(rename = "location")]
    pub location_id: Option<i64>,
    pub from_price: Option<i64>,
    pub to_price: Option<i64>,
    #[serde(rename = "type")]
    pub tour_type: Option<String>,
    pub order_by: TourSortBy,
}

impl Query for TourQuery {
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}

impl TourQuery {
    pub fn with_status(mut self, status: TourStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_price_range(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.from_price = from;
        self.to_price = to;
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from_date = from;
        self.to_date = to;
        self
    }

    pub fn with_location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn with_tour_type(mut self, tour_type: &str) -> Self {
        self.tour_type = Some(tour_type.to_string());
        self
    }

    pub fn with_sort_by(mut self, order_by: TourSortBy) -> Self {
        self.order_by = order_by;
        self
    }
}

/// Moderation/publication state of a tour, as used by the vendor listing filter.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    Active,
    Inactive,
    Pending,
    Draft,
    Rejected,
}

impl std::fmt::Display for TourStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TourStatus::Active => "active",
                TourStatus::Inactive => "inactive",
                TourStatus::Pending => "pending",
                TourStatus::Draft => "draft",
                TourStatus::Rejected => "rejected",
            }
        )
    }
}

impl FromStr for TourStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(TourStatus::Active),
            "inactive" => Ok(TourStatus::Inactive),
            "pending" => Ok(TourStatus::Pending),
            "draft" => Ok(TourStatus::Draft),
            "rejected" => Ok(TourStatus::Rejected),
            _ => Err(()),
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TourSortBy {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    Popular,
}

impl std::fmt::Display for TourSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TourSortBy::Newest => "newest",
                TourSortBy::Oldest => "oldest",
                TourSortBy::PriceAsc => "price_asc",
                TourSortBy::PriceDesc => "price_desc",
                TourSortBy::Popular => "popular",
            }
        )
    }
}

impl FromStr for TourSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "newest" => Ok(TourSortBy::Newest),
            "oldest" => Ok(TourSortBy::Oldest),
            "price_asc" | "cheapest" => Ok(TourSortBy::PriceAsc),
            "price_desc" => Ok(TourSortBy::PriceDesc),
            "popular" => Ok(TourSortBy::Popular),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::query::{Query, TourQuery, TourSortBy, TourStatus};

    #[test]
    fn test_tour_query_body() {
        insta::assert_json_snapshot!(TourQuery::default(), @r###"
        {
          "limit": 10,
          "offset": 0,
          "search": null,
          "status": null,
          "from_date": null,
          "to_date": null,
          "location": null,
          "from_price": null,
          "to_price": null,
          "type": null,
          "order_by": "newest"
        }
        "###);

        insta::assert_json_snapshot!(TourQuery::default()
            .with_limit(12)
            .with_page(3)
            .with_search("  khiva ")
            .with_status(TourStatus::Active)
            .with_date_range(NaiveDate::from_ymd_opt(2024, 5, 1), NaiveDate::from_ymd_opt(2024, 5, 31))
            .with_location(7)
            .with_price_range(Some(100000), Some(500000))
            .with_tour_type("hiking")
            .with_sort_by(TourSortBy::PriceDesc), @r###"
        {
          "limit": 12,
          "offset": 24,
          "search": "khiva",
          "status": "active",
          "from_date": "2024-05-01",
          "to_date": "2024-05-31",
          "location": 7,
          "from_price": 100000,
          "to_price": 500000,
          "type": "hiking",
          "order_by": "price_desc"
        }
        "###);
    }

    #[test]
    fn test_sort_by_parses_cli_spellings() {
        assert_eq!("price-asc".parse::<TourSortBy>(), Ok(TourSortBy::PriceAsc));
        assert_eq!("Newest".parse::<TourSortBy>(), Ok(TourSortBy::Newest));
        assert!("random".parse::<TourSortBy>().is_err());
    }
}
