use std::str::FromStr;

use serde::Serialize;

use super::common::{Query, QueryCommon};

/// Request body of the blog listing endpoint.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct BlogQuery {
    #[serde(flatten)]
    pub common: QueryCommon,
    pub order_by: BlogSortBy,
}

impl Query for BlogQuery {
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}

impl BlogQuery {
    pub fn with_sort_by(mut self, order_by: BlogSortBy) -> Self {
        self.order_by = order_by;
        self
    }
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlogSortBy {
    #[default]
    Newest,
    Oldest,
    Popular,
}

impl std::fmt::Display for BlogSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BlogSortBy::Newest => "newest",
                BlogSortBy::Oldest => "oldest",
                BlogSortBy::Popular => "popular",
            }
        )
    }
}

impl FromStr for BlogSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(BlogSortBy::Newest),
            "oldest" => Ok(BlogSortBy::Oldest),
            "popular" => Ok(BlogSortBy::Popular),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{BlogQuery, BlogSortBy, Query};

    #[test]
    fn test_blog_query_body() {
        insta::assert_json_snapshot!(BlogQuery::default()
            .with_limit(8)
            .with_page(2)
            .with_sort_by(BlogSortBy::Popular), @r###"
        {
          "limit": 8,
          "offset": 8,
          "search": null,
          "order_by": "popular"
        }
        "###);
    }
}
