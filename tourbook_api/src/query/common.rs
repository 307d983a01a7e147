//! Shared query infrastructure: the [`Query`] trait and the [`QueryCommon`] fields.

use serde::Serialize;

use crate::types::Locale;

/// Trait implemented by all listing queries. The query itself is the JSON
/// request body; the builder methods below cover pagination, search and locale.
pub trait Query: Serialize {
    /// Returns the common query fields.
    fn common(&self) -> &QueryCommon;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page size. The offset is rescaled so the current page is kept.
    fn with_limit(mut self, limit: i64) -> Self
    where
        Self: Sized,
    {
        let page = self.common().page();
        let common = self.get_common();
        common.limit = limit.max(1);
        common.offset = (page - 1) * common.limit;
        self
    }

    /// Moves to the given page (1-indexed): `offset = (page - 1) * limit`.
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        let common = self.get_common();
        common.offset = (page.max(1) - 1) * common.limit;
        self
    }

    /// Sets the search text. Blank input clears the filter.
    fn with_search(mut self, search: &str) -> Self
    where
        Self: Sized,
    {
        let trimmed = search.trim();
        self.get_common().search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Sets the locale sent in the `x-lang` header.
    fn with_language(mut self, language: Locale) -> Self
    where
        Self: Sized,
    {
        self.get_common().language = language;
        self
    }
}

/// Fields shared by all listing queries.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct QueryCommon {
    /// Records per page. Fixed per list kind.
    pub limit: i64,
    /// Index of the first record: `(page - 1) * limit`.
    pub offset: i64,
    /// Free-text search. `None` is sent as `null`.
    pub search: Option<String>,
    /// Request locale; travels as a header, not in the body.
    #[serde(skip)]
    pub language: Locale,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            limit: 10,
            offset: 0,
            search: None,
            language: Locale::default(),
        }
    }
}

impl QueryCommon {
    /// Current page number (1-indexed).
    pub fn page(&self) -> i64 {
        self.offset / self.limit.max(1) + 1
    }
}
