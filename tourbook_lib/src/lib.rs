//! Library layer for Tourbook: paginated listings, filters, drafts and the
//! vendor flows built on top of the `tourbook_api` client.
//!
//! Everything here is UI-agnostic. A front end feeds user actions in (filter
//! changes, keystrokes, scroll positions, button presses) and renders the
//! resulting list state and cards.

pub mod config;
pub mod contact;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod fetcher;
pub mod filters;
pub mod instagram;
pub mod pagination;
pub mod render;
pub mod store;
pub mod validation;

pub use tourbook_api;
pub use tourbook_api::types;
pub use tourbook_api::{
    BlogQuery, BlogSortBy, Client, Query, TourQuery, TourSortBy, TourStatus,
};

pub use config::Config;
pub use error::TourbookError;
pub use fetcher::{
    BlogSource, LoadOutcome, PageSource, PaginatedResource, Phase, TourSource, VendorTourSource,
};
pub use filters::{BlogFilters, ListKind, TourFilters};
pub use store::LocalStore;
