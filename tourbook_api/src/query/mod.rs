mod common;
pub use self::common::{Query, QueryCommon};

mod tour;
pub use self::tour::{TourQuery, TourSortBy, TourStatus};

mod blog;
pub use self::blog::{BlogQuery, BlogSortBy};
