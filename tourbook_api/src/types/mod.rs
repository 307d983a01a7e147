mod de;

mod meta;
pub use self::meta::{ListPage, MessageResponse, Response, UploadResponse};

mod locale;
pub use self::locale::{Locale, LocalizedText};

mod media;
pub use self::media::MediaFile;

mod tour;
pub use self::tour::{Tour, TourID, TourPayload, Waypoint};

mod blog;
pub use self::blog::{Blog, BlogID, BlogPayload};

mod instagram;
pub use self::instagram::{ExtractedStop, ExtractedTour, InstagramPost};
