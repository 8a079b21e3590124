//! Timezone engine: resolution, adjustment, request-scoped context, and
//! language-based guessing.

pub mod adjust;
pub mod context;
pub mod country;
pub mod language;
pub mod resolve;

pub use adjust::{Timestamp, ZoneRef, adjust, localize, to_utc};
pub use context::{ActiveGuard, ActiveZones, ContextId};
pub use country::{first_zone_for_country, guess_from_language};
pub use language::{guess_from_accept_language, parse_accept_language};
pub use resolve::{canonical_name, resolve};
