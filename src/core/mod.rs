// Core algorithm exports
pub mod distance;
pub mod matcher;
pub mod router;
pub mod scoring;
pub mod tags;

pub use distance::great_circle_miles;
pub use matcher::select_best;
pub use router::{Catalog, Router, INTEREST_MIN_DURATION_MS};
pub use scoring::{device_ordinal, price_ordinal, score_candidate};
pub use tags::{classify, derive_tags};
