//! Driver dispatch: an in-memory registry of drivers and their last known
//! positions, plus radius search for nearby available drivers and
//! score-based matching of a driver to a pickup.

pub mod matching;
pub mod registry;
pub mod types;

pub use matching::{freshness_score, match_score, MatchedDriver, MATCH_RADIUS_KM};
pub use registry::{DriverRegistry, DEFAULT_SEARCH_RADIUS_KM};
pub use types::{DispatchError, Driver, NearbyDriver};
