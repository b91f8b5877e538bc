//! Driver-to-pickup matching by composite score.
//!
//! score = 0.4 · max(0, 10 − km) + 0.3 · rating
//!       + 0.2 · min(5, rides / 20) + 0.1 · freshness
//!
//! Freshness is 5 for a position reported within 2 minutes, stepping down
//! through 5/10/30/60 minutes to 0. A driver who never reported scores 0.

use super::types::{Driver, NearbyDriver};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Only drivers this close to the pickup are considered.
pub const MATCH_RADIUS_KM: f64 = 15.0;

const DISTANCE_WEIGHT: f64 = 0.4;
const RATING_WEIGHT: f64 = 0.3;
const EXPERIENCE_WEIGHT: f64 = 0.2;
const FRESHNESS_WEIGHT: f64 = 0.1;

/// Upper bounds (minutes ago, inclusive) and their freshness points.
const FRESHNESS_BANDS: &[(i64, f64)] = &[(2, 5.0), (5, 4.0), (10, 3.0), (30, 2.0), (60, 1.0)];

/// The driver picked for a pickup, with the score that won.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedDriver {
    #[serde(flatten)]
    pub driver: NearbyDriver,
    pub score: f64,
}

/// Points for how recently the driver's position was reported.
pub fn freshness_score(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(updated_at) = updated_at else {
        return 0.0;
    };
    let minutes_ago = (now - updated_at).num_minutes();
    FRESHNESS_BANDS
        .iter()
        .find(|(limit, _)| minutes_ago <= *limit)
        .map_or(0.0, |(_, points)| *points)
}

/// Composite score for `driver` at `km` from the pickup; higher is better.
pub fn match_score(driver: &Driver, km: f64, now: DateTime<Utc>) -> f64 {
    let distance = (10.0 - km).max(0.0);
    let experience = (f64::from(driver.total_rides) / 20.0).min(5.0);
    let freshness = freshness_score(driver.location_updated_at, now);

    distance * DISTANCE_WEIGHT
        + driver.rating * RATING_WEIGHT
        + experience * EXPERIENCE_WEIGHT
        + freshness * FRESHNESS_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DriverRegistry;
    use crate::geo::Coordinate;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap()
    }

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn seen(minutes_ago: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::minutes(minutes_ago))
    }

    #[test]
    fn test_freshness_bands() {
        assert_eq!(freshness_score(seen(0), now()), 5.0);
        assert_eq!(freshness_score(seen(2), now()), 5.0);
        assert_eq!(freshness_score(seen(3), now()), 4.0);
        assert_eq!(freshness_score(seen(5), now()), 4.0);
        assert_eq!(freshness_score(seen(10), now()), 3.0);
        assert_eq!(freshness_score(seen(11), now()), 2.0);
        assert_eq!(freshness_score(seen(30), now()), 2.0);
        assert_eq!(freshness_score(seen(60), now()), 1.0);
        assert_eq!(freshness_score(seen(61), now()), 0.0);
        assert_eq!(freshness_score(None, now()), 0.0);
    }

    #[test]
    fn test_partial_minutes_truncate() {
        // 2 min 59 s is still "2 minutes ago".
        let updated = now() - Duration::seconds(179);
        assert_eq!(freshness_score(Some(updated), now()), 5.0);
    }

    #[test]
    fn test_match_score_components() {
        let mut d = Driver::new(1, "A").with_rating(4.5, 60);
        d.location_updated_at = seen(1);
        // 0.4·(10−2) + 0.3·4.5 + 0.2·3 + 0.1·5
        assert_abs_diff_eq!(match_score(&d, 2.0, now()), 5.65, epsilon = 1e-9);

        let mut veteran = Driver::new(2, "B").with_rating(5.0, 1000);
        veteran.location_updated_at = None;
        // Distance beyond 10 km and experience above 100 rides are capped.
        assert_abs_diff_eq!(match_score(&veteran, 12.0, now()), 2.5, epsilon = 1e-9);
    }

    fn parked(id: u64, name: &str, at: Coordinate, rating: f64, rides: u32, minutes_ago: i64) -> Driver {
        let mut d = Driver::new(id, name).with_rating(rating, rides).parked_at(at);
        d.location_updated_at = seen(minutes_ago);
        d
    }

    #[test]
    fn test_best_match_prefers_score_over_distance() {
        let pickup = c(40.7580, -73.9855);
        let mut reg = DriverRegistry::new();
        // Right at the pickup but new, low-rated and stale.
        reg.register(parked(1, "Rookie", pickup, 3.0, 0, 120));
        // ~1 km away, experienced, highly rated and fresh.
        reg.register(parked(2, "Pro", c(40.7670, -73.9855), 5.0, 200, 1));

        let m = reg.best_match(pickup, now()).unwrap();
        assert_eq!(m.driver.driver_id, 2);
        assert!(m.score > match_score(reg.get(1).unwrap(), 0.0, now()));
    }

    #[test]
    fn test_best_match_tie_goes_to_nearer_then_lower_id() {
        let pickup = c(40.7580, -73.9855);
        let mut reg = DriverRegistry::new();
        // Beyond 10 km the distance term is zero, so both score the same.
        reg.register(parked(4, "Far", c(40.6600, -73.9855), 4.0, 40, 1));
        reg.register(parked(9, "Farther", c(40.6500, -73.9855), 4.0, 40, 1));
        assert_eq!(reg.best_match(pickup, now()).unwrap().driver.driver_id, 4);

        let mut twins = DriverRegistry::new();
        twins.register(parked(8, "B", pickup, 4.0, 40, 1));
        twins.register(parked(3, "A", pickup, 4.0, 40, 1));
        assert_eq!(twins.best_match(pickup, now()).unwrap().driver.driver_id, 3);
    }

    #[test]
    fn test_best_match_skips_unavailable_and_out_of_range() {
        let pickup = c(40.7580, -73.9855);
        let mut reg = DriverRegistry::new();
        let mut offline = parked(1, "Offline", pickup, 5.0, 500, 0);
        offline.available = false;
        reg.register(offline);
        // Philadelphia, ~130 km
        reg.register(parked(2, "Philly", c(39.9526, -75.1652), 5.0, 500, 0));
        assert!(reg.best_match(pickup, now()).is_none());

        reg.register(parked(3, "Fallback", c(40.7000, -73.9855), 3.5, 10, 45));
        let m = reg.best_match(pickup, now()).unwrap();
        assert_eq!(m.driver.name, "Fallback");
    }

    #[test]
    fn test_best_match_empty_registry() {
        assert!(DriverRegistry::new().best_match(c(0.0, 0.0), now()).is_none());
    }
}
