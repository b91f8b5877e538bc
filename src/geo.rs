//! Great-circle distance and trip-duration estimation.
//!
//! Distances use the haversine formula on a sphere of radius 6371 km and are
//! rounded to two decimals. Durations assume a constant city speed of
//! 25 km/h and never drop below five minutes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average city driving speed used for duration estimates.
pub const AVERAGE_SPEED_KMH: f64 = 25.0;

/// Minimum trip duration (pickup overhead), in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;

/// Rejected coordinate or distance input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate ({latitude}, {longitude}): lat must be in -90..90, lng in -180..180")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("invalid distance {0} km: must be finite and non-negative")]
    InvalidDistance(f64),
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Wire shape of a coordinate: `{"lat": .., "lng": ..}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self { latitude, longitude })
        } else {
            Err(GeoError::InvalidCoordinate { latitude, longitude })
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        Self { lat: c.latitude, lng: c.longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// A non-negative distance in kilometers, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    /// Wrap a raw kilometer value, rounding it to two decimals.
    pub fn from_km(km: f64) -> Result<Self, GeoError> {
        if km.is_finite() && km >= 0.0 {
            Ok(Self(round2(km)))
        } else {
            Err(GeoError::InvalidDistance(km))
        }
    }

    pub fn km(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

/// Round to two decimal places, half away from zero (`round(x*100)/100`).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Unrounded haversine distance in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Near antipodes rounding can push h a hair past 1.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates, rounded to two decimals.
pub fn distance_km(a: Coordinate, b: Coordinate) -> Distance {
    Distance(round2(haversine_km(a, b)))
}

/// Trip duration in whole minutes at 25 km/h, floored at five minutes.
pub fn estimate_duration_minutes(distance: Distance) -> u32 {
    let minutes = (distance.km() / AVERAGE_SPEED_KMH * 60.0).round();
    (minutes as u32).max(MIN_DURATION_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    const NEW_YORK: (f64, f64) = (40.7128, -74.0060);
    const CENTRAL_PARK: (f64, f64) = (40.7829, -73.9654);

    #[test]
    fn test_new_york_to_central_park() {
        let a = c(NEW_YORK.0, NEW_YORK.1);
        let b = c(CENTRAL_PARK.0, CENTRAL_PARK.1);
        let d = distance_km(a, b);
        assert_abs_diff_eq!(d.km(), 8.51, epsilon = 1e-9);
        assert_eq!(estimate_duration_minutes(d), 20);
        assert_eq!(estimate_duration_minutes(Distance::from_km(8.41).unwrap()), 20);
    }

    #[test]
    fn test_identical_points() {
        let a = c(NEW_YORK.0, NEW_YORK.1);
        let d = distance_km(a, a);
        assert_eq!(d.km(), 0.0);
        assert_eq!(estimate_duration_minutes(d), MIN_DURATION_MINUTES);
    }

    #[test]
    fn test_zero_distance_hits_floor() {
        assert_eq!(estimate_duration_minutes(Distance::ZERO), 5);
        // 1 km at 25 km/h is 2.4 minutes
        assert_eq!(estimate_duration_minutes(Distance::from_km(1.0).unwrap()), 5);
        // 2.1 km → 5.04 minutes, just over the floor
        assert_eq!(estimate_duration_minutes(Distance::from_km(2.1).unwrap()), 5);
        assert_eq!(estimate_duration_minutes(Distance::from_km(2.5).unwrap()), 6);
    }

    #[test]
    fn test_duration_scales_linearly() {
        let a = c(NEW_YORK.0, NEW_YORK.1);
        // One degree of latitude is R·π/180 km.
        let step = 1000.0 / (EARTH_RADIUS_KM * std::f64::consts::PI / 180.0);
        let b = c(NEW_YORK.0 + step, NEW_YORK.1);
        let d = distance_km(a, b);
        assert_abs_diff_eq!(d.km(), 1000.0, epsilon = 1e-9);
        assert_eq!(estimate_duration_minutes(d), 2400);
        assert_eq!(estimate_duration_minutes(Distance::from_km(500.0).unwrap()), 1200);
    }

    #[test]
    fn test_half_circumference() {
        let d = distance_km(c(0.0, 0.0), c(0.0, 180.0));
        assert_abs_diff_eq!(d.km(), 20015.09, epsilon = 1e-9);
        let poles = distance_km(c(90.0, 0.0), c(-90.0, 0.0));
        assert_abs_diff_eq!(poles.km(), 20015.09, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_rounds_to_two_decimals() {
        let d = distance_km(c(40.7128, -74.0060), c(40.7061, -73.9969));
        assert_abs_diff_eq!(d.km(), 1.07, epsilon = 1e-9);
        assert_abs_diff_eq!(Distance::from_km(3.14159).unwrap().km(), 3.14, epsilon = 1e-9);
        assert_abs_diff_eq!(Distance::from_km(2.675001).unwrap().km(), 2.68, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(matches!(
            Coordinate::new(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_invalid_distance_rejected() {
        assert_eq!(Distance::from_km(-0.5), Err(GeoError::InvalidDistance(-0.5)));
        assert!(Distance::from_km(f64::NAN).is_err());
        assert!(Distance::from_km(f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinate_wire_format() {
        let coord: Coordinate = serde_json::from_str(r#"{"lat": 40.7128, "lng": -74.006}"#).unwrap();
        assert_eq!(coord.latitude(), 40.7128);
        let json = serde_json::to_value(coord).unwrap();
        assert_eq!(json["lng"], -74.006);

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 120.0, "lng": 0.0}"#);
        assert!(bad.is_err());
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| c(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(a in coordinate()) {
            prop_assert_eq!(distance_km(a, a).km(), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(haversine_km(a, b), haversine_km(b, a));
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        #[test]
        fn prop_distance_non_negative(a in coordinate(), b in coordinate()) {
            let d = distance_km(a, b).km();
            prop_assert!(d >= 0.0);
            prop_assert!(d <= 20015.09 + 1e-6);
        }

        #[test]
        fn prop_duration_has_floor(km in 0.0f64..50_000.0) {
            let d = Distance::from_km(km).unwrap();
            prop_assert!(estimate_duration_minutes(d) >= MIN_DURATION_MINUTES);
        }
    }
}
