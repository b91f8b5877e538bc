//! Driver registry with radius search.
//!
//! Search flow: available drivers with a known position → haversine filter
//! (unrounded, inclusive) → sort by rounded distance, then id.
//! Matching ranks the same candidates by composite score instead.

use super::matching::{match_score, MatchedDriver, MATCH_RADIUS_KM};
use super::types::{DispatchError, Driver, NearbyDriver};
use crate::geo::{self, Coordinate};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

/// All drivers known to this process, keyed by id.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<u64, Driver>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Driver> {
        self.drivers.get(&id)
    }

    /// Add a driver, replacing any previous entry with the same id.
    pub fn register(&mut self, driver: Driver) -> Option<Driver> {
        tracing::debug!(driver_id = driver.id, name = %driver.name, "registered driver");
        self.drivers.insert(driver.id, driver)
    }

    /// Record a driver's current position.
    pub fn update_location(&mut self, id: u64, location: Coordinate) -> Result<(), DispatchError> {
        let driver = self.drivers.get_mut(&id).ok_or(DispatchError::UnknownDriver(id))?;
        driver.location = Some(location);
        driver.location_updated_at = Some(Utc::now());
        tracing::debug!(driver_id = id, %location, "driver location updated");
        Ok(())
    }

    pub fn set_availability(&mut self, id: u64, available: bool) -> Result<(), DispatchError> {
        let driver = self.drivers.get_mut(&id).ok_or(DispatchError::UnknownDriver(id))?;
        driver.available = available;
        tracing::debug!(driver_id = id, available, "driver availability changed");
        Ok(())
    }

    /// Available drivers with a known position within `radius_km` of `origin`,
    /// paired with their unrounded distance.
    fn candidates(&self, origin: Coordinate, radius_km: f64) -> impl Iterator<Item = (&Driver, Coordinate, f64)> + '_ {
        self.drivers
            .values()
            .filter(|d| d.available)
            .filter_map(move |d| {
                let location = d.location?;
                let km = geo::haversine_km(origin, location);
                (km <= radius_km).then_some((d, location, km))
            })
    }

    /// Available drivers within `radius_km` of `origin`, nearest first.
    pub fn find_nearby(&self, origin: Coordinate, radius_km: f64) -> Result<Vec<NearbyDriver>, DispatchError> {
        check_radius(radius_km)?;

        let mut hits: Vec<NearbyDriver> = self
            .candidates(origin, radius_km)
            .filter_map(|(d, location, km)| NearbyDriver::new(d, location, km))
            .collect();

        hits.sort_by(|a, b| {
            a.distance_km
                .km()
                .total_cmp(&b.distance_km.km())
                .then(a.driver_id.cmp(&b.driver_id))
        });
        Ok(hits)
    }

    /// Pick the best available driver for a pickup within [`MATCH_RADIUS_KM`].
    ///
    /// Drivers are ranked by [`match_score`]; ties go to the nearer driver,
    /// then the lower id. `now` anchors location freshness.
    pub fn best_match(&self, pickup: Coordinate, now: DateTime<Utc>) -> Option<MatchedDriver> {
        let best = self
            .candidates(pickup, MATCH_RADIUS_KM)
            .map(|(d, location, km)| (d, location, km, match_score(d, km, now)))
            .min_by(|a, b| {
                b.3.total_cmp(&a.3)
                    .then(a.2.total_cmp(&b.2))
                    .then(a.0.id.cmp(&b.0.id))
            })?;

        let (driver, location, km, score) = best;
        tracing::info!(driver_id = driver.id, score, "matched driver");
        Some(MatchedDriver {
            driver: NearbyDriver::new(driver, location, km)?,
            score: geo::round2(score),
        })
    }

    /// Seed a registry with available drivers parked at the demo landmarks.
    pub fn demo() -> Self {
        const DEMO_DRIVERS: &[(&str, &str, f64, u32)] = &[
            ("Alex Rivera", "Toyota Camry - Silver", 4.8, 312),
            ("Priya Shah", "Honda Accord - Black", 4.9, 541),
            ("Marcus Lee", "Tesla Model 3 - White", 4.7, 128),
            ("Elena Petrova", "Ford Escape - Blue", 4.6, 87),
            ("Sam Okafor", "Hyundai Sonata - Gray", 4.9, 903),
            ("Jordan Kim", "Kia Niro - Red", 4.5, 45),
            ("Noor Haddad", "Chevy Malibu - Black", 4.8, 276),
            ("Luis Ortega", "Nissan Altima - White", 4.7, 190),
        ];

        let mut registry = Self::new();
        for (id, (place, (name, vehicle, rating, rides))) in
            (1u64..).zip(crate::places::all().into_iter().zip(DEMO_DRIVERS))
        {
            registry.register(
                Driver::new(id, *name)
                    .with_vehicle(*vehicle)
                    .with_rating(*rating, *rides)
                    .parked_at(place.coordinate),
            );
        }
        registry
    }
}

fn check_radius(radius_km: f64) -> Result<(), DispatchError> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(())
    } else {
        Err(DispatchError::InvalidRadius(radius_km))
    }
}
