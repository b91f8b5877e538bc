//! Core types for driver dispatch.

use crate::geo::{Coordinate, Distance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A driver known to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub vehicle_info: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub total_rides: u32,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub location_updated_at: Option<DateTime<Utc>>,
}

fn default_rating() -> f64 {
    5.0
}

impl Driver {
    /// A new, offline driver with no known position.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vehicle_info: None,
            rating: default_rating(),
            total_rides: 0,
            available: false,
            location: None,
            location_updated_at: None,
        }
    }

    pub fn with_vehicle(mut self, vehicle: impl Into<String>) -> Self {
        self.vehicle_info = Some(vehicle.into());
        self
    }

    pub fn with_rating(mut self, rating: f64, total_rides: u32) -> Self {
        self.rating = rating;
        self.total_rides = total_rides;
        self
    }

    /// Mark available and park at `location`.
    pub fn parked_at(mut self, location: Coordinate) -> Self {
        self.available = true;
        self.location = Some(location);
        self.location_updated_at = Some(Utc::now());
        self
    }
}

/// A search hit, shaped for the booking page's driver list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyDriver {
    pub driver_id: u64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: Distance,
    pub rating: f64,
    pub total_rides: u32,
    pub vehicle_info: Option<String>,
}

impl NearbyDriver {
    pub(super) fn new(d: &Driver, location: Coordinate, km: f64) -> Option<Self> {
        Some(Self {
            driver_id: d.id,
            name: d.name.trim().to_string(),
            lat: location.latitude(),
            lng: location.longitude(),
            distance_km: Distance::from_km(km).ok()?,
            rating: d.rating,
            total_rides: d.total_rides,
            vehicle_info: d.vehicle_info.clone(),
        })
    }
}

/// Registry and search failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("unknown driver {0}")]
    UnknownDriver(u64),
    #[error("invalid search radius {0} km: must be finite and non-negative")]
    InvalidRadius(f64),
}
