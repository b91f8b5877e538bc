//! Fare estimation from trip distance and duration.
//!
//! Price = base fare + per-km rate × distance + per-minute rate × duration.
//! Component costs and the total are each rounded to cents.

use crate::geo::{self, Coordinate, Distance};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_BASE_FARE: f64 = 5.00;
pub const DEFAULT_RATE_PER_KM: f64 = 1.50;
pub const DEFAULT_RATE_PER_MINUTE: f64 = 0.30;

/// Rejected fare schedule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FareError {
    #[error("invalid {name} rate {value}: must be finite and non-negative")]
    InvalidRate { name: &'static str, value: f64 },
}

/// Rates applied to every trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareSchedule {
    base_fare: f64,
    per_km: f64,
    per_minute: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_fare: DEFAULT_BASE_FARE,
            per_km: DEFAULT_RATE_PER_KM,
            per_minute: DEFAULT_RATE_PER_MINUTE,
        }
    }
}

/// Price breakdown returned to the booking page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEstimate {
    pub base_fare: f64,
    pub distance_cost: f64,
    pub time_cost: f64,
    pub total_price: f64,
    pub distance_km: Distance,
    pub duration_minutes: u32,
}

/// A full quote: endpoints plus the price breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct TripQuote {
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    #[serde(flatten)]
    pub estimate: PriceEstimate,
}

impl FareSchedule {
    pub fn new(base_fare: f64, per_km: f64, per_minute: f64) -> Result<Self, FareError> {
        check_rate("base fare", base_fare)?;
        check_rate("per-km", per_km)?;
        check_rate("per-minute", per_minute)?;
        Ok(Self { base_fare, per_km, per_minute })
    }

    pub fn base_fare(&self) -> f64 {
        self.base_fare
    }

    pub fn per_km(&self) -> f64 {
        self.per_km
    }

    pub fn per_minute(&self) -> f64 {
        self.per_minute
    }

    /// Price a trip of known distance and duration.
    pub fn estimate(&self, distance: Distance, duration_minutes: u32) -> PriceEstimate {
        let distance_cost = distance.km() * self.per_km;
        let time_cost = f64::from(duration_minutes) * self.per_minute;
        let total = self.base_fare + distance_cost + time_cost;

        PriceEstimate {
            base_fare: self.base_fare,
            distance_cost: geo::round2(distance_cost),
            time_cost: geo::round2(time_cost),
            total_price: geo::round2(total),
            distance_km: distance,
            duration_minutes,
        }
    }

    /// Price the straight-line trip between two coordinates.
    pub fn quote(&self, pickup: Coordinate, dropoff: Coordinate) -> TripQuote {
        let distance = geo::distance_km(pickup, dropoff);
        let minutes = geo::estimate_duration_minutes(distance);
        TripQuote {
            pickup,
            dropoff,
            estimate: self.estimate(distance, minutes),
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), FareError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FareError::InvalidRate { name, value })
    }
}
