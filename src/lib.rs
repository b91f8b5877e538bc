//! Ride Estimator — distance, duration and fare estimates for ride booking.
//!
//! The core is [`geo`]: haversine great-circle distance (Earth radius
//! 6371 km, rounded to two decimals) and a trip duration at an
//! average 25 km/h with a five-minute floor. [`fare`], [`dispatch`] and
//! [`places`] build on it, and [`server`] exposes them as a JSON API.

pub mod dispatch;
pub mod fare;
pub mod geo;
pub mod places;
pub mod server;
