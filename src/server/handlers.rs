use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::{DispatchError, MatchedDriver, NearbyDriver, DEFAULT_SEARCH_RADIUS_KM};
use crate::fare::PriceEstimate;
use crate::geo::{self, Coordinate, Distance, GeoError, RawCoordinate};
use crate::places;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// JSON body extractor whose failures use the `{error, code}` shape.
type JsonBody<T> = WithRejection<Json<T>, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "rejected request body");
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<GeoError> for ApiError {
    fn from(e: GeoError) -> Self {
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<DispatchError> for ApiError {
    fn from(e: DispatchError) -> Self {
        let status = match e {
            DispatchError::UnknownDriver(_) => StatusCode::NOT_FOUND,
            DispatchError::InvalidRadius(_) => StatusCode::BAD_REQUEST,
        };
        api_error(status, e.to_string())
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── POST /api/price_estimate ────────────────────────────────────

#[derive(Deserialize)]
pub struct TripRequest {
    pub pickup_coords: Option<RawCoordinate>,
    pub dropoff_coords: Option<RawCoordinate>,
}

impl TripRequest {
    fn endpoints(&self) -> Result<(Coordinate, Coordinate), ApiError> {
        match (self.pickup_coords, self.dropoff_coords) {
            (Some(p), Some(d)) => Ok((Coordinate::try_from(p)?, Coordinate::try_from(d)?)),
            _ => Err(api_error(
                StatusCode::BAD_REQUEST,
                "Both pickup and dropoff coordinates required",
            )),
        }
    }
}

pub async fn price_estimate(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): JsonBody<TripRequest>,
) -> Result<Json<PriceEstimate>, ApiError> {
    let start = Instant::now();
    let (pickup, dropoff) = req.endpoints()?;

    let quote = state.fares.quote(pickup, dropoff);

    tracing::info!(
        %pickup, %dropoff,
        distance = %quote.estimate.distance_km,
        minutes = quote.estimate.duration_minutes,
        total = quote.estimate.total_price,
        "POST /api/price_estimate ({:.1}ms)",
        elapsed_ms(start)
    );

    Ok(Json(quote.estimate))
}

// ─── POST /api/distance ──────────────────────────────────────────

#[derive(Serialize)]
pub struct DistanceResponse {
    pub distance_km: Distance,
    pub duration_minutes: u32,
}

pub async fn distance(
    WithRejection(Json(req), _): JsonBody<TripRequest>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let (pickup, dropoff) = req.endpoints()?;
    let distance_km = geo::distance_km(pickup, dropoff);
    let duration_minutes = geo::estimate_duration_minutes(distance_km);

    tracing::debug!(%pickup, %dropoff, distance = %distance_km, "POST /api/distance");

    Ok(Json(DistanceResponse {
        distance_km,
        duration_minutes,
    }))
}

// ─── POST /api/nearby_drivers ────────────────────────────────────

#[derive(Deserialize)]
pub struct NearbyRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

#[derive(Serialize)]
pub struct NearbyResponse {
    pub drivers: Vec<NearbyDriver>,
}

pub async fn nearby_drivers(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): JsonBody<NearbyRequest>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let start = Instant::now();
    let (Some(lat), Some(lng)) = (req.lat, req.lng) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Location coordinates required"));
    };
    let origin = Coordinate::new(lat, lng)?;
    let radius = req.radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);

    let drivers = state.registry().find_nearby(origin, radius)?;

    tracing::info!(
        %origin, radius,
        found = drivers.len(),
        "POST /api/nearby_drivers ({:.1}ms)",
        elapsed_ms(start)
    );

    Ok(Json(NearbyResponse { drivers }))
}

// ─── POST /api/match_driver ──────────────────────────────────────

#[derive(Serialize)]
pub struct MatchResponse {
    pub driver: MatchedDriver,
}

pub async fn match_driver(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(pickup), _): JsonBody<RawCoordinate>,
) -> Result<Json<MatchResponse>, ApiError> {
    let pickup = Coordinate::try_from(pickup)?;

    let Some(driver) = state.registry().best_match(pickup, Utc::now()) else {
        return Err(api_error(StatusCode::NOT_FOUND, "No available drivers nearby"));
    };

    tracing::info!(%pickup, driver_id = driver.driver.driver_id, score = driver.score, "POST /api/match_driver");
    Ok(Json(MatchResponse { driver }))
}

// ─── POST /api/update_location ───────────────────────────────────

#[derive(Deserialize)]
pub struct LocationUpdate {
    pub driver_id: u64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Serialize)]
pub struct Success {
    success: bool,
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): JsonBody<LocationUpdate>,
) -> Result<Json<Success>, ApiError> {
    let (Some(lat), Some(lng)) = (req.lat, req.lng) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Location coordinates required"));
    };
    let location = Coordinate::new(lat, lng)?;
    state.registry().update_location(req.driver_id, location)?;

    tracing::info!(driver_id = req.driver_id, %location, "POST /api/update_location");
    Ok(Json(Success { success: true }))
}

// ─── POST /api/availability ──────────────────────────────────────

#[derive(Deserialize)]
pub struct AvailabilityUpdate {
    pub driver_id: u64,
    pub available: bool,
}

pub async fn set_availability(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): JsonBody<AvailabilityUpdate>,
) -> Result<Json<Success>, ApiError> {
    state.registry().set_availability(req.driver_id, req.available)?;

    tracing::info!(driver_id = req.driver_id, available = req.available, "POST /api/availability");
    Ok(Json(Success { success: true }))
}

// ─── GET /api/autocomplete ───────────────────────────────────────

const MAX_SUGGESTIONS: usize = 5;

#[derive(Deserialize)]
pub struct AutocompleteQuery {
    pub input: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct Prediction {
    pub description: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub formatted_coords: String,
}

#[derive(Serialize)]
pub struct AutocompleteResponse {
    pub predictions: Vec<Prediction>,
}

pub async fn autocomplete(Query(params): Query<AutocompleteQuery>) -> Json<AutocompleteResponse> {
    let input = params.input.as_deref().unwrap_or("");
    let limit = params.limit.unwrap_or(MAX_SUGGESTIONS).min(MAX_SUGGESTIONS);

    let predictions = places::autocomplete(input, limit)
        .into_iter()
        .map(|p| Prediction {
            description: p.name,
            lat: p.coordinate.latitude(),
            lng: p.coordinate.longitude(),
            formatted_coords: places::format_coords(p.coordinate),
        })
        .collect();

    Json(AutocompleteResponse { predictions })
}
