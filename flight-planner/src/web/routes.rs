//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, warn};

use crate::domain::{AirportCode, InvalidAirportCode};
use crate::planner::{InvalidSortKey, Planner, SearchConfig, SearchError, SearchRequest, SortKey};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search_trips))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search for trips.
async fn search_trips(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchTripsResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: SearchTripsRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "Invalid search request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let (request, config) = build_search(req, &state.config)?;

    // The search is synchronous and CPU-bound
    let schedule = state.schedule.clone();
    let result =
        tokio::task::spawn_blocking(move || Planner::new(&schedule, &config).search(&request))
            .await
            .map_err(|e| AppError::Internal {
                message: format!("Search task failed: {e}"),
            })??;

    debug!(
        trips = result.trips.len(),
        routes_explored = result.routes_explored,
        "Search request served"
    );

    Ok(Json(SearchTripsResponse {
        trips: result.trips.iter().map(TripResult::from_trip).collect(),
        routes_explored: result.routes_explored,
    }))
}

/// Turn a web request into a planner request, applying per-request
/// overrides to the server's default configuration.
fn build_search(
    req: SearchTripsRequest,
    defaults: &SearchConfig,
) -> Result<(SearchRequest, SearchConfig), AppError> {
    let origins = parse_codes(&req.origin, &req.alt_origins)?;
    let destinations = parse_codes(&req.destination, &req.alt_destinations)?;

    let mut request = SearchRequest::new(origins, destinations);
    request.bags = req.bags;
    request.return_flight = req.return_flight;
    request.return_to_other_airport = req.return_to_other_airport;
    request.return_from_other_airport = req.return_from_other_airport;
    request.min_departure = req.min_departure;
    request.max_departure = req.max_departure;
    request.min_days_at_destination = req.min_days_at_destination;
    request.max_days_at_destination = req.max_days_at_destination;
    if let Some(names) = req.sort_by {
        request.sort_by = names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<SortKey>, _>>()?;
    }

    let config = SearchConfig::new(
        req.min_transfer_mins.unwrap_or(defaults.min_transfer_mins),
        req.max_transfer_mins.unwrap_or(defaults.max_transfer_mins),
        req.max_transfers.or(defaults.max_transfers),
    );

    Ok((request, config))
}

fn parse_codes(first: &str, rest: &[String]) -> Result<Vec<AirportCode>, InvalidAirportCode> {
    std::iter::once(first)
        .chain(rest.iter().map(String::as_str))
        .map(AirportCode::parse_normalized)
        .collect()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::UnknownAirport(_) => AppError::NotFound {
                message: e.to_string(),
            },
            SearchError::OverlappingAirports(_) | SearchError::InvalidRequest(_) => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            SearchError::Domain(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<InvalidAirportCode> for AppError {
    fn from(e: InvalidAirportCode) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidSortKey> for AppError {
    fn from(e: InvalidSortKey) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Flight;
    use crate::schedule::ScheduleIndex;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    fn make_flight(from: &str, to: &str, dep: &str, arr: &str, price: i64) -> Flight {
        Flight {
            flight_no: None,
            origin: code(from),
            destination: code(to),
            departure: format!("2021-09-01T{dep}:00").parse().unwrap(),
            arrival: format!("2021-09-01T{arr}:00").parse().unwrap(),
            base_price: Decimal::from(price),
            bag_price: Decimal::from(10),
            bags_allowed: 1,
        }
    }

    fn test_state() -> AppState {
        let schedule = ScheduleIndex::build(vec![
            make_flight("AAA", "BBB", "10:00", "12:00", 100),
            make_flight("BBB", "CCC", "13:00", "15:00", 80),
            make_flight("AAA", "CCC", "16:00", "18:00", 250),
            make_flight("CCC", "AAA", "20:00", "22:00", 90),
        ])
        .unwrap();
        AppState::new(schedule, SearchConfig::default())
    }

    async fn post_search(body: Value) -> Response {
        let body = Bytes::from(body.to_string());
        match search_trips(State(test_state()), body).await {
            Ok(json) => json.into_response(),
            Err(e) => e.into_response(),
        }
    }

    async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn search_returns_ranked_trips() {
        let response = post_search(json!({ "origin": "aaa", "destination": "CCC" })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let trips = body["trips"].as_array().unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0]["total_price"], json!(180.0));
        assert_eq!(trips[0]["flights"].as_array().unwrap().len(), 2);
        assert_eq!(trips[1]["total_price"], json!(250.0));
        assert!(body["routes_explored"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn request_overrides_transfer_window() {
        let response = post_search(json!({
            "origin": "AAA",
            "destination": "CCC",
            "min_transfer_mins": 120,
        }))
        .await;

        let body = read_json(response).await;
        let trips = body["trips"].as_array().unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0]["total_price"], json!(250.0));
    }

    #[tokio::test]
    async fn round_trip_search() {
        let response = post_search(json!({
            "origin": "AAA",
            "destination": "CCC",
            "return_flight": true,
            "sort_by": ["travel_time"],
        }))
        .await;

        let body = read_json(response).await;
        let trips = body["trips"].as_array().unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0]["origin"], "AAA");
        assert_eq!(trips[0]["destination"], "AAA");
        assert_eq!(trips[0]["travel_time"], "6:00:00");
    }

    #[tokio::test]
    async fn unknown_airport_is_not_found() {
        let response = post_search(json!({ "origin": "AAA", "destination": "ZZZ" })).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = read_json(response).await;
        assert_eq!(body["error"], "unknown airport code ZZZ");
    }

    #[tokio::test]
    async fn overlapping_airports_are_rejected() {
        let response = post_search(json!({
            "origin": "AAA",
            "destination": "CCC",
            "alt_destinations": ["AAA"],
        }))
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn huge_transfer_window_is_rejected() {
        let response = post_search(json!({
            "origin": "AAA",
            "destination": "CCC",
            "max_transfer_mins": i64::MAX,
        }))
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("out of range"));
    }

    #[tokio::test]
    async fn bad_sort_key_is_rejected() {
        let response = post_search(json!({
            "origin": "AAA",
            "destination": "CCC",
            "sort_by": ["price"],
        }))
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("\"price\""));
    }

    #[tokio::test]
    async fn malformed_code_is_rejected() {
        let response = post_search(json!({ "origin": "AAAA", "destination": "CCC" })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let body = Bytes::from_static(b"{\"origin\": ");
        let response = match search_trips(State(test_state()), body).await {
            Ok(json) => json.into_response(),
            Err(e) => e.into_response(),
        };

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn build_search_keeps_server_defaults() {
        let defaults = SearchConfig::new(45, 300, Some(2));
        let req: SearchTripsRequest = serde_json::from_value(json!({
            "origin": "AAA",
            "destination": "CCC",
            "alt_origins": ["bbb"],
            "max_transfer_mins": 200,
        }))
        .unwrap();

        let (request, config) = build_search(req, &defaults).unwrap();

        assert_eq!(request.origins, vec![code("AAA"), code("BBB")]);
        assert_eq!(request.sort_by, SortKey::defaults());
        assert_eq!(config, SearchConfig::new(45, 200, Some(2)));
    }
}
