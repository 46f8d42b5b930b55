use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use tracing::info;

use crate::{
    error::AppError,
    ingest::{CoordinateFormat, TripSubmission},
    models::{
        notification::{IngestionNotification, NotificationOutcome},
        trip::Trip,
    },
    services::importer,
    state::AppState,
};

pub const RECENT_TRIPS_LIMIT: i64 = 25;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_trip", get(create_trip_form).post(create_trip_submit))
        .route("/trips", get(recent_trips))
        .route("/load_data", get(load_data))
}

#[derive(Template)]
#[template(path = "create_trip.html")]
struct CreateTripTemplate {
    show_message: bool,
    is_error: bool,
    message: String,
}

async fn create_trip_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(CreateTripTemplate {
        show_message: false,
        is_error: false,
        message: String::new(),
    })
}

/// A trip submission read from either a JSON body (WKT points) or a form (bare pairs).
pub struct SubmittedTrip {
    format: CoordinateFormat,
    submission: TripSubmission,
}

#[async_trait]
impl<S> FromRequest<S> for SubmittedTrip
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(submission) = Json::<TripSubmission>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Self {
                format: CoordinateFormat::Wkt,
                submission,
            })
        } else {
            let Form(submission) = Form::<TripSubmission>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Self {
                format: CoordinateFormat::Pair,
                submission,
            })
        }
    }
}

async fn create_trip_submit(
    State(state): State<AppState>,
    submitted: Result<SubmittedTrip, AppError>,
) -> Result<Response, AppError> {
    let new_trip = match submitted {
        Ok(SubmittedTrip { format, submission }) => match submission.validate(format) {
            Ok(trip) => trip,
            Err(err) => return Ok(render_create_error(err.to_string())),
        },
        Err(AppError::BadRequest(msg)) => return Ok(render_create_error(msg)),
        Err(err) => return Err(err),
    };

    let trip = state.trips.insert(new_trip).await?;
    info!(trip_id = trip.id, region = %trip.region, "trip stored");

    let outcome = state
        .notifier
        .notify(&IngestionNotification::completed(
            &trip.region,
            &trip.datasource,
        ))
        .await;
    let message = match outcome {
        NotificationOutcome::Delivered => {
            "Trip created successfully and ingestion state notified."
        }
        NotificationOutcome::Failed(_) => {
            "Trip created successfully, but notifying the ingestion state failed."
        }
    };

    Ok(AskamaTemplateResponse::into_response(CreateTripTemplate {
        show_message: true,
        is_error: false,
        message: message.to_string(),
    }))
}

fn render_create_error(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        AskamaTemplateResponse::into_response(CreateTripTemplate {
            show_message: true,
            is_error: true,
            message,
        }),
    )
        .into_response()
}

#[derive(Template)]
#[template(path = "trips.html")]
struct TripsTemplate {
    trips: Vec<Trip>,
}

async fn recent_trips(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trips = state.trips.recent(RECENT_TRIPS_LIMIT).await?;
    Ok(AskamaTemplateResponse::into_response(TripsTemplate {
        trips,
    }))
}

async fn load_data(State(state): State<AppState>) -> String {
    match importer::import_file(&state.trips, &state.config.import_path).await {
        Ok(count) => format!("Loaded {count} trips into the database."),
        Err(err) => format!("Error loading data into the database: {err}"),
    }
}
