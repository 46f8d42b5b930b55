use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    geometry::{self, Quadrilateral},
    ingest::IngestError,
    reporting::{self, AverageOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grouped_trips", get(grouped_trips))
        .route("/average_trips", get(average_form).post(average_submit))
}

#[derive(Clone)]
struct GroupRow {
    region: String,
    interval: &'static str,
    count: usize,
    trip_ids: String,
}

#[derive(Template)]
#[template(path = "grouped_trips.html")]
struct GroupedTripsTemplate {
    groups: Vec<GroupRow>,
}

async fn grouped_trips(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trips = state.trips.all().await?;
    let groups = reporting::group_by_interval(&trips)
        .into_iter()
        .map(|group| GroupRow {
            region: group.region,
            interval: group.interval.label(),
            count: group.count,
            trip_ids: group
                .trip_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    Ok(AskamaTemplateResponse::into_response(
        GroupedTripsTemplate { groups },
    ))
}

#[derive(Clone)]
struct WeekRow {
    label: String,
    count: usize,
}

#[derive(Template)]
#[template(path = "average_trips.html")]
struct AverageTripsTemplate {
    form: AreaForm,
    show_message: bool,
    is_error: bool,
    message: String,
    has_result: bool,
    average_text: String,
    trips_in_area: usize,
    weeks: Vec<WeekRow>,
}

impl AverageTripsTemplate {
    fn empty(form: AreaForm) -> Self {
        Self {
            form,
            show_message: false,
            is_error: false,
            message: String::new(),
            has_result: false,
            average_text: String::new(),
            trips_in_area: 0,
            weeks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaForm {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub point1: String,
    #[serde(default)]
    pub point2: String,
    #[serde(default)]
    pub point3: String,
    #[serde(default)]
    pub point4: String,
}

impl AreaForm {
    /// Reads the region and the four corners, in the order the user entered them.
    pub fn parse(&self) -> Result<(String, Quadrilateral), IngestError> {
        let region = self.region.trim();
        if region.is_empty() {
            return Err(IngestError::MissingField("region"));
        }
        let corners = [
            parse_corner("point1", &self.point1)?,
            parse_corner("point2", &self.point2)?,
            parse_corner("point3", &self.point3)?,
            parse_corner("point4", &self.point4)?,
        ];
        Ok((region.to_string(), Quadrilateral::from_corners(corners)))
    }
}

fn parse_corner(field: &'static str, raw: &str) -> Result<geo::Point<f64>, IngestError> {
    if raw.trim().is_empty() {
        return Err(IngestError::MissingField(field));
    }
    geometry::parse_coordinate_pair(raw).map_err(|source| IngestError::Coordinate { field, source })
}

async fn average_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(AverageTripsTemplate::empty(AreaForm::default()))
}

async fn average_submit(
    State(state): State<AppState>,
    Form(form): Form<AreaForm>,
) -> Result<Response, AppError> {
    let (region, area) = match form.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            let mut page = AverageTripsTemplate::empty(form);
            page.show_message = true;
            page.is_error = true;
            page.message = err.to_string();
            return Ok((
                StatusCode::BAD_REQUEST,
                AskamaTemplateResponse::into_response(page),
            )
                .into_response());
        }
    };

    let trips = state.trips.in_region(&region).await?;
    let mut page = AverageTripsTemplate::empty(form);
    match reporting::weekly_average_in_area(&trips, &area) {
        AverageOutcome::NoValidTrips => {
            page.show_message = true;
            page.message =
                "No valid trip dates were found to compute the average.".to_string();
        }
        AverageOutcome::Average(result) => {
            page.has_result = true;
            page.average_text = format!("{:.2}", result.average);
            page.trips_in_area = result.trips_in_area;
            page.weeks = result
                .weeks
                .into_iter()
                .map(|(label, count)| WeekRow {
                    label: label.to_string(),
                    count,
                })
                .collect();
        }
    }

    Ok(AskamaTemplateResponse::into_response(page))
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;

    fn form(points: [&str; 4]) -> AreaForm {
        AreaForm {
            region: "Hamburg".into(),
            point1: points[0].into(),
            point2: points[1].into(),
            point3: points[2].into(),
            point4: points[3].into(),
        }
    }

    #[test]
    fn parses_corners_in_order() {
        let (region, area) = form(["0 0", "10 0", "10 10", "0 10"]).parse().unwrap();
        assert_eq!(region, "Hamburg");
        assert!(area.contains(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn reports_the_offending_corner() {
        let err = form(["0 0", "10 0", "ten ten", "0 10"]).parse().unwrap_err();
        assert!(matches!(err, IngestError::Coordinate { field: "point3", .. }));

        let err = form(["0 0", "10 0", "10 10", " "]).parse().unwrap_err();
        assert!(matches!(err, IngestError::MissingField("point4")));
    }
}
