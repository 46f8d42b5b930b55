//! Validation of incoming trip data before it reaches the store.

use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    geometry::{self, CoordinateError},
    models::trip::{NewTrip, TIMESTAMP_FORMAT},
};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("the `{0}` field is required")]
    MissingField(&'static str),
    #[error("`{field}` is not a valid point: {source}")]
    Coordinate {
        field: &'static str,
        #[source]
        source: CoordinateError,
    },
    #[error("`{value}` does not match the YYYY-MM-DD HH:MM:SS pattern")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// How the coordinate fields of a submission are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFormat {
    /// `POINT (x y)`, used by JSON bodies and CSV rows.
    Wkt,
    /// A bare `x y` pair, used by the HTML form.
    Pair,
}

/// One trip as submitted by a client. Every field is optional at this stage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripSubmission {
    pub region: Option<String>,
    pub origin_coord: Option<String>,
    pub destination_coord: Option<String>,
    pub datasource: Option<String>,
    pub datetime: Option<String>,
}

impl TripSubmission {
    /// Checks every field and canonicalizes the coordinates. A missing timestamp
    /// becomes the current UTC time.
    pub fn validate(self, format: CoordinateFormat) -> Result<NewTrip, IngestError> {
        let region = required("region", self.region)?;
        let origin_coord = point_field("origin_coord", self.origin_coord, format)?;
        let destination_coord = point_field("destination_coord", self.destination_coord, format)?;
        let datasource = required("datasource", self.datasource)?;
        let datetime = match non_blank(self.datetime) {
            Some(value) => parse_timestamp(&value)?,
            None => Utc::now().naive_utc(),
        };

        Ok(NewTrip {
            region,
            origin_coord,
            destination_coord,
            datetime,
            datasource,
        })
    }
}

/// A row of the bulk import file. Unknown columns are ignored by the reader.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvTripRow {
    pub region: String,
    pub origin_coord: String,
    pub destination_coord: String,
    pub datetime: String,
    pub datasource: String,
}

impl CsvTripRow {
    pub fn validate(self) -> Result<NewTrip, IngestError> {
        if self.datetime.trim().is_empty() {
            return Err(IngestError::MissingField("datetime"));
        }
        TripSubmission {
            region: Some(self.region),
            origin_coord: Some(self.origin_coord),
            destination_coord: Some(self.destination_coord),
            datasource: Some(self.datasource),
            datetime: Some(self.datetime),
        }
        .validate(CoordinateFormat::Wkt)
    }
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, IngestError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|source| {
        IngestError::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}

fn non_blank(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn required(field: &'static str, input: Option<String>) -> Result<String, IngestError> {
    non_blank(input).ok_or(IngestError::MissingField(field))
}

fn point_field(
    field: &'static str,
    input: Option<String>,
    format: CoordinateFormat,
) -> Result<String, IngestError> {
    let raw = required(field, input)?;
    let point = match format {
        CoordinateFormat::Wkt => geometry::parse_wkt_point(&raw),
        CoordinateFormat::Pair => geometry::parse_coordinate_pair(&raw),
    }
    .map_err(|source| IngestError::Coordinate { field, source })?;
    Ok(geometry::to_wkt(&point))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn submission(origin: &str, destination: &str) -> TripSubmission {
        TripSubmission {
            region: Some("Prague".into()),
            origin_coord: Some(origin.into()),
            destination_coord: Some(destination.into()),
            datasource: Some("cheap_mobile".into()),
            datetime: Some("2024-03-05 07:15:00".into()),
        }
    }

    #[test]
    fn form_and_json_paths_store_the_same_record() {
        let from_form = submission("14.4 50.1", "14.5 50.0")
            .validate(CoordinateFormat::Pair)
            .unwrap();
        let from_json = submission("POINT (14.4 50.1)", "POINT (14.5 50)")
            .validate(CoordinateFormat::Wkt)
            .unwrap();
        assert_eq!(from_form, from_json);
        assert_eq!(from_form.origin_coord, "POINT (14.4 50.1)");
        assert_eq!(
            from_form.datetime,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(7, 15, 0)
                .unwrap()
        );
    }

    #[test]
    fn blank_fields_are_missing() {
        let mut input = submission("1 2", "3 4");
        input.region = Some("   ".into());
        assert!(matches!(
            input.validate(CoordinateFormat::Pair),
            Err(IngestError::MissingField("region"))
        ));

        let mut input = submission("1 2", "3 4");
        input.datasource = None;
        assert!(matches!(
            input.validate(CoordinateFormat::Pair),
            Err(IngestError::MissingField("datasource"))
        ));
    }

    #[test]
    fn bad_coordinates_name_the_field() {
        let err = submission("1 2", "three four")
            .validate(CoordinateFormat::Pair)
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Coordinate {
                field: "destination_coord",
                ..
            }
        ));

        let err = submission("1 2", "3 4")
            .validate(CoordinateFormat::Wkt)
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Coordinate {
                field: "origin_coord",
                source: CoordinateError::NotAPoint(_),
            }
        ));
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let mut input = submission("1 2", "3 4");
        input.datetime = None;
        let before = Utc::now().naive_utc().with_nanosecond(0).unwrap();
        let trip = input.validate(CoordinateFormat::Pair).unwrap();
        assert!(trip.datetime >= before);
    }

    #[test]
    fn csv_rows_require_the_fixed_timestamp_pattern() {
        let row = CsvTripRow {
            region: "Turin".into(),
            origin_coord: "POINT (7.6 45.0)".into(),
            destination_coord: "POINT (7.7 45.1)".into(),
            datetime: "05/03/2024 07:15".into(),
            datasource: "funny_car".into(),
        };
        assert!(matches!(
            row.validate(),
            Err(IngestError::Timestamp { .. })
        ));
    }
}
