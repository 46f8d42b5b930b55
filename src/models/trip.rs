use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Timestamp pattern shared by CSV rows, optional submission timestamps and listings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub region: String,
    pub origin_coord: String,
    pub destination_coord: String,
    pub datetime: NaiveDateTime,
    pub datasource: String,
}

impl Trip {
    pub fn from_new(id: i64, new: NewTrip) -> Self {
        Self {
            id,
            region: new.region,
            origin_coord: new.origin_coord,
            destination_coord: new.destination_coord,
            datetime: new.datetime,
            datasource: new.datasource,
        }
    }

    pub fn datetime_text(&self) -> String {
        self.datetime.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A validated trip that has not been stored yet. Coordinates are canonical WKT.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub region: String,
    pub origin_coord: String,
    pub destination_coord: String,
    pub datetime: NaiveDateTime,
    pub datasource: String,
}
