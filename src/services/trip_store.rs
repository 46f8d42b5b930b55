use sqlx::{Executor, Sqlite, Transaction};

use crate::{
    db::DbPool,
    error::AppError,
    models::trip::{NewTrip, Trip},
};

const SELECT_TRIPS: &str =
    "SELECT id, region, origin_coord, destination_coord, datetime, datasource FROM trips";

/// Sole owner of persisted trips. Trips are only ever inserted.
#[derive(Clone)]
pub struct TripStore {
    pool: DbPool,
}

impl TripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, trip: NewTrip) -> Result<Trip, AppError> {
        let id = insert_trip(&self.pool, &trip).await?;
        Ok(Trip::from_new(id, trip))
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Newest first; trips sharing a timestamp fall back to insertion order, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "{SELECT_TRIPS} ORDER BY datetime DESC, id DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    pub async fn all(&self) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(&format!("{SELECT_TRIPS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(trips)
    }

    pub async fn in_region(&self, region: &str) -> Result<Vec<Trip>, AppError> {
        let trips =
            sqlx::query_as::<_, Trip>(&format!("{SELECT_TRIPS} WHERE region = ?1 ORDER BY id"))
                .bind(region)
                .fetch_all(&self.pool)
                .await?;
        Ok(trips)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trips")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Inserts one trip through any executor, so bulk imports can share a transaction.
pub async fn insert_trip<'e, E>(executor: E, trip: &NewTrip) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"INSERT INTO trips (region, origin_coord, destination_coord, datetime, datasource)
           VALUES (?1, ?2, ?3, ?4, ?5)"#,
    )
    .bind(&trip.region)
    .bind(&trip.origin_coord)
    .bind(&trip.destination_coord)
    .bind(trip.datetime)
    .bind(&trip.datasource)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}
