use std::{io::Read, path::Path};

use sqlx::{Sqlite, Transaction};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::{
    ingest::{CsvTripRow, IngestError},
    services::trip_store::{insert_trip, TripStore},
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: IngestError,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Loads every row of the CSV file at `path` as one all-or-nothing batch.
pub async fn import_file(store: &TripStore, path: &Path) -> Result<usize, ImportError> {
    let raw = fs::read(path).await.map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    import_reader(store, raw.as_slice()).await
}

/// Inserts all rows inside one transaction. Any bad row rolls back the whole batch.
pub async fn import_reader<R>(store: &TripStore, reader: R) -> Result<usize, ImportError>
where
    R: Read + Send,
{
    let mut rows = csv::Reader::from_reader(reader);
    let mut tx = store.begin().await?;

    match insert_rows(&mut tx, &mut rows).await {
        Ok(count) => {
            tx.commit().await?;
            info!(count, "bulk import committed");
            Ok(count)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "bulk import rollback failed");
            }
            warn!(error = %err, "bulk import rolled back");
            Err(err)
        }
    }
}

async fn insert_rows<R>(
    tx: &mut Transaction<'static, Sqlite>,
    rows: &mut csv::Reader<R>,
) -> Result<usize, ImportError>
where
    R: Read + Send,
{
    let mut count = 0;
    for (index, record) in rows.deserialize::<CsvTripRow>().enumerate() {
        let row = index + 1;
        let trip = record?
            .validate()
            .map_err(|source| ImportError::Row { row, source })?;
        insert_trip(&mut **tx, &trip).await?;
        count += 1;
    }
    Ok(count)
}
