use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{FlightId, FlightRecord, Result, StoreError, Version, store::FlightStore};

/// PostgreSQL-backed flight store implementation.
///
/// Commits are conditional updates keyed by `(id, version)`; an update that
/// touches no row means another writer committed first.
#[derive(Clone)]
pub struct PostgresFlightStore {
    pool: PgPool,
}

impl PostgresFlightStore {
    /// Creates a new PostgreSQL flight store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<FlightRecord> {
        Ok(FlightRecord {
            flight_id: FlightId::from_uuid(row.try_get::<Uuid, _>("id")?),
            version: Version::new(row.try_get("version")?),
            updated_at: row.try_get("updated_at")?,
            state: row.try_get("state")?,
        })
    }

    async fn current_version(&self, flight_id: FlightId) -> Result<Option<Version>> {
        let version: Option<i64> = sqlx::query_scalar("SELECT version FROM flights WHERE id = $1")
            .bind(flight_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(version.map(Version::new))
    }
}

#[async_trait]
impl FlightStore for PostgresFlightStore {
    async fn insert(&self, record: FlightRecord) -> Result<Version> {
        let flight_id = record.flight_id;

        sqlx::query(
            r#"
            INSERT INTO flights (id, version, updated_at, state)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(flight_id.as_uuid())
        .bind(Version::first().as_i64())
        .bind(Utc::now())
        .bind(&record.state)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("flights_pkey")
            {
                return StoreError::FlightAlreadyExists(flight_id);
            }
            StoreError::Database(e)
        })?;

        Ok(Version::first())
    }

    async fn load(&self, flight_id: FlightId) -> Result<Option<FlightRecord>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, version, updated_at, state
            FROM flights
            WHERE id = $1
            "#,
        )
        .bind(flight_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn commit(&self, record: FlightRecord) -> Result<Version> {
        let flight_id = record.flight_id;
        let expected = record.version;
        let new_version = expected.next();

        let result = sqlx::query(
            r#"
            UPDATE flights
            SET version = $3, updated_at = $4, state = $5
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(flight_id.as_uuid())
        .bind(expected.as_i64())
        .bind(new_version.as_i64())
        .bind(Utc::now())
        .bind(&record.state)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either the flight is gone or someone else moved the version on
            return match self.current_version(flight_id).await? {
                Some(actual) => {
                    tracing::debug!(%flight_id, %expected, %actual, "stale flight commit rejected");
                    Err(StoreError::ConcurrencyConflict {
                        flight_id,
                        expected,
                        actual,
                    })
                }
                None => Err(StoreError::FlightNotFound(flight_id)),
            };
        }

        Ok(new_version)
    }

    async fn list(&self) -> Result<Vec<FlightRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, version, updated_at, state
            FROM flights
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
