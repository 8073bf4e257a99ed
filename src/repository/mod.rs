//! Repository layer: store traits and their Postgres / in-memory backends

pub mod blackouts;
pub mod memory;
pub mod reservations;
pub mod schedules;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::{
    config::DatabaseConfig,
    error::AppResult,
    models::{
        reservation::{NewReservation, ReservationFilter},
        schedule::NewBlackout,
        Blackout, BookedSlot, Reservation, ReservationStatus, WeeklyHours, WeeklySlot,
    },
};

/// Weekly opening template, business-wide rows (`provider_scope IS NULL`)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// All stored rows, ordered by day of week
    async fn list_weekly(&self) -> AppResult<Vec<WeeklySlot>>;

    async fn get_weekly(&self, day_of_week: i16) -> AppResult<Option<WeeklySlot>>;

    /// Insert or overwrite the row for `hours.day_of_week`
    async fn upsert_weekly(&self, hours: &WeeklyHours) -> AppResult<WeeklySlot>;
}

/// Dates forced closed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlackoutStore: Send + Sync {
    /// First blackout on `date`, if any
    async fn find_on(&self, date: NaiveDate) -> AppResult<Option<Blackout>>;

    /// Blackouts on or after `from`, ascending by date
    async fn list_from(&self, from: NaiveDate) -> AppResult<Vec<Blackout>>;

    async fn create(&self, data: &NewBlackout) -> AppResult<Blackout>;

    /// Fails with `NotFound` when the id does not exist
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Booked appointments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Non-cancelled reservations on `date`, ordered by start time
    async fn booked_on(&self, date: NaiveDate) -> AppResult<Vec<BookedSlot>>;

    async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Reservation>;

    async fn create(&self, data: &NewReservation) -> AppResult<Reservation>;

    /// Set the status; a given payment reference replaces the stored one
    async fn update_status(
        &self,
        id: i32,
        status: ReservationStatus,
        payment_reference: Option<String>,
    ) -> AppResult<Reservation>;
}

/// Handle over the three stores.
///
/// Built once at startup and passed down explicitly; `close` releases the
/// underlying pool.
#[derive(Clone)]
pub struct Repository {
    pub schedules: Arc<dyn ScheduleStore>,
    pub blackouts: Arc<dyn BlackoutStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Create a repository backed by the given Postgres pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            schedules: Arc::new(schedules::PgScheduleStore::new(pool.clone())),
            blackouts: Arc::new(blackouts::PgBlackoutStore::new(pool.clone())),
            reservations: Arc::new(reservations::PgReservationStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository holding everything in process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            schedules: store.clone(),
            blackouts: store.clone(),
            reservations: store,
            pool: None,
        }
    }

    /// Assemble a repository from arbitrary store implementations
    pub fn from_stores(
        schedules: Arc<dyn ScheduleStore>,
        blackouts: Arc<dyn BlackoutStore>,
        reservations: Arc<dyn ReservationStore>,
    ) -> Self {
        Self {
            schedules,
            blackouts,
            reservations,
            pool: None,
        }
    }

    /// Open the store described by the configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            return Ok(Self::in_memory());
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> Option<&Pool<Postgres>> {
        self.pool.as_ref()
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// Release pooled connections
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }
}
