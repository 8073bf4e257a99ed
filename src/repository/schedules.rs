//! Weekly template repository (Postgres)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::ScheduleStore;
use crate::{
    error::AppResult,
    models::{WeeklyHours, WeeklySlot},
};

#[derive(Clone)]
pub struct PgScheduleStore {
    pool: Pool<Postgres>,
}

impl PgScheduleStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn list_weekly(&self) -> AppResult<Vec<WeeklySlot>> {
        let rows = sqlx::query_as::<_, WeeklySlot>(
            "SELECT * FROM weekly_slots WHERE provider_scope IS NULL ORDER BY day_of_week",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_weekly(&self, day_of_week: i16) -> AppResult<Option<WeeklySlot>> {
        let row = sqlx::query_as::<_, WeeklySlot>(
            "SELECT * FROM weekly_slots WHERE provider_scope IS NULL AND day_of_week = $1",
        )
        .bind(day_of_week)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_weekly(&self, hours: &WeeklyHours) -> AppResult<WeeklySlot> {
        // Conflict target matches weekly_slots_scope_day_idx
        let row = sqlx::query_as::<_, WeeklySlot>(
            r#"
            INSERT INTO weekly_slots (provider_scope, day_of_week, is_available, start_time, end_time)
            VALUES (NULL, $1, $2, $3, $4)
            ON CONFLICT ((COALESCE(provider_scope, '')), day_of_week)
            DO UPDATE SET
                is_available = EXCLUDED.is_available,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                modif_date = NOW()
            RETURNING *
            "#,
        )
        .bind(hours.day_of_week)
        .bind(hours.is_available)
        .bind(hours.start_time)
        .bind(hours.end_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
