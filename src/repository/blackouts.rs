//! Blackout dates repository (Postgres)

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use super::BlackoutStore;
use crate::{
    error::{AppError, AppResult},
    models::{schedule::NewBlackout, Blackout},
};

#[derive(Clone)]
pub struct PgBlackoutStore {
    pool: Pool<Postgres>,
}

impl PgBlackoutStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlackoutStore for PgBlackoutStore {
    async fn find_on(&self, date: NaiveDate) -> AppResult<Option<Blackout>> {
        let row = sqlx::query_as::<_, Blackout>(
            "SELECT * FROM blackouts WHERE date = $1 ORDER BY id LIMIT 1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_from(&self, from: NaiveDate) -> AppResult<Vec<Blackout>> {
        let rows = sqlx::query_as::<_, Blackout>(
            "SELECT * FROM blackouts WHERE date >= $1 ORDER BY date, id",
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, data: &NewBlackout) -> AppResult<Blackout> {
        let row = sqlx::query_as::<_, Blackout>(
            "INSERT INTO blackouts (date, reason) VALUES ($1, $2) RETURNING *",
        )
        .bind(data.date)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blackouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Blackout {} not found", id)));
        }
        Ok(())
    }
}
