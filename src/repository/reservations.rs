//! Reservations repository (Postgres)

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use super::ReservationStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{NewReservation, ReservationFilter},
        BookedSlot, Reservation, ReservationStatus,
    },
};

#[derive(Clone)]
pub struct PgReservationStore {
    pool: Pool<Postgres>,
}

impl PgReservationStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn booked_on(&self, date: NaiveDate) -> AppResult<Vec<BookedSlot>> {
        let rows = sqlx::query_as::<_, BookedSlot>(
            r#"
            SELECT start_time, end_time, status
            FROM reservations
            WHERE date = $1 AND status <> $2
            ORDER BY start_time, id
            "#,
        )
        .bind(date)
        .bind(ReservationStatus::Cancelled)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.start_date.is_some() {
            conditions.push(format!("date >= ${}", idx));
            idx += 1;
        }
        if filter.end_date.is_some() {
            conditions.push(format!("date <= ${}", idx));
            idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT * FROM reservations {} ORDER BY date, start_time, id",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Reservation>(&query);
        if let Some(sd) = filter.start_date { builder = builder.bind(sd); }
        if let Some(ed) = filter.end_date { builder = builder.bind(ed); }
        if let Some(st) = filter.status { builder = builder.bind(st); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    async fn create(&self, data: &NewReservation) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                customer_name, customer_email, customer_phone, style_name,
                date, start_time, end_time, status, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(&data.customer_phone)
        .bind(&data.style_name)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(ReservationStatus::Pending)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        id: i32,
        status: ReservationStatus,
        payment_reference: Option<String>,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $1,
                payment_reference = COALESCE($2, payment_reference),
                modif_date = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(payment_reference)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }
}
