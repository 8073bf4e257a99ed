//! In-process store, selected with `database.url = "memory://"`

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{BlackoutStore, ReservationStore, ScheduleStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{NewReservation, ReservationFilter},
        schedule::NewBlackout,
        Blackout, BookedSlot, Reservation, ReservationStatus, WeeklyHours, WeeklySlot,
    },
};

#[derive(Default)]
struct Tables {
    weekly: Vec<WeeklySlot>,
    blackouts: Vec<Blackout>,
    reservations: Vec<Reservation>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// All three stores behind one lock
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_weekly(&self) -> AppResult<Vec<WeeklySlot>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WeeklySlot> = tables
            .weekly
            .iter()
            .filter(|s| s.provider_scope.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.day_of_week);
        Ok(rows)
    }

    async fn get_weekly(&self, day_of_week: i16) -> AppResult<Option<WeeklySlot>> {
        let tables = self.tables.read().await;
        Ok(tables
            .weekly
            .iter()
            .find(|s| s.provider_scope.is_none() && s.day_of_week == day_of_week)
            .cloned())
    }

    async fn upsert_weekly(&self, hours: &WeeklyHours) -> AppResult<WeeklySlot> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Some(row) = tables
            .weekly
            .iter_mut()
            .find(|s| s.provider_scope.is_none() && s.day_of_week == hours.day_of_week)
        {
            row.is_available = hours.is_available;
            row.start_time = hours.start_time;
            row.end_time = hours.end_time;
            row.modif_date = Some(now);
            return Ok(row.clone());
        }

        let row = WeeklySlot {
            id: tables.next_id(),
            provider_scope: None,
            day_of_week: hours.day_of_week,
            is_available: hours.is_available,
            start_time: hours.start_time,
            end_time: hours.end_time,
            crea_date: Some(now),
            modif_date: None,
        };
        tables.weekly.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl BlackoutStore for MemoryStore {
    async fn find_on(&self, date: NaiveDate) -> AppResult<Option<Blackout>> {
        let tables = self.tables.read().await;
        Ok(tables.blackouts.iter().find(|b| b.date == date).cloned())
    }

    async fn list_from(&self, from: NaiveDate) -> AppResult<Vec<Blackout>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Blackout> = tables
            .blackouts
            .iter()
            .filter(|b| b.date >= from)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.date, b.id));
        Ok(rows)
    }

    async fn create(&self, data: &NewBlackout) -> AppResult<Blackout> {
        let mut tables = self.tables.write().await;
        let row = Blackout {
            id: tables.next_id(),
            date: data.date,
            reason: data.reason.clone(),
            crea_date: Some(Utc::now()),
        };
        tables.blackouts.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.blackouts.len();
        tables.blackouts.retain(|b| b.id != id);
        if tables.blackouts.len() == before {
            return Err(AppError::NotFound(format!("Blackout {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn booked_on(&self, date: NaiveDate) -> AppResult<Vec<BookedSlot>> {
        let tables = self.tables.read().await;
        let mut slots: Vec<(i32, BookedSlot)> = tables
            .reservations
            .iter()
            .filter(|r| r.date == date && r.status.occupies_slot())
            .map(|r| (r.id, BookedSlot::from(r)))
            .collect();
        slots.sort_by_key(|(id, s)| (s.start_time, *id));
        Ok(slots.into_iter().map(|(_, s)| s).collect())
    }

    async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Reservation> = tables
            .reservations
            .iter()
            .filter(|r| filter.start_date.map_or(true, |d| r.date >= d))
            .filter(|r| filter.end_date.map_or(true, |d| r.date <= d))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.date, r.start_time, r.id));
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        let tables = self.tables.read().await;
        tables
            .reservations
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    async fn create(&self, data: &NewReservation) -> AppResult<Reservation> {
        let mut tables = self.tables.write().await;
        let row = Reservation {
            id: tables.next_id(),
            customer_name: data.customer_name.clone(),
            customer_email: data.customer_email.clone(),
            customer_phone: data.customer_phone.clone(),
            style_name: data.style_name.clone(),
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            status: ReservationStatus::Pending,
            payment_reference: None,
            notes: data.notes.clone(),
            crea_date: Some(Utc::now()),
            modif_date: None,
        };
        tables.reservations.push(row.clone());
        Ok(row)
    }

    async fn update_status(
        &self,
        id: i32,
        status: ReservationStatus,
        payment_reference: Option<String>,
    ) -> AppResult<Reservation> {
        let mut tables = self.tables.write().await;
        let row = tables
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?;
        row.status = status;
        if payment_reference.is_some() {
            row.payment_reference = payment_reference;
        }
        row.modif_date = Some(Utc::now());
        Ok(row.clone())
    }
}
