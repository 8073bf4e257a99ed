//! Availability editor (weekly template, blackout dates)

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        schedule::{weekly_template, BlackoutCreated, CreateBlackout, SaveWeeklyTemplate},
        Blackout, WeeklyHours,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SchedulesService {
    repository: Repository,
}

impl SchedulesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- Weekly template ----

    /// Seven entries, Sunday first, defaults filled in for unsaved days
    pub async fn list_weekly_template(&self) -> AppResult<Vec<WeeklyHours>> {
        let rows = self.repository.schedules.list_weekly().await?;
        Ok(weekly_template(&rows))
    }

    /// Upsert each submitted day.
    ///
    /// The whole request is validated first. Days are then committed one by
    /// one with no surrounding transaction: on failure, days before the
    /// failing one stay saved.
    pub async fn save_weekly_template(&self, data: SaveWeeklyTemplate) -> AppResult<()> {
        let days = data.into_hours()?;

        for (idx, hours) in days.iter().enumerate() {
            if let Err(e) = self.repository.schedules.upsert_weekly(hours).await {
                tracing::error!(
                    day_of_week = hours.day_of_week,
                    committed = idx,
                    error = %e,
                    "Weekly template save stopped"
                );
                return Err(e);
            }
        }

        tracing::info!(days = days.len(), "Weekly template saved");
        Ok(())
    }

    // ---- Blackouts ----

    /// Blackouts dated `today` or later, ascending
    pub async fn list_future_blackouts(&self, today: NaiveDate) -> AppResult<Vec<Blackout>> {
        self.repository.blackouts.list_from(today).await
    }

    pub async fn add_blackout(&self, data: CreateBlackout) -> AppResult<BlackoutCreated> {
        let new = data.into_new()?;
        let blackout = self.repository.blackouts.create(&new).await?;
        tracing::info!(id = blackout.id, date = %blackout.date, "Blackout added");
        Ok(BlackoutCreated { id: blackout.id })
    }

    pub async fn remove_blackout(&self, id: i32) -> AppResult<()> {
        self.repository.blackouts.delete(id).await?;
        tracing::info!(id, "Blackout removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        error::AppError,
        models::{schedule::WeeklyTemplateEntry, WeeklySlot},
        repository::{MockBlackoutStore, MockReservationStore, MockScheduleStore},
    };

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn service() -> SchedulesService {
        SchedulesService::new(Repository::in_memory())
    }

    fn full_week() -> SaveWeeklyTemplate {
        SaveWeeklyTemplate {
            days: Some(
                (0..7)
                    .map(|day| WeeklyTemplateEntry {
                        day_of_week: day,
                        is_open: day != 1,
                        start: Some("10:00".into()),
                        end: Some("19:30".into()),
                    })
                    .collect(),
            ),
        }
    }

    #[tokio::test]
    async fn empty_template_lists_seven_defaults() {
        let template = service().list_weekly_template().await.unwrap();
        assert_eq!(template.len(), 7);
        assert_eq!(template, (0..7).map(WeeklyHours::default_for).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn saving_twice_is_idempotent() {
        let service = service();
        service.save_weekly_template(full_week()).await.unwrap();
        let once = service.list_weekly_template().await.unwrap();

        service.save_weekly_template(full_week()).await.unwrap();
        let twice = service.list_weekly_template().await.unwrap();

        assert_eq!(once, twice);
        assert!(!twice[1].is_available);
        assert!(twice[0].is_available);
        assert_eq!(twice[4].end_time.format("%H:%M").to_string(), "19:30");
    }

    #[tokio::test]
    async fn partial_save_leaves_other_days_untouched() {
        let service = service();
        service
            .save_weekly_template(SaveWeeklyTemplate {
                days: Some(vec![WeeklyTemplateEntry {
                    day_of_week: 6,
                    is_open: false,
                    start: None,
                    end: None,
                }]),
            })
            .await
            .unwrap();

        let template = service.list_weekly_template().await.unwrap();
        assert!(!template[6].is_available);
        assert_eq!(template[5], WeeklyHours::default_for(5));
    }

    #[tokio::test]
    async fn invalid_batch_writes_nothing() {
        let mut schedules = MockScheduleStore::new();
        schedules.expect_upsert_weekly().never();
        let repo = Repository::from_stores(
            Arc::new(schedules),
            Arc::new(MockBlackoutStore::new()),
            Arc::new(MockReservationStore::new()),
        );

        let mut request = full_week();
        if let Some(days) = request.days.as_mut() {
            days[5].start = Some("noon".into());
        }
        let err = SchedulesService::new(repo)
            .save_weekly_template(request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn failure_mid_batch_keeps_earlier_days() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let mut schedules = MockScheduleStore::new();
        schedules.expect_upsert_weekly().returning(move |hours| {
            if seen.fetch_add(1, Ordering::SeqCst) == 2 {
                return Err(AppError::StoreUnavailable(sqlx::Error::PoolTimedOut));
            }
            Ok(WeeklySlot {
                id: hours.day_of_week as i32 + 1,
                provider_scope: None,
                day_of_week: hours.day_of_week,
                is_available: hours.is_available,
                start_time: hours.start_time,
                end_time: hours.end_time,
                crea_date: None,
                modif_date: None,
            })
        });
        let repo = Repository::from_stores(
            Arc::new(schedules),
            Arc::new(MockBlackoutStore::new()),
            Arc::new(MockReservationStore::new()),
        );

        let err = SchedulesService::new(repo)
            .save_weekly_template(full_week())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        // Two days committed, third failed, the rest never attempted
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn blackout_lifecycle() {
        let service = service();
        let created = service
            .add_blackout(CreateBlackout {
                date: Some("2099-12-24".into()),
                reason: Some("Christmas Eve".into()),
            })
            .await
            .unwrap();

        let listed = service.list_future_blackouts(d("2099-01-01")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].reason.as_deref(), Some("Christmas Eve"));

        service.remove_blackout(created.id).await.unwrap();
        assert!(service.list_future_blackouts(d("2099-01-01")).await.unwrap().is_empty());
        assert!(matches!(
            service.remove_blackout(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn past_and_duplicate_blackouts_are_accepted() {
        let service = service();
        for date in ["2020-01-01", "2099-03-01", "2099-03-01", "2099-02-01"] {
            service
                .add_blackout(CreateBlackout { date: Some(date.into()), reason: None })
                .await
                .unwrap();
        }

        let listed = service.list_future_blackouts(d("2026-10-19")).await.unwrap();
        let dates: Vec<_> = listed.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d("2099-02-01"), d("2099-03-01"), d("2099-03-01")]);
    }

    #[tokio::test]
    async fn blackout_on_today_is_listed_and_yesterday_is_not() {
        let service = service();
        for date in ["2026-10-18", "2026-10-19"] {
            service
                .add_blackout(CreateBlackout { date: Some(date.into()), reason: None })
                .await
                .unwrap();
        }

        let listed = service.list_future_blackouts(d("2026-10-19")).await.unwrap();
        let dates: Vec<_> = listed.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d("2026-10-19")]);
    }

    #[tokio::test]
    async fn blackout_without_date_is_rejected() {
        let err = service()
            .add_blackout(CreateBlackout { date: None, reason: Some("?".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
