//! Business logic services

pub mod availability;
pub mod email;
pub mod reservations;
pub mod schedules;

use chrono::{NaiveDate, Utc};

use crate::{config::EmailConfig, repository::Repository};

/// Current calendar date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub schedules: schedules::SchedulesService,
    pub reservations: reservations::ReservationsService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, email_config: EmailConfig) -> Self {
        let availability = availability::AvailabilityService::new(repository.clone());
        Self {
            schedules: schedules::SchedulesService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(
                repository.clone(),
                availability.clone(),
                email::EmailService::new(email_config),
            ),
            availability,
            repository,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}
