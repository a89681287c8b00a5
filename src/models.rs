//! Data models for the day schedule.
//!
//! - Appointment: one booked service slot in today's queue
//! - Client: the optional client record attached to an appointment
//! - AppointmentStatus: the derived lifecycle state used for display

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{self, FormatError};
use crate::error::ScheduleError;

/// Shortest service the schedule allows, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 15;

/// Duration and price rules shared by every way an appointment gets built.
pub fn validate_terms(duration: i64, price: f64) -> Result<(), ScheduleError> {
    if duration < MIN_DURATION_MINUTES {
        return Err(ScheduleError::InvalidAppointment(format!(
            "duration must be at least {} minutes, got {}",
            MIN_DURATION_MINUTES, duration
        )));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ScheduleError::InvalidAppointment(format!(
            "price must be a non-negative amount, got {}",
            price
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairType {
    Straight,
    Wavy,
    Curly,
    Coily,
}

impl HairType {
    pub fn name(&self) -> &str {
        match self {
            HairType::Straight => "straight",
            HairType::Wavy => "wavy",
            HairType::Curly => "curly",
            HairType::Coily => "coily",
        }
    }
}

/// Client record as kept by the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub hair_type: HairType,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub no_show_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_products: Vec<String>,
}

impl Client {
    /// Regulars with ten or more visits.
    pub fn is_vip(&self) -> bool {
        self.visit_count >= 10
    }

    pub fn has_no_show_history(&self) -> bool {
        self.no_show_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Waiting,
    Active,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    pub fn name(&self) -> &str {
        match self {
            AppointmentStatus::Waiting => "WAITING",
            AppointmentStatus::Active => "IN CHAIR",
            AppointmentStatus::Completed => "DONE",
            AppointmentStatus::NoShow => "NO-SHOW",
        }
    }
}

/// One slot in today's queue.
///
/// `recalculated_start_time` is written by the recalculation engine and,
/// once present, wins over `scheduled_start_time` everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub client_phone: String,
    pub service_name: String,
    pub scheduled_start_time: String,
    pub duration: i64,
    pub price: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_no_show: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recalculated_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl Appointment {
    /// Create a waiting appointment with validation.
    pub fn new(
        client_id: String,
        client_name: String,
        client_phone: String,
        service_name: String,
        scheduled_start_time: String,
        duration: i64,
        price: f64,
    ) -> Result<Self, ScheduleError> {
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            client_id,
            client_name,
            client_phone,
            service_name,
            scheduled_start_time,
            duration,
            price,
            is_active: false,
            is_completed: false,
            is_no_show: false,
            recalculated_start_time: None,
            client: None,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Check an appointment that did not come through [`Appointment::new`],
    /// such as one read from a seed file.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.client_name.trim().is_empty() {
            return Err(ScheduleError::InvalidAppointment(
                "client name cannot be empty".to_string(),
            ));
        }
        if self.service_name.trim().is_empty() {
            return Err(ScheduleError::InvalidAppointment(
                "service name cannot be empty".to_string(),
            ));
        }
        validate_terms(self.duration, self.price)?;
        clock::parse(&self.scheduled_start_time)?;
        if let Some(start) = &self.recalculated_start_time {
            clock::parse(start)?;
        }

        let flags = [self.is_active, self.is_completed, self.is_no_show];
        if flags.iter().filter(|&&set| set).count() > 1 {
            return Err(ScheduleError::InvalidAppointment(format!(
                "appointment {} combines active, completed and no-show flags",
                self.id
            )));
        }
        Ok(())
    }

    /// Book a known client; the denormalized fields are copied from the record.
    pub fn for_client(
        client: Client,
        service_name: String,
        scheduled_start_time: String,
        duration: i64,
        price: f64,
    ) -> Result<Self, ScheduleError> {
        let appointment = Appointment::new(
            client.id.clone(),
            client.name.clone(),
            client.phone.clone(),
            service_name,
            scheduled_start_time,
            duration,
            price,
        )?;
        Ok(appointment.with_client(client))
    }

    /// Attach the full client record, refreshing the denormalized fields.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client_id = client.id.clone();
        self.client_name = client.name.clone();
        self.client_phone = client.phone.clone();
        self.client = Some(client);
        self
    }

    /// The start time to display and to chain from.
    pub fn effective_start_time(&self) -> &str {
        self.recalculated_start_time
            .as_deref()
            .unwrap_or(&self.scheduled_start_time)
    }

    pub fn end_time(&self) -> Result<String, FormatError> {
        clock::add_minutes(self.effective_start_time(), self.duration)
    }

    pub fn status(&self) -> AppointmentStatus {
        if self.is_no_show {
            AppointmentStatus::NoShow
        } else if self.is_completed {
            AppointmentStatus::Completed
        } else if self.is_active {
            AppointmentStatus::Active
        } else {
            AppointmentStatus::Waiting
        }
    }

    /// Completed and no-show appointments never come back into the queue.
    pub fn is_terminal(&self) -> bool {
        self.is_completed || self.is_no_show
    }
}
