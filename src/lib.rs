//! Live "today" schedule for a single-chair service business.
//!
//! The appointment list is owned by the caller. Every operation in
//! [`schedule`] and [`recalculate`] takes the current list and returns a new
//! one; the caller replaces its copy with the result.

pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recalculate;
pub mod schedule;
pub mod seed;

#[cfg(test)]
pub mod test_support;

pub use error::{ConfigError, ScheduleError};
pub use models::{Appointment, AppointmentStatus, Client, HairType};
