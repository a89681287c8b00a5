use thiserror::Error;

use crate::clock::FormatError;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("no appointment is in progress")]
    NoActiveAppointment,

    #[error("appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("appointment {0} is already completed")]
    AlreadyClosed(String),

    #[error("invalid appointment: {0}")]
    InvalidAppointment(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("seed file is not valid appointment JSON: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}
