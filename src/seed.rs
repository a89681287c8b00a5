//! Appointment lists to start a session from: the built-in demo day or a
//! JSON file exported by the booking app.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ScheduleError;
use crate::models::{Appointment, Client, HairType};

/// Load and check a JSON array of appointments.
pub fn load_appointments(path: &Path) -> Result<Vec<Appointment>, ScheduleError> {
    let raw = fs::read_to_string(path)?;
    let appointments = parse_appointments(&raw)?;
    info!(path = %path.display(), count = appointments.len(), "seed loaded");
    Ok(appointments)
}

/// Parse a JSON seed and reject lists the schedule cannot work with.
pub fn parse_appointments(raw: &str) -> Result<Vec<Appointment>, ScheduleError> {
    let appointments: Vec<Appointment> = serde_json::from_str(raw)?;

    for appointment in &appointments {
        appointment.validate()?;
    }

    let active = appointments.iter().filter(|a| a.is_active).count();
    if active > 1 {
        return Err(ScheduleError::InvalidAppointment(format!(
            "{} appointments are marked active, at most one may be",
            active
        )));
    }

    let mut ids: Vec<&str> = appointments.iter().map(|a| a.id.as_str()).collect();
    ids.sort_unstable();
    if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(ScheduleError::InvalidAppointment(format!(
            "duplicate appointment id {}",
            pair[0]
        )));
    }

    Ok(appointments)
}

/// A fixed Saturday at the shop, first client already in the chair.
pub fn demo_day() -> Result<Vec<Appointment>, ScheduleError> {
    let karim = Client {
        id: "client-karim".to_string(),
        name: "Karim Benali".to_string(),
        phone: "+33 6 12 34 56 78".to_string(),
        hair_type: HairType::Curly,
        visit_count: 14,
        no_show_count: 0,
        last_visit: Some("2026-09-26".to_string()),
        notes: Some("Low fade, keeps the top long".to_string()),
        preferred_products: vec!["Curl cream".to_string()],
    };
    let lucas = Client {
        id: "client-lucas".to_string(),
        name: "Lucas Martin".to_string(),
        phone: "+33 6 98 76 54 32".to_string(),
        hair_type: HairType::Straight,
        visit_count: 3,
        no_show_count: 1,
        last_visit: Some("2026-08-30".to_string()),
        notes: None,
        preferred_products: Vec::new(),
    };

    let mut day = vec![
        Appointment::for_client(karim, "Fade + beard".to_string(), "09:00".to_string(), 45, 35.0)?,
        Appointment::new(
            "client-yanis".to_string(),
            "Yanis Haddad".to_string(),
            "+33 7 11 22 33 44".to_string(),
            "Classic cut".to_string(),
            "09:45".to_string(),
            30,
            25.0,
        )?,
        Appointment::for_client(lucas, "Cut + wash".to_string(), "10:15".to_string(), 30, 30.0)?,
        Appointment::new(
            "client-omar".to_string(),
            "Omar Diallo".to_string(),
            "+33 6 55 44 33 22".to_string(),
            "Beard trim".to_string(),
            "10:45".to_string(),
            15,
            15.0,
        )?,
        Appointment::new(
            "client-theo".to_string(),
            "Théo Laurent".to_string(),
            "+33 6 66 77 88 99".to_string(),
            "Kids cut".to_string(),
            "11:00".to_string(),
            30,
            20.0,
        )?,
    ];
    day[0].is_active = true;

    Ok(day)
}
