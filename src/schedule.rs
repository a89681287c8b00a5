//! Lifecycle of today's queue: stretching or shortening the appointment in
//! the chair, finishing it and calling the next client, and no-shows.
//!
//! Every operation takes the current list by reference and hands back a new
//! one. The host swaps its list for the returned one; nothing here keeps
//! state between calls.

use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::clock;
use crate::error::ScheduleError;
use crate::models::{Appointment, MIN_DURATION_MINUTES};
use crate::recalculate::recalculate;

/// How far one tap moves the active duration, and how short it may get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    pub step: i64,
    pub minimum: i64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        DurationPolicy {
            step: 15,
            minimum: MIN_DURATION_MINUTES,
        }
    }
}

/// Result of shortening or extending the active appointment.
#[derive(Debug, Clone)]
pub struct DurationChange {
    pub appointments: Vec<Appointment>,
    /// Minutes actually added to the active duration; 0 when already at the minimum.
    pub applied_minutes: i64,
    /// After an extension, the next waiting client, with the shifted start time.
    pub notify: Option<Appointment>,
}

/// Weeks offered when a client books their next visit.
pub const REBOOK_WEEK_OPTIONS: [u32; 6] = [1, 2, 3, 4, 6, 8];
pub const DEFAULT_REBOOK_WEEKS: u32 = 3;
pub const REBOOK_TIME_SLOTS: [&str; 6] = ["10:00", "11:00", "14:00", "15:00", "16:00", "17:00"];
pub const DEFAULT_REBOOK_TIME: &str = "14:00";

/// A follow-up visit booked for a client of today's list.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebooking {
    pub appointment_id: String,
    pub client_id: String,
    pub client_name: String,
    pub service_name: String,
    pub weeks: u32,
    pub date: NaiveDate,
    pub time: String,
}

/// Result of finishing the active appointment.
#[derive(Debug, Clone)]
pub struct FinishOutcome {
    pub appointments: Vec<Appointment>,
    pub finished: Appointment,
    pub end_time: String,
    pub next_id: Option<String>,
}

pub fn active_appointment(appointments: &[Appointment]) -> Option<&Appointment> {
    appointments.iter().find(|a| a.is_active)
}

/// Everything shown under the active card: not in the chair, not a no-show,
/// ordered by effective start time.
pub fn planning_list(appointments: &[Appointment]) -> Vec<&Appointment> {
    let mut list: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| !a.is_active && !a.is_no_show)
        .collect();
    list.sort_by(|a, b| a.effective_start_time().cmp(b.effective_start_time()));
    list
}

/// The appointment that takes the chair next.
///
/// Start times are compared as strings. That matches clock order inside one
/// day only: a start that wrapped to `00:20` is picked before `23:00`.
pub fn next_eligible(appointments: &[Appointment]) -> Option<&Appointment> {
    appointments
        .iter()
        .filter(|a| !a.is_active && !a.is_terminal())
        .min_by(|a, b| a.effective_start_time().cmp(b.effective_start_time()))
}

/// Take `policy.step` minutes off the active appointment, never going below
/// `policy.minimum`.
pub fn shorten_active(
    appointments: &[Appointment],
    policy: DurationPolicy,
) -> Result<DurationChange, ScheduleError> {
    let (updated, applied_minutes) = change_active_duration(appointments, |duration| {
        duration
            .checked_sub(policy.step)
            .map(|shorter| shorter.max(policy.minimum))
    })?;

    Ok(DurationChange {
        appointments: updated,
        applied_minutes,
        notify: None,
    })
}

/// Add `policy.step` minutes to the active appointment.
pub fn extend_active(
    appointments: &[Appointment],
    policy: DurationPolicy,
) -> Result<DurationChange, ScheduleError> {
    let (updated, applied_minutes) =
        change_active_duration(appointments, |duration| duration.checked_add(policy.step))?;
    let notify = planning_list(&updated)
        .into_iter()
        .find(|a| !a.is_terminal())
        .cloned();

    Ok(DurationChange {
        appointments: updated,
        applied_minutes,
        notify,
    })
}

fn change_active_duration(
    appointments: &[Appointment],
    new_duration: impl FnOnce(i64) -> Option<i64>,
) -> Result<(Vec<Appointment>, i64), ScheduleError> {
    let active = active_appointment(appointments).ok_or(ScheduleError::NoActiveAppointment)?;
    let (duration, applied) = new_duration(active.duration)
        .and_then(|duration| Some((duration, duration.checked_sub(active.duration)?)))
        .ok_or_else(|| {
            ScheduleError::InvalidAppointment(format!(
                "duration of appointment {} is out of range at {} minutes",
                active.id, active.duration
            ))
        })?;

    let updated: Vec<Appointment> = appointments
        .iter()
        .map(|a| {
            if a.id == active.id {
                Appointment {
                    duration,
                    ..a.clone()
                }
            } else {
                a.clone()
            }
        })
        .collect();
    let recalculated = recalculate(&updated, &active.id, active.effective_start_time())?;

    info!(
        appointment_id = %active.id,
        duration,
        applied,
        "active duration changed"
    );
    Ok((recalculated, applied))
}

/// Close the active appointment and seat the next client at its end time.
///
/// When nobody is left to serve, the returned list has no active appointment.
pub fn finish_active(appointments: &[Appointment]) -> Result<FinishOutcome, ScheduleError> {
    let active_index = appointments
        .iter()
        .position(|a| a.is_active)
        .ok_or(ScheduleError::NoActiveAppointment)?;
    let end_time = appointments[active_index].end_time()?;

    let mut updated = appointments.to_vec();
    updated[active_index].is_active = false;
    updated[active_index].is_completed = true;
    let finished = updated[active_index].clone();

    let next_id = next_eligible(&updated).map(|a| a.id.clone());
    match &next_id {
        Some(id) => {
            for appointment in updated.iter_mut().filter(|a| &a.id == id) {
                appointment.is_active = true;
                appointment.recalculated_start_time = Some(end_time.clone());
            }
            updated = recalculate(&updated, id, &end_time)?;
            info!(finished = %finished.id, next = %id, start = %end_time, "next client seated");
        }
        None => info!(finished = %finished.id, end = %end_time, "queue is empty"),
    }

    Ok(FinishOutcome {
        appointments: updated,
        finished,
        end_time,
        next_id,
    })
}

/// Mark a client as absent. The appointment leaves the queue for good;
/// downstream start times are not recalculated and nobody is seated in its
/// place.
pub fn mark_no_show(
    appointments: &[Appointment],
    appointment_id: &str,
) -> Result<Vec<Appointment>, ScheduleError> {
    let target = appointments
        .iter()
        .find(|a| a.id == appointment_id)
        .ok_or_else(|| ScheduleError::AppointmentNotFound(appointment_id.to_string()))?;
    if target.is_completed {
        return Err(ScheduleError::AlreadyClosed(appointment_id.to_string()));
    }
    if target.is_no_show {
        debug!(appointment_id, "already marked as no-show");
        return Ok(appointments.to_vec());
    }
    if target.is_active {
        warn!(appointment_id, "active appointment marked as no-show, chair is now free");
    }

    let updated: Vec<Appointment> = appointments
        .iter()
        .map(|a| {
            if a.id == appointment_id {
                Appointment {
                    is_no_show: true,
                    is_active: false,
                    ..a.clone()
                }
            } else {
                a.clone()
            }
        })
        .collect();

    info!(appointment_id, client = %target.client_name, "marked as no-show");
    Ok(updated)
}

/// The day `weeks` weeks after `today`, or `None` past the calendar range.
pub fn rebook_date(today: NaiveDate, weeks: u32) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(u64::from(weeks) * 7))
}

/// Book the same service again for the client of `appointment`.
pub fn rebook(
    appointment: &Appointment,
    today: NaiveDate,
    weeks: u32,
    time: &str,
) -> Result<Rebooking, ScheduleError> {
    if weeks == 0 {
        return Err(ScheduleError::InvalidAppointment(
            "a rebooking is at least one week away".to_string(),
        ));
    }
    clock::parse(time)?;
    let date = rebook_date(today, weeks).ok_or_else(|| {
        ScheduleError::InvalidAppointment(format!("{} weeks from {} is out of range", weeks, today))
    })?;

    info!(
        appointment_id = %appointment.id,
        client = %appointment.client_name,
        %date,
        time,
        "client rebooked"
    );
    Ok(Rebooking {
        appointment_id: appointment.id.clone(),
        client_id: appointment.client_id.clone(),
        client_name: appointment.client_name.clone(),
        service_name: appointment.service_name.clone(),
        weeks,
        date,
        time: time.to_string(),
    })
}
