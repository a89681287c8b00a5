//! Forward propagation of start times through today's queue.
//!
//! The queue is a single chair served first come, first served: each
//! appointment starts when the one before it in list order ends. Nothing is
//! re-sorted and no gaps are filled.

use tracing::debug;

use crate::clock::{self, FormatError};
use crate::models::Appointment;

/// Re-derive start times from the active appointment to the end of the list.
///
/// The appointment `active_id` is pinned to `active_start_time` and every later
/// entry starts where its predecessor ends. Entries before the active one are
/// the past and are copied unchanged. An unknown `active_id` is not an error:
/// the list comes back as it went in.
///
/// Durations are added as they are, including zero or negative values; the
/// minimum duration is the caller's business.
pub fn recalculate(
    appointments: &[Appointment],
    active_id: &str,
    active_start_time: &str,
) -> Result<Vec<Appointment>, FormatError> {
    let Some(active_index) = appointments.iter().position(|a| a.id == active_id) else {
        debug!(active_id, "active appointment not in list, nothing to recalculate");
        return Ok(appointments.to_vec());
    };
    clock::parse(active_start_time)?;

    let mut updated = appointments.to_vec();
    let mut current_time = active_start_time.to_string();
    updated[active_index].recalculated_start_time = Some(current_time.clone());

    for i in active_index + 1..updated.len() {
        current_time = clock::add_minutes(&current_time, updated[i - 1].duration)?;
        updated[i].recalculated_start_time = Some(current_time.clone());
    }

    debug!(
        active_id,
        active_start_time,
        shifted = updated.len() - active_index,
        "recalculated start times"
    );
    Ok(updated)
}
