//! Builders for appointment fixtures used across the unit tests.
//!
//! Appointments are built field by field (no validation, fixed ids) so tests
//! can reach states `Appointment::new` refuses, such as a zero duration.

use crate::models::Appointment;

pub struct AppointmentBuilder {
    appointment: Appointment,
}

impl AppointmentBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            appointment: Appointment {
                id: id.to_string(),
                client_id: format!("client-{id}"),
                client_name: format!("Client {id}"),
                client_phone: "+33 6 00 00 00 00".to_string(),
                service_name: "Coupe".to_string(),
                scheduled_start_time: "09:00".to_string(),
                duration: 30,
                price: 25.0,
                is_active: false,
                is_completed: false,
                is_no_show: false,
                recalculated_start_time: None,
                client: None,
            },
        }
    }

    pub fn start(mut self, time: &str) -> Self {
        self.appointment.scheduled_start_time = time.to_string();
        self
    }

    pub fn recalculated(mut self, time: &str) -> Self {
        self.appointment.recalculated_start_time = Some(time.to_string());
        self
    }

    pub fn duration(mut self, minutes: i64) -> Self {
        self.appointment.duration = minutes;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.appointment.price = price;
        self
    }

    pub fn active(mut self) -> Self {
        self.appointment.is_active = true;
        self
    }

    pub fn completed(mut self) -> Self {
        self.appointment.is_completed = true;
        self
    }

    pub fn no_show(mut self) -> Self {
        self.appointment.is_no_show = true;
        self
    }

    pub fn build(self) -> Appointment {
        self.appointment
    }
}

/// Scenario list from the schedule screen: 09:00 / 45 min / 20 min.
pub fn morning_queue() -> Vec<Appointment> {
    vec![
        AppointmentBuilder::new("1").start("09:00").duration(30).active().build(),
        AppointmentBuilder::new("2").start("09:30").duration(45).build(),
        AppointmentBuilder::new("3").start("10:15").duration(20).build(),
    ]
}
