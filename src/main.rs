//! Terminal front desk for the day schedule.
//!
//! Plays the part of the schedule screen: it owns today's appointment list,
//! turns menu choices into schedule operations and swaps in whatever list
//! they return.

use std::io::{self, Write};
use std::path::PathBuf;

use chairside::config::Config;
use chairside::metrics::{achievements_for, PerformanceMetrics, ScheduleSummary, SessionActivity};
use chairside::models::Appointment;
use chairside::schedule::{
    active_appointment, extend_active, finish_active, mark_no_show, planning_list, rebook,
    rebook_date, shorten_active, DurationChange, Rebooking, DEFAULT_REBOOK_TIME,
    DEFAULT_REBOOK_WEEKS, REBOOK_TIME_SLOTS, REBOOK_WEEK_OPTIONS,
};
use chairside::seed;
use chrono::Local;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

struct ScheduleCli {
    config: Config,
    appointments: Vec<Appointment>,
    delay_minutes: i64,
    activity: SessionActivity,
    rebookings: Vec<Rebooking>,
    running: bool,
}

impl ScheduleCli {
    fn new(config: Config, appointments: Vec<Appointment>) -> Self {
        ScheduleCli {
            config,
            appointments,
            delay_minutes: 0,
            activity: SessionActivity::default(),
            rebookings: Vec::new(),
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       CHAIRSIDE - {}", Local::now().format("%A %d %B, %H:%M"));
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. View schedule");
        println!("2. Shorten current client (-{} min)", self.config.duration.step);
        println!("3. Extend current client (+{} min)", self.config.duration.step);
        println!("4. Finish current client");
        println!("5. Mark a no-show");
        println!("6. Client details");
        println!("7. Performance");
        println!("8. Load demo day");
        println!("9. Load seed file");
        println!("0. Exit");
        println!("{}", "-".repeat(20));
    }

    /// Read one line; end of input stops the session and yields the default.
    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "cannot flush stdout");
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                self.running = false;
                return default.unwrap_or("").to_string();
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "cannot read stdin");
                self.running = false;
                return default.unwrap_or("").to_string();
            }
        }

        let input = input.trim();
        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn get_int_input(&mut self, prompt: &str, default: Option<i64>) -> Option<i64> {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());
            if let Ok(value) = input.parse::<i64>() {
                return Some(value);
            }
            if !self.running {
                return None;
            }
            println!("Please enter a valid number");
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.get_input(&format!("{} (y/n)", prompt), Some("n"))
            .eq_ignore_ascii_case("y")
    }

    fn view_schedule(&self) {
        let summary = ScheduleSummary::from_appointments(&self.appointments);
        println!(
            "\n--- Today: {} clients, {:.0}€ expected, {} done, {} no-show ---",
            summary.client_count, summary.total_revenue, summary.completed, summary.no_shows
        );

        match active_appointment(&self.appointments) {
            Some(active) => {
                let end = active.end_time().unwrap_or_else(|_| "??:??".to_string());
                println!(
                    "\nIn chair: {} - {}  {} -> {} ({} min)",
                    active.client_name,
                    active.service_name,
                    active.effective_start_time(),
                    end,
                    active.duration
                );
                if self.delay_minutes != 0 {
                    println!("  Running {:+} min against plan", self.delay_minutes);
                }
            }
            None => println!("\nChair is free"),
        }

        let upcoming = planning_list(&self.appointments);
        if upcoming.is_empty() {
            println!("\nNothing else on the list");
            return;
        }

        println!("\nUp next:");
        for (i, apt) in upcoming.iter().enumerate() {
            let moved = if apt.effective_start_time() != apt.scheduled_start_time {
                format!(" (was {})", apt.scheduled_start_time)
            } else {
                String::new()
            };
            println!(
                "  {:2}. {}{:12} {:20} {:15} {:3} min {:>5.0}€  {}",
                i + 1,
                apt.effective_start_time(),
                moved,
                apt.client_name,
                apt.service_name,
                apt.duration,
                apt.price,
                apt.status().name()
            );
        }
    }

    fn apply_duration_change(&mut self, change: DurationChange) {
        self.appointments = change.appointments;
        self.delay_minutes += change.applied_minutes;
        self.activity.time_managed += change.applied_minutes.abs();

        if change.applied_minutes == 0 {
            println!(
                "\nAlready at the minimum of {} minutes",
                self.config.duration.minimum
            );
        } else {
            println!("\nDuration changed by {:+} min", change.applied_minutes);
        }

        if let Some(next) = change.notify {
            println!(
                "\n{} now starts at {} ({})",
                next.client_name,
                next.effective_start_time(),
                next.client_phone
            );
            if self.confirm("Mark client as notified?") {
                self.activity.clients_notified += 1;
            }
        }
    }

    fn shorten(&mut self) {
        match shorten_active(&self.appointments, self.config.duration) {
            Ok(change) => self.apply_duration_change(change),
            Err(e) => println!("\n{}", e),
        }
    }

    fn extend(&mut self) {
        match extend_active(&self.appointments, self.config.duration) {
            Ok(change) => self.apply_duration_change(change),
            Err(e) => println!("\n{}", e),
        }
    }

    fn finish(&mut self) {
        let outcome = match finish_active(&self.appointments) {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("\n{}", e);
                return;
            }
        };

        self.appointments = outcome.appointments;
        self.delay_minutes = 0;

        println!(
            "\n{} done at {} ({:.0}€)",
            outcome.finished.client_name, outcome.end_time, outcome.finished.price
        );
        match active_appointment(&self.appointments) {
            Some(next) => println!(
                "Next: {} - {} at {}",
                next.client_name,
                next.service_name,
                next.effective_start_time()
            ),
            None => println!("That was the last client of the day"),
        }

        self.rebook(&outcome.finished);
    }

    /// Offer the client a follow-up visit a few weeks out.
    fn rebook(&mut self, appointment: &Appointment) {
        let today = Local::now().date_naive();
        println!(
            "
--- Rebook {} ({}) ---",
            appointment.client_name, appointment.service_name
        );
        for weeks in REBOOK_WEEK_OPTIONS {
            if let Some(date) = rebook_date(today, weeks) {
                println!("  {} wk: {}", weeks, date.format("%A %d %B"));
            }
        }

        let Some(weeks) = self.get_int_input(
            "Weeks until next visit (0 to skip)",
            Some(i64::from(DEFAULT_REBOOK_WEEKS)),
        ) else {
            return;
        };
        if weeks <= 0 {
            return;
        }
        let Ok(weeks) = u32::try_from(weeks) else {
            println!("
That is too far ahead");
            return;
        };

        println!("  Slots: {}", REBOOK_TIME_SLOTS.join(", "));
        let time = self.get_input("Time", Some(DEFAULT_REBOOK_TIME));

        match rebook(appointment, today, weeks, &time) {
            Ok(rebooking) => {
                println!(
                    "
{} booked in {} week{}: {} at {}",
                    rebooking.client_name,
                    rebooking.weeks,
                    if rebooking.weeks > 1 { "s" } else { "" },
                    rebooking.date.format("%A %d %B"),
                    rebooking.time
                );
                self.rebookings.push(rebooking);
            }
            Err(e) => println!("
{}", e),
        }
    }

    /// Number the open appointments and let the operator pick one.
    fn pick_appointment(&mut self, include_closed: bool) -> Option<String> {
        let candidates: Vec<(String, String)> = self
            .appointments
            .iter()
            .filter(|a| include_closed || !a.is_terminal())
            .map(|a| {
                (
                    a.id.clone(),
                    format!(
                        "{} {} - {} [{}]",
                        a.effective_start_time(),
                        a.client_name,
                        a.service_name,
                        a.status().name()
                    ),
                )
            })
            .collect();

        if candidates.is_empty() {
            println!("\nNo appointments to choose from");
            return None;
        }

        println!();
        for (i, (_, label)) in candidates.iter().enumerate() {
            println!("  {}. {}", i + 1, label);
        }

        let choice = self.get_int_input("Select appointment (0 to go back)", Some(0))?;
        if choice <= 0 || choice as usize > candidates.len() {
            return None;
        }
        Some(candidates[choice as usize - 1].0.clone())
    }

    fn no_show(&mut self) {
        println!("\n--- Mark a no-show ---");
        let Some(id) = self.pick_appointment(false) else {
            return;
        };
        let name = self
            .appointments
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.client_name.clone())
            .unwrap_or_default();

        if !self.confirm(&format!("Mark {} as absent?", name)) {
            return;
        }

        match mark_no_show(&self.appointments, &id) {
            Ok(updated) => {
                self.appointments = updated;
                println!("\n{} marked as no-show", name);
            }
            Err(e) => println!("\n{}", e),
        }
    }

    fn client_details(&mut self) {
        println!("\n--- Client details ---");
        let Some(id) = self.pick_appointment(true) else {
            return;
        };
        let Some(apt) = self.appointments.iter().find(|a| a.id == id).cloned() else {
            return;
        };

        println!("\n{} ({})", apt.client_name, apt.client_phone);
        println!(
            "  {} at {}, {} min, {:.0}€",
            apt.service_name,
            apt.effective_start_time(),
            apt.duration,
            apt.price
        );

        match &apt.client {
            Some(client) => {
                println!(
                    "  Visits: {}{}",
                    client.visit_count,
                    if client.is_vip() { "  [VIP]" } else { "" }
                );
                println!(
                    "  No-shows: {}{}",
                    client.no_show_count,
                    if client.has_no_show_history() { "  [watch]" } else { "" }
                );
                println!("  Hair: {}", client.hair_type.name());
                if let Some(last) = &client.last_visit {
                    println!("  Last visit: {}", last);
                }
                if let Some(notes) = &client.notes {
                    println!("  Notes: {}", notes);
                }
                if !client.preferred_products.is_empty() {
                    println!("  Products: {}", client.preferred_products.join(", "));
                }
            }
            None => println!("  No client record on file"),
        }

        if self.confirm("Book their next visit?") {
            self.rebook(&apt);
        }
    }

    fn performance(&self) {
        let metrics = PerformanceMetrics::from_schedule(&self.appointments, self.activity);
        let goal = self.config.daily_goal;
        let progress = metrics.goal_progress(goal);
        let filled = (progress / 5.0).round() as usize;

        println!("\n--- Performance ---");
        println!("  Revenue:        {:.0}€ / {:.0}€", metrics.total_revenue, goal);
        println!("  [{}{}] {:.0}%", "#".repeat(filled), ".".repeat(20 - filled), progress);
        println!("  Clients served: {}", metrics.completed_today);
        println!("  No-shows:       {}", metrics.no_shows_today);
        println!("  Average ticket: {:.0}€", metrics.average_ticket());
        println!("  Attendance:     {}%", metrics.attendance_rate());
        println!("  Time managed:   {} min", metrics.time_managed);
        println!("  Notified:       {}", metrics.clients_notified);
        println!("  Rebooked:       {}", self.rebookings.len());
        println!(
            "  App clients:    {:.0}€ ({}%), walk-ins {:.0}€",
            metrics.app_revenue,
            metrics.app_revenue_share(),
            metrics.walk_in_revenue()
        );

        println!("\nAchievements:");
        for achievement in achievements_for(&metrics, goal) {
            println!(
                "  [{}] {:14} {:3}%  {}",
                if achievement.unlocked { "x" } else { " " },
                achievement.name,
                achievement.progress_percent(),
                achievement.description
            );
        }
    }

    fn replace_day(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
        self.delay_minutes = 0;
        self.activity = SessionActivity::default();
        self.rebookings.clear();
        println!("\nLoaded {} appointments", self.appointments.len());
    }

    fn load_demo(&mut self) {
        match seed::demo_day() {
            Ok(day) => self.replace_day(day),
            Err(e) => println!("\nCannot build demo day: {}", e),
        }
    }

    fn load_seed(&mut self) {
        let default = self
            .config
            .seed_path
            .as_ref()
            .map(|p| p.display().to_string());
        let path = self.get_input("Seed file", default.as_deref());
        if path.is_empty() {
            return;
        }

        match seed::load_appointments(&PathBuf::from(path)) {
            Ok(day) => self.replace_day(day),
            Err(e) => println!("\nCannot load seed: {}", e),
        }
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let Some(choice) = self.get_int_input("Enter choice", Some(1)) else {
                break;
            };

            match choice {
                1 => self.view_schedule(),
                2 => self.shorten(),
                3 => self.extend(),
                4 => self.finish(),
                5 => self.no_show(),
                6 => self.client_details(),
                7 => self.performance(),
                8 => self.load_demo(),
                9 => self.load_seed(),
                0 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chairside=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let appointments = match &config.seed_path {
        Some(path) => seed::load_appointments(path)?,
        None => seed::demo_day()?,
    };

    let mut cli = ScheduleCli::new(config, appointments);
    cli.run();
    Ok(())
}
