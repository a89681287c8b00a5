//! Day performance: revenue, goal progress, attendance and achievements,
//! all derived from the live appointment list.

use serde::Serialize;

use crate::models::Appointment;

/// Counters over the appointment list as the schedule screen shows them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScheduleSummary {
    /// Sum of prices over every appointment that is not a no-show.
    pub total_revenue: f64,
    /// Sum of prices over completed appointments only.
    pub earned: f64,
    pub client_count: usize,
    pub completed: usize,
    pub no_shows: usize,
    pub remaining: usize,
}

impl ScheduleSummary {
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        appointments
            .iter()
            .fold(ScheduleSummary::default(), |mut summary, appointment| {
                if appointment.is_no_show {
                    summary.no_shows += 1;
                    return summary;
                }
                summary.total_revenue += appointment.price;
                summary.client_count += 1;
                if appointment.is_completed {
                    summary.completed += 1;
                    summary.earned += appointment.price;
                } else {
                    summary.remaining += 1;
                }
                summary
            })
    }
}

/// What the host measured during the session, beyond the list itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionActivity {
    /// Minutes of duration adjustments absorbed by the queue, in absolute value.
    pub time_managed: i64,
    pub clients_notified: u32,
    pub tips_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_revenue: f64,
    pub app_revenue: f64,
    pub time_managed: i64,
    pub clients_notified: u32,
    pub tips_total: f64,
    pub completed_today: u32,
    pub no_shows_today: u32,
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

impl PerformanceMetrics {
    /// Build the day metrics. Revenue counts completed services only;
    /// app revenue is the part coming from clients with a profile attached.
    pub fn from_schedule(appointments: &[Appointment], activity: SessionActivity) -> Self {
        let summary = ScheduleSummary::from_appointments(appointments);
        let app_revenue: f64 = appointments
            .iter()
            .filter(|a| a.is_completed && !a.is_no_show && a.client.is_some())
            .map(|a| a.price)
            .sum();

        PerformanceMetrics {
            total_revenue: summary.earned,
            app_revenue,
            time_managed: activity.time_managed,
            clients_notified: activity.clients_notified,
            tips_total: activity.tips_total,
            completed_today: saturating_count(summary.completed),
            no_shows_today: saturating_count(summary.no_shows),
        }
    }

    /// Percent of the daily goal reached, capped at 100.
    pub fn goal_progress(&self, daily_goal: f64) -> f64 {
        if daily_goal <= 0.0 {
            return 100.0;
        }
        (self.total_revenue / daily_goal * 100.0).min(100.0)
    }

    pub fn average_ticket(&self) -> f64 {
        if self.completed_today == 0 {
            return 0.0;
        }
        (self.total_revenue / f64::from(self.completed_today)).round()
    }

    /// Share of expected clients who showed up, in whole percent.
    pub fn attendance_rate(&self) -> u32 {
        if self.completed_today == 0 {
            return 0;
        }
        let expected = self.completed_today + self.no_shows_today;
        (f64::from(self.completed_today) / f64::from(expected) * 100.0).round() as u32
    }

    pub fn app_revenue_share(&self) -> u32 {
        if self.total_revenue <= 0.0 {
            return 0;
        }
        (self.app_revenue / self.total_revenue * 100.0).round() as u32
    }

    pub fn walk_in_revenue(&self) -> f64 {
        self.total_revenue - self.app_revenue
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    pub progress: f64,
    pub target: f64,
}

impl Achievement {
    fn new(id: &str, name: &str, description: &str, progress: f64, target: f64) -> Self {
        Achievement {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            unlocked: progress >= target,
            progress,
            target,
        }
    }

    pub fn progress_percent(&self) -> u32 {
        if self.target <= 0.0 {
            return if self.unlocked { 100 } else { 0 };
        }
        (self.progress / self.target * 100.0).clamp(0.0, 100.0).round() as u32
    }
}

/// Evaluate the fixed achievement catalogue against today's metrics.
pub fn achievements_for(metrics: &PerformanceMetrics, daily_goal: f64) -> Vec<Achievement> {
    let mut perfect_day = Achievement::new(
        "perfect-attendance",
        "Full house",
        "Serve five clients without a single no-show",
        f64::from(metrics.completed_today),
        5.0,
    );
    if metrics.no_shows_today > 0 {
        perfect_day.unlocked = false;
    }

    vec![
        Achievement::new(
            "first-client",
            "First cut",
            "Finish the first appointment of the day",
            f64::from(metrics.completed_today),
            1.0,
        ),
        Achievement::new(
            "daily-goal",
            "Goal reached",
            "Reach the daily revenue goal",
            metrics.total_revenue,
            daily_goal,
        ),
        perfect_day,
        Achievement::new(
            "good-communicator",
            "Heads-up",
            "Warn three clients about a delay",
            f64::from(metrics.clients_notified),
            3.0,
        ),
    ]
}

#[cfg(test)]
mod metrics_tests {
    use super::*;
    use crate::models::{Client, HairType};
    use crate::test_support::AppointmentBuilder;
    use rstest::{fixture, rstest};

    #[fixture]
    fn day() -> Vec<Appointment> {
        let client = Client {
            id: "c1".to_string(),
            name: "Client 1".to_string(),
            phone: String::new(),
            hair_type: HairType::Wavy,
            visit_count: 3,
            no_show_count: 1,
            last_visit: None,
            notes: None,
            preferred_products: Vec::new(),
        };
        vec![
            AppointmentBuilder::new("1").price(30.0).completed().build().with_client(client),
            AppointmentBuilder::new("2").price(20.0).completed().build(),
            AppointmentBuilder::new("3").price(45.0).no_show().build(),
            AppointmentBuilder::new("4").price(25.0).active().build(),
            AppointmentBuilder::new("5").price(15.0).build(),
        ]
    }

    #[rstest]
    fn it_should_summarize_the_schedule(day: Vec<Appointment>) {
        let summary = ScheduleSummary::from_appointments(&day);

        assert_eq!(summary.total_revenue, 90.0);
        assert_eq!(summary.earned, 50.0);
        assert_eq!(summary.client_count, 4);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.no_shows, 1);
        assert_eq!(summary.remaining, 2);
    }

    #[rstest]
    fn it_should_summarize_an_empty_day() {
        assert_eq!(
            ScheduleSummary::from_appointments(&[]),
            ScheduleSummary::default()
        );
    }

    #[rstest]
    fn it_should_build_metrics_from_the_schedule(day: Vec<Appointment>) {
        let activity = SessionActivity {
            time_managed: 30,
            clients_notified: 2,
            tips_total: 5.0,
        };

        let metrics = PerformanceMetrics::from_schedule(&day, activity);

        assert_eq!(metrics.total_revenue, 50.0);
        assert_eq!(metrics.app_revenue, 30.0);
        assert_eq!(metrics.walk_in_revenue(), 20.0);
        assert_eq!(metrics.app_revenue_share(), 60);
        assert_eq!(metrics.completed_today, 2);
        assert_eq!(metrics.no_shows_today, 1);
        assert_eq!(metrics.average_ticket(), 25.0);
        assert_eq!(metrics.attendance_rate(), 67);
        assert_eq!(metrics.time_managed, 30);
        assert_eq!(metrics.clients_notified, 2);
    }

    #[rstest]
    #[case(250.0, 500.0, 50.0)]
    #[case(750.0, 500.0, 100.0)]
    #[case(10.0, 0.0, 100.0)]
    fn it_should_cap_goal_progress(#[case] revenue: f64, #[case] goal: f64, #[case] expected: f64) {
        let metrics = PerformanceMetrics {
            total_revenue: revenue,
            ..PerformanceMetrics::default()
        };
        assert_eq!(metrics.goal_progress(goal), expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(4, 4)]
    #[case(u32::MAX as usize, u32::MAX)]
    #[case(usize::MAX, u32::MAX)]
    fn it_should_saturate_day_counts(#[case] count: usize, #[case] expected: u32) {
        assert_eq!(saturating_count(count), expected);
    }

    #[rstest]
    fn it_should_report_zero_ratios_before_the_first_client() {
        let metrics = PerformanceMetrics {
            no_shows_today: 2,
            ..PerformanceMetrics::default()
        };

        assert_eq!(metrics.average_ticket(), 0.0);
        assert_eq!(metrics.attendance_rate(), 0);
        assert_eq!(metrics.app_revenue_share(), 0);
    }

    #[rstest]
    fn it_should_unlock_achievements() {
        let metrics = PerformanceMetrics {
            total_revenue: 520.0,
            completed_today: 6,
            clients_notified: 1,
            ..PerformanceMetrics::default()
        };

        let achievements = achievements_for(&metrics, 500.0);
        let unlocked: Vec<&str> = achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id.as_str())
            .collect();

        assert_eq!(unlocked, vec!["first-client", "daily-goal", "perfect-attendance"]);
        assert_eq!(achievements[3].progress_percent(), 33);
    }

    #[rstest]
    fn it_should_lock_the_perfect_day_after_a_no_show() {
        let metrics = PerformanceMetrics {
            completed_today: 8,
            no_shows_today: 1,
            ..PerformanceMetrics::default()
        };

        let achievements = achievements_for(&metrics, 500.0);

        assert!(!achievements[2].unlocked);
        assert_eq!(achievements[2].progress_percent(), 100);
    }
}
