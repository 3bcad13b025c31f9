use std::time::{Duration, Instant};

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

/// Shortest allowed reminder interval, in minutes
pub const MIN_INTERVAL_MINS: u32 = 1;

/// A focus reminder about the current active task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// Wall-clock time the reminder fired, `h:mm`
    pub time: String,
    pub title: String,
    pub body: String,
    pub task: String,
}

impl Reminder {
    /// Build a reminder for `task`. Blank tasks produce no reminder.
    pub fn for_task(task: &str, at: NaiveTime) -> Option<Reminder> {
        let task = task.trim();
        if task.is_empty() {
            return None;
        }
        let time = format_clock(at);
        Some(Reminder {
            title: format!("{} - Are you focused?", time),
            body: format!("Current task: {}", task),
            task: task.to_string(),
            time,
        })
    }
}

/// 12-hour clock without am/pm, minutes zero-padded (`1:05`, `12:30`, `0:15`)
pub fn format_clock(at: NaiveTime) -> String {
    let hour = at.hour();
    let hour = if hour > 12 { hour - 12 } else { hour };
    format!("{}:{:02}", hour, at.minute())
}

/// Clamp a requested interval to the allowed range
pub fn clamp_interval(mins: u32) -> u32 {
    mins.max(MIN_INTERVAL_MINS)
}

/// Fires a reminder every `interval` while there is an active task.
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    interval_mins: u32,
    next_due: Instant,
    enabled: bool,
}

impl ReminderScheduler {
    pub fn new(interval_mins: u32, now: Instant) -> Self {
        let interval_mins = clamp_interval(interval_mins);
        ReminderScheduler {
            interval_mins,
            next_due: now + interval_duration(interval_mins),
            enabled: true,
        }
    }

    pub fn disabled(interval_mins: u32, now: Instant) -> Self {
        ReminderScheduler {
            enabled: false,
            ..Self::new(interval_mins, now)
        }
    }

    pub fn interval_mins(&self) -> u32 {
        self.interval_mins
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.enabled = enabled;
        if enabled {
            self.reschedule(now);
        }
    }

    /// Change the interval and restart the countdown from `now`
    pub fn set_interval_mins(&mut self, mins: u32, now: Instant) {
        self.interval_mins = clamp_interval(mins);
        self.reschedule(now);
    }

    pub fn reschedule(&mut self, now: Instant) {
        self.next_due = now + interval_duration(self.interval_mins);
    }

    /// Time left until the next reminder is due
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.enabled && now >= self.next_due
    }

    /// Check the timer. When due, re-arm and build a reminder for the active
    /// task, if there is one.
    pub fn tick(&mut self, now: Instant, active: Option<&str>, clock: NaiveTime) -> Option<Reminder> {
        if !self.is_due(now) {
            return None;
        }
        self.reschedule(now);
        let reminder = active.and_then(|task| Reminder::for_task(task, clock));
        match &reminder {
            Some(r) => tracing::info!(task = %r.task, "reminder due"),
            None => tracing::debug!("reminder due but no active task"),
        }
        reminder
    }
}

fn interval_duration(mins: u32) -> Duration {
    Duration::from_secs(u64::from(mins) * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn clock_format_matches_twelve_hour_style() {
        assert_eq!(format_clock(clock(13, 5)), "1:05");
        assert_eq!(format_clock(clock(12, 30)), "12:30");
        assert_eq!(format_clock(clock(0, 15)), "0:15");
        assert_eq!(format_clock(clock(9, 0)), "9:00");
        assert_eq!(format_clock(clock(23, 59)), "11:59");
    }

    #[test]
    fn reminder_text() {
        let r = Reminder::for_task("Call bank", clock(14, 7)).unwrap();
        assert_eq!(r.title, "2:07 - Are you focused?");
        assert_eq!(r.body, "Current task: Call bank");
        assert_eq!(r.task, "Call bank");
    }

    #[test]
    fn blank_task_gives_no_reminder() {
        assert_eq!(Reminder::for_task("", clock(1, 0)), None);
        assert_eq!(Reminder::for_task("   ", clock(1, 0)), None);
    }

    #[test]
    fn interval_is_clamped_to_one_minute() {
        let now = Instant::now();
        let sched = ReminderScheduler::new(0, now);
        assert_eq!(sched.interval_mins(), 1);
        assert_eq!(sched.time_until_due(now), Duration::from_secs(60));
    }

    #[test]
    fn tick_before_due_does_nothing() {
        let now = Instant::now();
        let mut sched = ReminderScheduler::new(5, now);
        let later = now + Duration::from_secs(299);
        assert_eq!(sched.tick(later, Some("task"), clock(10, 0)), None);
    }

    #[test]
    fn tick_when_due_fires_and_rearms() {
        let now = Instant::now();
        let mut sched = ReminderScheduler::new(1, now);
        let due = now + Duration::from_secs(60);
        let r = sched.tick(due, Some("Call bank"), clock(10, 0));
        assert_eq!(r.map(|r| r.task), Some("Call bank".to_string()));
        assert!(!sched.is_due(due));
        assert_eq!(sched.time_until_due(due), Duration::from_secs(60));
    }

    #[test]
    fn tick_without_active_task_rearms_silently() {
        let now = Instant::now();
        let mut sched = ReminderScheduler::new(1, now);
        let due = now + Duration::from_secs(61);
        assert_eq!(sched.tick(due, None, clock(10, 0)), None);
        assert!(!sched.is_due(due));
    }

    #[test]
    fn disabled_scheduler_never_fires() {
        let now = Instant::now();
        let mut sched = ReminderScheduler::disabled(1, now);
        let due = now + Duration::from_secs(3600);
        assert_eq!(sched.tick(due, Some("task"), clock(10, 0)), None);
        sched.set_enabled(true, due);
        assert!(!sched.is_due(due));
        assert!(sched.is_due(due + Duration::from_secs(60)));
    }

    #[test]
    fn changing_interval_restarts_countdown() {
        let now = Instant::now();
        let mut sched = ReminderScheduler::new(10, now);
        let later = now + Duration::from_secs(300);
        sched.set_interval_mins(2, later);
        assert_eq!(sched.interval_mins(), 2);
        assert_eq!(sched.time_until_due(later), Duration::from_secs(120));
    }
}
