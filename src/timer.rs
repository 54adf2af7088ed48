use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Tick(i64),
    Warning,
    Expired,
}

/// Count down `limit_secs` on a background thread. The thread stops after
/// `Expired` or as soon as the receiver is dropped, so replacing the receiver
/// is enough to restart the countdown.
pub fn spawn_timer(limit_secs: i64, warning_secs: u64) -> mpsc::Receiver<TimerEvent> {
    let (tx, rx) = mpsc::channel();
    let deadline = Utc::now() + TimeDelta::seconds(limit_secs);
    let warning_secs = i64::try_from(warning_secs).unwrap_or(i64::MAX);

    thread::spawn(move || {
        let mut warned = false;

        loop {
            let secs = remaining_secs(deadline, Utc::now());

            if secs <= 0 {
                let _ = tx.send(TimerEvent::Expired);
                break;
            }

            if secs <= warning_secs && !warned {
                warned = true;
                let _ = tx.send(TimerEvent::Warning);
            }

            if tx.send(TimerEvent::Tick(secs)).is_err() {
                break;
            }

            thread::sleep(Duration::from_secs(1));
        }
    });

    rx
}

pub fn remaining_secs(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    deadline.signed_duration_since(now).num_seconds()
}

pub fn format_duration(total_secs: i64) -> String {
    if total_secs <= 0 {
        return "0:00".to_string();
    }
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
