use crate::error::TimerError;

pub const MAX_TIMER_HOURS: u64 = 24;
pub const MAX_TIMER_SECS: u64 = MAX_TIMER_HOURS * 3600;

/// A one-second countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: u64,
    remaining: u64,
}

impl Countdown {
    pub fn new(total_secs: u64) -> Result<Self, TimerError> {
        if total_secs == 0 {
            return Err(TimerError::Empty);
        }
        if total_secs > MAX_TIMER_SECS {
            return Err(TimerError::TooLong {
                max_hours: MAX_TIMER_HOURS,
            });
        }
        Ok(Self {
            total: total_secs,
            remaining: total_secs,
        })
    }

    /// Builds a countdown from hour/minute/second fields. Blank or
    /// non-numeric fields count as zero.
    pub fn from_parts(hours: &str, minutes: &str, seconds: &str) -> Result<Self, TimerError> {
        let total = lenient(hours)
            .saturating_mul(3600)
            .saturating_add(lenient(minutes).saturating_mul(60))
            .saturating_add(lenient(seconds));
        Self::new(total)
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Advances one second. Returns `true` once the countdown hits zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_finished()
    }
}

fn lenient(field: &str) -> u64 {
    field.trim().parse().unwrap_or(0)
}

/// `HH:MM:SS` when there are hours to show, `MM:SS` otherwise.
#[must_use]
pub fn format_clock(total_secs: u64) -> String {
    let (hours, mins, secs) = split(total_secs);
    if hours > 0 {
        format!("{hours:02}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// Length as announced when a timer is set. Zero fields are left out, so
/// 3605 seconds reads `1h 5s`.
#[must_use]
pub fn describe_set(total_secs: u64) -> String {
    let (hours, mins, secs) = split(total_secs);
    [(hours, 'h'), (mins, 'm'), (secs, 's')]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Time left on a stopped timer. Seconds are always shown.
#[must_use]
pub fn describe_remaining(total_secs: u64) -> String {
    let (hours, mins, secs) = split(total_secs);
    let mut text = String::new();
    if hours > 0 {
        text.push_str(&format!("{hours}h "));
    }
    if mins > 0 {
        text.push_str(&format!("{mins}m "));
    }
    text.push_str(&format!("{secs}s"));
    text
}

const fn split(total_secs: u64) -> (u64, u64, u64) {
    (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}
