use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Clock abstracts access to the current time so services remain deterministic in tests.
///
/// Billing math runs on local calendar dates; persisted timestamps use UTC.
pub trait Clock: Send + Sync {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Returns the current instant for `createdAt`/`updatedAt` stamps.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Clock pinned to a fixed local instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Pins the clock to local midnight of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN))
    }

    pub fn set(&mut self, now: NaiveDateTime) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.now)
    }
}

/// Real-time clock backed by the host's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_moves_only_when_set() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let mut clock = FixedClock::at_date(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.timestamp(), Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());

        let later = day.and_hms_opt(23, 59, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
        assert_eq!(clock.today(), day);
    }
}
