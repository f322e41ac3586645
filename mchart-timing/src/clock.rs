use chrono::{Duration, Local, NaiveDateTime};
use std::cell::Cell;

/// Source of wall-clock timestamps for confirmed trials.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to.
///
/// Every reading advances the clock by `tick`, so scripted sessions get
/// distinct, increasing timestamps without sleeping. Moves that would leave
/// the representable date range leave the clock where it is.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<NaiveDateTime>,
    tick: Duration,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self::with_tick(start, Duration::zero())
    }

    pub fn with_tick(start: NaiveDateTime, tick: Duration) -> Self {
        Self {
            current: Cell::new(start),
            tick,
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.current.set(at);
    }

    pub fn advance(&self, by: Duration) {
        let current = self.current.get();
        self.current.set(current.checked_add_signed(by).unwrap_or(current));
    }

    pub fn peek(&self) -> NaiveDateTime {
        self.current.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        let now = self.current.get();
        self.advance(self.tick);
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    #[test]
    fn manual_clock_ticks_on_read() {
        let clock = ManualClock::with_tick(start(), Duration::seconds(2));
        assert_eq!(clock.now(), start());
        assert_eq!(clock.now(), start() + Duration::seconds(2));
        assert_eq!(clock.peek(), start() + Duration::seconds(4));
    }

    #[test]
    fn manual_clock_can_be_moved_back() {
        let clock = ManualClock::new(start());
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start() + Duration::minutes(5));
        clock.set(start());
        assert_eq!(clock.now(), start());
    }

    #[test]
    fn overflowing_tick_stops_the_clock() {
        let end = NaiveDateTime::MAX - Duration::hours(1);
        let clock = ManualClock::with_tick(end, Duration::days(365));
        assert_eq!(clock.now(), end);
        assert_eq!(clock.now(), end);

        clock.advance(Duration::days(-365 * 1000));
        assert!(clock.peek() < end);
    }

    fn read<C: Clock>(clock: C) -> NaiveDateTime {
        clock.now()
    }

    #[test]
    fn clock_by_reference() {
        let clock = ManualClock::with_tick(start(), Duration::seconds(1));
        assert_eq!(read(&clock), start());
        assert_eq!(clock.peek(), start() + Duration::seconds(1));
    }
}
