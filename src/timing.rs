//! Periodic wake-ups with a live-reconfigurable interval.
//!
//! A [`Scheduler`] is the shared configuration handle; a [`Timer`] is the
//! consumer side owned by one event loop. Fire times are computed from an
//! absolute deadline advanced by addition, so a consumer that is slow to
//! service a tick does not push subsequent ticks later (no compounding
//! drift). Ticks the consumer never serviced are dropped, not queued.
//!
//! Tests drive the timer deterministically with tokio's paused clock
//! (`#[tokio::test(start_paused = true)]` plus `tokio::time::advance`).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Shared handle configuring how often a [`Timer`] fires.
///
/// A new scheduler is idle: its timers sleep until [`every`](Scheduler::every)
/// is first called. Cloning yields another handle to the same configuration,
/// safe to use from outside the event loop.
#[derive(Debug, Clone)]
pub struct Scheduler {
    period: Arc<watch::Sender<Option<Duration>>>,
}

impl Scheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            period: Arc::new(tx),
        }
    }

    /// (Re)configure the tick period.
    ///
    /// Takes effect from the next fire point: the running timer's next tick
    /// moves to now + `period`, and previously missed ticks are never
    /// delivered retroactively. Never blocks.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero, mirroring `tokio::time::interval`.
    pub fn every(&self, period: Duration) {
        assert!(!period.is_zero(), "scheduler period must be non-zero");
        self.period.send_replace(Some(period));
    }

    /// Create the consumer-side timer for this scheduler.
    pub fn timer(&self) -> Timer {
        let mut period = self.period.subscribe();
        let configured = *period.borrow_and_update();
        Timer {
            period,
            interval: configured.map(new_interval),
            detached: false,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn new_interval(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// The ticking end of a [`Scheduler`], owned by one event loop.
#[derive(Debug)]
pub struct Timer {
    period: watch::Receiver<Option<Duration>>,
    interval: Option<Interval>,
    /// Set once the scheduler handle is gone; the current cadence is kept.
    detached: bool,
}

impl Timer {
    /// Complete once per configured period.
    ///
    /// Pending forever while the scheduler is idle. Cancel-safe: dropping the
    /// future mid-wait does not consume a tick.
    pub async fn tick(&mut self) {
        loop {
            tokio::select! {
                _ = Self::fire(&mut self.interval) => return,
                changed = self.period.changed(), if !self.detached => match changed {
                    Ok(()) => {
                        let configured = *self.period.borrow_and_update();
                        self.interval = configured.map(new_interval);
                    }
                    Err(_) => self.detached = true,
                },
            }
        }
    }

    async fn fire(interval: &mut Option<Interval>) {
        match interval {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;
    use tokio_test::{assert_pending, assert_ready, task};

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period_on_the_grid() {
        let scheduler = Scheduler::new();
        scheduler.every(Duration::from_secs(3));
        let mut timer = scheduler.timer();

        let start = Instant::now();
        for k in 1..=4 {
            timer.tick().await;
            assert_eq!(start.elapsed(), Duration::from_secs(3 * k));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn consumer_delay_does_not_accumulate_drift() {
        let scheduler = Scheduler::new();
        scheduler.every(Duration::from_secs(3));
        let mut timer = scheduler.timer();
        let start = Instant::now();

        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));

        // Consumer burns 2s handling the tick; the next fire point is still
        // at 6s, not 3s after handling finished.
        advance(Duration::from_secs(2)).await;
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn missed_ticks_are_dropped_not_queued() {
        let scheduler = Scheduler::new();
        scheduler.every(Duration::from_secs(3));
        let mut timer = scheduler.timer();
        let start = Instant::now();

        // Sleep through three fire points (3s, 6s, 9s).
        advance(Duration::from_secs(10)).await;
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));

        // Only one tick was pending; the next lands back on the grid.
        let mut next = task::spawn(timer.tick());
        assert_pending!(next.poll());
        drop(next);
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn exactly_k_ticks_for_k_periods() {
        let scheduler = Scheduler::new();
        scheduler.every(Duration::from_secs(1));
        let mut timer = scheduler.timer();

        for _ in 0..5 {
            advance(Duration::from_secs(1)).await;
            let mut tick = task::spawn(timer.tick());
            assert_ready!(tick.poll());
            drop(tick);
            // No second tick is available within the same period.
            let mut tick = task::spawn(timer.tick());
            assert_pending!(tick.poll());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_until_first_every() {
        let scheduler = Scheduler::new();
        let mut timer = scheduler.timer();

        let mut tick = task::spawn(timer.tick());
        advance(Duration::from_secs(60)).await;
        assert_pending!(tick.poll());
        drop(tick);

        let start = Instant::now();
        scheduler.every(Duration::from_secs(2));
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn reconfiguration_applies_from_the_next_fire_point() {
        let scheduler = Scheduler::new();
        scheduler.every(Duration::from_secs(1));
        let mut timer = scheduler.timer();

        timer.tick().await;
        let reconfigured_at = Instant::now();
        scheduler.every(Duration::from_secs(5));
        timer.tick().await;
        assert_eq!(reconfigured_at.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_cadence_after_scheduler_is_dropped() {
        let scheduler = Scheduler::new();
        scheduler.every(Duration::from_secs(3));
        let mut timer = scheduler.timer();
        drop(scheduler);

        let start = Instant::now();
        timer.tick().await;
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_period_panics() {
        Scheduler::new().every(Duration::ZERO);
    }
}
