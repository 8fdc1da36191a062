// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decorative hazard counters.
//!
//! The tally is not derived from submitted reports. A background ticker bumps
//! one random category now and then so the overview panel looks alive.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Categories shown in the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardCategory {
    Cyclone,
    Flood,
    Pollution,
}

impl HazardCategory {
    pub const ALL: [HazardCategory; 3] = [
        HazardCategory::Cyclone,
        HazardCategory::Flood,
        HazardCategory::Pollution,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HazardCategory::Cyclone => "Cyclones",
            HazardCategory::Flood => "Floods",
            HazardCategory::Pollution => "Pollution",
        }
    }
}

/// Per-category counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardTally {
    cyclone: u32,
    flood: u32,
    pollution: u32,
}

impl Default for HazardTally {
    /// The counts the overview starts with.
    fn default() -> Self {
        Self::new(2, 4, 1)
    }
}

impl HazardTally {
    #[must_use]
    pub const fn new(cyclone: u32, flood: u32, pollution: u32) -> Self {
        Self {
            cyclone,
            flood,
            pollution,
        }
    }

    #[must_use]
    pub fn get(&self, category: HazardCategory) -> u32 {
        match category {
            HazardCategory::Cyclone => self.cyclone,
            HazardCategory::Flood => self.flood,
            HazardCategory::Pollution => self.pollution,
        }
    }

    pub fn increment(&mut self, category: HazardCategory) {
        let count = match category {
            HazardCategory::Cyclone => &mut self.cyclone,
            HazardCategory::Flood => &mut self.flood,
            HazardCategory::Pollution => &mut self.pollution,
        };
        *count = count.saturating_add(1);
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        HazardCategory::ALL
            .iter()
            .map(|c| u64::from(self.get(*c)))
            .sum()
    }
}

/// Tally shared between the ticker task and the UI.
pub type SharedTally = Arc<Mutex<HazardTally>>;

/// Longest accepted tick interval.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// How often and how likely the tally is bumped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TallySimulator {
    interval: Duration,
    probability: f64,
}

impl Default for TallySimulator {
    fn default() -> Self {
        Self::new(Duration::from_secs(20), 0.4)
    }
}

impl TallySimulator {
    /// `probability` is clamped to `[0, 1]`; a zero interval becomes one
    /// second and anything above [`MAX_TICK_INTERVAL`] is capped.
    #[must_use]
    pub fn new(interval: Duration, probability: f64) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let interval = if interval.is_zero() {
            Duration::from_secs(1)
        } else {
            interval.min(MAX_TICK_INTERVAL)
        };
        Self {
            interval,
            probability,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One tick: with the configured probability, bump one uniformly chosen
    /// category by one.
    pub fn step<R: Rng + ?Sized>(&self, tally: &mut HazardTally, rng: &mut R) -> Option<HazardCategory> {
        if !rng.random_bool(self.probability) {
            return None;
        }
        let category = HazardCategory::ALL[rng.random_range(0..HazardCategory::ALL.len())];
        tally.increment(category);
        Some(category)
    }
}

/// Handle to the background ticker. Dropping it stops the ticker.
pub struct TallyTicker {
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for TallyTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TallyTicker")
            .field("cancel_token", &self.cancel_token)
            .finish()
    }
}

impl TallyTicker {
    /// Start ticking on `handle`. `on_change` runs after every increment.
    #[must_use]
    pub fn spawn(
        handle: &Handle,
        tally: SharedTally,
        simulator: TallySimulator,
        on_change: impl Fn() + Send + 'static,
    ) -> Self {
        Self::spawn_with_rng(handle, tally, simulator, StdRng::from_os_rng(), on_change)
    }

    /// Same as [`TallyTicker::spawn`] with a caller-provided random source.
    #[must_use]
    pub fn spawn_with_rng(
        handle: &Handle,
        tally: SharedTally,
        simulator: TallySimulator,
        mut rng: StdRng,
        on_change: impl Fn() + Send + 'static,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let task_cancel = cancel_token.clone();

        handle.spawn(async move {
            let period = simulator.interval();
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                "Hazard tally simulator started (every {:?}, p={})",
                period,
                simulator.probability()
            );

            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        let bumped = match tally.lock() {
                            Ok(mut tally) => simulator.step(&mut tally, &mut rng),
                            Err(_) => return,
                        };
                        if let Some(category) = bumped {
                            debug!("Simulated {} report", category.label());
                            on_change();
                        }
                    }
                    () = task_cancel.cancelled() => {
                        info!("Hazard tally simulator stopped");
                        return;
                    }
                }
            }
        });

        Self { cancel_token }
    }

    /// Stop the ticker.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for TallyTicker {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_tally() {
        let tally = HazardTally::default();
        assert_eq!(tally.get(HazardCategory::Cyclone), 2);
        assert_eq!(tally.get(HazardCategory::Flood), 4);
        assert_eq!(tally.get(HazardCategory::Pollution), 1);
        assert_eq!(tally.total(), 7);
    }

    #[test]
    fn test_each_step_touches_at_most_one_category() {
        let simulator = TallySimulator::new(Duration::from_secs(20), 0.4);
        let mut rng = StdRng::seed_from_u64(7);
        let mut tally = HazardTally::default();

        for _ in 0..1_000 {
            let before = tally;
            match simulator.step(&mut tally, &mut rng) {
                Some(category) => {
                    assert_eq!(tally.total(), before.total() + 1);
                    assert_eq!(tally.get(category), before.get(category) + 1);
                }
                None => assert_eq!(tally, before),
            }
        }
    }

    #[test]
    fn test_expected_increase_is_ticks_times_probability() {
        let ticks = 10_000;
        let simulator = TallySimulator::new(Duration::from_secs(20), 0.4);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut tally = HazardTally::new(0, 0, 0);

        for _ in 0..ticks {
            simulator.step(&mut tally, &mut rng);
        }

        // Binomial(10_000, 0.4): sd ~ 49, allow > 4 sd.
        let total = tally.total();
        assert!((3_800..=4_200).contains(&total), "total was {total}");
        for category in HazardCategory::ALL {
            // Each category should get roughly a third.
            let count = tally.get(category);
            assert!((1_150..=1_520).contains(&count), "{category:?} was {count}");
        }
    }

    #[test]
    fn test_probability_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut tally = HazardTally::default();

        let never = TallySimulator::new(Duration::from_secs(1), -3.0);
        assert_eq!(never.probability(), 0.0);
        assert_eq!(never.step(&mut tally, &mut rng), None);

        let always = TallySimulator::new(Duration::ZERO, 7.0);
        assert_eq!(always.probability(), 1.0);
        assert_eq!(always.interval(), Duration::from_secs(1));
        assert!(always.step(&mut tally, &mut rng).is_some());
    }

    #[test]
    fn test_huge_interval_is_capped() {
        let simulator = TallySimulator::new(Duration::from_secs(u64::MAX), 0.4);
        assert_eq!(simulator.interval(), MAX_TICK_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_survives_huge_interval() {
        let tally: SharedTally = Arc::new(Mutex::new(HazardTally::default()));
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);

        let _ticker = TallyTicker::spawn_with_rng(
            &Handle::current(),
            Arc::clone(&tally),
            TallySimulator::new(Duration::from_secs(u64::MAX), 1.0),
            StdRng::seed_from_u64(5),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(MAX_TICK_INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(tally.lock().unwrap().total(), 7 + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_runs_until_dropped() {
        let tally: SharedTally = Arc::new(Mutex::new(HazardTally::default()));
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);

        let ticker = TallyTicker::spawn_with_rng(
            &Handle::current(),
            Arc::clone(&tally),
            TallySimulator::new(Duration::from_secs(20), 1.0),
            StdRng::seed_from_u64(3),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(tally.lock().unwrap().total(), 7 + 3);
        assert_eq!(changes.load(Ordering::SeqCst), 3);

        drop(ticker);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(tally.lock().unwrap().total(), 7 + 3);
    }
}
