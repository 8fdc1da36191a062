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

use std::time::{Duration, Instant};

use hazard_core::Coordinate;

pub const FLY_DURATION: Duration = Duration::from_secs(2);

/// Animated pan and zoom from the current view to a target
#[derive(Debug, Clone, Copy)]
pub struct FlyTo {
    from: Coordinate,
    to: Coordinate,
    from_zoom: f64,
    to_zoom: f64,
    started: Instant,
    duration: Duration,
}

impl FlyTo {
    pub fn new(from: Coordinate, from_zoom: f64, to: Coordinate, to_zoom: f64, started: Instant) -> Self {
        Self {
            from,
            to,
            from_zoom,
            to_zoom,
            started,
            duration: FLY_DURATION,
        }
    }

    pub fn target(&self) -> Coordinate {
        self.to
    }

    /// Eased progress in [0, 1]
    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let t = (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        // Cubic ease-in-out
        if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
        }
    }

    pub fn position_at(&self, now: Instant) -> Coordinate {
        self.from.lerp(&self.to, self.progress(now))
    }

    pub fn zoom_at(&self, now: Instant) -> f64 {
        self.from_zoom + (self.to_zoom - self.from_zoom) * self.progress(now)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}
