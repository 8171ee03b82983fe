// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use fleet_reshuffle_core::{
    TimeVariable,
    time::{SECONDS_PER_MINUTE, TimeDelta},
};
use num_traits::NumCast;

/// How a negative gap between two consecutive bookings of one vehicle is
/// counted as unusable time. Negative gaps only occur when bookings overlap,
/// which the reshuffled assignment never produces but raw input may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GapPolicy {
    /// Negative gaps count as zero, so unusable time is never negative.
    #[default]
    ClampNegative,
    /// Negative gaps are summed as they are. Idle time may then exceed the
    /// window minus productive time.
    PassThrough,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReshuffleConfig {
    /// Pause kept free before and after every reservation, in minutes.
    pub buffer_minutes: u32,
    /// Process seat classes on the rayon pool.
    pub parallel: bool,
}

impl Default for ReshuffleConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: 30,
            parallel: false,
        }
    }
}

impl ReshuffleConfig {
    /// The buffer as a time delta, saturating at the largest value `T` holds.
    pub fn buffer<T: TimeVariable>(&self) -> TimeDelta<T> {
        let seconds = <i64 as From<u32>>::from(self.buffer_minutes) * SECONDS_PER_MINUTE;
        TimeDelta::new(<T as NumCast>::from(seconds).unwrap_or_else(T::max_value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Gaps up to this many hours between consecutive bookings are too short
    /// to rent out and count as unusable; longer gaps contribute this cap.
    pub unusable_gap_cap_hours: f64,
    /// Bookings shorter than this many hours count as wasted time.
    pub short_trip_threshold_hours: f64,
    pub gap_policy: GapPolicy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            unusable_gap_cap_hours: 0.5,
            short_trip_threshold_hours: 0.5,
            gap_policy: GapPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_in_seconds() {
        let cfg = ReshuffleConfig {
            buffer_minutes: 30,
            ..ReshuffleConfig::default()
        };
        assert_eq!(cfg.buffer::<i64>(), TimeDelta::new(1_800));
    }

    #[test]
    fn test_buffer_saturates_for_narrow_types() {
        let cfg = ReshuffleConfig {
            buffer_minutes: u32::MAX,
            parallel: false,
        };
        assert_eq!(cfg.buffer::<i32>(), TimeDelta::new(i32::MAX));
    }

    #[test]
    fn test_metrics_defaults() {
        let cfg = MetricsConfig::default();
        assert_eq!(cfg.unusable_gap_cap_hours, 0.5);
        assert_eq!(cfg.short_trip_threshold_hours, 0.5);
        assert_eq!(cfg.gap_policy, GapPolicy::ClampNegative);
    }
}
