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

//! # Time
//!
//! Strongly typed time values used throughout the fleet model.
//!
//! - `TimePoint<T>`: an instant, counted in seconds since the Unix epoch.
//! - `TimeDelta<T>`: a signed span of seconds, the difference of two points.
//! - `TimeInterval<T>`: a half-open interval `[start, end)` of two points.
//!
//! Keeping points and deltas apart makes nonsense such as adding two instants
//! a compile error. Subtracting two points panics on overflow; shifting a
//! point by a delta saturates.
//!
//! Reports are expressed in fractional hours, so `TimeDelta::as_hours`
//! is the single place where seconds turn into `f64`.

use crate::primitives::Interval;
use num_traits::{NumCast, PrimInt, Signed, ToPrimitive};
use std::{fmt::Display, ops::Sub};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePoint<T: PrimInt>(T);

impl<T: PrimInt + Display> Display for TimePoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({})", self.value())
    }
}

pub type TimeInterval<T> = Interval<TimePoint<T>>;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeDelta<T: PrimInt + Signed>(T);

impl<T: PrimInt + Signed> TimeDelta<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline]
    pub fn zero() -> Self {
        Self(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }

    /// A span of `minutes` whole minutes.
    ///
    /// # Panics
    ///
    /// Panics if the number of seconds does not fit in `T`.
    #[inline]
    pub fn from_minutes(minutes: T) -> Self {
        let factor = <T as NumCast>::from(SECONDS_PER_MINUTE)
            .expect("seconds per minute fit in every signed integer type");
        Self(
            minutes
                .checked_mul(&factor)
                .expect("overflow converting minutes to seconds"),
        )
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0.is_negative()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl<T: PrimInt + Signed + ToPrimitive> TimeDelta<T> {
    /// The span in fractional hours.
    ///
    /// ```
    /// use fleet_reshuffle_core::time::TimeDelta;
    ///
    /// assert_eq!(TimeDelta::new(5_400_i64).as_hours(), 1.5);
    /// assert_eq!(TimeDelta::<i64>::from_minutes(-30).as_hours(), -0.5);
    /// ```
    #[inline]
    pub fn as_hours(self) -> f64 {
        self.0
            .to_f64()
            .expect("TimeDelta value is representable as f64")
            / SECONDS_PER_HOUR as f64
    }
}

impl<T: PrimInt> TimePoint<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        TimePoint(value)
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }
}

impl<T: PrimInt + Signed> TimePoint<T> {
    #[inline]
    pub fn saturating_add(self, delta: TimeDelta<T>) -> Self {
        TimePoint(self.0.saturating_add(delta.0))
    }

    #[inline]
    pub fn saturating_sub(self, delta: TimeDelta<T>) -> Self {
        TimePoint(self.0.saturating_sub(delta.0))
    }
}

impl<T: PrimInt + Display + Signed> Display for TimeDelta<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeDelta({})", self.0)
    }
}

impl<T: PrimInt + Signed> Sub<TimePoint<T>> for TimePoint<T> {
    type Output = TimeDelta<T>;

    fn sub(self, rhs: TimePoint<T>) -> Self::Output {
        TimeDelta::new(
            self.0
                .checked_sub(&rhs.0)
                .expect("underflow in TimePoint - TimePoint"),
        )
    }
}

impl<T: PrimInt + Signed> Interval<TimePoint<T>> {
    #[inline]
    pub fn duration(&self) -> TimeDelta<T> {
        self.end() - self.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_point_display() {
        let tp = TimePoint::new(42);
        assert_eq!(format!("{}", tp), "TimePoint(42)");
    }

    #[test]
    fn test_time_interval_display() {
        let interval: TimeInterval<i64> = TimeInterval::new(TimePoint::new(10), TimePoint::new(20));
        assert_eq!(format!("{}", interval), "[TimePoint(10), TimePoint(20))");
    }

    #[test]
    fn test_time_interval_duration() {
        let interval: TimeInterval<i64> = TimeInterval::new(TimePoint::new(10), TimePoint::new(70));
        assert_eq!(interval.duration(), TimeDelta::new(60));
        let empty: TimeInterval<i64> = TimeInterval::new(TimePoint::new(10), TimePoint::new(10));
        assert!(empty.duration().is_zero());
    }

    #[test]
    fn test_timedelta_from_minutes() {
        assert_eq!(TimeDelta::<i64>::from_minutes(30), TimeDelta::new(1_800));
        assert_eq!(TimeDelta::<i64>::from_minutes(0), TimeDelta::zero());
        assert!(TimeDelta::<i64>::from_minutes(-1).is_negative());
    }

    #[test]
    #[should_panic(expected = "overflow converting minutes to seconds")]
    fn test_timedelta_from_minutes_overflow_panics() {
        let _ = TimeDelta::<i64>::from_minutes(i64::MAX);
    }

    #[test]
    fn test_timedelta_as_hours() {
        assert_eq!(TimeDelta::new(0_i64).as_hours(), 0.0);
        assert_eq!(TimeDelta::new(1_800_i64).as_hours(), 0.5);
        assert_eq!(TimeDelta::new(-7_200_i64).as_hours(), -2.0);
    }

    #[test]
    fn test_point_difference() {
        assert_eq!(TimePoint::new(20_i64) - TimePoint::new(5), TimeDelta::new(15));
        assert_eq!(TimePoint::new(5_i64) - TimePoint::new(20), TimeDelta::new(-15));
    }

    #[test]
    fn test_shifting_a_point_saturates() {
        let tp = TimePoint::new(i64::MAX);
        assert_eq!(tp.saturating_add(TimeDelta::new(1)), TimePoint::new(i64::MAX));
        let tp = TimePoint::new(i64::MIN);
        assert_eq!(tp.saturating_sub(TimeDelta::new(1)), TimePoint::new(i64::MIN));
        assert_eq!(
            TimePoint::new(100_i64).saturating_sub(TimeDelta::new(30)),
            TimePoint::new(70)
        );
    }

    #[test]
    #[should_panic(expected = "underflow in TimePoint - TimePoint")]
    fn test_point_difference_panics_on_overflow() {
        let _ = TimePoint::new(i64::MIN) - TimePoint::new(1);
    }
}
