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

use crate::err::{DegenerateFleetWindowError, FleetWindowError};
use fleet_reshuffle_core::{
    TimeVariable,
    time::{TimeDelta, TimeInterval, TimePoint},
};
use std::fmt::Display;

/// The span from the earliest reservation start to the latest reservation
/// end. Every utilization figure is relative to it, so a window is never
/// zero-length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FleetWindow<T: TimeVariable = i64> {
    interval: TimeInterval<T>,
}

impl<T: TimeVariable> FleetWindow<T> {
    #[inline]
    pub fn new(interval: TimeInterval<T>) -> Result<Self, DegenerateFleetWindowError<T>> {
        if interval.is_empty() {
            return Err(DegenerateFleetWindowError::new(interval.start()));
        }
        Ok(Self { interval })
    }

    /// The hull of all given intervals.
    pub fn from_intervals<I>(intervals: I) -> Result<Self, FleetWindowError<T>>
    where
        I: IntoIterator<Item = TimeInterval<T>>,
    {
        let hull = intervals
            .into_iter()
            .reduce(|acc, iv| acc.hull(&iv))
            .ok_or(FleetWindowError::<T>::NoReservations)?;
        Ok(Self::new(hull)?)
    }

    #[inline]
    pub fn interval(&self) -> TimeInterval<T> {
        self.interval
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.interval.start()
    }

    #[inline]
    pub fn end(&self) -> TimePoint<T> {
        self.interval.end()
    }

    #[inline]
    pub fn duration(&self) -> TimeDelta<T> {
        self.interval.duration()
    }

    #[inline]
    pub fn hours(&self) -> f64 {
        self.duration().as_hours()
    }
}

impl<T: TimeVariable> Display for FleetWindow<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FleetWindow({})", self.interval)
    }
}
