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

use crate::config::{GapPolicy, MetricsConfig};
use fleet_reshuffle_core::TimeVariable;
use fleet_reshuffle_model::{
    id::VehicleId, reservation::Reservation, schedule::Assignment, window::FleetWindow,
};
use serde::Serialize;

/// Time accounting for one vehicle over the fleet window, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleMetrics {
    pub bookings: usize,
    pub idle_hours: f64,
    pub productive_hours: f64,
    pub unusable_hours: f64,
    pub wasted_hours: f64,
    /// `(productive + unusable) / window`, as a fraction.
    pub utilization: f64,
}

/// Computes per-vehicle time metrics against a fixed fleet window.
///
/// Every entry point takes the bookings of a single vehicle in any order and
/// returns `None` when there are none.
#[derive(Debug, Clone)]
pub struct MetricsEngine<'w, T: TimeVariable = i64> {
    window: &'w FleetWindow<T>,
    config: MetricsConfig,
}

impl<'w, T: TimeVariable> MetricsEngine<'w, T> {
    #[inline]
    pub fn new(window: &'w FleetWindow<T>) -> Self {
        Self {
            window,
            config: MetricsConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: MetricsConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    #[inline]
    pub fn window_hours(&self) -> f64 {
        self.window.hours()
    }

    fn chronological<'b>(bookings: &'b [Reservation<T>]) -> Option<Vec<&'b Reservation<T>>> {
        if bookings.is_empty() {
            return None;
        }
        let mut sorted: Vec<&Reservation<T>> = bookings.iter().collect();
        sorted.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.id().cmp(&b.id())));
        Some(sorted)
    }

    fn productive(sorted: &[&Reservation<T>]) -> f64 {
        sorted.iter().map(|r| r.duration().as_hours()).fold(0.0, |acc, h| acc + h)
    }

    fn unusable(&self, sorted: &[&Reservation<T>]) -> f64 {
        let cap = self.config.unusable_gap_cap_hours;
        sorted
            .windows(2)
            .map(|pair| {
                let gap = (pair[1].start() - pair[0].end()).as_hours();
                match self.config.gap_policy {
                    GapPolicy::ClampNegative => gap.clamp(0.0, cap.max(0.0)),
                    GapPolicy::PassThrough => gap.min(cap),
                }
            })
            .fold(0.0, |acc, h| acc + h)
    }

    fn wasted(&self, sorted: &[&Reservation<T>]) -> f64 {
        let threshold = self.config.short_trip_threshold_hours;
        sorted
            .iter()
            .map(|r| r.duration().as_hours())
            .filter(|h| *h < threshold)
            .fold(0.0, |acc, h| acc + h)
    }

    /// Total booked time.
    pub fn productive_hours(&self, bookings: &[Reservation<T>]) -> Option<f64> {
        Self::chronological(bookings).map(|s| Self::productive(&s))
    }

    /// Time between consecutive bookings too short to rent out: each gap
    /// contributes at most the configured cap.
    pub fn unusable_hours(&self, bookings: &[Reservation<T>]) -> Option<f64> {
        Self::chronological(bookings).map(|s| self.unusable(&s))
    }

    /// Window time that is neither booked nor unusable.
    pub fn idle_hours(&self, bookings: &[Reservation<T>]) -> Option<f64> {
        Self::chronological(bookings)
            .map(|s| self.window_hours() - Self::productive(&s) - self.unusable(&s))
    }

    /// Booked time of trips shorter than the configured threshold.
    pub fn wasted_hours(&self, bookings: &[Reservation<T>]) -> Option<f64> {
        Self::chronological(bookings).map(|s| self.wasted(&s))
    }

    pub fn utilization(&self, bookings: &[Reservation<T>]) -> Option<f64> {
        Self::chronological(bookings)
            .map(|s| (Self::productive(&s) + self.unusable(&s)) / self.window_hours())
    }

    pub fn vehicle(&self, bookings: &[Reservation<T>]) -> Option<VehicleMetrics> {
        let sorted = Self::chronological(bookings)?;
        let window = self.window_hours();
        let productive = Self::productive(&sorted);
        let unusable = self.unusable(&sorted);
        Some(VehicleMetrics {
            bookings: sorted.len(),
            idle_hours: window - productive - unusable,
            productive_hours: productive,
            unusable_hours: unusable,
            wasted_hours: self.wasted(&sorted),
            utilization: (productive + unusable) / window,
        })
    }

    /// Metrics of every vehicle that carries at least one booking, in
    /// ascending vehicle id order.
    pub fn assignment(&self, assignment: &Assignment<T>) -> Vec<(VehicleId, VehicleMetrics)> {
        assignment
            .iter()
            .filter_map(|(id, bookings)| self.vehicle(bookings).map(|m| (id, m)))
            .collect()
    }
}
