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

use crate::metrics::{MetricsEngine, VehicleMetrics};
use fleet_reshuffle_core::TimeVariable;
use fleet_reshuffle_model::{id::VehicleId, schedule::Assignment};
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportRow {
    pub vehicle: VehicleId,
    #[serde(flatten)]
    pub metrics: VehicleMetrics,
}

/// One row per vehicle that carries at least one booking, busiest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationReport {
    window_hours: f64,
    rows: Vec<ReportRow>,
}

impl UtilizationReport {
    pub fn for_assignment<T: TimeVariable>(
        engine: &MetricsEngine<'_, T>,
        assignment: &Assignment<T>,
    ) -> Self {
        let mut rows: Vec<ReportRow> = engine
            .assignment(assignment)
            .into_iter()
            .map(|(vehicle, metrics)| ReportRow { vehicle, metrics })
            .collect();
        rows.sort_by(|a, b| {
            b.metrics
                .productive_hours
                .total_cmp(&a.metrics.productive_hours)
                .then_with(|| a.vehicle.cmp(&b.vehicle))
        });
        Self {
            window_hours: engine.window_hours(),
            rows,
        }
    }

    #[inline]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    #[inline]
    pub fn window_hours(&self) -> f64 {
        self.window_hours
    }

    /// Number of utilized vehicles.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn utilizations(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.metrics.utilization).collect()
    }
}

impl Display for UtilizationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>10} {:>12} {:>10} {:>10} {:>10} {:>10} {:>11}",
            "Vehicle", "Reservations", "Idle", "Productive", "Unusable", "Wasted", "Utilization"
        )?;
        for row in &self.rows {
            let m = &row.metrics;
            writeln!(
                f,
                "{:>10} {:>12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}%",
                row.vehicle.value(),
                m.bookings,
                m.idle_hours,
                m.productive_hours,
                m.unusable_hours,
                m.wasted_hours,
                m.utilization * 100.0
            )?;
        }
        write!(f, "[{} vehicles, window {:.2} h]", self.rows.len(), self.window_hours)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImprovementError {
    /// One of the inputs holds no values.
    Empty,
    /// Utilization before reshuffling has no spread, so the ratio is
    /// undefined.
    ZeroBaselineDeviation,
}

impl Display for ImprovementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImprovementError::Empty => write!(f, "Cannot compare an empty set of utilizations"),
            ImprovementError::ZeroBaselineDeviation => {
                write!(f, "Utilization before reshuffling has zero standard deviation")
            }
        }
    }
}

impl std::error::Error for ImprovementError {}

/// Population standard deviation.
fn std_deviation(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

/// `σ(after) / σ(before)` over per-vehicle utilization fractions.
///
/// Below one the fleet's utilization became more even, above one it became
/// more concentrated.
pub fn std_deviation_ratio(before: &[f64], after: &[f64]) -> Result<f64, ImprovementError> {
    if before.is_empty() || after.is_empty() {
        return Err(ImprovementError::Empty);
    }
    let sigma_before = std_deviation(before);
    if sigma_before == 0.0 {
        return Err(ImprovementError::ZeroBaselineDeviation);
    }
    Ok(std_deviation(after) / sigma_before)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImprovementSummary {
    pub leftovers: usize,
    pub utilized_before: usize,
    pub utilized_after: usize,
    /// Vehicles freed by the reshuffle; negative if more are in use.
    pub vehicle_reduction: i64,
    /// `(before / after - 1) * 100`; absent when no vehicle is in use after.
    pub vehicle_reduction_percent: Option<f64>,
    /// Absent when [`std_deviation_ratio`] is undefined for the inputs.
    pub std_deviation_ratio: Option<f64>,
}

impl ImprovementSummary {
    pub fn new(before: &UtilizationReport, after: &UtilizationReport, leftovers: usize) -> Self {
        let utilized_before = before.len();
        let utilized_after = after.len();
        let vehicle_reduction_percent = (utilized_after > 0)
            .then(|| (utilized_before as f64 / utilized_after as f64 - 1.0) * 100.0);
        Self {
            leftovers,
            utilized_before,
            utilized_after,
            vehicle_reduction: utilized_before as i64 - utilized_after as i64,
            vehicle_reduction_percent,
            std_deviation_ratio: std_deviation_ratio(&before.utilizations(), &after.utilizations())
                .ok(),
        }
    }
}

impl Display for ImprovementSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number of leftover bookings:    {}", self.leftovers)?;
        writeln!(f, "Reduction of utilized vehicles: {} vehicles", self.vehicle_reduction)?;
        match self.vehicle_reduction_percent {
            Some(p) => writeln!(f, "Reduction of utilized vehicles: {:.1}%", p)?,
            None => writeln!(f, "Reduction of utilized vehicles: n/a")?,
        }
        match self.std_deviation_ratio {
            Some(r) => write!(f, "Change in utilization standard deviation: {:.1}x", r),
            None => write!(f, "Change in utilization standard deviation: n/a"),
        }
    }
}
