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

//! # Fleet Reshuffle Solver (`fleet-reshuffle-solver`)
//!
//! Greedy reassignment of reservations across interchangeable vehicles and
//! the utilization metrics used to judge the result.
//!
//! - [`feasibility`]: whether a reservation, padded by a buffer, fits next to
//!   a vehicle's existing bookings.
//! - [`reshuffle`]: longest-first, first-fit packing per seat class.
//! - [`preference`]: the order in which vehicles of a seat class are tried.
//! - [`metrics`] and [`report`]: productive, unusable, idle and wasted time,
//!   utilization, and the before/after comparison.

pub mod config;
pub mod feasibility;
pub mod metrics;
pub mod preference;
pub mod report;
pub mod reshuffle;

pub mod prelude {
    pub use crate::config::{GapPolicy, MetricsConfig, ReshuffleConfig};
    pub use crate::feasibility::can_accommodate;
    pub use crate::metrics::{MetricsEngine, VehicleMetrics};
    pub use crate::preference::{CheapestCategoryFirst, VehiclePreference};
    pub use crate::report::{
        ImprovementError, ImprovementSummary, ReportRow, UtilizationReport, std_deviation_ratio,
    };
    pub use crate::reshuffle::{Reshuffle, Reshuffler};
}
