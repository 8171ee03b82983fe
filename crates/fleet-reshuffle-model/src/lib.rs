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

//! # Fleet Reshuffle Model (`fleet-reshuffle-model`)
//!
//! The data model of a vehicle fleet and its reservations, built on the
//! typed time primitives of `fleet-reshuffle-core`.
//!
//! ## Key Data Structures
//!
//! - **`Vehicle`** / **`VehicleCatalog`**: every vehicle with its seat class
//!   and category. Vehicles sharing a seat count are interchangeable.
//! - **`Reservation<T>`**: a trip with a fixed interval, bound to the vehicle
//!   it was originally booked on.
//! - **`Assignment<T>`**: which vehicle carries which reservations.
//! - **`FleetWindow<T>`**: the span from the earliest start to the latest end
//!   over all reservations; the denominator of every utilization figure.
//! - **`Schedule<T>`**: catalog, original assignment and window together,
//!   assembled by **`ScheduleBuilder`** or read from CSV by **`FleetLoader`**.

pub mod err;
pub mod id;
pub mod loader;
pub mod reservation;
pub mod schedule;
pub mod vehicle;
pub mod window;

pub mod prelude {
    pub use crate::err::*;
    pub use crate::id::{CategoryId, ModelId, ReservationId, Seats, VehicleId};
    pub use crate::loader::{FleetLoader, parse_timestamp};
    pub use crate::reservation::{RawReservation, Reservation};
    pub use crate::schedule::{Assignment, Schedule, ScheduleBuilder};
    pub use crate::vehicle::{Vehicle, VehicleCatalog, VehicleDetails};
    pub use crate::window::FleetWindow;
}
