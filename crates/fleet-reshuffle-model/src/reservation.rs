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

use crate::{
    err::{NegativeDurationError, ReservationError, UnknownVehicleError},
    id::{CategoryId, ReservationId, Seats, VehicleId},
    vehicle::{Vehicle, VehicleCatalog},
};
use fleet_reshuffle_core::{
    TimeVariable,
    time::{TimeDelta, TimeInterval, TimePoint},
};
use std::fmt::Display;

/// A reservation as it arrives from the outside world, before its vehicle
/// reference has been checked against a catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReservation<T: TimeVariable = i64> {
    pub id: ReservationId,
    pub driven_km: f64,
    pub start: TimePoint<T>,
    pub end: TimePoint<T>,
    pub vehicle: VehicleId,
}

impl<T: TimeVariable> RawReservation<T> {
    #[inline]
    pub fn new(
        id: ReservationId,
        driven_km: f64,
        start: TimePoint<T>,
        end: TimePoint<T>,
        vehicle: VehicleId,
    ) -> Self {
        Self {
            id,
            driven_km,
            start,
            end,
            vehicle,
        }
    }
}

/// A trip bound to the vehicle it was originally booked on.
///
/// Seats and category are copied from that vehicle when the reservation is
/// created, so the reservation stays meaningful without the catalog. The
/// original vehicle never changes; where a reservation ends up after a
/// reshuffle is recorded by the assignment it is filed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation<T: TimeVariable = i64> {
    id: ReservationId,
    driven_km: f64,
    interval: TimeInterval<T>,
    duration: TimeDelta<T>,
    vehicle: VehicleId,
    seats: Seats,
    category: CategoryId,
}

impl<T: TimeVariable> Reservation<T> {
    #[inline]
    pub fn new(
        id: ReservationId,
        driven_km: f64,
        start: TimePoint<T>,
        end: TimePoint<T>,
        vehicle: &Vehicle,
    ) -> Result<Self, NegativeDurationError<T>> {
        if end < start {
            return Err(NegativeDurationError::new(id, start, end));
        }
        let interval = TimeInterval::new(start, end);
        Ok(Self {
            id,
            driven_km,
            interval,
            duration: interval.duration(),
            vehicle: vehicle.id(),
            seats: vehicle.seats(),
            category: vehicle.category(),
        })
    }

    /// Looks the vehicle up in `catalog` and builds the reservation.
    pub fn resolve(raw: RawReservation<T>, catalog: &VehicleCatalog) -> Result<Self, ReservationError<T>> {
        let vehicle = catalog
            .get(raw.vehicle)
            .ok_or_else(|| UnknownVehicleError::new(raw.id, raw.vehicle))?;
        Ok(Self::new(raw.id, raw.driven_km, raw.start, raw.end, vehicle)?)
    }

    #[inline]
    pub fn id(&self) -> ReservationId {
        self.id
    }

    #[inline]
    pub fn driven_km(&self) -> f64 {
        self.driven_km
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
        self.duration
    }

    /// The vehicle this reservation was originally booked on.
    #[inline]
    pub fn original_vehicle(&self) -> VehicleId {
        self.vehicle
    }

    #[inline]
    pub fn seats(&self) -> Seats {
        self.seats
    }

    #[inline]
    pub fn category(&self) -> CategoryId {
        self.category
    }
}

impl<T: TimeVariable> Display for Reservation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reservation({}, {}, {}, {})",
            self.id.value(),
            self.interval,
            self.vehicle,
            self.seats
        )
    }
}
