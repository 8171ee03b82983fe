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
    err::{
        DuplicateReservationError, FleetWindowError, ReservationError, ScheduleBuildError,
        UnknownVehicleError,
    },
    id::{ReservationId, VehicleId},
    reservation::{RawReservation, Reservation},
    vehicle::VehicleCatalog,
    window::FleetWindow,
};
use fleet_reshuffle_core::{TimeVariable, time::TimeInterval};
use std::collections::BTreeMap;
use tracing::debug;

/// Which vehicle carries which reservations.
///
/// Bookings of a vehicle keep their insertion order. A reservation id may
/// appear at most once across the whole assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<T: TimeVariable = i64> {
    bookings: BTreeMap<VehicleId, Vec<Reservation<T>>>,
    placement: BTreeMap<ReservationId, VehicleId>,
}

impl<T: TimeVariable> Default for Assignment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeVariable> Assignment<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            bookings: BTreeMap::new(),
            placement: BTreeMap::new(),
        }
    }

    /// Files `reservation` under `vehicle`.
    pub fn insert(
        &mut self,
        vehicle: VehicleId,
        reservation: Reservation<T>,
    ) -> Result<&mut Self, DuplicateReservationError> {
        let id = reservation.id();
        if self.placement.contains_key(&id) {
            return Err(DuplicateReservationError::new(id));
        }
        self.placement.insert(id, vehicle);
        self.bookings.entry(vehicle).or_default().push(reservation);
        Ok(self)
    }

    /// The bookings of `vehicle`; empty when the vehicle carries nothing.
    #[inline]
    pub fn bookings(&self, vehicle: VehicleId) -> &[Reservation<T>] {
        self.bookings.get(&vehicle).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn vehicle_of(&self, reservation: ReservationId) -> Option<VehicleId> {
        self.placement.get(&reservation).copied()
    }

    #[inline]
    pub fn contains(&self, reservation: ReservationId) -> bool {
        self.placement.contains_key(&reservation)
    }

    /// Vehicles with at least one booking, in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, &[Reservation<T>])> {
        self.bookings.iter().map(|(id, list)| (*id, list.as_slice()))
    }

    #[inline]
    pub fn reservations(&self) -> impl Iterator<Item = &Reservation<T>> {
        self.bookings.values().flatten()
    }

    /// Number of reservations.
    #[inline]
    pub fn len(&self) -> usize {
        self.placement.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placement.is_empty()
    }

    /// Number of vehicles that carry at least one reservation.
    #[inline]
    pub fn utilized_vehicles(&self) -> usize {
        self.bookings.len()
    }
}

/// The immutable input of a reshuffle: the catalog, the original assignment
/// and the fleet window derived from every reservation offered to the
/// builder.
#[derive(Debug, Clone)]
pub struct Schedule<T: TimeVariable = i64> {
    catalog: VehicleCatalog,
    original: Assignment<T>,
    window: FleetWindow<T>,
    skipped: Vec<UnknownVehicleError>,
}

impl<T: TimeVariable> Schedule<T> {
    #[inline]
    pub fn catalog(&self) -> &VehicleCatalog {
        &self.catalog
    }

    #[inline]
    pub fn original(&self) -> &Assignment<T> {
        &self.original
    }

    #[inline]
    pub fn window(&self) -> &FleetWindow<T> {
        &self.window
    }

    /// Reservations that referenced a vehicle missing from the catalog.
    #[inline]
    pub fn skipped(&self) -> &[UnknownVehicleError] {
        &self.skipped
    }

    #[inline]
    pub fn reservation_count(&self) -> usize {
        self.original.len()
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleBuilder<T: TimeVariable = i64> {
    catalog: VehicleCatalog,
    original: Assignment<T>,
    window: Option<FleetWindow<T>>,
    hull: Option<TimeInterval<T>>,
    skipped: Vec<UnknownVehicleError>,
}

impl<T: TimeVariable> ScheduleBuilder<T> {
    #[inline]
    pub fn new(catalog: VehicleCatalog) -> Self {
        Self {
            catalog,
            original: Assignment::new(),
            window: None,
            hull: None,
            skipped: Vec::new(),
        }
    }

    /// Pins the fleet window instead of deriving it from the reservations.
    #[inline]
    pub fn window(&mut self, window: FleetWindow<T>) -> &mut Self {
        self.window = Some(window);
        self
    }

    #[inline]
    pub fn catalog(&self) -> &VehicleCatalog {
        &self.catalog
    }

    fn widen(&mut self, interval: TimeInterval<T>) {
        self.hull = Some(match self.hull {
            Some(h) => h.hull(&interval),
            None => interval,
        });
    }

    /// Adds an already resolved reservation under its original vehicle.
    pub fn add_reservation(
        &mut self,
        reservation: Reservation<T>,
    ) -> Result<&mut Self, ScheduleBuildError<T>> {
        let vehicle = reservation.original_vehicle();
        if !self.catalog.contains_id(vehicle) {
            let err = UnknownVehicleError::new(reservation.id(), vehicle);
            return Err(ReservationError::UnknownVehicle(err).into());
        }
        let interval = reservation.interval();
        self.original.insert(vehicle, reservation)?;
        self.widen(interval);
        Ok(self)
    }

    /// Resolves and adds a raw reservation.
    ///
    /// A raw reservation whose vehicle is not in the catalog is skipped and
    /// recorded, but its interval still widens the fleet window.
    pub fn add_raw(&mut self, raw: RawReservation<T>) -> Result<&mut Self, ScheduleBuildError<T>> {
        match Reservation::resolve(raw, &self.catalog) {
            Ok(reservation) => self.add_reservation(reservation),
            Err(ReservationError::UnknownVehicle(err)) => {
                debug!(
                    reservation = %err.reservation(),
                    vehicle = %err.vehicle(),
                    "skipping reservation with unknown vehicle"
                );
                self.widen(TimeInterval::new(raw.start, raw.end));
                self.skipped.push(err);
                Ok(self)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn build(self) -> Result<Schedule<T>, ScheduleBuildError<T>> {
        let window = match self.window {
            Some(w) => w,
            None => {
                let hull = self.hull.ok_or(FleetWindowError::<T>::NoReservations)?;
                FleetWindow::new(hull).map_err(FleetWindowError::from)?
            }
        };
        Ok(Schedule {
            catalog: self.catalog,
            original: self.original,
            window,
            skipped: self.skipped,
        })
    }
}
