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

use crate::id::{ReservationId, VehicleId};
use fleet_reshuffle_core::{TimeVariable, time::TimePoint};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeroSeatsError {
    vehicle: VehicleId,
}

impl ZeroSeatsError {
    #[inline]
    pub fn new(vehicle: VehicleId) -> Self {
        Self { vehicle }
    }

    #[inline]
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }
}

impl Display for ZeroSeatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vehicle {} has no seats", self.vehicle)
    }
}

impl std::error::Error for ZeroSeatsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateVehicleError {
    vehicle: VehicleId,
}

impl DuplicateVehicleError {
    #[inline]
    pub fn new(vehicle: VehicleId) -> Self {
        Self { vehicle }
    }

    #[inline]
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }
}

impl Display for DuplicateVehicleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vehicle {} is already in the catalog", self.vehicle)
    }
}

impl std::error::Error for DuplicateVehicleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogError {
    ZeroSeats(ZeroSeatsError),
    DuplicateVehicle(DuplicateVehicleError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::ZeroSeats(e) => write!(f, "{}", e),
            CatalogError::DuplicateVehicle(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<ZeroSeatsError> for CatalogError {
    fn from(err: ZeroSeatsError) -> Self {
        CatalogError::ZeroSeats(err)
    }
}

impl From<DuplicateVehicleError> for CatalogError {
    fn from(err: DuplicateVehicleError) -> Self {
        CatalogError::DuplicateVehicle(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownVehicleError {
    reservation: ReservationId,
    vehicle: VehicleId,
}

impl UnknownVehicleError {
    #[inline]
    pub fn new(reservation: ReservationId, vehicle: VehicleId) -> Self {
        Self {
            reservation,
            vehicle,
        }
    }

    #[inline]
    pub fn reservation(&self) -> ReservationId {
        self.reservation
    }

    #[inline]
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }
}

impl Display for UnknownVehicleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reservation {} references vehicle {} which is not in the catalog",
            self.reservation, self.vehicle
        )
    }
}

impl std::error::Error for UnknownVehicleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeDurationError<T: TimeVariable> {
    reservation: ReservationId,
    start: TimePoint<T>,
    end: TimePoint<T>,
}

impl<T: TimeVariable> NegativeDurationError<T> {
    #[inline]
    pub fn new(reservation: ReservationId, start: TimePoint<T>, end: TimePoint<T>) -> Self {
        Self {
            reservation,
            start,
            end,
        }
    }

    #[inline]
    pub fn reservation(&self) -> ReservationId {
        self.reservation
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimePoint<T> {
        self.end
    }
}

impl<T: TimeVariable> Display for NegativeDurationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reservation {} ends before it starts: {} < {}",
            self.reservation, self.end, self.start
        )
    }
}

impl<T: TimeVariable> std::error::Error for NegativeDurationError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationError<T: TimeVariable> {
    UnknownVehicle(UnknownVehicleError),
    NegativeDuration(NegativeDurationError<T>),
}

impl<T: TimeVariable> Display for ReservationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationError::UnknownVehicle(e) => write!(f, "{}", e),
            ReservationError::NegativeDuration(e) => write!(f, "{}", e),
        }
    }
}

impl<T: TimeVariable> std::error::Error for ReservationError<T> {}

impl<T: TimeVariable> From<UnknownVehicleError> for ReservationError<T> {
    fn from(err: UnknownVehicleError) -> Self {
        ReservationError::UnknownVehicle(err)
    }
}

impl<T: TimeVariable> From<NegativeDurationError<T>> for ReservationError<T> {
    fn from(err: NegativeDurationError<T>) -> Self {
        ReservationError::NegativeDuration(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateReservationError {
    reservation: ReservationId,
}

impl DuplicateReservationError {
    #[inline]
    pub fn new(reservation: ReservationId) -> Self {
        Self { reservation }
    }

    #[inline]
    pub fn reservation(&self) -> ReservationId {
        self.reservation
    }
}

impl Display for DuplicateReservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reservation {} was added twice", self.reservation)
    }
}

impl std::error::Error for DuplicateReservationError {}

/// The fleet window collapsed to a single instant; every utilization figure
/// would divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DegenerateFleetWindowError<T: TimeVariable> {
    at: TimePoint<T>,
}

impl<T: TimeVariable> DegenerateFleetWindowError<T> {
    #[inline]
    pub fn new(at: TimePoint<T>) -> Self {
        Self { at }
    }

    #[inline]
    pub fn at(&self) -> TimePoint<T> {
        self.at
    }
}

impl<T: TimeVariable> Display for DegenerateFleetWindowError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fleet window has zero length: earliest start equals latest end ({})",
            self.at
        )
    }
}

impl<T: TimeVariable> std::error::Error for DegenerateFleetWindowError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FleetWindowError<T: TimeVariable> {
    NoReservations,
    Degenerate(DegenerateFleetWindowError<T>),
}

impl<T: TimeVariable> Display for FleetWindowError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetWindowError::NoReservations => {
                write!(f, "Fleet window needs at least one reservation")
            }
            FleetWindowError::Degenerate(e) => write!(f, "{}", e),
        }
    }
}

impl<T: TimeVariable> std::error::Error for FleetWindowError<T> {}

impl<T: TimeVariable> From<DegenerateFleetWindowError<T>> for FleetWindowError<T> {
    fn from(err: DegenerateFleetWindowError<T>) -> Self {
        FleetWindowError::Degenerate(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleBuildError<T: TimeVariable> {
    DuplicateReservation(DuplicateReservationError),
    Reservation(ReservationError<T>),
    FleetWindow(FleetWindowError<T>),
}

impl<T: TimeVariable> Display for ScheduleBuildError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleBuildError::DuplicateReservation(e) => write!(f, "{}", e),
            ScheduleBuildError::Reservation(e) => write!(f, "{}", e),
            ScheduleBuildError::FleetWindow(e) => write!(f, "{}", e),
        }
    }
}

impl<T: TimeVariable> std::error::Error for ScheduleBuildError<T> {}

impl<T: TimeVariable> From<DuplicateReservationError> for ScheduleBuildError<T> {
    fn from(err: DuplicateReservationError) -> Self {
        ScheduleBuildError::DuplicateReservation(err)
    }
}

impl<T: TimeVariable> From<ReservationError<T>> for ScheduleBuildError<T> {
    fn from(err: ReservationError<T>) -> Self {
        ScheduleBuildError::Reservation(err)
    }
}

impl<T: TimeVariable> From<FleetWindowError<T>> for ScheduleBuildError<T> {
    fn from(err: FleetWindowError<T>) -> Self {
        ScheduleBuildError::FleetWindow(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidTimestampError {
    raw: String,
}

impl InvalidTimestampError {
    #[inline]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Display for InvalidTimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot parse timestamp {:?}", self.raw)
    }
}

impl std::error::Error for InvalidTimestampError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidIdError {
    column: &'static str,
    raw: String,
}

impl InvalidIdError {
    #[inline]
    pub fn new(column: &'static str, raw: impl Into<String>) -> Self {
        Self {
            column,
            raw: raw.into(),
        }
    }

    #[inline]
    pub fn column(&self) -> &'static str {
        self.column
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Display for InvalidIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column {} holds an invalid id {:?}", self.column, self.raw)
    }
}

impl std::error::Error for InvalidIdError {}

#[derive(Debug)]
pub enum LoaderError {
    Io(std::io::Error),
    Csv(csv::Error),
    Timestamp(InvalidTimestampError),
    Id(InvalidIdError),
    Catalog(CatalogError),
    Window(FleetWindowError<i64>),
    Schedule(ScheduleBuildError<i64>),
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for LoaderError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<InvalidTimestampError> for LoaderError {
    fn from(e: InvalidTimestampError) -> Self {
        Self::Timestamp(e)
    }
}

impl From<InvalidIdError> for LoaderError {
    fn from(e: InvalidIdError) -> Self {
        Self::Id(e)
    }
}

impl From<FleetWindowError<i64>> for LoaderError {
    fn from(e: FleetWindowError<i64>) -> Self {
        Self::Window(e)
    }
}

impl From<CatalogError> for LoaderError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<ScheduleBuildError<i64>> for LoaderError {
    fn from(e: ScheduleBuildError<i64>) -> Self {
        Self::Schedule(e)
    }
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LoaderError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            Csv(e) => write!(f, "csv error: {e}"),
            Timestamp(e) => write!(f, "timestamp error: {e}"),
            Id(e) => write!(f, "id error: {e}"),
            Catalog(e) => write!(f, "catalog error: {e}"),
            Window(e) => write!(f, "window error: {e}"),
            Schedule(e) => write!(f, "schedule error: {e}"),
        }
    }
}

impl std::error::Error for LoaderError {}
