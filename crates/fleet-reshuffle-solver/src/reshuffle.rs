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
    config::ReshuffleConfig,
    feasibility::can_accommodate,
    preference::{CheapestCategoryFirst, VehiclePreference},
};
use fleet_reshuffle_core::{TimeVariable, time::TimeDelta};
use fleet_reshuffle_model::{
    id::{Seats, VehicleId},
    reservation::Reservation,
    schedule::{Assignment, Schedule},
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// The outcome of one reshuffle pass.
///
/// Every reservation of the original assignment is either filed under a
/// vehicle in [`Reshuffle::assignment`] or listed in
/// [`Reshuffle::leftovers`], exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshuffle<T: TimeVariable = i64> {
    assignment: Assignment<T>,
    leftovers: Vec<Reservation<T>>,
}

impl<T: TimeVariable> Reshuffle<T> {
    #[inline]
    pub fn assignment(&self) -> &Assignment<T> {
        &self.assignment
    }

    #[inline]
    pub fn leftovers(&self) -> &[Reservation<T>] {
        &self.leftovers
    }

    #[inline]
    pub fn placed(&self) -> usize {
        self.assignment.len()
    }

    #[inline]
    pub fn into_parts(self) -> (Assignment<T>, Vec<Reservation<T>>) {
        (self.assignment, self.leftovers)
    }
}

struct SeatClassOutcome<T: TimeVariable> {
    bookings: BTreeMap<VehicleId, Vec<Reservation<T>>>,
    leftovers: Vec<Reservation<T>>,
}

/// Greedy first-fit packing of the original reservations onto the fewest,
/// most preferred vehicles of each seat class.
///
/// Reservations are taken longest first (ties by id) and each goes to the
/// first vehicle of its seat class, in preference order, that can take it.
/// Seat classes never share vehicles, so they are packed independently.
#[derive(Debug, Clone)]
pub struct Reshuffler<'s, T: TimeVariable = i64, P: VehiclePreference = CheapestCategoryFirst> {
    schedule: &'s Schedule<T>,
    preference: P,
    config: ReshuffleConfig,
}

impl<'s, T: TimeVariable> Reshuffler<'s, T, CheapestCategoryFirst> {
    #[inline]
    pub fn new(schedule: &'s Schedule<T>) -> Self {
        Self {
            schedule,
            preference: CheapestCategoryFirst,
            config: ReshuffleConfig::default(),
        }
    }
}

impl<'s, T: TimeVariable, P: VehiclePreference> Reshuffler<'s, T, P> {
    #[inline]
    pub fn with_preference<Q: VehiclePreference>(self, preference: Q) -> Reshuffler<'s, T, Q> {
        Reshuffler {
            schedule: self.schedule,
            preference,
            config: self.config,
        }
    }

    #[inline]
    pub fn with_config(mut self, config: ReshuffleConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &ReshuffleConfig {
        &self.config
    }

    #[inline]
    pub fn schedule(&self) -> &'s Schedule<T> {
        self.schedule
    }

    /// Reshuffles with the buffer from the configuration.
    #[inline]
    pub fn run(&self) -> Reshuffle<T> {
        self.reshuffle(self.config.buffer())
    }

    #[instrument(level = "info", skip_all, fields(buffer = %buffer, parallel = self.config.parallel))]
    pub fn reshuffle(&self, buffer: TimeDelta<T>) -> Reshuffle<T> {
        let groups: Vec<(Seats, Vec<Reservation<T>>)> = self.seat_classes().into_iter().collect();

        let outcomes: Vec<SeatClassOutcome<T>> = if self.config.parallel {
            groups
                .into_par_iter()
                .map(|(seats, pending)| self.pack_seat_class(seats, pending, buffer))
                .collect()
        } else {
            groups
                .into_iter()
                .map(|(seats, pending)| self.pack_seat_class(seats, pending, buffer))
                .collect()
        };

        let mut assignment = Assignment::new();
        let mut leftovers = Vec::new();
        for outcome in outcomes {
            for (vehicle, bookings) in outcome.bookings {
                for r in bookings {
                    assignment
                        .insert(vehicle, r)
                        .expect("reservation ids are unique in the original assignment");
                }
            }
            leftovers.extend(outcome.leftovers);
        }

        info!(
            reservations = self.schedule.reservation_count(),
            placed = assignment.len(),
            leftovers = leftovers.len(),
            vehicles_before = self.schedule.original().utilized_vehicles(),
            vehicles_after = assignment.utilized_vehicles(),
            "reshuffle finished"
        );

        Reshuffle {
            assignment,
            leftovers,
        }
    }

    /// All original reservations, longest first, grouped by seat class.
    fn seat_classes(&self) -> BTreeMap<Seats, Vec<Reservation<T>>> {
        let mut pending: Vec<Reservation<T>> =
            self.schedule.original().reservations().cloned().collect();
        pending.sort_by(|a, b| {
            b.duration()
                .cmp(&a.duration())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let mut groups: BTreeMap<Seats, Vec<Reservation<T>>> = BTreeMap::new();
        for r in pending {
            groups.entry(r.seats()).or_default().push(r);
        }
        groups
    }

    fn pack_seat_class(
        &self,
        seats: Seats,
        pending: Vec<Reservation<T>>,
        buffer: TimeDelta<T>,
    ) -> SeatClassOutcome<T> {
        let candidates: Vec<VehicleId> = self
            .preference
            .candidates(self.schedule.catalog(), seats)
            .into_iter()
            .map(|v| v.id())
            .collect();

        let mut bookings: BTreeMap<VehicleId, Vec<Reservation<T>>> = BTreeMap::new();
        let mut leftovers = Vec::new();

        for r in pending {
            let slot = candidates.iter().copied().find(|id| {
                let existing = bookings.get(id).map(Vec::as_slice).unwrap_or(&[]);
                can_accommodate(&r, existing, buffer)
            });
            match slot {
                Some(vehicle) => bookings.entry(vehicle).or_default().push(r),
                None => {
                    debug!(
                        reservation = %r.id(),
                        seats = %seats,
                        original_vehicle = %r.original_vehicle(),
                        "no vehicle can take reservation"
                    );
                    leftovers.push(r);
                }
            }
        }

        SeatClassOutcome {
            bookings,
            leftovers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::can_accommodate;
    use fleet_reshuffle_core::time::TimePoint;
    use fleet_reshuffle_model::{
        id::{CategoryId, ReservationId},
        reservation::RawReservation,
        schedule::ScheduleBuilder,
        vehicle::{Vehicle, VehicleCatalog},
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeSet;

    const HOUR: i64 = 3_600;

    fn vehicle(id: u64, seats: u32, category: u64) -> Vehicle {
        Vehicle::new(VehicleId::new(id), Seats::new(seats), CategoryId::new(category)).unwrap()
    }

    fn raw(id: u64, start: i64, end: i64, vehicle: u64) -> RawReservation<i64> {
        RawReservation::new(
            ReservationId::new(id),
            0.0,
            TimePoint::new(start),
            TimePoint::new(end),
            VehicleId::new(vehicle),
        )
    }

    fn schedule(vehicles: Vec<Vehicle>, raws: Vec<RawReservation<i64>>) -> Schedule<i64> {
        let catalog = VehicleCatalog::try_from_vehicles(vehicles).unwrap();
        let mut b = ScheduleBuilder::new(catalog);
        for r in raws {
            b.add_raw(r).unwrap();
        }
        b.build().unwrap()
    }

    fn ids(list: &[Reservation<i64>]) -> Vec<u64> {
        list.iter().map(|r| r.id().value()).collect()
    }

    /// A fleet of `n_vehicles` across a few seat classes and `n_trips` random
    /// trips over a three day horizon, possibly overlapping on their original
    /// vehicle.
    fn random_schedule(seed: u64, n_vehicles: u64, n_trips: u64) -> Schedule<i64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let seat_classes = [2_u32, 4, 5, 7];
        let vehicles: Vec<Vehicle> = (1..=n_vehicles)
            .map(|id| {
                let seats = seat_classes[rng.random_range(0..seat_classes.len())];
                vehicle(id, seats, rng.random_range(1..=3))
            })
            .collect();
        let raws = (1..=n_trips)
            .map(|id| {
                let start = rng.random_range(0..72 * HOUR);
                let len = rng.random_range(0..8 * HOUR);
                raw(id, start, start + len, rng.random_range(1..=n_vehicles))
            })
            .collect();
        schedule(vehicles, raws)
    }

    fn assert_conserved(s: &Schedule<i64>, out: &Reshuffle<i64>) {
        let original: BTreeSet<_> = s.original().reservations().map(Reservation::id).collect();
        let mut seen = BTreeSet::new();
        for r in out.assignment().reservations().chain(out.leftovers()) {
            assert!(seen.insert(r.id()), "{} appears twice", r.id());
        }
        assert_eq!(seen, original);
        assert_eq!(out.placed() + out.leftovers().len(), s.reservation_count());
    }

    #[test]
    fn test_non_overlapping_trips_pack_onto_cheapest_vehicle() {
        // 2h, 1h and 3h trips spread over two vehicles, no time conflicts.
        let s = schedule(
            vec![vehicle(1, 4, 2), vehicle(2, 4, 1)],
            vec![
                raw(1, 0, 2 * HOUR, 1),
                raw(2, 3 * HOUR, 4 * HOUR, 1),
                raw(3, 5 * HOUR, 8 * HOUR, 2),
            ],
        );
        let out = Reshuffler::new(&s).reshuffle(TimeDelta::zero());

        assert!(out.leftovers().is_empty());
        assert_eq!(out.assignment().utilized_vehicles(), 1);
        // Longest first: 3h, 2h, 1h.
        assert_eq!(ids(out.assignment().bookings(VehicleId::new(2))), vec![3, 1, 2]);
        assert!(out.assignment().bookings(VehicleId::new(1)).is_empty());
    }

    #[test]
    fn test_overlapping_trip_falls_to_next_category() {
        // The 2h trip overlaps the 3h trip, so it moves to the category 2 car.
        let s = schedule(
            vec![vehicle(1, 4, 2), vehicle(2, 4, 1)],
            vec![
                raw(1, 2 * HOUR, 4 * HOUR, 1),
                raw(2, 6 * HOUR, 7 * HOUR, 1),
                raw(3, 0, 3 * HOUR, 2),
            ],
        );
        let out = Reshuffler::new(&s).reshuffle(TimeDelta::zero());

        assert!(out.leftovers().is_empty());
        assert_eq!(ids(out.assignment().bookings(VehicleId::new(2))), vec![3, 2]);
        assert_eq!(ids(out.assignment().bookings(VehicleId::new(1))), vec![1]);
        assert_eq!(out.assignment().vehicle_of(ReservationId::new(1)), Some(VehicleId::new(1)));
    }

    #[test]
    fn test_reservation_keeps_original_vehicle() {
        let s = schedule(
            vec![vehicle(1, 4, 2), vehicle(2, 4, 1)],
            vec![raw(1, 0, HOUR, 1)],
        );
        let out = Reshuffler::new(&s).reshuffle(TimeDelta::zero());
        let moved = &out.assignment().bookings(VehicleId::new(2))[0];
        assert_eq!(moved.original_vehicle(), VehicleId::new(1));
        assert_eq!(s.original().vehicle_of(ReservationId::new(1)), Some(VehicleId::new(1)));
    }

    #[test]
    fn test_conflicting_trips_with_single_vehicle_become_leftovers() {
        let s = schedule(
            vec![vehicle(1, 4, 1)],
            vec![raw(1, 0, 2 * HOUR, 1), raw(2, HOUR, 2 * HOUR, 1)],
        );
        let out = Reshuffler::new(&s).reshuffle(TimeDelta::zero());
        assert_eq!(ids(out.leftovers()), vec![2]);
        assert_eq!(ids(out.assignment().bookings(VehicleId::new(1))), vec![1]);
        assert_conserved(&s, &out);
    }

    #[test]
    fn test_buffer_pushes_trip_to_another_vehicle() {
        // 20 minutes between the trips is less than the 30 minute buffer.
        let s = schedule(
            vec![vehicle(1, 4, 1), vehicle(2, 4, 2)],
            vec![raw(1, 0, 2 * HOUR, 1), raw(2, 2 * HOUR + 1_200, 3 * HOUR, 1)],
        );
        let tight = Reshuffler::new(&s).reshuffle(TimeDelta::from_minutes(30));
        assert_eq!(tight.assignment().vehicle_of(ReservationId::new(2)), Some(VehicleId::new(2)));

        let loose = Reshuffler::new(&s).reshuffle(TimeDelta::from_minutes(15));
        assert_eq!(loose.assignment().vehicle_of(ReservationId::new(2)), Some(VehicleId::new(1)));
    }

    #[test]
    fn test_seat_class_without_vehicles_goes_to_leftovers() {
        // Booked while vehicle 1 was still a 7-seater; the catalog now only
        // knows 4-seaters.
        let catalog =
            VehicleCatalog::try_from_vehicles([vehicle(1, 4, 1), vehicle(2, 4, 1)]).unwrap();
        let stray = Reservation::new(
            ReservationId::new(2),
            0.0,
            TimePoint::new(0),
            TimePoint::new(HOUR),
            &vehicle(1, 7, 1),
        )
        .unwrap();

        let mut b = ScheduleBuilder::new(catalog);
        b.add_raw(raw(1, 0, HOUR, 1)).unwrap();
        b.add_reservation(stray).unwrap();
        let s = b.build().unwrap();

        for buffer in [0, 30] {
            let out = Reshuffler::new(&s).reshuffle(TimeDelta::from_minutes(buffer));
            assert_eq!(ids(out.leftovers()), vec![2]);
            assert_eq!(out.placed(), 1);
        }
    }

    #[test]
    fn test_custom_preference_changes_order() {
        struct HighestIdFirst;
        impl VehiclePreference for HighestIdFirst {
            fn compare(&self, a: &Vehicle, b: &Vehicle) -> std::cmp::Ordering {
                b.id().cmp(&a.id())
            }
        }

        let s = schedule(
            vec![vehicle(1, 4, 1), vehicle(2, 4, 2)],
            vec![raw(1, 0, HOUR, 1)],
        );
        let out = Reshuffler::new(&s)
            .with_preference(HighestIdFirst)
            .reshuffle(TimeDelta::zero());
        assert_eq!(out.assignment().vehicle_of(ReservationId::new(1)), Some(VehicleId::new(2)));
    }

    #[test]
    fn test_conservation_on_random_fleets() {
        for seed in 0..16 {
            let s = random_schedule(seed, 12, 120);
            let out = Reshuffler::new(&s).reshuffle(TimeDelta::from_minutes(30));
            assert_conserved(&s, &out);
        }
    }

    #[test]
    fn test_reshuffled_bookings_respect_the_buffer() {
        let buffer = TimeDelta::from_minutes(30);
        for seed in 0..8 {
            let s = random_schedule(seed, 10, 100);
            let out = Reshuffler::new(&s).reshuffle(buffer);
            for (_, bookings) in out.assignment().iter() {
                for (i, r) in bookings.iter().enumerate() {
                    assert!(can_accommodate(r, &bookings[..i], buffer));
                }
            }
        }
    }

    #[test]
    fn test_reshuffle_is_idempotent() {
        let s = random_schedule(7, 15, 200);
        let r = Reshuffler::new(&s);
        let a = r.reshuffle(TimeDelta::from_minutes(30));
        let b = r.reshuffle(TimeDelta::from_minutes(30));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for seed in 0..6 {
            let s = random_schedule(seed, 20, 300);
            let seq = Reshuffler::new(&s).reshuffle(TimeDelta::from_minutes(15));
            let par = Reshuffler::new(&s)
                .with_config(ReshuffleConfig {
                    buffer_minutes: 15,
                    parallel: true,
                })
                .run();
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn test_leftovers_are_ordered_by_seat_class_then_duration() {
        let s = schedule(
            vec![vehicle(1, 2, 1), vehicle(2, 5, 1)],
            vec![
                raw(1, 0, 4 * HOUR, 2),
                raw(2, HOUR, 2 * HOUR, 2),
                raw(3, HOUR, 3 * HOUR, 2),
                raw(4, 0, 4 * HOUR, 1),
                raw(5, 0, HOUR, 1),
            ],
        );
        let out = Reshuffler::new(&s).reshuffle(TimeDelta::zero());
        assert_eq!(ids(out.leftovers()), vec![5, 3, 2]);
    }
}
