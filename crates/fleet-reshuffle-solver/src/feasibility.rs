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

use fleet_reshuffle_core::{
    TimeVariable,
    time::{TimeDelta, TimeInterval},
};
use fleet_reshuffle_model::reservation::Reservation;

/// `reservation` widened by `buffer` on both sides. A negative buffer counts
/// as zero.
#[inline]
pub fn expanded_interval<T: TimeVariable>(
    reservation: &Reservation<T>,
    buffer: TimeDelta<T>,
) -> TimeInterval<T> {
    let buffer = if buffer.is_negative() {
        TimeDelta::zero()
    } else {
        buffer
    };
    TimeInterval::new(
        reservation.start().saturating_sub(buffer),
        reservation.end().saturating_add(buffer),
    )
}

/// Whether the widened interval `adj` collides with `booking`.
///
/// A collision is an endpoint of `adj` lying strictly inside `booking`, or
/// `adj` covering `booking` entirely. Intervals that merely touch do not
/// collide.
#[inline]
pub fn collides<T: TimeVariable>(adj: &TimeInterval<T>, booking: &TimeInterval<T>) -> bool {
    booking.contains_strictly(adj.start())
        || booking.contains_strictly(adj.end())
        || adj.contains_interval(booking)
}

/// Whether `reservation`, padded by `buffer`, fits next to `bookings`.
///
/// Only the candidate is padded; existing bookings are taken as they are.
/// An empty booking list always fits.
pub fn can_accommodate<T: TimeVariable>(
    reservation: &Reservation<T>,
    bookings: &[Reservation<T>],
    buffer: TimeDelta<T>,
) -> bool {
    let adj = expanded_interval(reservation, buffer);
    !bookings.iter().any(|b| collides(&adj, &b.interval()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_reshuffle_core::time::TimePoint;
    use fleet_reshuffle_model::{
        id::{CategoryId, ReservationId, Seats, VehicleId},
        vehicle::Vehicle,
    };

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const MIN: i64 = 60;

    fn car() -> Vehicle {
        Vehicle::new(VehicleId::new(1), Seats::new(5), CategoryId::new(1)).unwrap()
    }

    fn res(id: u64, start_min: i64, end_min: i64) -> Reservation<i64> {
        Reservation::new(
            ReservationId::new(id),
            0.0,
            TimePoint::new(start_min * MIN),
            TimePoint::new(end_min * MIN),
            &car(),
        )
        .unwrap()
    }

    fn buffer(minutes: i64) -> TimeDelta<i64> {
        TimeDelta::from_minutes(minutes)
    }

    #[test]
    fn test_empty_vehicle_accepts_anything() {
        assert!(can_accommodate(&res(1, 0, 600), &[], buffer(30)));
    }

    #[test]
    fn test_twenty_minute_gap_rejected_by_thirty_minute_buffer() {
        let existing = [res(1, 0, 60)];
        let candidate = res(2, 80, 140);
        assert!(!can_accommodate(&candidate, &existing, buffer(30)));
        assert!(can_accommodate(&candidate, &existing, buffer(20)));
        assert!(can_accommodate(&candidate, &existing, buffer(0)));
    }

    #[test]
    fn test_touching_is_feasible() {
        let existing = [res(1, 0, 60)];
        assert!(can_accommodate(&res(2, 60, 120), &existing, buffer(0)));
        assert!(can_accommodate(&res(3, 90, 120), &existing, buffer(30)));
    }

    #[test]
    fn test_covering_an_existing_booking_is_rejected() {
        let existing = [res(1, 60, 90)];
        assert!(!can_accommodate(&res(2, 0, 200), &existing, buffer(0)));
        assert!(!can_accommodate(&res(3, 60, 90), &existing, buffer(0)));
    }

    #[test]
    fn test_candidate_strictly_inside_existing_is_rejected() {
        let existing = [res(1, 0, 200)];
        assert!(!can_accommodate(&res(2, 50, 100), &existing, buffer(0)));
    }

    #[test]
    fn test_zero_length_reservations() {
        let existing = [res(1, 0, 120)];
        assert!(!can_accommodate(&res(2, 60, 60), &existing, buffer(0)));
        assert!(can_accommodate(&res(3, 120, 120), &existing, buffer(0)));
        assert!(!can_accommodate(&res(4, 130, 130), &existing, buffer(30)));

        // An empty booking still blocks anything that covers its instant.
        let instant = [res(5, 60, 60)];
        assert!(!can_accommodate(&res(6, 0, 120), &instant, buffer(0)));
        assert!(can_accommodate(&res(7, 90, 120), &instant, buffer(0)));
        assert!(!can_accommodate(&res(8, 90, 120), &instant, buffer(30)));
    }

    #[test]
    fn test_larger_buffer_never_admits_more() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xF1EE7);
        for round in 0..500 {
            let existing: Vec<_> = (0..rng.random_range(0..6))
                .map(|i| {
                    let s = rng.random_range(0..1_440);
                    res(i, s, s + rng.random_range(0..240))
                })
                .collect();
            let s = rng.random_range(0..1_440);
            let candidate = res(100, s, s + rng.random_range(0..240));

            let mut previous = true;
            for minutes in [0, 5, 15, 30, 60, 120] {
                let fits = can_accommodate(&candidate, &existing, buffer(minutes));
                assert!(
                    previous || !fits,
                    "round {round}: fits at {minutes} min but not at a smaller buffer"
                );
                previous = fits;
            }
        }
    }
}
