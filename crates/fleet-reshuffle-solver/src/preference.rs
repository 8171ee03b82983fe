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

use fleet_reshuffle_model::{
    id::Seats,
    vehicle::{Vehicle, VehicleCatalog},
};
use std::cmp::Ordering;

/// Decides the order in which interchangeable vehicles are tried when a
/// reservation is placed. The first vehicle that fits wins, so the order
/// determines which vehicles end up busy and which stay free.
pub trait VehiclePreference: Send + Sync {
    fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering;

    /// The catalog vehicles with `seats` seats, most preferred first.
    fn candidates<'c>(&self, catalog: &'c VehicleCatalog, seats: Seats) -> Vec<&'c Vehicle> {
        let mut out: Vec<&Vehicle> = catalog.vehicles_with_seats(seats).collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }
}

/// Lowest category first, then lowest vehicle id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheapestCategoryFirst;

impl VehiclePreference for CheapestCategoryFirst {
    #[inline]
    fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        a.category()
            .cmp(&b.category())
            .then_with(|| a.id().cmp(&b.id()))
    }
}

impl<P: VehiclePreference + ?Sized> VehiclePreference for &P {
    #[inline]
    fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        (**self).compare(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_reshuffle_model::id::{CategoryId, VehicleId};

    fn vehicle(id: u64, seats: u32, category: u64) -> Vehicle {
        Vehicle::new(VehicleId::new(id), Seats::new(seats), CategoryId::new(category)).unwrap()
    }

    #[test]
    fn test_cheapest_category_first_orders_by_category_then_id() {
        let catalog = VehicleCatalog::try_from_vehicles([
            vehicle(1, 5, 3),
            vehicle(2, 5, 1),
            vehicle(3, 5, 1),
            vehicle(4, 7, 0),
        ])
        .unwrap();

        let ids: Vec<_> = CheapestCategoryFirst
            .candidates(&catalog, Seats::new(5))
            .into_iter()
            .map(Vehicle::id)
            .collect();
        assert_eq!(ids, vec![VehicleId::new(2), VehicleId::new(3), VehicleId::new(1)]);
    }

    #[test]
    fn test_no_candidates_for_unknown_seat_class() {
        let catalog = VehicleCatalog::try_from_vehicles([vehicle(1, 5, 1)]).unwrap();
        assert!(CheapestCategoryFirst.candidates(&catalog, Seats::new(2)).is_empty());
    }
}
