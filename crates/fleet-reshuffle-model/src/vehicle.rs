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
    err::{CatalogError, DuplicateVehicleError, ZeroSeatsError},
    id::{CategoryId, ModelId, Seats, VehicleId},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Descriptive attributes carried along for reporting. None of them take part
/// in placement decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleDetails {
    pub model_id: Option<ModelId>,
    pub model_name: Option<String>,
    pub category_name: Option<String>,
    pub location_id: Option<u64>,
    pub car_number: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    id: VehicleId,
    seats: Seats,
    category: CategoryId,
    details: VehicleDetails,
}

impl Vehicle {
    #[inline]
    pub fn new(id: VehicleId, seats: Seats, category: CategoryId) -> Result<Self, ZeroSeatsError> {
        if seats.value() == 0 {
            return Err(ZeroSeatsError::new(id));
        }
        Ok(Self {
            id,
            seats,
            category,
            details: VehicleDetails::default(),
        })
    }

    #[inline]
    pub fn with_details(mut self, details: VehicleDetails) -> Self {
        self.details = details;
        self
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn seats(&self) -> Seats {
        self.seats
    }

    #[inline]
    pub fn category(&self) -> CategoryId {
        self.category
    }

    #[inline]
    pub fn details(&self) -> &VehicleDetails {
        &self.details
    }
}

/// All vehicles known to a schedule, keyed by id.
///
/// Iteration is in ascending [`VehicleId`] order, which keeps every consumer
/// deterministic without an extra sort.
#[repr(transparent)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleCatalog(BTreeMap<VehicleId, Vehicle>);

impl VehicleCatalog {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn insert(&mut self, vehicle: Vehicle) -> Result<&mut Self, DuplicateVehicleError> {
        let id = vehicle.id();
        if self.0.contains_key(&id) {
            return Err(DuplicateVehicleError::new(id));
        }
        self.0.insert(id, vehicle);
        Ok(self)
    }

    pub fn try_from_vehicles<I>(vehicles: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Vehicle>,
    {
        let mut catalog = Self::new();
        for v in vehicles {
            catalog.insert(v)?;
        }
        Ok(catalog)
    }

    #[inline]
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.0.get(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: VehicleId) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.0.values()
    }

    #[inline]
    pub fn vehicles_with_seats(&self, seats: Seats) -> impl Iterator<Item = &Vehicle> {
        self.0.values().filter(move |v| v.seats() == seats)
    }
}

impl<'a> IntoIterator for &'a VehicleCatalog {
    type Item = &'a Vehicle;
    type IntoIter = std::collections::btree_map::Values<'a, VehicleId, Vehicle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: u64, seats: u32, category: u64) -> Vehicle {
        Vehicle::new(VehicleId::new(id), Seats::new(seats), CategoryId::new(category))
            .expect("valid vehicle")
    }

    #[test]
    fn test_zero_seats_rejected() {
        let err = Vehicle::new(VehicleId::new(7), Seats::new(0), CategoryId::new(1)).unwrap_err();
        assert_eq!(err.vehicle(), VehicleId::new(7));
    }

    #[test]
    fn test_duplicate_vehicle_rejected() {
        let mut catalog = VehicleCatalog::new();
        catalog.insert(vehicle(1, 5, 1)).unwrap();
        let err = catalog.insert(vehicle(1, 7, 2)).unwrap_err();
        assert_eq!(err.vehicle(), VehicleId::new(1));
        assert_eq!(catalog.get(VehicleId::new(1)).unwrap().seats(), Seats::new(5));
    }

    #[test]
    fn test_try_from_vehicles_surfaces_duplicates() {
        let err = VehicleCatalog::try_from_vehicles([vehicle(1, 5, 1), vehicle(1, 5, 1)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateVehicle(_)));
    }

    #[test]
    fn test_vehicles_with_seats_filters_and_orders_by_id() {
        let catalog = VehicleCatalog::try_from_vehicles([
            vehicle(3, 5, 1),
            vehicle(1, 5, 2),
            vehicle(2, 7, 1),
        ])
        .unwrap();

        let ids: Vec<_> = catalog
            .vehicles_with_seats(Seats::new(5))
            .map(Vehicle::id)
            .collect();
        assert_eq!(ids, vec![VehicleId::new(1), VehicleId::new(3)]);
        assert_eq!(catalog.vehicles_with_seats(Seats::new(9)).count(), 0);
    }

    #[test]
    fn test_len_counts_vehicles_not_seat_classes() {
        let catalog = VehicleCatalog::try_from_vehicles([
            vehicle(1, 7, 1),
            vehicle(2, 5, 1),
            vehicle(3, 7, 2),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.vehicles_with_seats(Seats::new(7)).count(), 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_details_are_kept() {
        let v = vehicle(1, 5, 1).with_details(VehicleDetails {
            model_name: Some("Kombi".into()),
            car_number: Some("B-FL 123".into()),
            ..VehicleDetails::default()
        });
        assert_eq!(v.details().model_name.as_deref(), Some("Kombi"));
        assert_eq!(v.details().car_number.as_deref(), Some("B-FL 123"));
        assert_eq!(v.details().icon_url, None);
    }
}
