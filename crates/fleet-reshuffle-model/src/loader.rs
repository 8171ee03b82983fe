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
    err::{CatalogError, InvalidIdError, InvalidTimestampError, LoaderError},
    id::{CategoryId, ModelId, ReservationId, Seats, VehicleId},
    reservation::RawReservation,
    schedule::{Schedule, ScheduleBuilder},
    vehicle::{Vehicle, VehicleCatalog, VehicleDetails},
};
use chrono::{DateTime, NaiveDateTime};
use fleet_reshuffle_core::time::TimePoint;
use serde::Deserialize;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use tracing::{debug, info};

pub const MODEL_FILE: &str = "model.csv";
pub const CATEGORY_FILE: &str = "car_category.csv";
pub const CAR_FILE: &str = "car.csv";
pub const TRIP_FILE: &str = "trips.csv";

#[derive(Debug, Deserialize)]
struct ModelRow {
    model_id: String,
    model_name: Option<String>,
    seats: String,
    category_id: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    category_id: String,
    category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CarRow {
    car_id: Option<String>,
    model_id: Option<String>,
    location_id: Option<String>,
    car_number: Option<String>,
    icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TripRow {
    trip_id: String,
    driven_km: Option<f64>,
    start_ts: String,
    ends_ts: String,
    car_id: Option<String>,
}

/// Parses an id column. Blank and `NaN` cells are absent values; integral
/// floats such as `17.0` are accepted because spreadsheet exports produce
/// them for columns with gaps.
fn parse_id(column: &'static str, raw: &str) -> Result<Option<u64>, InvalidIdError> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if let Ok(v) = s.parse::<u64>() {
        return Ok(Some(v));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(Some(f as u64))
        }
        _ => Err(InvalidIdError::new(column, s)),
    }
}

fn require_id(column: &'static str, raw: &str) -> Result<u64, InvalidIdError> {
    parse_id(column, raw)?.ok_or_else(|| InvalidIdError::new(column, raw))
}

fn opt_id(column: &'static str, raw: Option<&str>) -> Result<Option<u64>, InvalidIdError> {
    match raw {
        Some(r) => parse_id(column, r),
        None => Ok(None),
    }
}

/// Parses a timestamp into seconds since the Unix epoch.
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS[.f]` with an optional numeric
/// offset. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<TimePoint<i64>, InvalidTimestampError> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(TimePoint::new(dt.timestamp()));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(TimePoint::new(dt.timestamp()));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(TimePoint::new(naive.and_utc().timestamp()));
        }
    }
    Err(InvalidTimestampError::new(s))
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Reads the four fleet tables (models, categories, cars, trips) and builds
/// a [`Schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetLoader {
    delimiter: u8,
    max_trips: Option<usize>,
}

impl Default for FleetLoader {
    fn default() -> Self {
        Self {
            delimiter: b';',
            max_trips: None,
        }
    }
}

impl FleetLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Keeps only the `n` earliest trips by start time.
    #[inline]
    pub fn max_trips(mut self, n: usize) -> Self {
        self.max_trips = Some(n);
        self
    }

    fn reader<R: Read>(&self, rdr: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(rdr)
    }

    pub fn from_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Schedule<i64>, LoaderError> {
        let dir = dir.as_ref();
        let models = File::open(dir.join(MODEL_FILE))?;
        let categories = File::open(dir.join(CATEGORY_FILE))?;
        let cars = File::open(dir.join(CAR_FILE))?;
        let trips = File::open(dir.join(TRIP_FILE))?;
        self.from_readers(models, categories, cars, trips)
    }

    pub fn from_readers<M, C, V, T>(
        &self,
        models: M,
        categories: C,
        cars: V,
        trips: T,
    ) -> Result<Schedule<i64>, LoaderError>
    where
        M: Read,
        C: Read,
        V: Read,
        T: Read,
    {
        let catalog = self.load_catalog(models, categories, cars)?;
        let mut raws = self.load_trips(trips)?;
        let total = raws.len();

        raws.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        if let Some(n) = self.max_trips {
            raws.truncate(n);
        }

        let mut builder = ScheduleBuilder::new(catalog);
        for raw in raws {
            builder.add_raw(raw)?;
        }
        let schedule = builder.build()?;

        info!(
            vehicles = schedule.catalog().len(),
            trips_read = total,
            reservations = schedule.reservation_count(),
            skipped = schedule.skipped().len(),
            window = %schedule.window(),
            "loaded fleet"
        );
        Ok(schedule)
    }

    pub fn load_catalog<M: Read, C: Read, V: Read>(
        &self,
        models: M,
        categories: C,
        cars: V,
    ) -> Result<VehicleCatalog, LoaderError> {
        let mut category_names: HashMap<CategoryId, Option<String>> = HashMap::new();
        for row in self.reader(categories).deserialize() {
            let row: CategoryRow = row?;
            let id = CategoryId::new(require_id("category_id", &row.category_id)?);
            category_names.insert(id, non_blank(row.category_name));
        }

        let mut model_table: HashMap<ModelId, ModelRow> = HashMap::new();
        for row in self.reader(models).deserialize() {
            let row: ModelRow = row?;
            let id = ModelId::new(require_id("model_id", &row.model_id)?);
            model_table.insert(id, row);
        }

        let mut catalog = VehicleCatalog::new();
        for row in self.reader(cars).deserialize() {
            let row: CarRow = row?;
            let Some(car_id) = opt_id("car_id", row.car_id.as_deref())? else {
                continue;
            };
            let id = VehicleId::new(car_id);
            let Some(model_id) = opt_id("model_id", row.model_id.as_deref())?.map(ModelId::new)
            else {
                debug!(vehicle = %id, "vehicle has no model, not admitted");
                continue;
            };
            let Some(model) = model_table.get(&model_id) else {
                debug!(vehicle = %id, model = %model_id, "model missing, vehicle not admitted");
                continue;
            };

            let seats = require_id("seats", &model.seats)?;
            let seats = u32::try_from(seats).map_err(|_| InvalidIdError::new("seats", &model.seats))?;
            let category = CategoryId::new(require_id("category_id", &model.category_id)?);

            let details = VehicleDetails {
                model_id: Some(model_id),
                model_name: non_blank(model.model_name.clone()),
                category_name: category_names.get(&category).cloned().flatten(),
                location_id: opt_id("location_id", row.location_id.as_deref())?,
                car_number: non_blank(row.car_number),
                icon_url: non_blank(row.icon_url),
            };
            let vehicle = Vehicle::new(id, Seats::new(seats), category)
                .map_err(CatalogError::from)?
                .with_details(details);
            catalog.insert(vehicle).map_err(CatalogError::from)?;
        }
        Ok(catalog)
    }

    pub fn load_trips<T: Read>(&self, trips: T) -> Result<Vec<RawReservation<i64>>, LoaderError> {
        let mut out = Vec::new();
        for row in self.reader(trips).deserialize() {
            let row: TripRow = row?;
            let id = ReservationId::new(require_id("trip_id", &row.trip_id)?);
            let vehicle = match row.car_id.as_deref() {
                Some(raw) => VehicleId::new(require_id("car_id", raw)?),
                None => return Err(InvalidIdError::new("car_id", "").into()),
            };
            let start = parse_timestamp(&row.start_ts)?;
            let end = parse_timestamp(&row.ends_ts)?;
            out.push(RawReservation::new(
                id,
                row.driven_km.unwrap_or(0.0),
                start,
                end,
                vehicle,
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::{ReservationError, ScheduleBuildError};

    const MODELS: &str = "\
model_id;model_name;seats;category_id
1;City;5;1
2;Van;9;2
";

    const CATEGORIES: &str = "\
category_id;category_name
1;Small
2;Large
";

    const CARS: &str = "\
car_id;model_id;location_id;car_number;icon_url
10;1;100;B-AA 1;https://img/1.png
11;1;100;B-AA 2;
12.0;2;101;B-AA 3;
;1;100;B-AA 4;
13;7;100;B-AA 5;
";

    const TRIPS: &str = "\
trip_id;driven_km;start_ts;ends_ts;car_id
1;12.5;2023-01-01 10:00:00+00:00;2023-01-01 12:00:00+00:00;10
2;3.0;2023-01-01 08:00:00+00:00;2023-01-01 09:00:00+00:00;11
3;40.0;2023-01-01T09:00:00Z;2023-01-01T12:00:00Z;12
4;1.0;2023-01-01 13:00:00;2023-01-01 14:00:00;13
";

    fn load(loader: FleetLoader, trips: &str) -> Result<Schedule<i64>, LoaderError> {
        loader.from_readers(
            MODELS.as_bytes(),
            CATEGORIES.as_bytes(),
            CARS.as_bytes(),
            trips.as_bytes(),
        )
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let base = parse_timestamp("2023-01-01T00:00:00Z").unwrap();
        assert_eq!(base.value(), 1_672_531_200);
        assert_eq!(parse_timestamp("2023-01-01 00:00:00").unwrap(), base);
        assert_eq!(parse_timestamp("2023-01-01 00:00:00.000+00:00").unwrap(), base);
        assert_eq!(
            parse_timestamp("2023-01-01 01:00:00+01:00").unwrap(),
            base
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_id_accepts_integral_floats_and_blanks() {
        assert_eq!(parse_id("x", "17").unwrap(), Some(17));
        assert_eq!(parse_id("x", "17.0").unwrap(), Some(17));
        assert_eq!(parse_id("x", "").unwrap(), None);
        assert_eq!(parse_id("x", "NaN").unwrap(), None);
        assert!(parse_id("x", "17.5").is_err());
        assert!(parse_id("x", "abc").is_err());
    }

    #[test]
    fn test_catalog_skips_cars_without_id_or_model() {
        let catalog = FleetLoader::new()
            .load_catalog(MODELS.as_bytes(), CATEGORIES.as_bytes(), CARS.as_bytes())
            .unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(VehicleId::new(13)).is_none());

        let van = catalog.get(VehicleId::new(12)).unwrap();
        assert_eq!(van.seats(), Seats::new(9));
        assert_eq!(van.category(), CategoryId::new(2));
        assert_eq!(van.details().category_name.as_deref(), Some("Large"));
        assert_eq!(van.details().model_name.as_deref(), Some("Van"));

        let city = catalog.get(VehicleId::new(10)).unwrap();
        assert_eq!(city.details().icon_url.as_deref(), Some("https://img/1.png"));
        assert_eq!(city.details().location_id, Some(100));
        assert_eq!(catalog.get(VehicleId::new(11)).unwrap().details().icon_url, None);
    }

    #[test]
    fn test_schedule_from_readers() {
        let s = load(FleetLoader::new(), TRIPS).unwrap();
        assert_eq!(s.reservation_count(), 3);
        assert_eq!(s.skipped().len(), 1);
        assert_eq!(s.window().hours(), 6.0);
        assert_eq!(
            s.original().vehicle_of(ReservationId::new(3)),
            Some(VehicleId::new(12))
        );
    }

    #[test]
    fn test_max_trips_keeps_earliest() {
        let s = load(FleetLoader::new().max_trips(2), TRIPS).unwrap();
        assert_eq!(s.reservation_count(), 2);
        assert!(s.original().contains(ReservationId::new(2)));
        assert!(s.original().contains(ReservationId::new(3)));
        assert_eq!(s.window().hours(), 4.0);
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let trips = "trip_id;driven_km;start_ts;ends_ts;car_id\n1;1.0;soon;later;10\n";
        let err = load(FleetLoader::new(), trips).unwrap_err();
        assert!(matches!(err, LoaderError::Timestamp(_)));
    }

    #[test]
    fn test_trip_ending_before_start_fails() {
        let trips = "trip_id;driven_km;start_ts;ends_ts;car_id\n\
1;1.0;2023-01-01 12:00:00;2023-01-01 10:00:00;10\n";
        let err = load(FleetLoader::new(), trips).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Schedule(ScheduleBuildError::Reservation(
                ReservationError::NegativeDuration(_)
            ))
        ));
    }
}
