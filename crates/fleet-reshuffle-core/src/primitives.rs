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

//! # Core Primitives
//!
//! Small, generic building blocks shared by the rest of the workspace.
//! Everything here is free of domain knowledge about vehicles or reservations;
//! the model and solver crates give these values their meaning.

use std::cmp::Ordering;
use std::fmt;

/// A half-open interval `[start, end)`.
///
/// The start is inclusive and the end is exclusive. Bounds passed in the
/// wrong order are swapped, so `start() <= end()` always holds.
///
/// # Examples
///
/// ```
/// use fleet_reshuffle_core::primitives::Interval;
///
/// let interval = Interval::new(1, 5);
/// assert_eq!(interval.start(), 1);
/// assert_eq!(interval.end(), 5);
/// assert!(interval.contains_strictly(3));
/// assert!(!interval.contains_strictly(5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> Interval<T> {
    /// Creates a new interval from two bounds, ordering them if necessary.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are not comparable (e.g. `NaN`).
    ///
    /// # Examples
    ///
    /// ```
    /// use fleet_reshuffle_core::primitives::Interval;
    ///
    /// let interval = Interval::new(5, 3);
    /// assert_eq!(interval.start(), 3);
    /// assert_eq!(interval.end(), 5);
    /// ```
    #[inline]
    pub fn new(a: T, b: T) -> Self
    where
        T: PartialOrd + Copy,
    {
        let ord = a
            .partial_cmp(&b)
            .expect("Interval::new: non-comparable bounds (NaN?)");
        let (s, e) = match ord {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };

        Self {
            start_inclusive: s,
            end_exclusive: e,
        }
    }

    /// Returns the inclusive start of the interval.
    #[inline]
    pub fn start(&self) -> T
    where
        T: Copy,
    {
        self.start_inclusive
    }

    /// Returns the exclusive end of the interval.
    #[inline]
    pub fn end(&self) -> T
    where
        T: Copy,
    {
        self.end_exclusive
    }

    /// Returns `true` if start and end coincide.
    ///
    /// ```
    /// use fleet_reshuffle_core::primitives::Interval;
    ///
    /// assert!(Interval::new(5, 5).is_empty());
    /// assert!(!Interval::new(1, 5).is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool
    where
        T: PartialEq,
    {
        self.start_inclusive == self.end_exclusive
    }

    /// Checks whether `x` lies strictly inside the interval, i.e. in the open
    /// interval `(start, end)`. Neither bound counts.
    ///
    /// ```
    /// use fleet_reshuffle_core::primitives::Interval;
    ///
    /// let interval = Interval::new(1, 5);
    /// assert!(interval.contains_strictly(3));
    /// assert!(!interval.contains_strictly(1));
    /// assert!(!interval.contains_strictly(5));
    /// ```
    #[inline]
    pub fn contains_strictly(&self, x: T) -> bool
    where
        T: PartialOrd,
    {
        x > self.start_inclusive && x < self.end_exclusive
    }

    /// Checks whether `other` lies completely within this interval.
    /// Shared bounds count as contained.
    ///
    /// ```
    /// use fleet_reshuffle_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert!(a.contains_interval(&Interval::new(2, 4)));
    /// assert!(a.contains_interval(&a));
    /// assert!(!a.contains_interval(&Interval::new(0, 6)));
    /// ```
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        other.start_inclusive >= self.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    /// The smallest interval covering both `self` and `other`, gaps included.
    ///
    /// ```
    /// use fleet_reshuffle_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 3);
    /// let b = Interval::new(6, 8);
    /// assert_eq!(a.hull(&b), Interval::new(1, 8));
    /// ```
    #[inline]
    pub fn hull(&self, other: &Self) -> Self
    where
        T: PartialOrd + Copy,
    {
        let start = if other.start_inclusive < self.start_inclusive {
            other.start_inclusive
        } else {
            self.start_inclusive
        };
        let end = if other.end_exclusive > self.end_exclusive {
            other.end_exclusive
        } else {
            self.end_exclusive
        };
        Self {
            start_inclusive: start,
            end_exclusive: end,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_order_integers() {
        let i = Interval::new(5i32, 3i32);
        assert_eq!(i.start(), 3);
        assert_eq!(i.end(), 5);
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_nan() {
        let _ = Interval::new(f64::NAN, 1.0f64);
    }

    #[test]
    fn test_contains_strictly_excludes_both_bounds() {
        let i = Interval::new(10i64, 20i64);
        assert!(i.contains_strictly(11));
        assert!(i.contains_strictly(19));
        assert!(!i.contains_strictly(10));
        assert!(!i.contains_strictly(20));
    }

    #[test]
    fn test_contains_strictly_on_empty_interval_is_always_false() {
        let i = Interval::new(3i64, 3i64);
        assert!(!i.contains_strictly(3));
    }

    #[test]
    fn test_contains_interval_accepts_empty_other_on_the_boundary() {
        let a = Interval::new(1i32, 5i32);
        assert!(a.contains_interval(&Interval::new(5, 5)));
        assert!(a.contains_interval(&Interval::new(1, 1)));
        assert!(!a.contains_interval(&Interval::new(6, 6)));
    }

    #[test]
    fn test_hull_is_commutative_and_covers_both() {
        let a = Interval::new(5i64, 7i64);
        let b = Interval::new(1i64, 2i64);
        assert_eq!(a.hull(&b), b.hull(&a));
        assert!(a.hull(&b).contains_interval(&a));
        assert!(a.hull(&b).contains_interval(&b));
    }

    #[test]
    fn test_display_formats_as_half_open() {
        assert_eq!(format!("{}", Interval::new(1, 5)), "[1, 5)");
    }
}
