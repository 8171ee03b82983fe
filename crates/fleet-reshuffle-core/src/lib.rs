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

//! # Fleet Reshuffle Core (`fleet-reshuffle-core`)
//!
//! Domain-agnostic primitives: half-open intervals and typed time values.

use num_traits::{PrimInt, Signed, ToPrimitive, Zero};
use std::fmt::{Debug, Display};

pub mod primitives;
pub mod time;

pub mod prelude {
    pub use crate::TimeVariable;
    pub use crate::primitives::Interval;
    pub use crate::time::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE, TimeDelta, TimeInterval, TimePoint};
}

/// The integer types usable as the raw representation of time values.
pub trait TimeVariable:
    PrimInt + Signed + Zero + ToPrimitive + Send + Sync + Debug + Display
{
}
impl<T> TimeVariable for T where
    T: PrimInt + Signed + Zero + ToPrimitive + Send + Sync + Debug + Display
{
}
