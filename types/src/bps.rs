//! Basis points: fixed-point fractions where 10_000 bp = 100%.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// 100% expressed in basis points.
pub const BP_SCALE: u32 = 10_000;

/// A fraction in basis points. Shares are in `0..=10_000`; sums of shares
/// may exceed that while they are being checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BasisPoints(u32);

impl BasisPoints {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(BP_SCALE);

    pub const fn new(bp: u32) -> Self {
        Self(bp)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

}

impl Add for BasisPoints {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for BasisPoints {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, b| acc + b)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}
