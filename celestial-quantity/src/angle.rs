//! Typed angles for sky positions.
//!
//! [`Angle`] stores radians and converts to and from degrees and [`Quantity`]
//! values with any angular unit. Longitudes are wrapped with [`wrap_0_2pi`];
//! latitudes are range checked rather than wrapped, because a latitude past
//! the pole is an input error and not an equivalent direction.

use crate::constants::{PI, RAD_TO_DEG, TWOPI};
use crate::{Quantity, QuantityError, QuantityResult, Unit};
use core::ops::{Add, Neg, Sub};

/// An angular measurement stored as radians.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angle {
    rad: f64,
}

impl Angle {
    pub const ZERO: Self = Self { rad: 0.0 };

    pub const PI: Self = Self { rad: PI };

    #[inline]
    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Self {
            rad: deg.to_radians(),
        }
    }

    pub fn from_quantity(q: &Quantity) -> QuantityResult<Self> {
        Ok(Self::from_radians(q.to_value(&Unit::RAD)?))
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.rad
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.rad * RAD_TO_DEG
    }

    pub fn to_quantity(self, unit: &Unit) -> QuantityResult<Quantity> {
        Quantity::new(self.rad, Unit::RAD).to(unit)
    }

    #[inline]
    pub fn sin_cos(self) -> (f64, f64) {
        libm::sincos(self.rad)
    }

    pub fn is_nan(self) -> bool {
        self.rad.is_nan()
    }

    /// Wrapped into [0, 2pi).
    pub fn wrapped(self) -> Self {
        Self::from_radians(wrap_0_2pi(self.rad))
    }

    /// Checks that the angle is a valid latitude in [-90, +90] degrees.
    ///
    /// `NaN` passes through: an undefined position is data, not an error.
    pub fn validate_latitude(self) -> QuantityResult<Self> {
        if self.rad.is_nan() || self.rad.abs() <= PI / 2.0 + 1e-12 {
            Ok(self)
        } else {
            Err(QuantityError::parse(format!(
                "Latitude {} deg outside [-90, 90]",
                self.degrees()
            )))
        }
    }
}

/// Wraps an angle to [0, 2pi) radians.
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = libm::fmod(x, TWOPI);
    if w < 0.0 {
        w + TWOPI
    } else {
        w
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Angle::from_radians(self.rad + rhs.rad)
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Angle::from_radians(self.rad - rhs.rad)
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Self {
        Angle::from_radians(-self.rad)
    }
}
