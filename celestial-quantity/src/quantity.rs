use crate::{QuantityResult, Unit};
use std::fmt;
use std::ops::Mul;

/// A scalar value tagged with a [`Unit`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, Unit::DIMENSIONLESS)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    pub fn to(&self, unit: &Unit) -> QuantityResult<Quantity> {
        Ok(Quantity::new(self.to_value(unit)?, unit.clone()))
    }

    pub fn to_value(&self, unit: &Unit) -> QuantityResult<f64> {
        Ok(self.value * self.unit.conversion_factor(unit)?)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.symbol().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

impl Mul<Unit> for f64 {
    type Output = Quantity;

    fn mul(self, unit: Unit) -> Quantity {
        Quantity::new(self, unit)
    }
}

impl Mul<&Unit> for f64 {
    type Output = Quantity;

    fn mul(self, unit: &Unit) -> Quantity {
        Quantity::new(self, unit.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuantityError;

    #[test]
    fn test_to_value() {
        let q = 0.1 * Unit::UM;
        assert!((q.to_value(&Unit::NM).unwrap() - 100.0).abs() < 1e-9);

        let q = 1.0 * &Unit::D;
        let s = q.to(&Unit::S).unwrap();
        assert_eq!(s.value(), 86400.0);
        assert_eq!(s.unit(), &Unit::S);
    }

    #[test]
    fn test_incompatible() {
        let q = 3.0 * Unit::JY;
        assert!(matches!(
            q.to_value(&Unit::PIX),
            Err(QuantityError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_nan_propagates() {
        let q = f64::NAN * Unit::DEG;
        assert!(q.is_nan());
        assert!(q.to_value(&Unit::RAD).unwrap().is_nan());
    }

    #[test]
    fn test_display() {
        assert_eq!((2.5 * Unit::NM).to_string(), "2.5 nm");
        assert_eq!(Quantity::dimensionless(3.0).to_string(), "3");
    }
}
