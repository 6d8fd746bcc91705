use crate::constants::{PLANCK_J_S, SPEED_OF_LIGHT};
use crate::{Dimension, Quantity, QuantityError, QuantityResult, Unit};
use std::fmt;

/// A spectral position: wavelength, frequency, energy, wavenumber or velocity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralCoord {
    quantity: Quantity,
}

impl SpectralCoord {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self {
            quantity: Quantity::new(value, unit),
        }
    }

    pub fn from_quantity(quantity: Quantity) -> Self {
        Self { quantity }
    }

    #[inline]
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.quantity.value()
    }

    #[inline]
    pub fn unit(&self) -> &Unit {
        self.quantity.unit()
    }

    pub fn to(&self, unit: &Unit) -> QuantityResult<SpectralCoord> {
        Ok(Self::new(self.to_value(unit)?, unit.clone()))
    }

    /// Converts within one dimension, or between wavelength, frequency,
    /// energy and wavenumber through `c` and `h`. Velocities need a rest
    /// value and only convert to other velocities.
    pub fn to_value(&self, unit: &Unit) -> QuantityResult<f64> {
        if self.unit().is_equivalent(unit) {
            return self.quantity.to_value(unit);
        }
        let incompatible =
            || QuantityError::incompatible_units(self.unit().to_string(), unit.to_string());

        let si = self.value() * self.unit().scale();
        let hz = to_frequency(si, self.unit().dimension()).ok_or_else(incompatible)?;
        let target = from_frequency(hz, unit.dimension()).ok_or_else(incompatible)?;
        Ok(target / unit.scale())
    }
}

fn to_frequency(si: f64, dimension: Dimension) -> Option<f64> {
    match dimension {
        Dimension::LENGTH => Some(SPEED_OF_LIGHT / si),
        Dimension::FREQUENCY => Some(si),
        Dimension::ENERGY => Some(si / PLANCK_J_S),
        Dimension::WAVENUMBER => Some(si * SPEED_OF_LIGHT),
        _ => None,
    }
}

fn from_frequency(hz: f64, dimension: Dimension) -> Option<f64> {
    match dimension {
        Dimension::LENGTH => Some(SPEED_OF_LIGHT / hz),
        Dimension::FREQUENCY => Some(hz),
        Dimension::ENERGY => Some(hz * PLANCK_J_S),
        Dimension::WAVENUMBER => Some(hz / SPEED_OF_LIGHT),
        _ => None,
    }
}

impl fmt::Display for SpectralCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SpectralCoord {}>", self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert() {
        let s = SpectralCoord::new(0.1, Unit::UM);
        let nm = s.to(&Unit::NM).unwrap();
        assert!((nm.value() - 100.0).abs() < 1e-9);
        assert_eq!(nm.unit(), &Unit::NM);
        assert!(s.to_value(&Unit::S).is_err());
    }

    #[test]
    fn test_wavelength_frequency() {
        let s = SpectralCoord::new(5e5, Unit::GHZ);
        let nm = s.to_value(&Unit::NM).unwrap();
        assert!((nm - 599.584916).abs() < 1e-6);
        let back = SpectralCoord::new(nm, Unit::NM).to_value(&Unit::GHZ).unwrap();
        assert!((back - 5e5).abs() < 1e-6);
    }

    #[test]
    fn test_energy_and_wavenumber() {
        // 1 um photon: 1.23984 eV, 10000 per cm
        let s = SpectralCoord::new(1.0, Unit::UM);
        assert!((s.to_value(&Unit::EV).unwrap() - 1.239_841_98).abs() < 1e-6);
        let per_cm = Unit::new("cm-1", 1e2, Dimension::WAVENUMBER);
        assert!((s.to_value(&per_cm).unwrap() - 1e4).abs() < 1e-6);
        let converted = s.to(&Unit::EV).unwrap();
        assert_eq!(converted.unit(), &Unit::EV);
    }

    #[test]
    fn test_velocity_needs_rest_value() {
        let s = SpectralCoord::new(500.0, Unit::NM);
        assert!(matches!(
            s.to_value(&Unit::KM_PER_S),
            Err(QuantityError::IncompatibleUnits { .. })
        ));
        let v = SpectralCoord::new(3.0, Unit::KM_PER_S);
        assert!((v.to_value(&Unit::M_PER_S).unwrap() - 3000.0).abs() < 1e-9);
    }
}
