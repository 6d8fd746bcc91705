//! Physical units as a scale factor over a small dimension vector.
//!
//! Every [`Unit`] is a multiple of a base unit for its [`Dimension`]. The base
//! units are the SI ones (metre, kilogram, second) plus the radian for angles
//! and the pixel, which is its own dimension so that detector coordinates can
//! never be silently converted into a physical length.
//!
//! Two units are convertible when their dimensions are identical; the
//! conversion factor is the ratio of their scales.
//!
//! ```
//! use celestial_quantity::Unit;
//!
//! let um = Unit::parse("um").unwrap();
//! assert!((um.conversion_factor(&Unit::NM).unwrap() - 1000.0).abs() < 1e-9);
//! assert!(Unit::JY.conversion_factor(&Unit::M).is_err());
//! ```

use crate::constants::{ARCMIN_TO_RAD, ARCSEC_TO_RAD, DEG_TO_RAD, ELECTRON_VOLT_J, JANSKY_SI};
use crate::{QuantityError, QuantityResult};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

/// Exponents over the base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub angle: i8,
    pub pixel: i8,
}

impl Dimension {
    pub const NONE: Self = Self::new(0, 0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(1, 0, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 1, 0, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0, 0);
    pub const ANGLE: Self = Self::new(0, 0, 0, 1, 0);
    pub const PIXEL: Self = Self::new(0, 0, 0, 0, 1);
    pub const FREQUENCY: Self = Self::new(0, 0, -1, 0, 0);
    pub const VELOCITY: Self = Self::new(1, 0, -1, 0, 0);
    pub const ENERGY: Self = Self::new(2, 1, -2, 0, 0);
    pub const WAVENUMBER: Self = Self::new(-1, 0, 0, 0, 0);
    pub const SPECTRAL_FLUX_DENSITY: Self = Self::new(0, 1, -2, 0, 0);

    pub const fn new(length: i8, mass: i8, time: i8, angle: i8, pixel: i8) -> Self {
        Self {
            length,
            mass,
            time,
            angle,
            pixel,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::NONE
    }

    pub fn powi(self, n: i8) -> Self {
        Self::new(
            self.length * n,
            self.mass * n,
            self.time * n,
            self.angle * n,
            self.pixel * n,
        )
    }
}

impl Mul for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.length + rhs.length,
            self.mass + rhs.mass,
            self.time + rhs.time,
            self.angle + rhs.angle,
            self.pixel + rhs.pixel,
        )
    }
}

impl Div for Dimension {
    type Output = Dimension;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self {
        self * rhs.powi(-1)
    }
}

/// A named scale over a [`Dimension`].
///
/// Equality compares scale and dimension only, so `Unit::parse("deg")` equals
/// [`Unit::DEG`] and `km / s` equals [`Unit::KM_PER_S`] whatever their symbols.
#[derive(Debug, Clone)]
pub struct Unit {
    symbol: Cow<'static, str>,
    scale: f64,
    dimension: Dimension,
}

impl Unit {
    pub const DIMENSIONLESS: Unit = Unit::base("", 1.0, Dimension::NONE);
    pub const PIX: Unit = Unit::base("pix", 1.0, Dimension::PIXEL);

    pub const M: Unit = Unit::base("m", 1.0, Dimension::LENGTH);
    pub const KM: Unit = Unit::base("km", 1e3, Dimension::LENGTH);
    pub const CM: Unit = Unit::base("cm", 1e-2, Dimension::LENGTH);
    pub const MM: Unit = Unit::base("mm", 1e-3, Dimension::LENGTH);
    pub const UM: Unit = Unit::base("um", 1e-6, Dimension::LENGTH);
    pub const NM: Unit = Unit::base("nm", 1e-9, Dimension::LENGTH);
    pub const ANGSTROM: Unit = Unit::base("Angstrom", 1e-10, Dimension::LENGTH);

    pub const KG: Unit = Unit::base("kg", 1.0, Dimension::MASS);

    pub const RAD: Unit = Unit::base("rad", 1.0, Dimension::ANGLE);
    pub const DEG: Unit = Unit::base("deg", DEG_TO_RAD, Dimension::ANGLE);
    pub const ARCMIN: Unit = Unit::base("arcmin", ARCMIN_TO_RAD, Dimension::ANGLE);
    pub const ARCSEC: Unit = Unit::base("arcsec", ARCSEC_TO_RAD, Dimension::ANGLE);

    pub const S: Unit = Unit::base("s", 1.0, Dimension::TIME);
    pub const MIN: Unit = Unit::base("min", 60.0, Dimension::TIME);
    pub const H: Unit = Unit::base("h", 3600.0, Dimension::TIME);
    pub const D: Unit = Unit::base("d", 86400.0, Dimension::TIME);
    pub const YR: Unit = Unit::base("yr", 365.25 * 86400.0, Dimension::TIME);

    pub const HZ: Unit = Unit::base("Hz", 1.0, Dimension::FREQUENCY);
    pub const KHZ: Unit = Unit::base("kHz", 1e3, Dimension::FREQUENCY);
    pub const MHZ: Unit = Unit::base("MHz", 1e6, Dimension::FREQUENCY);
    pub const GHZ: Unit = Unit::base("GHz", 1e9, Dimension::FREQUENCY);

    pub const M_PER_S: Unit = Unit::base("m / s", 1.0, Dimension::VELOCITY);
    pub const KM_PER_S: Unit = Unit::base("km / s", 1e3, Dimension::VELOCITY);

    pub const J: Unit = Unit::base("J", 1.0, Dimension::ENERGY);
    pub const EV: Unit = Unit::base("eV", ELECTRON_VOLT_J, Dimension::ENERGY);

    pub const JY: Unit = Unit::base("Jy", JANSKY_SI, Dimension::SPECTRAL_FLUX_DENSITY);

    const fn base(symbol: &'static str, scale: f64, dimension: Dimension) -> Self {
        Self {
            symbol: Cow::Borrowed(symbol),
            scale,
            dimension,
        }
    }

    pub fn new(symbol: impl Into<String>, scale: f64, dimension: Dimension) -> Self {
        Self {
            symbol: Cow::Owned(symbol.into()),
            scale,
            dimension,
        }
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Factor `f` such that `x self == x * f other`.
    pub fn conversion_factor(&self, to: &Unit) -> QuantityResult<f64> {
        if !self.is_equivalent(to) {
            return Err(QuantityError::incompatible_units(
                self.to_string(),
                to.to_string(),
            ));
        }
        Ok(self.scale / to.scale)
    }

    pub fn powi(&self, n: i8) -> Unit {
        let symbol = if n == 1 {
            self.symbol.to_string()
        } else {
            format!("{}{}", self.symbol, n)
        };
        Unit::new(symbol, self.scale.powi(n as i32), self.dimension.powi(n))
    }

    /// Parses unit strings such as `deg`, `km / s`, `km s-1`, `m^2` or `erg*s`.
    ///
    /// Whitespace and `*` separate factors; everything after a `/` is in the
    /// denominator. Powers are written `^n`, `**n` or as a trailing signed
    /// integer. An empty string is the dimensionless unit.
    pub fn parse(s: &str) -> QuantityResult<Unit> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "one" {
            return Ok(Unit::DIMENSIONLESS);
        }

        let mut scale = 1.0;
        let mut dimension = Dimension::NONE;

        let normalized = trimmed.replace("**", "^");
        for (i, part) in normalized.split('/').enumerate() {
            let sign: i8 = if i == 0 { 1 } else { -1 };
            let factors: Vec<&str> = part
                .split(|c: char| c.is_whitespace() || c == '*')
                .filter(|t| !t.is_empty())
                .collect();

            if factors.is_empty() {
                return Err(QuantityError::parse(format!(
                    "Empty unit factor in '{}'",
                    trimmed
                )));
            }

            for factor in factors {
                let (name, power) = split_power(factor)?;
                let unit = named_unit(name).ok_or_else(|| QuantityError::unknown_unit(name))?;
                let power = power * sign;
                scale *= unit.scale.powi(power as i32);
                dimension = dimension * unit.dimension.powi(power);
            }
        }

        Ok(Unit::new(trimmed, scale, dimension))
    }
}

fn split_power(token: &str) -> QuantityResult<(&str, i8)> {
    let bad_power = || QuantityError::parse(format!("Invalid power in unit factor '{}'", token));

    if let Some((name, power)) = token.split_once('^') {
        return Ok((name, power.parse().map_err(|_| bad_power())?));
    }

    let split = token
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit() || *c == '-' || *c == '+')
        .map(|(i, _)| i);

    match split {
        Some(0) | None => Ok((token, 1)),
        Some(i) => {
            let (name, power) = token.split_at(i);
            Ok((name, power.parse().map_err(|_| bad_power())?))
        }
    }
}

fn named_unit(name: &str) -> Option<Unit> {
    let unit = match name {
        "pix" | "pixel" => Unit::PIX,
        "m" => Unit::M,
        "km" => Unit::KM,
        "cm" => Unit::CM,
        "mm" => Unit::MM,
        "um" | "micron" => Unit::UM,
        "nm" => Unit::NM,
        "Angstrom" | "AA" | "angstrom" => Unit::ANGSTROM,
        "kg" => Unit::KG,
        "g" => Unit::base("g", 1e-3, Dimension::MASS),
        "rad" => Unit::RAD,
        "deg" => Unit::DEG,
        "arcmin" => Unit::ARCMIN,
        "arcsec" => Unit::ARCSEC,
        "mas" => Unit::base("mas", ARCSEC_TO_RAD * 1e-3, Dimension::ANGLE),
        "s" => Unit::S,
        "min" => Unit::MIN,
        "h" => Unit::H,
        "d" => Unit::D,
        "yr" => Unit::YR,
        "Hz" => Unit::HZ,
        "kHz" => Unit::KHZ,
        "MHz" => Unit::MHZ,
        "GHz" => Unit::GHZ,
        "J" => Unit::J,
        "erg" => Unit::base("erg", 1e-7, Dimension::ENERGY),
        "eV" => Unit::EV,
        "keV" => Unit::base("keV", ELECTRON_VOLT_J * 1e3, Dimension::ENERGY),
        "Jy" => Unit::JY,
        "mJy" => Unit::base("mJy", JANSKY_SI * 1e-3, Dimension::SPECTRAL_FLUX_DENSITY),
        _ => return None,
    };
    Some(unit)
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if self.dimension != other.dimension {
            return false;
        }
        let diff = (self.scale - other.scale).abs();
        diff <= 1e-12 * self.scale.abs().max(other.scale.abs())
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::DIMENSIONLESS
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl FromStr for Unit {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        Unit::new(
            format!("{} {}", self.symbol, rhs.symbol),
            self.scale * rhs.scale,
            self.dimension * rhs.dimension,
        )
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        Unit::new(
            format!("{} / {}", self.symbol, rhs.symbol),
            self.scale / rhs.scale,
            self.dimension / rhs.dimension,
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Unit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.symbol)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Unit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        Unit::parse(&symbol).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Unit::parse("deg").unwrap(), Unit::DEG);
        assert_eq!(Unit::parse("nm").unwrap(), Unit::NM);
        assert_eq!(Unit::parse("pixel").unwrap(), Unit::PIX);
        assert_eq!(Unit::parse("").unwrap(), Unit::DIMENSIONLESS);
        assert_eq!(Unit::parse("deg").unwrap().symbol(), "deg");
    }

    #[test]
    fn test_parse_compound() {
        let a = Unit::parse("km / s").unwrap();
        let b = Unit::parse("km s-1").unwrap();
        let c = Unit::parse("km*s^-1").unwrap();
        assert_eq!(a, Unit::KM_PER_S);
        assert_eq!(b, Unit::KM_PER_S);
        assert_eq!(c, Unit::KM_PER_S);
        assert_eq!(a.symbol(), "km / s");

        let area = Unit::parse("m2").unwrap();
        assert_eq!(area.dimension(), Dimension::LENGTH.powi(2));
        assert_eq!(Unit::parse("m**2").unwrap(), area);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            Unit::parse("furlong"),
            Err(QuantityError::UnknownUnit { .. })
        ));
        assert!(matches!(
            Unit::parse("m^x"),
            Err(QuantityError::Parse { .. })
        ));
        assert!(matches!(Unit::parse("m / "), Err(QuantityError::Parse { .. })));
    }

    #[test]
    fn test_conversion_factor() {
        let f = Unit::UM.conversion_factor(&Unit::NM).unwrap();
        assert!((f - 1000.0).abs() < 1e-9);

        let f = Unit::DEG.conversion_factor(&Unit::ARCSEC).unwrap();
        assert!((f - 3600.0).abs() < 1e-9);

        let f = Unit::D.conversion_factor(&Unit::S).unwrap();
        assert_eq!(f, 86400.0);
    }

    #[test]
    fn test_incompatible() {
        let err = Unit::JY.conversion_factor(&Unit::PIX).unwrap_err();
        assert!(matches!(err, QuantityError::IncompatibleUnits { .. }));

        // pixels are not lengths
        assert!(Unit::PIX.conversion_factor(&Unit::M).is_err());
    }

    #[test]
    fn test_mul_div() {
        let v = Unit::KM / Unit::S;
        assert_eq!(v, Unit::KM_PER_S);
        assert_eq!(v.symbol(), "km / s");

        let e = Unit::KG * Unit::M_PER_S.powi(2);
        assert_eq!(e.dimension(), Dimension::ENERGY);
    }

    #[test]
    fn test_spectral_dimensions() {
        assert_eq!(Unit::GHZ.dimension(), Dimension::FREQUENCY);
        assert_eq!(Unit::EV.dimension(), Dimension::ENERGY);
        assert_eq!(
            Unit::parse("cm-1").unwrap().dimension(),
            Dimension::WAVENUMBER
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_symbol() {
        let json = serde_json::to_string(&Unit::KM_PER_S).unwrap();
        assert_eq!(json, "\"km / s\"");
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Unit::KM_PER_S);
    }
}
