use crate::constants::GALACTIC_TO_ICRS;
use crate::{Angle, Quantity, QuantityError, QuantityResult, Unit};
use std::fmt;

/// Celestial reference frame of a [`SkyCoord`].
///
/// Only ICRS and Galactic are related to each other; a custom frame is a
/// label that can be carried around but not converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkyFrame {
    Icrs,
    Galactic,
    Custom(String),
}

impl SkyFrame {
    pub fn name(&self) -> &str {
        match self {
            SkyFrame::Icrs => "icrs",
            SkyFrame::Galactic => "galactic",
            SkyFrame::Custom(name) => name,
        }
    }

    pub fn axis_names(&self) -> [&'static str; 2] {
        match self {
            SkyFrame::Icrs => ["ra", "dec"],
            SkyFrame::Galactic => ["l", "b"],
            SkyFrame::Custom(_) => ["lon", "lat"],
        }
    }

    pub fn physical_types(&self) -> [String; 2] {
        match self {
            SkyFrame::Icrs => ["pos.eq.ra".to_string(), "pos.eq.dec".to_string()],
            SkyFrame::Galactic => [
                "pos.galactic.lon".to_string(),
                "pos.galactic.lat".to_string(),
            ],
            SkyFrame::Custom(name) => [
                format!("custom:pos.{}.lon", name),
                format!("custom:pos.{}.lat", name),
            ],
        }
    }
}

impl fmt::Display for SkyFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A position on the sky in a given reference frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkyCoord {
    lon: Angle,
    lat: Angle,
    frame: SkyFrame,
}

impl SkyCoord {
    pub fn new(lon: Angle, lat: Angle, frame: SkyFrame) -> QuantityResult<Self> {
        let lat = lat.validate_latitude()?;
        Ok(Self { lon, lat, frame })
    }

    pub fn from_degrees(lon: f64, lat: f64, frame: SkyFrame) -> QuantityResult<Self> {
        Self::new(Angle::from_degrees(lon), Angle::from_degrees(lat), frame)
    }

    pub fn from_quantities(lon: &Quantity, lat: &Quantity, frame: SkyFrame) -> QuantityResult<Self> {
        Self::new(Angle::from_quantity(lon)?, Angle::from_quantity(lat)?, frame)
    }

    #[inline]
    pub fn lon(&self) -> Angle {
        self.lon
    }

    #[inline]
    pub fn lat(&self) -> Angle {
        self.lat
    }

    #[inline]
    pub fn frame(&self) -> &SkyFrame {
        &self.frame
    }

    pub fn lon_quantity(&self, unit: &Unit) -> QuantityResult<Quantity> {
        self.lon.to_quantity(unit)
    }

    pub fn lat_quantity(&self, unit: &Unit) -> QuantityResult<Quantity> {
        self.lat.to_quantity(unit)
    }

    /// Re-expresses this position in `target`.
    ///
    /// Converting between ICRS and Galactic applies the fixed rotation; the
    /// result longitude is wrapped into [0, 360) degrees. A custom frame can
    /// only be "converted" to itself.
    pub fn transform_to(&self, target: &SkyFrame) -> QuantityResult<SkyCoord> {
        if &self.frame == target {
            return Ok(self.clone());
        }

        let v = self.to_cartesian();
        let rotated = match (&self.frame, target) {
            (SkyFrame::Galactic, SkyFrame::Icrs) => rotate_transposed(&GALACTIC_TO_ICRS, v),
            (SkyFrame::Icrs, SkyFrame::Galactic) => rotate(&GALACTIC_TO_ICRS, v),
            _ => {
                return Err(QuantityError::frame_conversion(
                    self.frame.name(),
                    target.name(),
                ))
            }
        };

        let (lon, lat) = from_cartesian(rotated);
        Ok(SkyCoord {
            lon: Angle::from_radians(lon).wrapped(),
            lat: Angle::from_radians(lat),
            frame: target.clone(),
        })
    }

    fn to_cartesian(&self) -> [f64; 3] {
        let (sin_lat, cos_lat) = self.lat.sin_cos();
        let (sin_lon, cos_lon) = self.lon.sin_cos();
        [cos_lon * cos_lat, sin_lon * cos_lat, sin_lat]
    }
}

fn rotate(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn rotate_transposed(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
        m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
        m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
    ]
}

fn from_cartesian(v: [f64; 3]) -> (f64, f64) {
    let d2 = v[0] * v[0] + v[1] * v[1];
    let lon = if d2 != 0.0 { libm::atan2(v[1], v[0]) } else { 0.0 };
    let lat = if d2 != 0.0 || v[2] != 0.0 {
        libm::atan2(v[2], libm::sqrt(d2))
    } else {
        0.0
    };
    (lon, lat)
}

impl fmt::Display for SkyCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [lon, lat] = self.frame.axis_names();
        write!(
            f,
            "<SkyCoord ({}): ({}, {}) in deg ({:.8}, {:.8})>",
            self.frame,
            lon,
            lat,
            self.lon.degrees(),
            self.lat.degrees()
        )
    }
}
