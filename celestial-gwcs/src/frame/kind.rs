use celestial_quantity::{Dimension, SkyFrame, Time, TimeScale, Unit};

use super::axis::AxisType;

/// What a frame member describes, and so how its axes are packed.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind {
    Celestial {
        reference: SkyFrame,
    },
    Spectral {
        reference_position: Option<String>,
    },
    /// With a reference time the axis holds an offset from it; without one it
    /// holds an absolute Julian date.
    Temporal {
        reference_time: Option<Time>,
        scale: TimeScale,
    },
    Stokes,
    Generic,
}

impl FrameKind {
    /// Group key for the whole member. Generic members group per axis.
    pub fn base_key(&self) -> Option<&'static str> {
        match self {
            FrameKind::Celestial { .. } => Some("celestial"),
            FrameKind::Spectral { .. } => Some("spectral"),
            FrameKind::Temporal { .. } => Some("temporal"),
            FrameKind::Stokes => Some("stokes"),
            FrameKind::Generic => None,
        }
    }

    pub(crate) fn fixed_naxes(&self) -> Option<usize> {
        match self {
            FrameKind::Celestial { .. } => Some(2),
            FrameKind::Generic => None,
            _ => Some(1),
        }
    }

    pub(crate) fn default_name(&self) -> &'static str {
        match self {
            FrameKind::Celestial { .. } => "CelestialFrame",
            FrameKind::Spectral { .. } => "SpectralFrame",
            FrameKind::Temporal { .. } => "TemporalFrame",
            FrameKind::Stokes => "StokesFrame",
            FrameKind::Generic => "CoordinateFrame",
        }
    }

    pub(crate) fn default_axis_type(&self) -> Option<AxisType> {
        match self {
            FrameKind::Celestial { .. } => Some(AxisType::Spatial),
            FrameKind::Spectral { .. } => Some(AxisType::Spectral),
            FrameKind::Temporal { .. } => Some(AxisType::Temporal),
            FrameKind::Stokes => Some(AxisType::Stokes),
            FrameKind::Generic => None,
        }
    }

    pub(crate) fn default_units(&self, naxes: usize) -> Vec<Unit> {
        match self {
            FrameKind::Celestial { .. } => vec![Unit::DEG, Unit::DEG],
            FrameKind::Temporal {
                reference_time: Some(_),
                ..
            } => vec![Unit::S],
            FrameKind::Temporal { .. } => vec![Unit::D],
            _ => vec![Unit::DIMENSIONLESS; naxes],
        }
    }

    pub(crate) fn default_names(&self, units: &[Unit]) -> Vec<String> {
        match self {
            FrameKind::Celestial { reference } => reference
                .axis_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            FrameKind::Spectral { .. } => {
                vec![spectral_name(units.first().map(Unit::dimension)).to_string()]
            }
            FrameKind::Temporal { .. } => vec!["time".to_string()],
            FrameKind::Stokes => vec!["stokes".to_string()],
            FrameKind::Generic => vec![String::new(); units.len()],
        }
    }

    pub(crate) fn default_physical_types(
        &self,
        units: &[Unit],
        axes_type: &[AxisType],
    ) -> Vec<String> {
        match self {
            FrameKind::Celestial { reference } => reference.physical_types().to_vec(),
            FrameKind::Spectral { .. } => {
                vec![spectral_physical_type(units.first().map(Unit::dimension)).to_string()]
            }
            FrameKind::Temporal { .. } => vec!["time".to_string()],
            FrameKind::Stokes => vec!["phys.polarization.stokes".to_string()],
            FrameKind::Generic => axes_type
                .iter()
                .map(|t| format!("custom:{}", t.as_str()))
                .collect(),
        }
    }
}

fn spectral_physical_type(dimension: Option<Dimension>) -> &'static str {
    match dimension {
        Some(Dimension::LENGTH) => "em.wl",
        Some(Dimension::FREQUENCY) => "em.freq",
        Some(Dimension::ENERGY) => "em.energy",
        Some(Dimension::VELOCITY) => "spect.dopplerVeloc",
        Some(Dimension::WAVENUMBER) => "em.wavenumber",
        _ => "custom:unknown",
    }
}

fn spectral_name(dimension: Option<Dimension>) -> &'static str {
    match dimension {
        Some(Dimension::LENGTH) => "wavelength",
        Some(Dimension::FREQUENCY) => "frequency",
        Some(Dimension::ENERGY) => "energy",
        Some(Dimension::VELOCITY) => "velocity",
        Some(Dimension::WAVENUMBER) => "wavenumber",
        _ => "spectral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectral_physical_types() {
        let kind = FrameKind::Spectral {
            reference_position: None,
        };
        let types = |u: Unit| kind.default_physical_types(&[u], &[AxisType::Spectral]);
        assert_eq!(types(Unit::NM), vec!["em.wl"]);
        assert_eq!(types(Unit::GHZ), vec!["em.freq"]);
        assert_eq!(types(Unit::EV), vec!["em.energy"]);
        assert_eq!(types(Unit::KM_PER_S), vec!["spect.dopplerVeloc"]);
        assert_eq!(types(Unit::S), vec!["custom:unknown"]);
    }

    #[test]
    fn test_temporal_default_unit() {
        let absolute = FrameKind::Temporal {
            reference_time: None,
            scale: TimeScale::Utc,
        };
        assert_eq!(absolute.default_units(1), vec![Unit::D]);

        let relative = FrameKind::Temporal {
            reference_time: Some(Time::from_jd(2451545.0, TimeScale::Utc)),
            scale: TimeScale::Utc,
        };
        assert_eq!(relative.default_units(1), vec![Unit::S]);
    }

    #[test]
    fn test_celestial_defaults() {
        let kind = FrameKind::Celestial {
            reference: SkyFrame::Galactic,
        };
        assert_eq!(kind.default_names(&[]), vec!["l", "b"]);
        assert_eq!(
            kind.default_physical_types(&[], &[]),
            vec!["pos.galactic.lon", "pos.galactic.lat"]
        );
        assert_eq!(kind.base_key(), Some("celestial"));
    }

    #[test]
    fn test_generic_physical_types() {
        let types = FrameKind::Generic
            .default_physical_types(&[Unit::PIX], &[AxisType::Custom("ANGLE".into())]);
        assert_eq!(types, vec!["custom:ANGLE"]);
    }
}
