use celestial_quantity::{Quantity, SkyCoord, SpectralCoord, StokesCoord, Time, Unit};
use std::fmt;

/// One argument of a frame operation: a bare number, a unit-tagged value, or
/// an already-built domain object.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Value(f64),
    Quantity(Quantity),
    /// Several components sharing one unit, e.g. `[10, 20] deg`.
    Vector { values: Vec<f64>, unit: Unit },
    Tuple(Vec<Coordinate>),
    Sky(SkyCoord),
    Spectral(SpectralCoord),
    Time(Time),
    Stokes(StokesCoord),
}

impl Coordinate {
    pub fn vector(values: impl Into<Vec<f64>>, unit: Unit) -> Self {
        Self::Vector {
            values: values.into(),
            unit,
        }
    }

    /// Name of the runtime type, as reported in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Coordinate::Value(_) => "float",
            Coordinate::Quantity(_) | Coordinate::Vector { .. } => "Quantity",
            Coordinate::Tuple(_) => "tuple",
            Coordinate::Sky(_) => "SkyCoord",
            Coordinate::Spectral(_) => "SpectralCoord",
            Coordinate::Time(_) => "Time",
            Coordinate::Stokes(_) => "StokesCoord",
        }
    }

    /// Number of scalar components carried.
    pub fn len(&self) -> usize {
        match self {
            Coordinate::Vector { values, .. } => values.len(),
            Coordinate::Tuple(items) => items.iter().map(Coordinate::len).sum(),
            Coordinate::Sky(_) => 2,
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_sky(&self) -> Option<&SkyCoord> {
        match self {
            Coordinate::Sky(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_spectral(&self) -> Option<&SpectralCoord> {
        match self {
            Coordinate::Spectral(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&Time> {
        match self {
            Coordinate::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_stokes(&self) -> Option<&StokesCoord> {
        match self {
            Coordinate::Stokes(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Coordinate::Quantity(q) => Some(q),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Value(v) => write!(f, "{}", v),
            Coordinate::Quantity(q) => write!(f, "{}", q),
            Coordinate::Vector { values, unit } => write!(f, "{:?} {}", values, unit),
            Coordinate::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Coordinate::Sky(c) => write!(f, "{}", c),
            Coordinate::Spectral(s) => write!(f, "{}", s),
            Coordinate::Time(t) => write!(f, "{}", t),
            Coordinate::Stokes(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(v: f64) -> Self {
        Coordinate::Value(v)
    }
}

impl From<Quantity> for Coordinate {
    fn from(q: Quantity) -> Self {
        Coordinate::Quantity(q)
    }
}

impl From<SkyCoord> for Coordinate {
    fn from(c: SkyCoord) -> Self {
        Coordinate::Sky(c)
    }
}

impl From<SpectralCoord> for Coordinate {
    fn from(s: SpectralCoord) -> Self {
        Coordinate::Spectral(s)
    }
}

impl From<Time> for Coordinate {
    fn from(t: Time) -> Self {
        Coordinate::Time(t)
    }
}

impl From<StokesCoord> for Coordinate {
    fn from(s: StokesCoord) -> Self {
        Coordinate::Stokes(s)
    }
}

impl From<Vec<Coordinate>> for Coordinate {
    fn from(items: Vec<Coordinate>) -> Self {
        Coordinate::Tuple(items)
    }
}

/// The packed result of a frame: one object when the frame has a single
/// group, otherwise one object per group in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub enum HighLevelObjects {
    Single(Coordinate),
    Multiple(Vec<Coordinate>),
}

impl HighLevelObjects {
    pub(crate) fn from_vec(mut objects: Vec<Coordinate>) -> Self {
        if objects.len() == 1 {
            HighLevelObjects::Single(objects.remove(0))
        } else {
            HighLevelObjects::Multiple(objects)
        }
    }

    pub fn into_vec(self) -> Vec<Coordinate> {
        match self {
            HighLevelObjects::Single(c) => vec![c],
            HighLevelObjects::Multiple(v) => v,
        }
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        match self {
            HighLevelObjects::Single(c) => std::slice::from_ref(c),
            HighLevelObjects::Multiple(v) => v,
        }
    }

    pub fn single(&self) -> Option<&Coordinate> {
        match self {
            HighLevelObjects::Single(c) => Some(c),
            HighLevelObjects::Multiple(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial_quantity::SkyFrame;

    #[test]
    fn test_type_names() {
        assert_eq!(Coordinate::from(1.0).type_name(), "float");
        assert_eq!(Coordinate::from(1.0 * Unit::DEG).type_name(), "Quantity");
        assert_eq!(
            Coordinate::vector([1.0, 2.0], Unit::DEG).type_name(),
            "Quantity"
        );
        let sky = SkyCoord::from_degrees(1.0, 2.0, SkyFrame::Icrs).unwrap();
        assert_eq!(Coordinate::from(sky).type_name(), "SkyCoord");
    }

    #[test]
    fn test_len() {
        let t = Coordinate::Tuple(vec![
            Coordinate::from(1.0 * Unit::DEG),
            Coordinate::vector([1.0, 2.0], Unit::DEG),
        ]);
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_high_level_objects() {
        let one = HighLevelObjects::from_vec(vec![Coordinate::from(1.0)]);
        assert!(one.single().is_some());
        assert_eq!(one.as_slice().len(), 1);

        let two = HighLevelObjects::from_vec(vec![Coordinate::from(1.0), Coordinate::from(2.0)]);
        assert!(two.single().is_none());
        assert_eq!(two.into_vec().len(), 2);
    }
}
