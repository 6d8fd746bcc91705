use celestial_quantity::{
    Quantity, SkyCoord, SkyFrame, SpectralCoord, StokesCoord, Time, TimeScale, Unit,
};

use crate::coordinate::Coordinate;
use crate::error::{GwcsError, GwcsResult};

/// Constructor template for the object that represents one axis group.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectClass {
    SkyCoord {
        frame: SkyFrame,
        units: [Unit; 2],
    },
    SpectralCoord {
        unit: Unit,
        reference_position: Option<String>,
    },
    Time {
        scale: TimeScale,
        unit: Unit,
        reference: Option<Time>,
    },
    StokesCoord,
    Quantity {
        unit: Unit,
    },
}

impl ObjectClass {
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectClass::SkyCoord { .. } => "SkyCoord",
            ObjectClass::SpectralCoord { .. } => "SpectralCoord",
            ObjectClass::Time { .. } => "Time",
            ObjectClass::StokesCoord => "StokesCoord",
            ObjectClass::Quantity { .. } => "Quantity",
        }
    }

    /// Number of constructor arguments.
    pub fn n_args(&self) -> usize {
        match self {
            ObjectClass::SkyCoord { .. } => 2,
            _ => 1,
        }
    }

    /// Time keyword: `isot` for offsets from a reference, `jd` otherwise.
    pub fn time_format(&self) -> Option<&'static str> {
        match self {
            ObjectClass::Time {
                reference: Some(_), ..
            } => Some("isot"),
            ObjectClass::Time { .. } => Some("jd"),
            _ => None,
        }
    }

    /// Builds the object from its arguments, given in the class units.
    pub fn construct(&self, args: &[f64]) -> GwcsResult<Coordinate> {
        if args.len() != self.n_args() {
            return Err(GwcsError::dimension_mismatch(
                format!("constructing {}", self.type_name()),
                self.n_args(),
                args.len(),
            ));
        }
        let coord = match self {
            ObjectClass::SkyCoord { frame, units } => {
                let lon = Quantity::new(args[0], units[0].clone());
                let lat = Quantity::new(args[1], units[1].clone());
                Coordinate::Sky(SkyCoord::from_quantities(&lon, &lat, frame.clone())?)
            }
            ObjectClass::SpectralCoord { unit, .. } => {
                Coordinate::Spectral(SpectralCoord::new(args[0], unit.clone()))
            }
            ObjectClass::Time {
                scale,
                unit,
                reference,
            } => {
                let offset = Quantity::new(args[0], unit.clone());
                let time = match reference {
                    Some(reference) => reference.add_seconds(offset.to_value(&Unit::S)?),
                    None => Time::from_jd(offset.to_value(&Unit::D)?, *scale),
                };
                Coordinate::Time(time)
            }
            ObjectClass::StokesCoord => Coordinate::Stokes(StokesCoord::new(args[0])),
            ObjectClass::Quantity { unit } => {
                Coordinate::Quantity(Quantity::new(args[0], unit.clone()))
            }
        };
        Ok(coord)
    }

    /// Strict runtime type check used by the high-level inverse.
    pub fn accepts(&self, coord: &Coordinate) -> bool {
        match (self, coord) {
            (ObjectClass::SkyCoord { .. }, Coordinate::Sky(_)) => true,
            (ObjectClass::SpectralCoord { .. }, Coordinate::Spectral(_)) => true,
            (ObjectClass::Time { .. }, Coordinate::Time(_)) => true,
            (ObjectClass::StokesCoord, Coordinate::Stokes(_)) => true,
            (ObjectClass::Quantity { .. }, Coordinate::Quantity(_)) => true,
            (ObjectClass::Quantity { .. }, Coordinate::Vector { values, .. }) => values.len() == 1,
            _ => false,
        }
    }
}

/// Pulls one axis value, in the axis unit, out of a packed object.
#[derive(Debug, Clone, PartialEq)]
pub enum Extractor {
    Longitude { frame: SkyFrame, unit: Unit },
    Latitude { frame: SkyFrame, unit: Unit },
    Spectral(Unit),
    /// Offset of an instant from the reference time.
    TimeOffset { reference: Time, unit: Unit },
    /// Absolute Julian date, expressed in `unit`.
    JulianDate(Unit),
    Stokes,
    Value(Unit),
}

impl Extractor {
    fn expected_type(&self) -> &'static str {
        match self {
            Extractor::Longitude { .. } | Extractor::Latitude { .. } => "SkyCoord",
            Extractor::Spectral(_) => "SpectralCoord",
            Extractor::TimeOffset { .. } | Extractor::JulianDate(_) => "Time",
            Extractor::Stokes => "StokesCoord",
            Extractor::Value(_) => "Quantity",
        }
    }

    pub fn extract(&self, coord: &Coordinate) -> GwcsResult<f64> {
        let mismatch = || GwcsError::type_mismatch([self.expected_type()], [coord.type_name()]);
        match (self, coord) {
            (Extractor::Longitude { frame, unit }, Coordinate::Sky(c)) => {
                Ok(c.transform_to(frame)?.lon_quantity(unit)?.value())
            }
            (Extractor::Latitude { frame, unit }, Coordinate::Sky(c)) => {
                Ok(c.transform_to(frame)?.lat_quantity(unit)?.value())
            }
            (Extractor::Spectral(unit), Coordinate::Spectral(s)) => Ok(s.to_value(unit)?),
            (Extractor::TimeOffset { reference, unit }, Coordinate::Time(t)) => {
                let seconds = Quantity::new(t.seconds_since(reference)?, Unit::S);
                Ok(seconds.to_value(unit)?)
            }
            (Extractor::JulianDate(unit), Coordinate::Time(t)) => {
                Ok(Quantity::new(t.to_jd(), Unit::D).to_value(unit)?)
            }
            (Extractor::Stokes, Coordinate::Stokes(s)) => Ok(s.value()),
            (Extractor::Value(unit), Coordinate::Quantity(q)) => Ok(q.to_value(unit)?),
            (Extractor::Value(unit), Coordinate::Vector { values, unit: from })
                if values.len() == 1 =>
            {
                Ok(Quantity::new(values[0], from.clone()).to_value(unit)?)
            }
            _ => Err(mismatch()),
        }
    }
}

/// Where world axis `i` lives: group key, argument index, extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectComponent {
    pub key: String,
    pub index: usize,
    pub extractor: Extractor,
}

/// Group key to class, ordered by first appearance across world axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectClasses {
    entries: Vec<(String, ObjectClass)>,
}

impl ObjectClasses {
    pub(crate) fn new(entries: Vec<(String, ObjectClass)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&ObjectClass> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectClass)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// Packs world-ordered values into one object per class.
pub fn values_to_high_level_objects(
    values: &[f64],
    components: &[ObjectComponent],
    classes: &ObjectClasses,
) -> GwcsResult<Vec<Coordinate>> {
    if values.len() != components.len() {
        return Err(GwcsError::dimension_mismatch(
            "world values",
            components.len(),
            values.len(),
        ));
    }

    let mut args: Vec<Vec<f64>> = classes
        .iter()
        .map(|(_, class)| vec![f64::NAN; class.n_args()])
        .collect();
    for (value, component) in values.iter().zip(components) {
        let slot = classes
            .position(&component.key)
            .ok_or_else(|| GwcsError::invalid_frame(format!("no class for '{}'", component.key)))?;
        if let Some(arg) = args[slot].get_mut(component.index) {
            *arg = *value;
        }
    }

    classes
        .iter()
        .zip(&args)
        .map(|((_, class), args)| class.construct(args))
        .collect()
}

/// Unpacks one object per class back into world-ordered values.
///
/// The objects must match the classes one to one, in order; anything else is
/// a type error naming both lists.
pub fn high_level_objects_to_values(
    objects: &[Coordinate],
    components: &[ObjectComponent],
    classes: &ObjectClasses,
) -> GwcsResult<Vec<f64>> {
    let matches = objects.len() == classes.len()
        && classes
            .iter()
            .zip(objects)
            .all(|((_, class), obj)| class.accepts(obj));
    if !matches {
        return Err(GwcsError::type_mismatch(
            classes.iter().map(|(_, c)| c.type_name()),
            objects.iter().map(Coordinate::type_name),
        ));
    }

    components
        .iter()
        .map(|component| {
            let slot = classes.position(&component.key).ok_or_else(|| {
                GwcsError::invalid_frame(format!("no class for '{}'", component.key))
            })?;
            component.extractor.extract(&objects[slot])
        })
        .collect()
}
