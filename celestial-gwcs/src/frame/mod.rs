//! Coordinate frames: axis metadata plus the rules for packing raw world
//! values into domain objects and unpacking them again.
//!
//! A [`Frame`] owns one flat arena of [`AxisSpec`]s and an ordered list of
//! [`Member`]s, each holding a [`FrameKind`] and the arena range it covers.
//! A plain frame has a single member; a composite frame is the flattening of
//! its children. World order is the rank of each axis' `axes_order` value.

mod axis;
mod kind;
mod object;

pub use axis::{AxisSpec, AxisType};
pub use kind::FrameKind;
pub use object::{
    high_level_objects_to_values, values_to_high_level_objects, Extractor, ObjectClass,
    ObjectClasses, ObjectComponent,
};

use celestial_quantity::{Dimension, Quantity, SkyFrame, Time, TimeScale, Unit};
use std::collections::HashMap;
use std::ops::Range;

use crate::coordinate::{Coordinate, HighLevelObjects};
use crate::error::{GwcsError, GwcsResult};

/// One kind-bearing part of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    name: String,
    kind: FrameKind,
    range: Range<usize>,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FrameKind {
        &self.kind
    }

    /// Arena indices owned by this member.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// World slots of one object group, in constructor-argument order.
#[derive(Debug, Clone, PartialEq)]
struct Group {
    key: String,
    class: ObjectClass,
    slots: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    name: String,
    axes: Vec<AxisSpec>,
    members: Vec<Member>,
    composite: bool,
    world_to_arena: Vec<usize>,
    components: Vec<ObjectComponent>,
    classes: ObjectClasses,
    groups: Vec<Group>,
}

impl Frame {
    pub fn celestial(reference: SkyFrame) -> FrameBuilder {
        FrameBuilder::new(FrameKind::Celestial { reference }, 2)
    }

    pub fn spectral(unit: Unit) -> FrameBuilder {
        FrameBuilder::new(
            FrameKind::Spectral {
                reference_position: None,
            },
            1,
        )
        .unit([unit])
    }

    /// Without a reference the axis holds absolute Julian dates.
    pub fn temporal(reference_time: Option<Time>) -> FrameBuilder {
        let scale = reference_time.map(|t| t.scale()).unwrap_or_default();
        FrameBuilder::new(
            FrameKind::Temporal {
                reference_time,
                scale,
            },
            1,
        )
    }

    pub fn stokes() -> FrameBuilder {
        FrameBuilder::new(FrameKind::Stokes, 1)
    }

    /// Axes of arbitrary type; `axes_type` must be supplied.
    pub fn generic(naxes: usize) -> FrameBuilder {
        FrameBuilder::new(FrameKind::Generic, naxes)
    }

    /// Pixel frame with axes `x`, `y`, `z`, ... in `pix`.
    pub fn detector(name: impl Into<String>, naxes: usize) -> FrameBuilder {
        Frame::generic(naxes)
            .name(name)
            .axes_type(vec![AxisType::Pixel; naxes])
            .unit(vec![Unit::PIX; naxes])
            .axes_names((0..naxes).map(pixel_axis_name))
    }

    /// Two spatial axes `x`, `y` in `pix`, e.g. a focal plane.
    pub fn frame_2d() -> FrameBuilder {
        Frame::generic(2)
            .name("Frame2D")
            .axes_type([AxisType::Spatial, AxisType::Spatial])
            .unit([Unit::PIX, Unit::PIX])
            .axes_names(["x", "y"])
    }

    /// Joins frames into one world space.
    ///
    /// The union of the children's `axes_order` values must be exactly
    /// `0..n`.
    pub fn composite(name: impl Into<String>, frames: Vec<Frame>) -> GwcsResult<Frame> {
        let mut axes = Vec::new();
        let mut members = Vec::new();
        for frame in frames {
            let offset = axes.len();
            for member in frame.members {
                members.push(Member {
                    range: member.range.start + offset..member.range.end + offset,
                    ..member
                });
            }
            axes.extend(frame.axes);
        }

        if axes.is_empty() {
            return Err(GwcsError::invalid_frame("a composite frame needs members"));
        }
        let mut orders: Vec<usize> = axes.iter().map(|a| a.axes_order).collect();
        orders.sort_unstable();
        if orders.iter().enumerate().any(|(i, &o)| i != o) {
            return Err(GwcsError::invalid_frame(format!(
                "axes_order of the members must cover 0..{} exactly, got {:?}",
                axes.len(),
                orders
            )));
        }

        Frame::assemble(name.into(), axes, members, true)
    }

    fn assemble(
        name: String,
        axes: Vec<AxisSpec>,
        members: Vec<Member>,
        composite: bool,
    ) -> GwcsResult<Frame> {
        let n = axes.len();
        let mut world_to_arena: Vec<usize> = (0..n).collect();
        world_to_arena.sort_by_key(|&i| axes[i].axes_order);
        let mut arena_to_world = vec![0; n];
        for (w, &a) in world_to_arena.iter().enumerate() {
            arena_to_world[a] = w;
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut arena_components: Vec<Option<ObjectComponent>> = vec![None; n];
        let mut groups = Vec::new();
        for member in &members {
            let raw: Vec<(String, Vec<usize>)> = match member.kind.base_key() {
                Some(key) => vec![(key.to_string(), member.range.clone().collect())],
                None => member
                    .range
                    .clone()
                    .map(|i| (axes[i].axis_type.as_str().to_string(), vec![i]))
                    .collect(),
            };

            for (base, indices) in raw {
                let count = counts.entry(base.clone()).or_insert(0);
                let key = if *count == 0 {
                    base
                } else {
                    format!("{}{}", base, count)
                };
                *count += 1;

                let units: Vec<Unit> = indices.iter().map(|&i| axes[i].unit.clone()).collect();
                let (class, extractors) = describe(&member.kind, &units)?;
                for (index, (&a, extractor)) in indices.iter().zip(extractors).enumerate() {
                    arena_components[a] = Some(ObjectComponent {
                        key: key.clone(),
                        index,
                        extractor,
                    });
                }
                groups.push(Group {
                    key,
                    class,
                    slots: indices.iter().map(|&a| arena_to_world[a]).collect(),
                });
            }
        }
        groups.sort_by_key(|g| g.slots.iter().min().copied().unwrap_or(usize::MAX));

        let components = world_to_arena
            .iter()
            .map(|&a| arena_components[a].clone())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| GwcsError::invalid_frame("members do not cover every axis"))?;
        let classes = ObjectClasses::new(
            groups
                .iter()
                .map(|g| (g.key.clone(), g.class.clone()))
                .collect(),
        );

        Ok(Frame {
            name,
            axes,
            members,
            composite,
            world_to_arena,
            components,
            classes,
            groups,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn naxes(&self) -> usize {
        self.axes.len()
    }

    /// Axis descriptors in declaration order.
    pub fn axes(&self) -> &[AxisSpec] {
        &self.axes
    }

    pub fn axes_order(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.axes_order).collect()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_composite(&self) -> bool {
        self.composite
    }

    /// Sky reference of the first celestial member.
    pub fn reference_frame(&self) -> Option<&SkyFrame> {
        self.members.iter().find_map(|m| match &m.kind {
            FrameKind::Celestial { reference } => Some(reference),
            _ => None,
        })
    }

    fn world_axis(&self, w: usize) -> &AxisSpec {
        &self.axes[self.world_to_arena[w]]
    }

    fn world_axes(&self) -> impl Iterator<Item = &AxisSpec> {
        self.world_to_arena.iter().map(|&a| &self.axes[a])
    }

    pub fn unit(&self) -> Vec<Unit> {
        self.world_axes().map(|a| a.unit.clone()).collect()
    }

    pub fn axes_type(&self) -> Vec<AxisType> {
        self.world_axes().map(|a| a.axis_type.clone()).collect()
    }

    pub fn axes_names(&self) -> Vec<String> {
        self.world_axes().map(|a| a.name.clone()).collect()
    }

    pub fn axis_physical_types(&self) -> Vec<String> {
        self.world_axes().map(|a| a.physical_type.clone()).collect()
    }

    pub fn world_axis_object_components(&self) -> &[ObjectComponent] {
        &self.components
    }

    pub fn world_axis_object_classes(&self) -> &ObjectClasses {
        &self.classes
    }

    /// Packs world-ordered values, in the frame units, into domain objects.
    pub fn coordinates(&self, values: &[f64]) -> GwcsResult<HighLevelObjects> {
        let objects = values_to_high_level_objects(values, &self.components, &self.classes)?;
        Ok(HighLevelObjects::from_vec(objects))
    }

    /// Like [`Frame::coordinates`] but from mixed arguments. Arguments that
    /// already are the frame's objects are returned unchanged.
    pub fn coordinates_from(&self, args: &[Coordinate]) -> GwcsResult<HighLevelObjects> {
        let already_packed = args.len() == self.classes.len()
            && self
                .classes
                .iter()
                .zip(args)
                .all(|((_, class), arg)| class.accepts(arg));
        if already_packed {
            return Ok(HighLevelObjects::from_vec(args.to_vec()));
        }
        let values = self.coordinate_values(args)?;
        self.coordinates(&values)
    }

    /// Expresses the arguments as quantities in the frame units, in world
    /// order.
    pub fn coordinate_to_quantity(&self, args: &[Coordinate]) -> GwcsResult<Vec<Quantity>> {
        let values = self.coordinate_values(args)?;
        Ok(values
            .into_iter()
            .zip(self.world_axes())
            .map(|(v, axis)| Quantity::new(v, axis.unit.clone()))
            .collect())
    }

    /// Strict unpacking: one object per group, of exactly the declared type.
    pub fn objects_to_values(&self, objects: &[Coordinate]) -> GwcsResult<Vec<f64>> {
        high_level_objects_to_values(objects, &self.components, &self.classes)
    }

    /// Unpacks mixed arguments into world-ordered values in the frame units.
    ///
    /// One scalar per axis is taken positionally. Otherwise the arguments are
    /// walked group by group, and a multi-axis group may be given as a single
    /// combined argument.
    pub fn coordinate_values(&self, args: &[Coordinate]) -> GwcsResult<Vec<f64>> {
        let n = self.naxes();
        if args.len() == n && args.iter().all(is_scalar) {
            return args
                .iter()
                .enumerate()
                .map(|(w, arg)| self.scalar_value(w, arg))
                .collect();
        }

        let too_few =
            || GwcsError::dimension_mismatch(format!("frame '{}'", self.name), n, args.len());
        let mut values = vec![f64::NAN; n];
        let mut cursor = 0;
        for group in &self.groups {
            let arg = args.get(cursor).ok_or_else(too_few)?;
            if group.slots.len() > 1 && !is_scalar(arg) {
                let unpacked = self.combined_values(group, arg)?;
                for (&slot, v) in group.slots.iter().zip(unpacked) {
                    values[slot] = v;
                }
                cursor += 1;
                continue;
            }
            for &slot in &group.slots {
                let arg = args.get(cursor).ok_or_else(too_few)?;
                values[slot] = self.scalar_value(slot, arg)?;
                cursor += 1;
            }
        }

        if cursor != args.len() {
            return Err(GwcsError::dimension_mismatch(
                format!("frame '{}'", self.name),
                cursor,
                args.len(),
            ));
        }
        Ok(values)
    }

    fn scalar_value(&self, w: usize, arg: &Coordinate) -> GwcsResult<f64> {
        let unit = &self.world_axis(w).unit;
        match arg {
            Coordinate::Value(v) => Ok(*v),
            Coordinate::Quantity(q) => Ok(q.to_value(unit)?),
            Coordinate::Vector { values, unit: from } if values.len() == 1 => {
                Ok(Quantity::new(values[0], from.clone()).to_value(unit)?)
            }
            Coordinate::Tuple(items) if items.len() == 1 => self.scalar_value(w, &items[0]),
            other => self.components[w].extractor.extract(other),
        }
    }

    fn combined_values(&self, group: &Group, arg: &Coordinate) -> GwcsResult<Vec<f64>> {
        let k = group.slots.len();
        match arg {
            Coordinate::Sky(_) => group
                .slots
                .iter()
                .map(|&w| self.components[w].extractor.extract(arg))
                .collect(),
            Coordinate::Tuple(items) if items.len() == k => group
                .slots
                .iter()
                .zip(items)
                .map(|(&w, item)| self.scalar_value(w, item))
                .collect(),
            Coordinate::Vector { values, unit } if values.len() == k => group
                .slots
                .iter()
                .zip(values)
                .map(|(&w, &v)| {
                    let q = Quantity::new(v, unit.clone());
                    Ok(q.to_value(&self.world_axis(w).unit)?)
                })
                .collect(),
            other => Err(GwcsError::type_mismatch(
                [group.class.type_name()],
                [other.type_name()],
            )),
        }
    }
}

fn is_scalar(arg: &Coordinate) -> bool {
    match arg {
        Coordinate::Sky(_) => false,
        Coordinate::Vector { values, .. } => values.len() == 1,
        Coordinate::Tuple(items) => items.len() == 1 && is_scalar(&items[0]),
        _ => true,
    }
}

fn pixel_axis_name(i: usize) -> String {
    match i {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "z".to_string(),
        _ => format!("x{}", i),
    }
}

/// Object class and per-axis extractors of one group.
fn describe(kind: &FrameKind, units: &[Unit]) -> GwcsResult<(ObjectClass, Vec<Extractor>)> {
    let single = |units: &[Unit]| -> GwcsResult<Unit> {
        match units {
            [unit] => Ok(unit.clone()),
            _ => Err(GwcsError::invalid_frame(format!(
                "expected one unit, got {}",
                units.len()
            ))),
        }
    };

    let described = match kind {
        FrameKind::Celestial { reference } => {
            let [lon, lat] = units else {
                return Err(GwcsError::invalid_frame(format!(
                    "a celestial frame has two axes, got {}",
                    units.len()
                )));
            };
            (
                ObjectClass::SkyCoord {
                    frame: reference.clone(),
                    units: [lon.clone(), lat.clone()],
                },
                vec![
                    Extractor::Longitude {
                        frame: reference.clone(),
                        unit: lon.clone(),
                    },
                    Extractor::Latitude {
                        frame: reference.clone(),
                        unit: lat.clone(),
                    },
                ],
            )
        }
        FrameKind::Spectral { reference_position } => {
            let unit = single(units)?;
            (
                ObjectClass::SpectralCoord {
                    unit: unit.clone(),
                    reference_position: reference_position.clone(),
                },
                vec![Extractor::Spectral(unit)],
            )
        }
        FrameKind::Temporal {
            reference_time,
            scale,
        } => {
            let unit = single(units)?;
            let extractor = match reference_time {
                Some(reference) => Extractor::TimeOffset {
                    reference: *reference,
                    unit: unit.clone(),
                },
                None => Extractor::JulianDate(unit.clone()),
            };
            (
                ObjectClass::Time {
                    scale: *scale,
                    unit,
                    reference: *reference_time,
                },
                vec![extractor],
            )
        }
        FrameKind::Stokes => (ObjectClass::StokesCoord, vec![Extractor::Stokes]),
        FrameKind::Generic => {
            let unit = single(units)?;
            (
                ObjectClass::Quantity { unit: unit.clone() },
                vec![Extractor::Value(unit)],
            )
        }
    };
    Ok(described)
}

/// Builder returned by the [`Frame`] constructors.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    kind: FrameKind,
    naxes: usize,
    name: Option<String>,
    axes_order: Option<Vec<usize>>,
    axes_names: Option<Vec<String>>,
    units: Option<Vec<Unit>>,
    axes_type: Option<Vec<AxisType>>,
    physical_types: Option<Vec<String>>,
}

impl FrameBuilder {
    fn new(kind: FrameKind, naxes: usize) -> Self {
        Self {
            kind,
            naxes,
            name: None,
            axes_order: None,
            axes_names: None,
            units: None,
            axes_type: None,
            physical_types: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn axes_order(mut self, order: impl IntoIterator<Item = usize>) -> Self {
        self.axes_order = Some(order.into_iter().collect());
        self
    }

    pub fn axes_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.axes_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn unit(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.units = Some(units.into_iter().collect());
        self
    }

    pub fn axes_type<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AxisType>,
    {
        self.axes_type = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn physical_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.physical_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Only meaningful for temporal frames; a reference time in another scale
    /// is rejected by [`FrameBuilder::build`].
    pub fn time_scale(mut self, time_scale: TimeScale) -> Self {
        if let FrameKind::Temporal { scale, .. } = &mut self.kind {
            *scale = time_scale;
        }
        self
    }

    /// Only meaningful for spectral frames.
    pub fn reference_position(mut self, position: impl Into<String>) -> Self {
        if let FrameKind::Spectral { reference_position } = &mut self.kind {
            *reference_position = Some(position.into());
        }
        self
    }

    pub fn build(self) -> GwcsResult<Frame> {
        let kind = self.kind;
        let naxes = self.naxes;
        if naxes == 0 {
            return Err(GwcsError::invalid_frame("a frame needs at least one axis"));
        }
        if let Some(fixed) = kind.fixed_naxes() {
            if naxes != fixed {
                return Err(GwcsError::dimension_mismatch("axes", fixed, naxes));
            }
        }

        let axes_order = self.axes_order.unwrap_or_else(|| (0..naxes).collect());
        check_len("axes_order", naxes, axes_order.len())?;
        let mut sorted = axes_order.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != naxes {
            return Err(GwcsError::invalid_frame(format!(
                "axes_order must be unique, got {:?}",
                axes_order
            )));
        }

        let units = self.units.unwrap_or_else(|| kind.default_units(naxes));
        check_len("unit", naxes, units.len())?;

        let axes_type = match (self.axes_type, kind.default_axis_type()) {
            (Some(types), _) => types,
            (None, Some(default)) => vec![default; naxes],
            (None, None) => {
                return Err(GwcsError::invalid_frame(
                    "axes_type is required for a generic frame",
                ))
            }
        };
        check_len("axes_type", naxes, axes_type.len())?;

        let names = self
            .axes_names
            .unwrap_or_else(|| kind.default_names(&units));
        check_len("axes_names", naxes, names.len())?;

        let physical_types = self
            .physical_types
            .unwrap_or_else(|| kind.default_physical_types(&units, &axes_type));
        check_len("axis_physical_types", naxes, physical_types.len())?;

        match &kind {
            FrameKind::Celestial { .. } => {
                require_dimension(&units, Dimension::ANGLE, "celestial")?;
            }
            FrameKind::Temporal {
                reference_time,
                scale,
            } => {
                require_dimension(&units, Dimension::TIME, "temporal")?;
                if let Some(reference) = reference_time {
                    if reference.scale() != *scale {
                        return Err(GwcsError::invalid_frame(format!(
                            "reference time is in {}, frame scale is {}",
                            reference.scale(),
                            scale
                        )));
                    }
                }
            }
            _ => {}
        }

        let axes = (0..naxes)
            .map(|i| AxisSpec {
                name: names[i].clone(),
                physical_type: physical_types[i].clone(),
                unit: units[i].clone(),
                axis_type: axes_type[i].clone(),
                axes_order: axes_order[i],
            })
            .collect();

        let name = self
            .name
            .unwrap_or_else(|| kind.default_name().to_string());
        let member = Member {
            name: name.clone(),
            kind,
            range: 0..naxes,
        };
        Frame::assemble(name, axes, vec![member], false)
    }
}

fn check_len(what: &str, expected: usize, got: usize) -> GwcsResult<()> {
    if expected != got {
        return Err(GwcsError::dimension_mismatch(what, expected, got));
    }
    Ok(())
}

fn require_dimension(units: &[Unit], dimension: Dimension, kind: &str) -> GwcsResult<()> {
    match units.iter().find(|u| u.dimension() != dimension) {
        Some(unit) => Err(GwcsError::invalid_frame(format!(
            "'{}' is not a valid unit for a {} frame",
            unit, kind
        ))),
        None => Ok(()),
    }
}
