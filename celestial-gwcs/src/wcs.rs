use celestial_quantity::{Quantity, Unit};
use std::sync::Arc;
use tracing::debug;

use crate::api::HighLevelWcs;
use crate::bounds::{BoundingBox, Bounds};
use crate::coordinate::{Coordinate, HighLevelObjects};
use crate::error::{GwcsError, GwcsResult};
use crate::frame::Frame;
use crate::inverse::{self, InverseConfig};
use crate::transform::{unit_factors, Compose, Identity, SharedTransform, Transform};

/// A frame and the transform that leaves it. The last frame of a pipeline
/// has no outgoing transform.
#[derive(Debug, Clone)]
struct Step {
    frame: Frame,
    transform: Option<SharedTransform>,
}

/// Result of a direct evaluation: bare quantities, or packed objects.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    Quantities(Vec<Quantity>),
    Objects(HighLevelObjects),
}

impl CallOutput {
    pub fn quantities(&self) -> Option<&[Quantity]> {
        match self {
            CallOutput::Quantities(q) => Some(q.as_slice()),
            CallOutput::Objects(_) => None,
        }
    }

    pub fn objects(&self) -> Option<&HighLevelObjects> {
        match self {
            CallOutput::Quantities(_) => None,
            CallOutput::Objects(o) => Some(o),
        }
    }
}

/// Pixel to world pipeline: frames joined by transforms.
///
/// Frame values are always in the frames' declared units. When the composed
/// transform declares input or return units, values are rescaled at its
/// boundary.
#[derive(Debug, Clone)]
pub struct Wcs {
    name: String,
    steps: Vec<Step>,
    forward: SharedTransform,
    backward: Option<SharedTransform>,
    input_factors: Option<Vec<f64>>,
    output_factors: Option<Vec<f64>>,
    bounds: Bounds,
    inverse_config: InverseConfig,
}

impl Wcs {
    pub fn new(
        forward: SharedTransform,
        input_frame: Frame,
        output_frame: Frame,
    ) -> GwcsResult<Self> {
        Self::from_steps(vec![(input_frame, Some(forward)), (output_frame, None)])
    }

    /// Builds a pipeline through intermediate frames. Every step but the last
    /// needs a transform; the last must have none.
    pub fn from_steps(steps: Vec<(Frame, Option<SharedTransform>)>) -> GwcsResult<Self> {
        if steps.len() < 2 {
            return Err(GwcsError::invalid_frame(
                "a pipeline needs an input and an output frame",
            ));
        }
        let steps: Vec<Step> = steps
            .into_iter()
            .map(|(frame, transform)| Step { frame, transform })
            .collect();
        validate_steps(&steps)?;

        let pixel_n_dim = steps[0].frame.naxes();
        let mut wcs = Self {
            name: String::new(),
            steps,
            forward: Arc::new(Identity::new(pixel_n_dim)),
            backward: None,
            input_factors: None,
            output_factors: None,
            bounds: Bounds::new(pixel_n_dim),
            inverse_config: InverseConfig::default(),
        };
        wcs.rebuild()?;
        debug!(
            pixel_n_dim,
            world_n_dim = wcs.output_frame().naxes(),
            frames = wcs.steps.len(),
            transform = wcs.forward.name(),
            "pipeline constructed"
        );
        Ok(wcs)
    }

    fn rebuild(&mut self) -> GwcsResult<()> {
        let last = self.steps.len() - 1;
        let forward = self.chain(0, last)?;
        let input_factors = match forward.input_units() {
            Some(units) => Some(unit_factors(&self.input_frame().unit(), &units)?),
            None => None,
        };
        let output_factors = match forward.return_units() {
            Some(units) => Some(unit_factors(&units, &self.output_frame().unit())?),
            None => None,
        };
        self.backward = forward.inverse();
        self.forward = forward;
        self.input_factors = input_factors;
        self.output_factors = output_factors;
        Ok(())
    }

    /// Composition of the transforms from step `from` up to step `to`.
    fn chain(&self, from: usize, to: usize) -> GwcsResult<SharedTransform> {
        if from == to {
            return Ok(Arc::new(Identity::new(self.steps[from].frame.naxes())));
        }
        let mut transforms = self.steps[from..to]
            .iter()
            .map(|s| s.transform.clone().ok_or_else(missing_transform));
        let mut acc = transforms.next().ok_or_else(missing_transform)??;
        for next in transforms {
            acc = Arc::new(Compose::new(acc, next?)?);
        }
        Ok(acc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn with_inverse_config(mut self, config: InverseConfig) -> Self {
        self.inverse_config = config;
        self
    }

    pub fn inverse_config(&self) -> &InverseConfig {
        &self.inverse_config
    }

    pub fn input_frame(&self) -> &Frame {
        &self.steps[0].frame
    }

    pub fn output_frame(&self) -> &Frame {
        &self.steps[self.steps.len() - 1].frame
    }

    pub fn forward_transform(&self) -> &SharedTransform {
        &self.forward
    }

    /// The analytic inverse of the whole pipeline, if every stage has one.
    pub fn backward_transform(&self) -> Option<SharedTransform> {
        self.backward.clone()
    }

    pub fn available_frames(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.frame.name()).collect()
    }

    fn frame_index(&self, name: &str) -> GwcsResult<usize> {
        self.steps
            .iter()
            .position(|s| s.frame.name() == name)
            .ok_or_else(|| GwcsError::unknown_frame(name))
    }

    /// Transform between two frames of the pipeline. Going backwards needs
    /// analytic inverses; `None` means there is none.
    pub fn get_transform(&self, from: &str, to: &str) -> GwcsResult<Option<SharedTransform>> {
        let (i, j) = (self.frame_index(from)?, self.frame_index(to)?);
        if i <= j {
            return Ok(Some(self.chain(i, j)?));
        }
        Ok(self.chain(j, i)?.inverse())
    }

    /// Evaluates one point from frame `from` to frame `to`.
    ///
    /// Backwards without an analytic inverse, the point is solved for
    /// numerically; the bounding box applies only when `to` is the input
    /// frame.
    pub fn transform(&self, from: &str, to: &str, values: &[f64]) -> GwcsResult<Vec<f64>> {
        let (i, j) = (self.frame_index(from)?, self.frame_index(to)?);
        check_len(from, self.steps[i].frame.naxes(), values.len())?;
        if i <= j {
            return Ok(self.chain(i, j)?.evaluate(values));
        }

        let forward = self.chain(j, i)?;
        if let Some(inverse) = forward.inverse() {
            return Ok(inverse.evaluate(values));
        }
        debug!(from, to, "no analytic inverse, solving numerically");
        let bbox = if j == 0 { self.bounding_box() } else { None };
        let n = self.steps[j].frame.naxes();
        let seeds = inverse::seeds(bbox.as_ref(), n, self.inverse_config.multi_start);
        let solution = inverse::solve(
            |p: &[f64]| forward.evaluate(p),
            values,
            &seeds,
            bbox.as_ref(),
            &self.inverse_config,
        );
        Ok(solution.point)
    }

    /// Appends `transform` to the transform entering `frame`, or with `after`
    /// prepends it to the one leaving it. The stage must keep the frame's
    /// dimensionality.
    pub fn insert_transform(
        &mut self,
        frame: &str,
        transform: SharedTransform,
        after: bool,
    ) -> GwcsResult<()> {
        let i = self.frame_index(frame)?;
        let naxes = self.steps[i].frame.naxes();
        if transform.n_inputs() != naxes || transform.n_outputs() != naxes {
            return Err(GwcsError::dimension_mismatch(
                format!("inserting '{}' at '{}'", transform.name(), frame),
                naxes,
                transform.n_inputs(),
            ));
        }

        let (slot, composed) = if after {
            let current = self.steps[i].transform.clone().ok_or_else(missing_transform)?;
            (i, Compose::new(transform, current)?)
        } else {
            let prev = i.checked_sub(1).ok_or_else(missing_transform)?;
            let current = self.steps[prev].transform.clone().ok_or_else(missing_transform)?;
            (prev, Compose::new(current, transform)?)
        };

        let previous = self.steps[slot].transform.replace(Arc::new(composed));
        if let Err(err) = self.rebuild() {
            self.steps[slot].transform = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn pixel_n_dim(&self) -> usize {
        self.input_frame().naxes()
    }

    pub fn world_n_dim(&self) -> usize {
        self.output_frame().naxes()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds.bounding_box()
    }

    pub fn set_bounding_box(&mut self, bounding_box: Option<BoundingBox>) -> GwcsResult<()> {
        self.bounds.set_bounding_box(bounding_box)
    }

    pub fn pixel_shape(&self) -> Option<Vec<usize>> {
        self.bounds.pixel_shape().map(<[usize]>::to_vec)
    }

    pub fn set_pixel_shape(&mut self, pixel_shape: Option<Vec<usize>>) -> GwcsResult<()> {
        self.bounds.set_pixel_shape(pixel_shape)
    }

    pub fn array_shape(&self) -> Option<Vec<usize>> {
        self.bounds.array_shape()
    }

    pub fn set_array_shape(&mut self, array_shape: Option<Vec<usize>>) -> GwcsResult<()> {
        self.bounds.set_array_shape(array_shape)
    }

    pub fn pixel_bounds(&self) -> Option<Vec<(f64, f64)>> {
        self.bounds.pixel_bounds()
    }

    /// World axis `i` depends on pixel axis `j`.
    pub fn axis_correlation_matrix(&self) -> Vec<Vec<bool>> {
        self.forward.separable_matrix()
    }

    /// Forward evaluation in frame units, without the bounding box.
    fn evaluate_forward(&self, pixel: &[f64]) -> Vec<f64> {
        let inputs = apply_factors(pixel, self.input_factors.as_deref(), false);
        let outputs = self.forward.evaluate(&inputs);
        apply_factors(&outputs, self.output_factors.as_deref(), false)
    }

    fn evaluate_backward(&self, inverse: &SharedTransform, world: &[f64]) -> Vec<f64> {
        let inputs = apply_factors(world, self.output_factors.as_deref(), true);
        let outputs = inverse.evaluate(&inputs);
        apply_factors(&outputs, self.input_factors.as_deref(), true)
    }

    /// Pixel points outside the bounding box map to `NaN` on every world axis.
    pub fn pixel_to_world_values(&self, pixel: &[f64]) -> GwcsResult<Vec<f64>> {
        check_len("pixel values", self.pixel_n_dim(), pixel.len())?;
        if !self.bounds.contains(pixel) {
            return Ok(vec![f64::NAN; self.world_n_dim()]);
        }
        Ok(self.evaluate_forward(pixel))
    }

    /// Uses the analytic inverse when there is one, otherwise solves
    /// numerically. Points that cannot be inverted, or land outside the
    /// bounding box, come back as `NaN`.
    pub fn world_to_pixel_values(&self, world: &[f64]) -> GwcsResult<Vec<f64>> {
        check_len("world values", self.world_n_dim(), world.len())?;
        let n = self.pixel_n_dim();
        if world.iter().any(|w| w.is_nan()) {
            return Ok(vec![f64::NAN; n]);
        }

        let bbox = self.bounding_box();
        let pixel = match &self.backward {
            Some(inverse) => self.evaluate_backward(inverse, world),
            None => {
                debug!("no analytic inverse, solving numerically");
                let seeds = inverse::seeds(bbox.as_ref(), n, self.inverse_config.multi_start);
                inverse::solve(
                    |p: &[f64]| self.evaluate_forward(p),
                    world,
                    &seeds,
                    bbox.as_ref(),
                    &self.inverse_config,
                )
                .point
            }
        };

        match &bbox {
            Some(b) if !b.contains(&pixel) => Ok(vec![f64::NAN; n]),
            _ => Ok(pixel),
        }
    }

    /// `index` is in array order, i.e. reversed pixel order.
    pub fn array_index_to_world_values(&self, index: &[f64]) -> GwcsResult<Vec<f64>> {
        let pixel: Vec<f64> = index.iter().rev().copied().collect();
        self.pixel_to_world_values(&pixel)
    }

    pub fn world_to_array_index_values(&self, world: &[f64]) -> GwcsResult<Vec<f64>> {
        let mut pixel = self.world_to_pixel_values(world)?;
        pixel.reverse();
        Ok(pixel)
    }

    pub fn pixel_to_world_values_many(&self, pixels: &[Vec<f64>]) -> GwcsResult<Vec<Vec<f64>>> {
        pixels
            .iter()
            .map(|p| self.pixel_to_world_values(p))
            .collect()
    }

    pub fn world_to_pixel_values_many(&self, worlds: &[Vec<f64>]) -> GwcsResult<Vec<Vec<f64>>> {
        worlds
            .iter()
            .map(|w| self.world_to_pixel_values(w))
            .collect()
    }

    /// Direct evaluation. Bare numbers are taken in the input frame units;
    /// quantities are converted and must be dimensionally compatible.
    pub fn call(&self, inputs: &[Coordinate], with_units: bool) -> GwcsResult<CallOutput> {
        if with_units {
            return Ok(CallOutput::Objects(self.pixel_to_world(inputs)?));
        }
        let pixel = self.input_frame().coordinate_values(inputs)?;
        let world = self.pixel_to_world_values(&pixel)?;
        Ok(CallOutput::Quantities(with_frame_units(
            world,
            &self.output_frame().unit(),
        )))
    }

    /// World to pixel from numbers, quantities or packed objects.
    ///
    /// Only bare numbers and quantities take the permissive path; anything
    /// else must match the output frame's object classes exactly.
    pub fn invert(&self, world: &[Coordinate], with_units: bool) -> GwcsResult<CallOutput> {
        let numeric = world
            .iter()
            .all(|w| matches!(w, Coordinate::Value(_) | Coordinate::Quantity(_)));
        let values = if numeric {
            self.output_frame().coordinate_values(world)?
        } else {
            self.output_frame().objects_to_values(world)?
        };

        let pixel = self.world_to_pixel_values(&values)?;
        if with_units {
            return Ok(CallOutput::Objects(self.input_frame().coordinates(&pixel)?));
        }
        Ok(CallOutput::Quantities(with_frame_units(
            pixel,
            &self.input_frame().unit(),
        )))
    }

    /// World coordinates of the bounding-box corners.
    ///
    /// In 2D the corners are lower-left, upper-left, upper-right and
    /// lower-right; otherwise every combination of interval ends, first axis
    /// slowest. With `center` the corners are first rounded to whole pixels.
    pub fn footprint(
        &self,
        bounding_box: Option<&BoundingBox>,
        center: bool,
    ) -> GwcsResult<Vec<Vec<f64>>> {
        let bbox = match bounding_box {
            Some(b) => b.clone(),
            None => self.bounding_box().ok_or_else(|| {
                GwcsError::invalid_bounding_box("footprint needs a bounding box")
            })?,
        };
        check_len("bounding_box", self.pixel_n_dim(), bbox.ndim())?;

        let ends = bbox.to_tuples();
        let mut vertices: Vec<Vec<f64>> = if ends.len() == 2 {
            let ((x0, x1), (y0, y1)) = (ends[0], ends[1]);
            vec![vec![x0, y0], vec![x0, y1], vec![x1, y1], vec![x1, y0]]
        } else {
            let n = ends.len();
            (0..(1usize << n))
                .map(|combo| {
                    (0..n)
                        .map(|axis| {
                            let (lo, hi) = ends[axis];
                            if (combo >> (n - 1 - axis)) & 1 == 0 {
                                lo
                            } else {
                                hi
                            }
                        })
                        .collect()
                })
                .collect()
        };
        if center {
            for v in vertices.iter_mut().flat_map(|v| v.iter_mut()) {
                *v = (*v + 0.5).floor();
            }
        }

        Ok(vertices.iter().map(|v| self.evaluate_forward(v)).collect())
    }
}

fn validate_steps(steps: &[Step]) -> GwcsResult<()> {
    let last = steps.len() - 1;
    for (i, pair) in steps.windows(2).enumerate() {
        let (step, next) = (&pair[0], &pair[1]);
        let transform = step.transform.as_ref().ok_or_else(|| {
            GwcsError::invalid_frame(format!(
                "frame '{}' has no outgoing transform",
                step.frame.name()
            ))
        })?;
        check_len(
            &format!("inputs of '{}'", transform.name()),
            step.frame.naxes(),
            transform.n_inputs(),
        )?;
        check_len(
            &format!("outputs of '{}' (step {})", transform.name(), i),
            next.frame.naxes(),
            transform.n_outputs(),
        )?;
    }
    if steps[last].transform.is_some() {
        return Err(GwcsError::invalid_frame(format!(
            "output frame '{}' cannot have a transform",
            steps[last].frame.name()
        )));
    }
    Ok(())
}

fn missing_transform() -> GwcsError {
    GwcsError::invalid_frame("missing transform between frames")
}

fn check_len(context: &str, expected: usize, got: usize) -> GwcsResult<()> {
    if expected != got {
        return Err(GwcsError::dimension_mismatch(context, expected, got));
    }
    Ok(())
}

fn apply_factors(values: &[f64], factors: Option<&[f64]>, invert: bool) -> Vec<f64> {
    match factors {
        Some(factors) => values
            .iter()
            .zip(factors)
            .map(|(v, f)| if invert { v / f } else { v * f })
            .collect(),
        None => values.to_vec(),
    }
}

fn with_frame_units(values: Vec<f64>, units: &[Unit]) -> Vec<Quantity> {
    values
        .into_iter()
        .zip(units)
        .map(|(v, u)| Quantity::new(v, u.clone()))
        .collect()
}
