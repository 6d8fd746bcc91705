//! Transform stages driven by the pipeline.
//!
//! A stage maps `n_inputs` numbers to `n_outputs` numbers. It may expose an
//! analytic inverse, declare which outputs depend on which inputs, and declare
//! the units it expects and returns. Everything else about the model is opaque.
//!
//! Stages combine with [`TransformExt::then`] (serial, `a | b`) and
//! [`TransformExt::and`] (parallel, `a & b`):
//!
//! ```
//! use celestial_gwcs::transform::{Scale, Shift, Transform, TransformExt};
//!
//! let shift = Shift::new(1.0).and(Shift::new(2.0));
//! let scale = Scale::new(5.0).and(Scale::new(10.0));
//! let model = shift.then(scale).unwrap();
//! assert_eq!(model.evaluate(&[1.0, 2.0]), vec![10.0, 40.0]);
//! ```

mod compound;
mod models;
mod sip;
mod tabular;

pub use compound::{Compose, Concatenate};
pub(crate) use compound::unit_factors;
pub use models::{Affine2D, Identity, Linear1D, Mapping, Scale, Shift};
pub use sip::Sip;
pub use tabular::{LookupTable, Tabular1D};

use celestial_quantity::Unit;
use std::fmt;
use std::sync::Arc;

use crate::error::GwcsResult;

pub type SharedTransform = Arc<dyn Transform>;

pub trait Transform: fmt::Debug + Send + Sync {
    fn n_inputs(&self) -> usize;

    fn n_outputs(&self) -> usize;

    /// Evaluates one point. `inputs.len()` equals `n_inputs()`; the result has
    /// `n_outputs()` entries. Points outside the model's domain yield `NaN`.
    fn evaluate(&self, inputs: &[f64]) -> Vec<f64>;

    fn inverse(&self) -> Option<SharedTransform> {
        None
    }

    /// `n_outputs x n_inputs`; entry `(i, j)` is true when output `i` depends
    /// on input `j`.
    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        vec![vec![true; self.n_inputs()]; self.n_outputs()]
    }

    /// Units the inputs must be expressed in, when the stage is unit aware.
    fn input_units(&self) -> Option<Vec<Unit>> {
        None
    }

    /// Units of the outputs, when the stage is unit aware.
    fn return_units(&self) -> Option<Vec<Unit>> {
        None
    }

    fn name(&self) -> &str;
}

impl Transform for Arc<dyn Transform> {
    fn n_inputs(&self) -> usize {
        self.as_ref().n_inputs()
    }

    fn n_outputs(&self) -> usize {
        self.as_ref().n_outputs()
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        self.as_ref().evaluate(inputs)
    }

    fn inverse(&self) -> Option<SharedTransform> {
        self.as_ref().inverse()
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        self.as_ref().separable_matrix()
    }

    fn input_units(&self) -> Option<Vec<Unit>> {
        self.as_ref().input_units()
    }

    fn return_units(&self) -> Option<Vec<Unit>> {
        self.as_ref().return_units()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }
}

pub trait TransformExt: Transform + Sized + 'static {
    /// Serial composition: `self` feeds `next`.
    fn then<T: Transform + 'static>(self, next: T) -> GwcsResult<Compose> {
        Compose::new(self.shared(), next.shared())
    }

    /// Parallel composition: inputs are split between `self` and `other`.
    fn and<T: Transform + 'static>(self, other: T) -> Concatenate {
        Concatenate::new(self.shared(), other.shared())
    }

    fn shared(self) -> SharedTransform {
        Arc::new(self)
    }
}

impl<T: Transform + Sized + 'static> TransformExt for T {}

pub(crate) fn diagonal_matrix(n: usize) -> Vec<Vec<bool>> {
    (0..n).map(|i| (0..n).map(|j| i == j).collect()).collect()
}
