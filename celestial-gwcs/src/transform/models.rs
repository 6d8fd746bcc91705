use celestial_quantity::Unit;
use std::sync::Arc;

use super::{diagonal_matrix, SharedTransform, Transform};

const DETERMINANT_THRESHOLD: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity {
    n: usize,
}

impl Identity {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Transform for Identity {
    fn n_inputs(&self) -> usize {
        self.n
    }

    fn n_outputs(&self) -> usize {
        self.n
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        inputs.to_vec()
    }

    fn inverse(&self) -> Option<SharedTransform> {
        Some(Arc::new(*self))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(self.n)
    }

    fn name(&self) -> &str {
        "Identity"
    }
}

/// `x + offset`, optionally in a fixed unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    offset: f64,
    unit: Option<Unit>,
}

impl Shift {
    pub fn new(offset: f64) -> Self {
        Self { offset, unit: None }
    }

    pub fn with_unit(offset: f64, unit: Unit) -> Self {
        Self {
            offset,
            unit: Some(unit),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Transform for Shift {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        vec![inputs[0] + self.offset]
    }

    fn inverse(&self) -> Option<SharedTransform> {
        Some(Arc::new(Self {
            offset: -self.offset,
            unit: self.unit.clone(),
        }))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(1)
    }

    fn input_units(&self) -> Option<Vec<Unit>> {
        self.unit.clone().map(|u| vec![u])
    }

    fn return_units(&self) -> Option<Vec<Unit>> {
        self.unit.clone().map(|u| vec![u])
    }

    fn name(&self) -> &str {
        "Shift"
    }
}

/// `x * factor`. With units, the factor carries `output / input`, e.g. a
/// plate scale in deg per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    factor: f64,
    units: Option<(Unit, Unit)>,
}

impl Scale {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            units: None,
        }
    }

    pub fn with_units(factor: f64, input: Unit, output: Unit) -> Self {
        Self {
            factor,
            units: Some((input, output)),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Transform for Scale {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        vec![inputs[0] * self.factor]
    }

    fn inverse(&self) -> Option<SharedTransform> {
        if self.factor == 0.0 {
            return None;
        }
        Some(Arc::new(Self {
            factor: 1.0 / self.factor,
            units: self.units.clone().map(|(i, o)| (o, i)),
        }))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(1)
    }

    fn input_units(&self) -> Option<Vec<Unit>> {
        self.units.as_ref().map(|(i, _)| vec![i.clone()])
    }

    fn return_units(&self) -> Option<Vec<Unit>> {
        self.units.as_ref().map(|(_, o)| vec![o.clone()])
    }

    fn name(&self) -> &str {
        "Scale"
    }
}

/// `slope * x + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear1D {
    slope: f64,
    intercept: f64,
    units: Option<(Unit, Unit)>,
}

impl Linear1D {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self {
            slope,
            intercept,
            units: None,
        }
    }

    /// `slope` is in `output / input`, `intercept` in `output`.
    pub fn with_units(slope: f64, intercept: f64, input: Unit, output: Unit) -> Self {
        Self {
            slope,
            intercept,
            units: Some((input, output)),
        }
    }
}

impl Transform for Linear1D {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        vec![self.slope * inputs[0] + self.intercept]
    }

    fn inverse(&self) -> Option<SharedTransform> {
        if self.slope == 0.0 {
            return None;
        }
        Some(Arc::new(Self {
            slope: 1.0 / self.slope,
            intercept: -self.intercept / self.slope,
            units: self.units.clone().map(|(i, o)| (o, i)),
        }))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(1)
    }

    fn input_units(&self) -> Option<Vec<Unit>> {
        self.units.as_ref().map(|(i, _)| vec![i.clone()])
    }

    fn return_units(&self) -> Option<Vec<Unit>> {
        self.units.as_ref().map(|(_, o)| vec![o.clone()])
    }

    fn name(&self) -> &str {
        "Linear1D"
    }
}

/// `M * (x, y) + t`. Both outputs are treated as depending on both inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    matrix: [[f64; 2]; 2],
    translation: [f64; 2],
}

impl Affine2D {
    pub fn new(matrix: [[f64; 2]; 2], translation: [f64; 2]) -> Self {
        Self {
            matrix,
            translation,
        }
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.matrix[0][0] * self.matrix[1][1] - self.matrix[0][1] * self.matrix[1][0]
    }
}

fn compute_inverse(m: [[f64; 2]; 2], det: f64) -> [[f64; 2]; 2] {
    let inv_det = 1.0 / det;
    [
        [m[1][1] * inv_det, -m[0][1] * inv_det],
        [-m[1][0] * inv_det, m[0][0] * inv_det],
    ]
}

impl Transform for Affine2D {
    fn n_inputs(&self) -> usize {
        2
    }

    fn n_outputs(&self) -> usize {
        2
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        let m = &self.matrix;
        let (x, y) = (inputs[0], inputs[1]);
        vec![
            m[0][0] * x + m[0][1] * y + self.translation[0],
            m[1][0] * x + m[1][1] * y + self.translation[1],
        ]
    }

    fn inverse(&self) -> Option<SharedTransform> {
        let det = self.determinant();
        if det.abs() < DETERMINANT_THRESHOLD {
            return None;
        }
        let inv = compute_inverse(self.matrix, det);
        let t = self.translation;
        let translation = [
            -(inv[0][0] * t[0] + inv[0][1] * t[1]),
            -(inv[1][0] * t[0] + inv[1][1] * t[1]),
        ];
        Some(Arc::new(Affine2D::new(inv, translation)))
    }

    fn name(&self) -> &str {
        "Affine2D"
    }
}

/// Routes inputs to outputs: output `i` is input `mapping[i]`. Inputs may be
/// duplicated or dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    mapping: Vec<usize>,
    n_inputs: usize,
}

impl Mapping {
    pub fn new(mapping: Vec<usize>, n_inputs: usize) -> Self {
        Self { mapping, n_inputs }
    }

    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }
}

impl Transform for Mapping {
    fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    fn n_outputs(&self) -> usize {
        self.mapping.len()
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        self.mapping
            .iter()
            .map(|&i| inputs.get(i).copied().unwrap_or(f64::NAN))
            .collect()
    }

    /// Exists only when every input reaches some output; duplicated inputs are
    /// read back from their first occurrence.
    fn inverse(&self) -> Option<SharedTransform> {
        let mapping = (0..self.n_inputs)
            .map(|j| self.mapping.iter().position(|&i| i == j))
            .collect::<Option<Vec<_>>>()?;
        Some(Arc::new(Mapping::new(mapping, self.mapping.len())))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        self.mapping
            .iter()
            .map(|&i| (0..self.n_inputs).map(|j| i == j).collect())
            .collect()
    }

    fn name(&self) -> &str {
        "Mapping"
    }
}
