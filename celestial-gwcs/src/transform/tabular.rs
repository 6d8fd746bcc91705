use std::sync::Arc;

use super::{diagonal_matrix, SharedTransform, Transform};
use crate::error::{GwcsError, GwcsResult};

/// Categorical table indexed by the rounded input.
///
/// `x` selects `table[floor(x + 0.5)]`; anything outside the table, or a
/// `NaN` input, yields `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    table: Vec<f64>,
}

impl LookupTable {
    pub fn new(table: Vec<f64>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &[f64] {
        &self.table
    }

    fn lookup(&self, x: f64) -> f64 {
        let index = (x + 0.5).floor();
        if !index.is_finite() || index < 0.0 || index >= self.table.len() as f64 {
            return f64::NAN;
        }
        self.table[index as usize]
    }
}

impl Transform for LookupTable {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        vec![self.lookup(inputs[0])]
    }

    fn inverse(&self) -> Option<SharedTransform> {
        Some(Arc::new(ReverseLookup {
            table: self.table.clone(),
        }))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(1)
    }

    fn name(&self) -> &str {
        "LookupTable"
    }
}

/// Index of the first table entry equal to the input, else `NaN`.
#[derive(Debug, Clone, PartialEq)]
struct ReverseLookup {
    table: Vec<f64>,
}

impl Transform for ReverseLookup {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        let target = inputs[0];
        let index = self
            .table
            .iter()
            .position(|&v| v == target)
            .map_or(f64::NAN, |i| i as f64);
        vec![index]
    }

    fn inverse(&self) -> Option<SharedTransform> {
        Some(Arc::new(LookupTable::new(self.table.clone())))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(1)
    }

    fn name(&self) -> &str {
        "ReverseLookup"
    }
}

/// Piecewise-linear interpolation through `(points[i], lookup[i])`.
///
/// `points` must be strictly increasing. Inputs outside
/// `[points[0], points[n-1]]` yield `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabular1D {
    points: Vec<f64>,
    lookup: Vec<f64>,
}

impl Tabular1D {
    pub fn new(points: Vec<f64>, lookup: Vec<f64>) -> GwcsResult<Self> {
        if points.len() != lookup.len() {
            return Err(GwcsError::dimension_mismatch(
                "Tabular1D lookup table",
                points.len(),
                lookup.len(),
            ));
        }
        if points.len() < 2 {
            return Err(GwcsError::invalid_model(
                "Tabular1D needs at least two points",
            ));
        }
        if !is_strictly_increasing(&points) {
            return Err(GwcsError::invalid_model(
                "Tabular1D points must be strictly increasing",
            ));
        }
        Ok(Self { points, lookup })
    }

    fn interpolate(&self, x: f64) -> f64 {
        let n = self.points.len();
        if x.is_nan() || x < self.points[0] || x > self.points[n - 1] {
            return f64::NAN;
        }
        let upper = self.points.partition_point(|&p| p < x).clamp(1, n - 1);
        let lower = upper - 1;
        let (x0, x1) = (self.points[lower], self.points[upper]);
        let (y0, y1) = (self.lookup[lower], self.lookup[upper]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

impl Transform for Tabular1D {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        vec![self.interpolate(inputs[0])]
    }

    /// Exists when the lookup values are strictly monotonic.
    fn inverse(&self) -> Option<SharedTransform> {
        if is_strictly_increasing(&self.lookup) {
            return Tabular1D::new(self.lookup.clone(), self.points.clone())
                .ok()
                .map(|t| Arc::new(t) as SharedTransform);
        }
        let mut lookup = self.lookup.clone();
        let mut points = self.points.clone();
        lookup.reverse();
        points.reverse();
        if is_strictly_increasing(&lookup) {
            return Tabular1D::new(lookup, points)
                .ok()
                .map(|t| Arc::new(t) as SharedTransform);
        }
        None
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        diagonal_matrix(1)
    }

    fn name(&self) -> &str {
        "Tabular1D"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stokes_lookup() {
        let t = LookupTable::new(vec![1.0, 2.0, 3.0, 4.0]);
        let out: Vec<f64> = [0.0, 1.0, 2.0, 3.0]
            .iter()
            .map(|&x| t.evaluate(&[x])[0])
            .collect();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);

        assert!(t.evaluate(&[-1.0])[0].is_nan());
        assert!(t.evaluate(&[4.0])[0].is_nan());
        assert!(t.evaluate(&[f64::NAN])[0].is_nan());
        // rounds to nearest index
        assert_eq!(t.evaluate(&[1.4])[0], 2.0);
        assert_eq!(t.evaluate(&[-0.5])[0], 1.0);
    }

    #[test]
    fn test_reverse_lookup() {
        let t = LookupTable::new(vec![1.0, 2.0, 3.0, 4.0]);
        let inv = t.inverse().unwrap();
        assert_eq!(inv.evaluate(&[3.0]), vec![2.0]);
        assert!(inv.evaluate(&[7.0])[0].is_nan());
        assert!(inv.evaluate(&[f64::NAN])[0].is_nan());
    }

    #[test]
    fn test_tabular_interpolation() {
        let t = Tabular1D::new(vec![0.0, 1.0, 2.0], vec![10.0, 20.0, 40.0]).unwrap();
        assert_eq!(t.evaluate(&[0.5]), vec![15.0]);
        assert_eq!(t.evaluate(&[1.5]), vec![30.0]);
        assert_eq!(t.evaluate(&[2.0]), vec![40.0]);
        assert_eq!(t.evaluate(&[0.0]), vec![10.0]);
        assert!(t.evaluate(&[2.1])[0].is_nan());
        assert!(t.evaluate(&[-0.1])[0].is_nan());
    }

    #[test]
    fn test_tabular_inverse() {
        let t = Tabular1D::new(vec![0.0, 1.0, 2.0], vec![40.0, 20.0, 10.0]).unwrap();
        let inv = t.inverse().unwrap();
        assert_eq!(inv.evaluate(&[30.0]), vec![0.5]);

        let bumpy = Tabular1D::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 2.0]).unwrap();
        assert!(bumpy.inverse().is_none());
    }

    #[test]
    fn test_tabular_validation() {
        assert!(Tabular1D::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(Tabular1D::new(vec![1.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(Tabular1D::new(vec![0.0], vec![1.0]).is_err());
    }
}
