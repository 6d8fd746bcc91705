use celestial_quantity::Unit;

use super::{SharedTransform, Transform};
use crate::error::{GwcsError, GwcsResult};

/// `first | second`: outputs of `first` feed `second`.
///
/// When `first` returns units and `second` declares input units, values are
/// rescaled between the two stages; incompatible dimensions are rejected at
/// construction.
#[derive(Debug, Clone)]
pub struct Compose {
    first: SharedTransform,
    second: SharedTransform,
    factors: Option<Vec<f64>>,
    name: String,
}

impl Compose {
    pub fn new(first: SharedTransform, second: SharedTransform) -> GwcsResult<Self> {
        if first.n_outputs() != second.n_inputs() {
            return Err(GwcsError::dimension_mismatch(
                format!("composing '{}' | '{}'", first.name(), second.name()),
                second.n_inputs(),
                first.n_outputs(),
            ));
        }

        let factors = match (first.return_units(), second.input_units()) {
            (Some(out), Some(inp)) => Some(unit_factors(&out, &inp)?),
            _ => None,
        };

        let name = format!("{} | {}", first.name(), second.name());
        Ok(Self {
            first,
            second,
            factors,
            name,
        })
    }

    pub fn first(&self) -> &SharedTransform {
        &self.first
    }

    pub fn second(&self) -> &SharedTransform {
        &self.second
    }
}

pub(crate) fn unit_factors(from: &[Unit], to: &[Unit]) -> GwcsResult<Vec<f64>> {
    from.iter()
        .zip(to)
        .map(|(f, t)| {
            f.conversion_factor(t).map_err(|_| {
                GwcsError::unit_mismatch(format!("cannot pass '{}' where '{}' is expected", f, t))
            })
        })
        .collect()
}

impl Transform for Compose {
    fn n_inputs(&self) -> usize {
        self.first.n_inputs()
    }

    fn n_outputs(&self) -> usize {
        self.second.n_outputs()
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        let mut mid = self.first.evaluate(inputs);
        if let Some(factors) = &self.factors {
            for (v, f) in mid.iter_mut().zip(factors) {
                *v *= f;
            }
        }
        self.second.evaluate(&mid)
    }

    fn inverse(&self) -> Option<SharedTransform> {
        let first = self.second.inverse()?;
        let second = self.first.inverse()?;
        Compose::new(first, second)
            .ok()
            .map(|c| std::sync::Arc::new(c) as SharedTransform)
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        let a = self.first.separable_matrix();
        let b = self.second.separable_matrix();
        b.iter()
            .map(|row| {
                (0..self.n_inputs())
                    .map(|j| row.iter().enumerate().any(|(k, &dep)| dep && a[k][j]))
                    .collect()
            })
            .collect()
    }

    fn input_units(&self) -> Option<Vec<Unit>> {
        self.first.input_units()
    }

    fn return_units(&self) -> Option<Vec<Unit>> {
        self.second.return_units()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// `left & right`: the first `left.n_inputs()` inputs go to `left`, the rest
/// to `right`; outputs are concatenated.
#[derive(Debug, Clone)]
pub struct Concatenate {
    left: SharedTransform,
    right: SharedTransform,
    name: String,
}

impl Concatenate {
    pub fn new(left: SharedTransform, right: SharedTransform) -> Self {
        let name = format!("{} & {}", left.name(), right.name());
        Self { left, right, name }
    }
}

impl Transform for Concatenate {
    fn n_inputs(&self) -> usize {
        self.left.n_inputs() + self.right.n_inputs()
    }

    fn n_outputs(&self) -> usize {
        self.left.n_outputs() + self.right.n_outputs()
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        let (a, b) = inputs.split_at(self.left.n_inputs());
        let mut out = self.left.evaluate(a);
        out.extend(self.right.evaluate(b));
        out
    }

    fn inverse(&self) -> Option<SharedTransform> {
        let left = self.left.inverse()?;
        let right = self.right.inverse()?;
        Some(std::sync::Arc::new(Concatenate::new(left, right)))
    }

    fn separable_matrix(&self) -> Vec<Vec<bool>> {
        let (ni_left, ni) = (self.left.n_inputs(), self.n_inputs());
        let mut rows = Vec::with_capacity(self.n_outputs());
        for row in self.left.separable_matrix() {
            let mut r = row;
            r.resize(ni, false);
            rows.push(r);
        }
        for row in self.right.separable_matrix() {
            let mut r = vec![false; ni_left];
            r.extend(row);
            rows.push(r);
        }
        rows
    }

    fn input_units(&self) -> Option<Vec<Unit>> {
        let mut units = self.left.input_units()?;
        units.extend(self.right.input_units()?);
        Some(units)
    }

    fn return_units(&self) -> Option<Vec<Unit>> {
        let mut units = self.left.return_units()?;
        units.extend(self.right.return_units()?);
        Some(units)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
