use std::collections::BTreeMap;

use super::Transform;

/// SIP-style polynomial distortion about a reference pixel.
///
/// `(x, y) -> (x + A(u, v), y + B(u, v))` with `u = x - crpix1`,
/// `v = y - crpix2`. There is no closed-form inverse, so a pipeline holding
/// this stage is inverted numerically.
#[derive(Debug, Clone)]
pub struct Sip {
    crpix: [f64; 2],
    a_order: u32,
    b_order: u32,
    a_coeffs: BTreeMap<(u32, u32), f64>,
    b_coeffs: BTreeMap<(u32, u32), f64>,
}

impl Sip {
    pub fn new(crpix: [f64; 2], a_order: u32, b_order: u32) -> Self {
        Self {
            crpix,
            a_order,
            b_order,
            a_coeffs: BTreeMap::new(),
            b_coeffs: BTreeMap::new(),
        }
    }

    /// Coefficients with `p + q` above the order, or zero, are ignored.
    pub fn set_a(&mut self, p: u32, q: u32, value: f64) {
        if p + q <= self.a_order && value != 0.0 {
            self.a_coeffs.insert((p, q), value);
        }
    }

    pub fn set_b(&mut self, p: u32, q: u32, value: f64) {
        if p + q <= self.b_order && value != 0.0 {
            self.b_coeffs.insert((p, q), value);
        }
    }

    pub fn with_a(mut self, p: u32, q: u32, value: f64) -> Self {
        self.set_a(p, q, value);
        self
    }

    pub fn with_b(mut self, p: u32, q: u32, value: f64) -> Self {
        self.set_b(p, q, value);
        self
    }

    fn eval_poly(coeffs: &BTreeMap<(u32, u32), f64>, u: f64, v: f64) -> f64 {
        coeffs
            .iter()
            .map(|(&(p, q), &coeff)| coeff * u.powi(p as i32) * v.powi(q as i32))
            .sum()
    }
}

impl Transform for Sip {
    fn n_inputs(&self) -> usize {
        2
    }

    fn n_outputs(&self) -> usize {
        2
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        let (x, y) = (inputs[0], inputs[1]);
        let u = x - self.crpix[0];
        let v = y - self.crpix[1];
        vec![
            x + Self::eval_poly(&self.a_coeffs, u, v),
            y + Self::eval_poly(&self.b_coeffs, u, v),
        ]
    }

    fn name(&self) -> &str {
        "Sip"
    }
}
