use crate::error::{GwcsError, GwcsResult};

/// Closed interval `[lower, upper]` on one pixel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> GwcsResult<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(GwcsError::invalid_bounding_box(format!(
                "interval ({}, {}) has a non-finite end",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(GwcsError::invalid_bounding_box(format!(
                "interval ({}, {}) has lower > upper",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Inclusive; `NaN` is never inside.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    #[inline]
    pub fn center(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    #[inline]
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.lower, self.upper)
    }
}

/// Valid pixel region, one interval per pixel axis in pixel (x, y, ...) order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    intervals: Vec<Interval>,
}

impl BoundingBox {
    pub fn new(intervals: impl IntoIterator<Item = (f64, f64)>) -> GwcsResult<Self> {
        let intervals = intervals
            .into_iter()
            .map(|(lo, hi)| Interval::new(lo, hi))
            .collect::<GwcsResult<Vec<_>>>()?;
        if intervals.is_empty() {
            return Err(GwcsError::invalid_bounding_box("no intervals given"));
        }
        Ok(Self { intervals })
    }

    /// Intervals given in array (slowest axis first) order.
    pub fn from_array_order(intervals: impl IntoIterator<Item = (f64, f64)>) -> GwcsResult<Self> {
        let mut intervals: Vec<(f64, f64)> = intervals.into_iter().collect();
        intervals.reverse();
        Self::new(intervals)
    }

    /// `(-0.5, n - 0.5)` per axis, i.e. whole pixels centred on integers.
    pub fn from_shape(pixel_shape: &[usize]) -> GwcsResult<Self> {
        if pixel_shape.contains(&0) {
            return Err(GwcsError::shape_mismatch(format!(
                "zero-length axis in {:?}",
                pixel_shape
            )));
        }
        Self::new(pixel_shape.iter().map(|&n| (-0.5, n as f64 - 0.5)))
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.ndim()
            && self
                .intervals
                .iter()
                .zip(point)
                .all(|(interval, &x)| interval.contains(x))
    }

    pub fn center(&self) -> Vec<f64> {
        self.intervals.iter().map(Interval::center).collect()
    }

    pub fn clip(&self, point: &[f64]) -> Vec<f64> {
        self.intervals
            .iter()
            .zip(point)
            .map(|(interval, &x)| interval.clip(x))
            .collect()
    }

    pub fn to_tuples(&self) -> Vec<(f64, f64)> {
        self.intervals
            .iter()
            .map(|i| (i.lower(), i.upper()))
            .collect()
    }
}

/// Bounding box and shape state of a pipeline's pixel space.
///
/// An explicit bounding box wins; otherwise one is derived from the pixel
/// shape when that is known. Setting either never changes the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pixel_n_dim: usize,
    bounding_box: Option<BoundingBox>,
    pixel_shape: Option<Vec<usize>>,
}

impl Bounds {
    pub fn new(pixel_n_dim: usize) -> Self {
        Self {
            pixel_n_dim,
            bounding_box: None,
            pixel_shape: None,
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match (&self.bounding_box, &self.pixel_shape) {
            (Some(bbox), _) => Some(bbox.clone()),
            (None, Some(shape)) => BoundingBox::from_shape(shape).ok(),
            (None, None) => None,
        }
    }

    pub fn set_bounding_box(&mut self, bounding_box: Option<BoundingBox>) -> GwcsResult<()> {
        if let Some(bbox) = &bounding_box {
            if bbox.ndim() != self.pixel_n_dim {
                return Err(GwcsError::dimension_mismatch(
                    "bounding_box",
                    self.pixel_n_dim,
                    bbox.ndim(),
                ));
            }
        }
        self.bounding_box = bounding_box;
        Ok(())
    }

    pub fn pixel_shape(&self) -> Option<&[usize]> {
        self.pixel_shape.as_deref()
    }

    pub fn set_pixel_shape(&mut self, pixel_shape: Option<Vec<usize>>) -> GwcsResult<()> {
        if let Some(shape) = &pixel_shape {
            if shape.len() != self.pixel_n_dim {
                return Err(GwcsError::dimension_mismatch(
                    "pixel_shape",
                    self.pixel_n_dim,
                    shape.len(),
                ));
            }
            if shape.contains(&0) {
                return Err(GwcsError::shape_mismatch(format!(
                    "zero-length axis in {:?}",
                    shape
                )));
            }
        }
        self.pixel_shape = pixel_shape;
        Ok(())
    }

    /// The pixel shape reversed.
    pub fn array_shape(&self) -> Option<Vec<usize>> {
        self.pixel_shape
            .as_ref()
            .map(|s| s.iter().rev().copied().collect())
    }

    pub fn set_array_shape(&mut self, array_shape: Option<Vec<usize>>) -> GwcsResult<()> {
        self.set_pixel_shape(array_shape.map(|mut s| {
            s.reverse();
            s
        }))
    }

    pub fn pixel_bounds(&self) -> Option<Vec<(f64, f64)>> {
        self.bounding_box().map(|b| b.to_tuples())
    }

    /// True when no bounding box is known.
    pub fn contains(&self, point: &[f64]) -> bool {
        self.bounding_box().map_or(true, |b| b.contains(point))
    }

    pub fn center(&self) -> Option<Vec<f64>> {
        self.bounding_box().map(|b| b.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_validation() {
        assert!(Interval::new(0.0, 1.0).is_ok());
        assert!(Interval::new(1.0, 0.0).unwrap_err().is_value_error());
        assert!(Interval::new(f64::NAN, 1.0).is_err());
        assert!(Interval::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_contains_inclusive() {
        let bbox = BoundingBox::new([(-0.5, 9.5), (-0.5, 4.5)]).unwrap();
        assert!(bbox.contains(&[-0.5, 4.5]));
        assert!(!bbox.contains(&[9.6, 0.0]));
        assert!(!bbox.contains(&[f64::NAN, 0.0]));
        assert!(!bbox.contains(&[0.0]));
    }

    #[test]
    fn test_from_array_order() {
        let bbox = BoundingBox::from_array_order([(0.0, 1.0), (2.0, 3.0)]).unwrap();
        assert_eq!(bbox.to_tuples(), vec![(2.0, 3.0), (0.0, 1.0)]);
    }

    #[test]
    fn test_shape_derives_bbox() {
        let mut bounds = Bounds::new(2);
        assert!(bounds.bounding_box().is_none());
        bounds.set_pixel_shape(Some(vec![10, 20])).unwrap();
        assert_eq!(bounds.array_shape(), Some(vec![20, 10]));
        assert_eq!(
            bounds.pixel_bounds(),
            Some(vec![(-0.5, 9.5), (-0.5, 19.5)])
        );
    }

    #[test]
    fn test_explicit_bbox_wins() {
        let mut bounds = Bounds::new(2);
        bounds.set_array_shape(Some(vec![2040, 1020])).unwrap();
        bounds
            .set_bounding_box(Some(BoundingBox::new([(0.0, 5.0), (0.0, 6.0)]).unwrap()))
            .unwrap();
        assert_eq!(bounds.pixel_shape(), Some(&[1020, 2040][..]));
        assert_eq!(bounds.pixel_bounds(), Some(vec![(0.0, 5.0), (0.0, 6.0)]));
        assert_eq!(bounds.center(), Some(vec![2.5, 3.0]));
    }

    #[test]
    fn test_wrong_dimensionality() {
        let mut bounds = Bounds::new(2);
        let err = bounds.set_pixel_shape(Some(vec![10])).unwrap_err();
        assert!(err.is_value_error());
        let bbox = BoundingBox::new([(0.0, 1.0)]).unwrap();
        assert!(bounds.set_bounding_box(Some(bbox)).is_err());
        assert!(bounds.set_array_shape(Some(vec![0, 3])).is_err());
        assert!(bounds.pixel_shape().is_none());
    }

    #[test]
    fn test_clip() {
        let bbox = BoundingBox::new([(0.0, 1.0), (0.0, 1.0)]).unwrap();
        assert_eq!(bbox.clip(&[-3.0, 0.5]), vec![0.0, 0.5]);
    }
}
