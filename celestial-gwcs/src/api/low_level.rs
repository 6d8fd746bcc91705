use celestial_quantity::Unit;

use crate::bounds::BoundingBox;
use crate::error::GwcsResult;
use crate::frame::{ObjectClasses, ObjectComponent};
use crate::wcs::Wcs;

/// Numeric pixel <-> world interface.
///
/// Pixel values are in pixel order (x first); array indices are the same
/// values reversed.
pub trait LowLevelWcs {
    fn pixel_n_dim(&self) -> usize;

    fn world_n_dim(&self) -> usize;

    fn world_axis_physical_types(&self) -> Vec<String>;

    fn world_axis_units(&self) -> Vec<Unit>;

    fn world_axis_names(&self) -> Vec<String>;

    fn pixel_axis_names(&self) -> Vec<String>;

    fn axis_correlation_matrix(&self) -> Vec<Vec<bool>>;

    fn pixel_to_world_values(&self, pixel: &[f64]) -> GwcsResult<Vec<f64>>;

    fn world_to_pixel_values(&self, world: &[f64]) -> GwcsResult<Vec<f64>>;

    fn array_index_to_world_values(&self, index: &[f64]) -> GwcsResult<Vec<f64>> {
        let pixel: Vec<f64> = index.iter().rev().copied().collect();
        self.pixel_to_world_values(&pixel)
    }

    fn world_to_array_index_values(&self, world: &[f64]) -> GwcsResult<Vec<f64>> {
        let mut pixel = self.world_to_pixel_values(world)?;
        pixel.reverse();
        Ok(pixel)
    }

    fn world_axis_object_components(&self) -> &[ObjectComponent];

    fn world_axis_object_classes(&self) -> &ObjectClasses;

    fn bounding_box(&self) -> Option<BoundingBox>;

    fn pixel_shape(&self) -> Option<Vec<usize>>;

    fn array_shape(&self) -> Option<Vec<usize>> {
        self.pixel_shape().map(|mut s| {
            s.reverse();
            s
        })
    }

    fn pixel_bounds(&self) -> Option<Vec<(f64, f64)>> {
        self.bounding_box().map(|b| b.to_tuples())
    }

    /// Object classes are plain descriptors here, never serialized forms.
    fn serialized_classes(&self) -> bool {
        false
    }
}

impl LowLevelWcs for Wcs {
    fn pixel_n_dim(&self) -> usize {
        Wcs::pixel_n_dim(self)
    }

    fn world_n_dim(&self) -> usize {
        Wcs::world_n_dim(self)
    }

    fn world_axis_physical_types(&self) -> Vec<String> {
        self.output_frame().axis_physical_types()
    }

    fn world_axis_units(&self) -> Vec<Unit> {
        self.output_frame().unit()
    }

    fn world_axis_names(&self) -> Vec<String> {
        self.output_frame().axes_names()
    }

    fn pixel_axis_names(&self) -> Vec<String> {
        self.input_frame().axes_names()
    }

    fn axis_correlation_matrix(&self) -> Vec<Vec<bool>> {
        Wcs::axis_correlation_matrix(self)
    }

    fn pixel_to_world_values(&self, pixel: &[f64]) -> GwcsResult<Vec<f64>> {
        Wcs::pixel_to_world_values(self, pixel)
    }

    fn world_to_pixel_values(&self, world: &[f64]) -> GwcsResult<Vec<f64>> {
        Wcs::world_to_pixel_values(self, world)
    }

    fn world_axis_object_components(&self) -> &[ObjectComponent] {
        self.output_frame().world_axis_object_components()
    }

    fn world_axis_object_classes(&self) -> &ObjectClasses {
        self.output_frame().world_axis_object_classes()
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Wcs::bounding_box(self)
    }

    fn pixel_shape(&self) -> Option<Vec<usize>> {
        Wcs::pixel_shape(self)
    }
}
