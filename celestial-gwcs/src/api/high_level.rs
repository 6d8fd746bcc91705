use crate::coordinate::{Coordinate, HighLevelObjects};
use crate::error::GwcsResult;
use crate::wcs::Wcs;

use super::LowLevelWcs;

/// Object-level pixel <-> world interface.
pub trait HighLevelWcs {
    type LowLevel: LowLevelWcs;

    fn low_level_wcs(&self) -> &Self::LowLevel;

    /// Pixel arguments may be numbers, quantities or objects of the input
    /// frame; the result is packed by the output frame.
    fn pixel_to_world(&self, pixel: &[Coordinate]) -> GwcsResult<HighLevelObjects>;

    /// One object per world group, of exactly the declared class.
    fn world_to_pixel(&self, world: &[Coordinate]) -> GwcsResult<Vec<f64>>;

    fn array_index_to_world(&self, index: &[Coordinate]) -> GwcsResult<HighLevelObjects> {
        let pixel: Vec<Coordinate> = index.iter().rev().cloned().collect();
        self.pixel_to_world(&pixel)
    }

    fn world_to_array_index(&self, world: &[Coordinate]) -> GwcsResult<Vec<f64>> {
        let mut pixel = self.world_to_pixel(world)?;
        pixel.reverse();
        Ok(pixel)
    }
}

impl HighLevelWcs for Wcs {
    type LowLevel = Wcs;

    fn low_level_wcs(&self) -> &Wcs {
        self
    }

    fn pixel_to_world(&self, pixel: &[Coordinate]) -> GwcsResult<HighLevelObjects> {
        let values = self.input_frame().coordinate_values(pixel)?;
        let world = Wcs::pixel_to_world_values(self, &values)?;
        self.output_frame().coordinates(&world)
    }

    fn world_to_pixel(&self, world: &[Coordinate]) -> GwcsResult<Vec<f64>> {
        let values = self.output_frame().objects_to_values(world)?;
        Wcs::world_to_pixel_values(self, &values)
    }
}
