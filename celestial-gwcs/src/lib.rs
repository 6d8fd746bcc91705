//! Generalized world coordinate systems.
//!
//! A [`Wcs`] is a pipeline of coordinate [`Frame`]s joined by
//! [`transform`] stages. It maps pixel positions to world coordinates and
//! back, either as raw numbers ([`LowLevelWcs`]) or as domain objects such
//! as sky positions, instants and spectral coordinates ([`HighLevelWcs`]).
//!
//! ```
//! use celestial_gwcs::transform::{Shift, TransformExt};
//! use celestial_gwcs::{Frame, LowLevelWcs, Wcs};
//! use celestial_quantity::SkyFrame;
//!
//! let wcs = Wcs::new(
//!     Shift::new(1.0).and(Shift::new(2.0)).shared(),
//!     Frame::detector("detector", 2).build().unwrap(),
//!     Frame::celestial(SkyFrame::Icrs).build().unwrap(),
//! )
//! .unwrap();
//! assert_eq!(wcs.pixel_to_world_values(&[1.0, 2.0]).unwrap(), vec![2.0, 4.0]);
//! assert_eq!(wcs.world_axis_physical_types(), vec!["pos.eq.ra", "pos.eq.dec"]);
//! ```

pub mod api;
pub mod bounds;
pub mod coordinate;
pub mod error;
pub mod frame;
pub mod inverse;
pub mod transform;
pub mod wcs;

pub use api::{HighLevelWcs, LowLevelWcs};
pub use bounds::{BoundingBox, Bounds, Interval};
pub use coordinate::{Coordinate, HighLevelObjects};
pub use error::{GwcsError, GwcsResult};
pub use frame::{
    AxisSpec, AxisType, Frame, FrameBuilder, FrameKind, Member, ObjectClass, ObjectClasses,
    ObjectComponent,
};
pub use inverse::InverseConfig;
pub use transform::{SharedTransform, Transform, TransformExt};
pub use wcs::{CallOutput, Wcs};
