//! Units, quantities and the domain objects a world coordinate system packs
//! its axis values into: sky positions, instants, spectral and Stokes
//! coordinates.

pub mod angle;
pub mod constants;
pub mod error;
pub mod quantity;
pub mod sky;
pub mod spectral;
pub mod stokes;
pub mod time;
pub mod unit;

pub use angle::Angle;
pub use error::{QuantityError, QuantityResult};
pub use quantity::Quantity;
pub use sky::{SkyCoord, SkyFrame};
pub use spectral::SpectralCoord;
pub use stokes::{StokesCoord, INVALID_STOKES_SYMBOL};
pub use time::{JulianDate, Time, TimeScale};
pub use unit::{Dimension, Unit};
