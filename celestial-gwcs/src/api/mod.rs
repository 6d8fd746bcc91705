//! The shared WCS interface: a numeric low-level layer and an object-level
//! high-level layer built on top of it.

mod high_level;
mod low_level;

pub use high_level::HighLevelWcs;
pub use low_level::LowLevelWcs;
