use celestial_quantity::Unit;
use std::fmt;

/// Category of a world axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisType {
    Spatial,
    Spectral,
    Temporal,
    Stokes,
    Pixel,
    Custom(String),
}

impl AxisType {
    pub fn as_str(&self) -> &str {
        match self {
            AxisType::Spatial => "SPATIAL",
            AxisType::Spectral => "SPECTRAL",
            AxisType::Temporal => "TIME",
            AxisType::Stokes => "STOKES",
            AxisType::Pixel => "PIXEL",
            AxisType::Custom(s) => s,
        }
    }
}

impl From<&str> for AxisType {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "SPATIAL" => AxisType::Spatial,
            "SPECTRAL" => AxisType::Spectral,
            "TIME" | "TEMPORAL" => AxisType::Temporal,
            "STOKES" => AxisType::Stokes,
            "PIXEL" => AxisType::Pixel,
            _ => AxisType::Custom(s.to_string()),
        }
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One world axis of a frame.
///
/// `axes_order` is the slot requested by the owning frame; the axis'
/// position in world order is the rank of that value among the frame's
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub name: String,
    pub physical_type: String,
    pub unit: Unit,
    pub axis_type: AxisType,
    pub axes_order: usize,
}
