use thiserror::Error;

pub type QuantityResult<T> = Result<T, QuantityError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    #[error("Cannot convert '{from}' to '{to}': incompatible dimensions")]
    IncompatibleUnits { from: String, to: String },

    #[error("Unknown unit: '{symbol}'")]
    UnknownUnit { symbol: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Cannot transform sky coordinates from {from} to {to}")]
    FrameConversion { from: String, to: String },

    #[error("Time scale mismatch: {left} vs {right}")]
    TimeScaleMismatch { left: String, right: String },
}

impl QuantityError {
    pub fn incompatible_units(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IncompatibleUnits {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn unknown_unit(symbol: impl Into<String>) -> Self {
        Self::UnknownUnit {
            symbol: symbol.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn frame_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::FrameConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn time_scale_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::TimeScaleMismatch {
            left: left.into(),
            right: right.into(),
        }
    }
}
