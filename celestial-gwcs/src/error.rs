use celestial_quantity::QuantityError;
use thiserror::Error;

pub type GwcsResult<T> = Result<T, GwcsError>;

/// Errors raised by frames, bounds and the pipeline.
///
/// Variants fall in two classes. Value errors mean a well-typed input carried
/// an unacceptable value (wrong unit, malformed interval, wrong length); type
/// errors mean the input was the wrong kind of object altogether. Numerical
/// non-convergence is never an error: it shows up as `NaN` in the output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GwcsError {
    #[error("Units are inconsistent: {message}")]
    UnitMismatch { message: String },

    #[error("Invalid bounding box: {message}")]
    InvalidBoundingBox { message: String },

    #[error("Invalid shape: {message}")]
    ShapeMismatch { message: String },

    #[error("{context}: expected {expected} values, got {got}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Frame '{name}' is not in the pipeline")]
    UnknownFrame { name: String },

    #[error("Invalid model parameters: {message}")]
    InvalidModel { message: String },

    #[error("Invalid types were passed, got ({got}) expected ({expected})")]
    TypeMismatch { expected: String, got: String },

    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

impl GwcsError {
    pub fn unit_mismatch(message: impl Into<String>) -> Self {
        Self::UnitMismatch {
            message: message.into(),
        }
    }

    pub fn invalid_bounding_box(message: impl Into<String>) -> Self {
        Self::InvalidBoundingBox {
            message: message.into(),
        }
    }

    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }

    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    pub fn unknown_frame(name: impl Into<String>) -> Self {
        Self::UnknownFrame { name: name.into() }
    }

    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::InvalidModel {
            message: message.into(),
        }
    }

    /// Builds the message from the two type-name lists.
    pub fn type_mismatch<E, G>(expected: E, got: G) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        Self::TypeMismatch {
            expected: join(expected),
            got: join(got),
        }
    }

    pub fn is_value_error(&self) -> bool {
        match self {
            Self::UnitMismatch { .. }
            | Self::InvalidBoundingBox { .. }
            | Self::ShapeMismatch { .. }
            | Self::DimensionMismatch { .. }
            | Self::InvalidFrame { .. }
            | Self::UnknownFrame { .. }
            | Self::InvalidModel { .. } => true,
            Self::Quantity(err) => !matches!(err, QuantityError::FrameConversion { .. }),
            Self::TypeMismatch { .. } => false,
        }
    }

    pub fn is_type_error(&self) -> bool {
        match self {
            Self::TypeMismatch { .. } => true,
            Self::Quantity(err) => matches!(err, QuantityError::FrameConversion { .. }),
            _ => false,
        }
    }
}

fn join<I>(names: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
