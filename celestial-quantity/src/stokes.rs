use std::fmt;

const STOKES_SYMBOLS: [(i32, &str); 12] = [
    (1, "I"),
    (2, "Q"),
    (3, "U"),
    (4, "V"),
    (-1, "RR"),
    (-2, "LL"),
    (-3, "RL"),
    (-4, "LR"),
    (-5, "XX"),
    (-6, "YY"),
    (-7, "XY"),
    (-8, "YX"),
];

/// Marker for a value that is not a known polarization state.
pub const INVALID_STOKES_SYMBOL: &str = "?";

/// A polarization state identified by its FITS Stokes code.
///
/// The value is kept as a float so that `NaN` can flow through as the
/// undefined state; its symbol is then [`INVALID_STOKES_SYMBOL`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StokesCoord(f64);

impl StokesCoord {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        STOKES_SYMBOLS
            .iter()
            .find(|(_, s)| *s == symbol)
            .map(|(code, _)| Self(*code as f64))
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.symbol() != INVALID_STOKES_SYMBOL
    }

    pub fn symbol(&self) -> &'static str {
        if !self.0.is_finite() {
            return INVALID_STOKES_SYMBOL;
        }
        let code = self.0.round();
        if (code - self.0).abs() > 1e-9 {
            return INVALID_STOKES_SYMBOL;
        }
        STOKES_SYMBOLS
            .iter()
            .find(|(c, _)| *c as f64 == code)
            .map(|(_, s)| *s)
            .unwrap_or(INVALID_STOKES_SYMBOL)
    }
}

impl fmt::Display for StokesCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
