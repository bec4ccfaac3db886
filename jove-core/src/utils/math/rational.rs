//! Rational payloads carried on power and calibration topics.
//!
//! Ratios travel as a numerator/denominator pair of integers (`30/100` for
//! `0.30`). Any denominator is accepted; the value is only resolved to a float
//! through [`Rational::ratio`].
//!
//! # Example
//! ```rust
//! use jove_core::utils::math::rational::Rational;
//! let calibration: Rational = "30/100".parse().unwrap();
//! assert_eq!(calibration.ratio(), 0.3);
//! ```

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A numerator/denominator pair.
///
/// Equality is structural: `1/2` and `2/4` are different payloads even though
/// they resolve to the same ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

impl Rational {
    pub const fn new(
        num: i64,
        den: i64,
    ) -> Self {
        Self { num, den }
    }

    /// Resolve the pair to `num / den`.
    ///
    /// A zero denominator is not rejected and yields an infinity or NaN.
    pub fn ratio(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

impl fmt::Display for Rational {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Errors produced when parsing a `num/den` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRationalError {
    MissingSlash,
    InvalidNumerator,
    InvalidDenominator,
}

impl fmt::Display for ParseRationalError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ParseRationalError::MissingSlash => f.write_str("expected `num/den`"),
            ParseRationalError::InvalidNumerator => f.write_str("invalid numerator"),
            ParseRationalError::InvalidDenominator => f.write_str("invalid denominator"),
        }
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s.split_once('/').ok_or(ParseRationalError::MissingSlash)?;
        let num = num
            .trim()
            .parse()
            .map_err(|_| ParseRationalError::InvalidNumerator)?;
        let den = den
            .trim()
            .parse()
            .map_err(|_| ParseRationalError::InvalidDenominator)?;
        Ok(Self { num, den })
    }
}
