use crate::error::RangeError;
use std::fmt;

/// Smallest lower bound a range may be configured with.
pub const LOWEST: u32 = 1;
/// Largest upper bound a range may be configured with.
pub const HIGHEST: u32 = 1000;

pub const DEFAULT_RANGE: Range = Range { min: 1, max: 100 };

/// Closed interval of candidate numbers.
///
/// Construction through [`Range::new`] enforces `LOWEST <= min < max <= HIGHEST`.
/// Narrowing during play may collapse the interval down to a single value, so
/// `min == max` is reachable but `min > max` never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    min: u32,
    max: u32,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Result<Self, RangeError> {
        if min >= max {
            return Err(RangeError::NotAscending { min, max });
        }
        if min < i64::from(LOWEST) || max > i64::from(HIGHEST) {
            return Err(RangeError::OutOfBounds {
                min,
                max,
                floor: LOWEST,
                ceiling: HIGHEST,
            });
        }
        // Both values were just checked to lie in LOWEST..=HIGHEST.
        Ok(Self {
            min: min as u32,
            max: max as u32,
        })
    }

    /// Parse raw user input, e.g. the two fields of a "set range" form.
    pub fn parse(min: &str, max: &str) -> Result<Self, RangeError> {
        let min = parse_whole(min)?;
        let max = parse_whole(max)?;
        Self::new(min, max)
    }

    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        value >= i64::from(self.min) && value <= i64::from(self.max)
    }

    /// Number of candidates left in the interval.
    #[must_use]
    pub const fn span(&self) -> u32 {
        self.max - self.min + 1
    }

    /// Caller guarantees `value < max`, i.e. the narrowed interval stays non-empty.
    pub(crate) fn above(self, value: u32) -> Self {
        debug_assert!(value < self.max);
        Self {
            min: value + 1,
            max: self.max,
        }
    }

    /// Caller guarantees `value > min`.
    pub(crate) fn below(self, value: u32) -> Self {
        debug_assert!(value > self.min);
        Self {
            min: self.min,
            max: value - 1,
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        DEFAULT_RANGE
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

fn parse_whole(input: &str) -> Result<i64, RangeError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| RangeError::NotANumber(trimmed.to_string()))
}
