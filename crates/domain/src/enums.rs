use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the pool's current tick sits relative to a position's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    /// Zero liquidity; checked before any tick comparison.
    Closed,
    /// `tick_lower <= current_tick <= tick_upper`, both ends inclusive.
    InRange,
    /// `current_tick < tick_lower`: the position holds only token0.
    BelowRange,
    /// `current_tick > tick_upper`: the position holds only token1.
    AboveRange,
}

impl RangeStatus {
    /// Classifies a position snapshot. Total over every input.
    #[must_use]
    pub fn classify(tick_lower: i32, tick_upper: i32, current_tick: i32, liquidity: u128) -> Self {
        if liquidity == 0 {
            Self::Closed
        } else if tick_lower <= current_tick && current_tick <= tick_upper {
            Self::InRange
        } else if current_tick < tick_lower {
            Self::BelowRange
        } else {
            Self::AboveRange
        }
    }

    #[must_use]
    pub fn is_in_range(self) -> bool {
        self == Self::InRange
    }
}

impl fmt::Display for RangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Closed => "Closed",
            Self::InRange => "In Range",
            Self::BelowRange => "Below Range",
            Self::AboveRange => "Above Range",
        };
        f.write_str(label)
    }
}

/// Free-function form of [`RangeStatus::classify`].
#[must_use]
pub fn classify_range(tick_lower: i32, tick_upper: i32, current_tick: i32, liquidity: u128) -> RangeStatus {
    RangeStatus::classify(tick_lower, tick_upper, current_tick, liquidity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    Active,
    Closed,
}

impl PositionStatus {
    #[must_use]
    pub fn from_liquidity(liquidity: u128) -> Self {
        if liquidity > 0 { Self::Active } else { Self::Closed }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Closed => f.write_str("Closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_wins_over_ticks() {
        assert_eq!(classify_range(-100, 100, 0, 0), RangeStatus::Closed);
        assert_eq!(classify_range(-100, 100, 5000, 0), RangeStatus::Closed);
        assert_eq!(classify_range(100, 100, 100, 0), RangeStatus::Closed);
    }

    #[test]
    fn test_inclusive_boundaries() {
        assert_eq!(classify_range(-100, 100, -100, 1), RangeStatus::InRange);
        assert_eq!(classify_range(-100, 100, 100, 1), RangeStatus::InRange);
        assert_eq!(classify_range(-100, 100, -101, 1), RangeStatus::BelowRange);
        assert_eq!(classify_range(-100, 100, 101, 1), RangeStatus::AboveRange);
    }

    #[test]
    fn test_zero_width_range() {
        assert_eq!(classify_range(60, 60, 60, 1), RangeStatus::InRange);
        assert_eq!(classify_range(60, 60, 59, 1), RangeStatus::BelowRange);
        assert_eq!(classify_range(60, 60, 61, 1), RangeStatus::AboveRange);
    }

    #[test]
    fn test_negative_ticks() {
        assert_eq!(
            classify_range(-201_000, -199_000, -200_000, 10),
            RangeStatus::InRange
        );
        assert_eq!(
            classify_range(-201_000, -199_000, -198_000, 10),
            RangeStatus::AboveRange
        );
    }

    #[test]
    fn test_classification_is_exclusive() {
        // Exactly one predicate holds for every tuple in a small grid.
        for lower in -3..=3 {
            for upper in lower..=3 {
                for current in -5..=5 {
                    for liquidity in [0u128, 1, u128::MAX] {
                        let status = classify_range(lower, upper, current, liquidity);
                        let holds = [
                            liquidity == 0,
                            liquidity > 0 && lower <= current && current <= upper,
                            liquidity > 0 && current < lower,
                            liquidity > 0 && current > upper,
                        ];
                        assert_eq!(holds.iter().filter(|h| **h).count(), 1);
                        let expected = match holds.iter().position(|h| *h) {
                            Some(0) => RangeStatus::Closed,
                            Some(1) => RangeStatus::InRange,
                            Some(2) => RangeStatus::BelowRange,
                            _ => RangeStatus::AboveRange,
                        };
                        assert_eq!(status, expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(RangeStatus::BelowRange.to_string(), "Below Range");
        assert_eq!(PositionStatus::from_liquidity(0), PositionStatus::Closed);
        assert_eq!(PositionStatus::from_liquidity(5).to_string(), "Active");
    }
}
