/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Long position
    Long,
    /// Short position
    Short,
}

impl Direction {
    /// Sign multiplier for share counts: +1 for long, -1 for short.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    /// Signed relative move in the trade's favor.
    ///
    /// Positive when price moved with the position, negative when against it.
    #[must_use]
    pub fn favorable_move(self, entry_price: f64, price: f64) -> f64 {
        let change = (price - entry_price) / entry_price;
        match self {
            Direction::Long => change,
            Direction::Short => -change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Long.sign(), 1);
        assert_eq!(Direction::Short.sign(), -1);
        assert_eq!(Direction::Long.opposite(), Direction::Short);
    }

    #[test]
    fn test_favorable_move_is_mirrored() {
        let long = Direction::Long.favorable_move(100.0, 110.0);
        let short = Direction::Short.favorable_move(100.0, 110.0);
        assert!((long - 0.10).abs() < 1e-12);
        assert!((short + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Long).unwrap(), "\"long\"");
        assert_eq!(
            serde_json::to_string(&Direction::Short).unwrap(),
            "\"short\""
        );
    }
}
