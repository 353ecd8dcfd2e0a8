//! Weighted outcome tables shared by every mini-game.
//!
//! A table is a fixed list of `(label, low, high, weight)` tiers. A draw picks a tier with
//! probability proportional to its weight and then a uniform amount in `[low, high]`.
//! Weights are relative; a zero weight makes its tier unreachable.
//!
//! Tables are built with the `const` constructor so a malformed table (inverted range,
//! no positive weight) is rejected at compile time:
//!
//! ```rust
//! use coinbot::games::reward::{RewardTable, RewardTier};
//!
//! const COINS: RewardTable = RewardTable::new(&[
//!     RewardTier::new("copper", 1, 5, 90),
//!     RewardTier::new("gold", 50, 80, 10),
//! ]);
//! let mut rng = rand::thread_rng();
//! let draw = COINS.draw(&mut rng);
//! assert!(draw.amount >= 1 && draw.amount <= 80);
//! ```

use rand::Rng;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardTier {
    pub label: &'static str,
    pub low: i64,
    pub high: i64,
    pub weight: u32,
}

impl RewardTier {
    pub const fn new(label: &'static str, low: i64, high: i64, weight: u32) -> Self {
        Self {
            label,
            low,
            high,
            weight,
        }
    }
}

/// Result of a single draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub label: &'static str,
    pub amount: i64,
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{}💰)", self.label, self.amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RewardTableError {
    #[error("reward table has no tiers")]
    Empty,
    #[error("reward table weights sum to zero")]
    ZeroTotalWeight,
    #[error("reward tier {label} has low > high")]
    InvertedRange { label: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct RewardTable {
    tiers: &'static [RewardTier],
    total_weight: u64,
}

impl RewardTable {
    /// Build a table from static tiers.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if the table is empty, every weight
    /// is zero, or any tier has `low > high`. Use [`RewardTable::try_new`] for tiers that
    /// are not known up front.
    pub const fn new(tiers: &'static [RewardTier]) -> Self {
        match Self::try_new(tiers) {
            Ok(table) => table,
            Err(RewardTableError::Empty) => panic!("reward table has no tiers"),
            Err(RewardTableError::ZeroTotalWeight) => panic!("reward table weights sum to zero"),
            Err(RewardTableError::InvertedRange { .. }) => panic!("reward tier has low > high"),
        }
    }

    pub const fn try_new(tiers: &'static [RewardTier]) -> Result<Self, RewardTableError> {
        if tiers.is_empty() {
            return Err(RewardTableError::Empty);
        }
        let mut total_weight = 0u64;
        let mut i = 0;
        while i < tiers.len() {
            let tier = &tiers[i];
            if tier.low > tier.high {
                return Err(RewardTableError::InvertedRange { label: tier.label });
            }
            total_weight += tier.weight as u64;
            i += 1;
        }
        if total_weight == 0 {
            return Err(RewardTableError::ZeroTotalWeight);
        }
        Ok(Self {
            tiers,
            total_weight,
        })
    }

    pub fn tiers(&self) -> &'static [RewardTier] {
        self.tiers
    }

    /// Pick a tier by weight, then a uniform amount inside its range.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let tier = self.pick(rng);
        Draw {
            label: tier.label,
            amount: rng.gen_range(tier.low..=tier.high),
        }
    }

    /// `count` independent draws.
    pub fn draw_many<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Draw> {
        (0..count).map(|_| self.draw(rng)).collect()
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static RewardTier {
        let mut roll = rng.gen_range(0..self.total_weight);
        for tier in self.tiers {
            let weight = tier.weight as u64;
            if roll < weight {
                return tier;
            }
            roll -= weight;
        }
        // roll < total_weight guarantees a hit above; fall back to the heaviest tier
        self.tiers
            .iter()
            .max_by_key(|t| t.weight)
            .unwrap_or(&self.tiers[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    const SKEWED: RewardTable = RewardTable::new(&[
        RewardTier::new("never", 1, 1, 0),
        RewardTier::new("common", 10, 20, 3),
        RewardTier::new("rare", 100, 100, 1),
    ]);

    #[test]
    fn zero_weight_tier_is_unreachable() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5_000 {
            assert_ne!(SKEWED.draw(&mut rng).label, "never");
        }
    }

    #[test]
    fn amounts_stay_inside_tier_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for draw in SKEWED.draw_many(&mut rng, 2_000) {
            match draw.label {
                "common" => assert!((10..=20).contains(&draw.amount)),
                "rare" => assert_eq!(draw.amount, 100),
                other => panic!("unexpected tier {other}"),
            }
        }
    }

    #[test]
    fn selection_follows_relative_weights() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for draw in SKEWED.draw_many(&mut rng, 20_000) {
            *seen.entry(draw.label).or_default() += 1;
        }
        let common = seen["common"] as f64;
        let rare = seen["rare"] as f64;
        let ratio = common / rare;
        assert!((2.6..3.4).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn equal_weights_are_uniform() {
        static TIERS: [RewardTier; 4] = [
            RewardTier::new("a", 1, 1, 5),
            RewardTier::new("b", 2, 2, 5),
            RewardTier::new("c", 3, 3, 5),
            RewardTier::new("d", 4, 4, 5),
        ];
        let table = RewardTable::try_new(&TIERS).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for draw in table.draw_many(&mut rng, 40_000) {
            *seen.entry(draw.label).or_default() += 1;
        }
        for count in seen.values() {
            assert!((9_000..11_000).contains(count), "counts were {seen:?}");
        }
    }

    #[test]
    fn invalid_tables_are_rejected() {
        static EMPTY: [RewardTier; 0] = [];
        static ZERO: [RewardTier; 1] = [RewardTier::new("z", 1, 2, 0)];
        static INVERTED: [RewardTier; 1] = [RewardTier::new("inv", 9, 2, 1)];
        assert_eq!(
            RewardTable::try_new(&EMPTY).unwrap_err(),
            RewardTableError::Empty
        );
        assert_eq!(
            RewardTable::try_new(&ZERO).unwrap_err(),
            RewardTableError::ZeroTotalWeight
        );
        assert_eq!(
            RewardTable::try_new(&INVERTED).unwrap_err(),
            RewardTableError::InvertedRange { label: "inv" }
        );
    }
}
