//! Dice: roll a d6; 5 or 6 wins, anything lower costs a small penalty.
use super::Outcome;
use rand::Rng;

pub const WIN_THRESHOLD: u8 = 5;
pub const WIN_RANGE: (i64, i64) = (50, 120);
pub const PENALTY_RANGE: (i64, i64) = (10, 40);

pub fn play<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    let roll: u8 = rng.gen_range(1..=6);
    settle(roll, rng)
}

/// Pay out a known roll.
pub fn settle<R: Rng + ?Sized>(roll: u8, rng: &mut R) -> Outcome {
    if roll >= WIN_THRESHOLD {
        let payout = rng.gen_range(WIN_RANGE.0..=WIN_RANGE.1);
        Outcome::adjust(
            format!("🎲 Bạn đổ được {roll} và kiếm được {payout}💰!"),
            payout,
        )
    } else {
        let penalty = rng.gen_range(PENALTY_RANGE.0..=PENALTY_RANGE.1);
        Outcome::adjust(
            format!("🎲 Xui quá! Bạn đổ {roll} và mất {penalty}💰..."),
            -penalty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn high_rolls_win_low_rolls_lose() {
        let mut rng = StdRng::seed_from_u64(21);
        for roll in 1..=6u8 {
            let out = settle(roll, &mut rng);
            if roll >= 5 {
                assert!((50..=120).contains(&out.delta), "roll {roll}: {}", out.delta);
            } else {
                assert!((-40..=-10).contains(&out.delta), "roll {roll}: {}", out.delta);
            }
        }
    }

    #[test]
    fn random_play_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..500 {
            let d = play(&mut rng).delta;
            assert!((50..=120).contains(&d) || (-40..=-10).contains(&d));
        }
    }
}
