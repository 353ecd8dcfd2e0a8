//! Slots: three reels over a five-icon alphabet.
//!
//! | Spin | Payout |
//! |---|---|
//! | 7️⃣7️⃣7️⃣ | 300 |
//! | any other triple | 180 |
//! | exactly two alike | 60–120 |
//! | all different | lose 15–45 |
use super::Outcome;
use rand::Rng;

pub const ICONS: [&str; 5] = ["🍒", "🍋", "⭐", "💎", "7️⃣"];
pub const JACKPOT_ICON: &str = "7️⃣";
pub const JACKPOT_PAYOUT: i64 = 300;
pub const TRIPLE_PAYOUT: i64 = 180;
pub const PAIR_RANGE: (i64, i64) = (60, 120);
pub const MISS_RANGE: (i64, i64) = (15, 45);

pub fn spin<R: Rng + ?Sized>(rng: &mut R) -> [&'static str; 3] {
    [(); 3].map(|_| ICONS[rng.gen_range(0..ICONS.len())])
}

/// Signed payout for a given spin.
pub fn payout<R: Rng + ?Sized>(reels: &[&str; 3], rng: &mut R) -> i64 {
    let [a, b, c] = *reels;
    if a == b && b == c {
        if a == JACKPOT_ICON {
            JACKPOT_PAYOUT
        } else {
            TRIPLE_PAYOUT
        }
    } else if a == b || b == c || a == c {
        rng.gen_range(PAIR_RANGE.0..=PAIR_RANGE.1)
    } else {
        -rng.gen_range(MISS_RANGE.0..=MISS_RANGE.1)
    }
}

pub fn play<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    let reels = spin(rng);
    settle(&reels, rng)
}

pub fn settle<R: Rng + ?Sized>(reels: &[&str; 3], rng: &mut R) -> Outcome {
    let amount = payout(reels, rng);
    let display = reels.join(" | ");
    let message = if amount >= 0 {
        format!("🎰 {display}\nBạn thắng {amount}💰!")
    } else {
        format!("🎰 {display}\nBạn mất {}💰...", -amount)
    };
    Outcome::adjust(message, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_triple_pays_fixed_amount() {
        let mut rng = StdRng::seed_from_u64(31);
        for icon in ICONS {
            for _ in 0..20 {
                let amount = payout(&[icon, icon, icon], &mut rng);
                if icon == JACKPOT_ICON {
                    assert_eq!(amount, 300);
                } else {
                    assert_eq!(amount, 180, "triple {icon}");
                }
            }
        }
    }

    #[test]
    fn pairs_and_misses_use_their_ranges() {
        let mut rng = StdRng::seed_from_u64(32);
        for a in ICONS {
            for b in ICONS {
                for c in ICONS {
                    let amount = payout(&[a, b, c], &mut rng);
                    let distinct = {
                        let mut v = vec![a, b, c];
                        v.sort();
                        v.dedup();
                        v.len()
                    };
                    match distinct {
                        1 => assert!(amount == 180 || amount == 300),
                        2 => assert!((60..=120).contains(&amount)),
                        _ => assert!((-45..=-15).contains(&amount)),
                    }
                }
            }
        }
    }

    #[test]
    fn settle_message_shows_reels() {
        let mut rng = StdRng::seed_from_u64(33);
        let out = settle(&["🍒", "🍒", "🍒"], &mut rng);
        assert_eq!(out.delta, 180);
        assert!(out.message.starts_with("🎰 🍒 | 🍒 | 🍒"));
    }
}
