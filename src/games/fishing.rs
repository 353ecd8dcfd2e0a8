//! Fishing: 2–5 casts against a weighted catch table, with a rare bonus wave on big hauls.
use super::reward::{RewardTable, RewardTier};
use super::Outcome;
use rand::Rng;

pub const CATCHES: RewardTable = RewardTable::new(&[
    RewardTier::new("🐟 Cá cơm", 8, 16, 40),
    RewardTier::new("🐠 Cá hồng", 22, 45, 30),
    RewardTier::new("🦑 Mực khổng lồ", 90, 160, 15),
    RewardTier::new("🐬 Cá heo lạc", 200, 400, 8),
    RewardTier::new("🐉 Rồng nước huyền thoại", 800, 1200, 2),
]);

pub const CASTS: (usize, usize) = (2, 5);
pub const BONUS_THRESHOLD: i64 = 600;
pub const BONUS_CHANCE: f64 = 0.35;
pub const BONUS_RANGE: (i64, i64) = (120, 300);

pub fn play<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    let casts = rng.gen_range(CASTS.0..=CASTS.1);
    let haul = CATCHES.draw_many(rng, casts);
    let mut total: i64 = haul.iter().map(|d| d.amount).sum();
    let mut lines: Vec<String> = haul.iter().map(ToString::to_string).collect();

    if total >= BONUS_THRESHOLD && rng.gen_bool(BONUS_CHANCE) {
        let bonus = rng.gen_range(BONUS_RANGE.0..=BONUS_RANGE.1);
        lines.push(format!("⚡ Cơn sóng vàng mang thêm {bonus}💰"));
        total += bonus;
    }

    let message = format!(
        "🎣 Phiên câu cá hoành tráng!\nBạn quăng lưới {casts} lần và thu về {total}💰.\nChi tiết:\n{}",
        lines.join("\n")
    );
    Outcome::adjust(message, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn haul_is_bounded_by_casts_and_bonus() {
        let mut rng = StdRng::seed_from_u64(41);
        for _ in 0..1_000 {
            let out = play(&mut rng);
            // at least two of the cheapest fish; at most five dragons plus a bonus
            assert!(out.delta >= 16, "{}", out.delta);
            assert!(out.delta <= 5 * 1200 + 300, "{}", out.delta);
        }
    }

    #[test]
    fn message_lists_each_cast() {
        let mut rng = StdRng::seed_from_u64(42);
        let out = play(&mut rng);
        let detail_lines = out
            .message
            .lines()
            .skip_while(|l| *l != "Chi tiết:")
            .skip(1)
            .filter(|l| !l.starts_with('⚡'))
            .count();
        assert!((2..=5).contains(&detail_lines), "{}", out.message);
    }
}
