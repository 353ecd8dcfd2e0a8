//! Mining: 3–6 excavations, a 10% relic jackpot, and a fatigue cost that can push the
//! net result below zero. The player's balance still never drops under zero.
use super::reward::{RewardTable, RewardTier};
use super::Outcome;
use rand::Rng;

pub const VEINS: RewardTable = RewardTable::new(&[
    RewardTier::new("⛏️ Quặng sắt", 40, 90, 45),
    RewardTier::new("💎 Quặng kim cương", 180, 320, 25),
    RewardTier::new("🌌 Tinh thể sao", 350, 520, 18),
    RewardTier::new("🪐 Mảnh thiên thạch quý", 600, 900, 9),
    RewardTier::new("⚙️ Cỗ máy cổ đại", 1100, 1600, 3),
]);

pub const EXCAVATIONS: (usize, usize) = (3, 6);
pub const JACKPOT_CHANCE: f64 = 0.1;
pub const JACKPOT_RANGE: (i64, i64) = (1500, 2500);
pub const FATIGUE_RANGE: (i64, i64) = (120, 240);

pub fn play<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    let excavations = rng.gen_range(EXCAVATIONS.0..=EXCAVATIONS.1);
    let draws = VEINS.draw_many(rng, excavations);
    let mut total: i64 = draws.iter().map(|d| d.amount).sum();
    let mut lines: Vec<String> = draws
        .iter()
        .map(|d| format!("{}: +{}💰", d.label, d.amount))
        .collect();

    let jackpot = rng.gen_bool(JACKPOT_CHANCE);
    if jackpot {
        let relic = rng.gen_range(JACKPOT_RANGE.0..=JACKPOT_RANGE.1);
        lines.push(format!("🏺 Kho báu cổ đại trị giá {relic}💰!"));
        total += relic;
    }

    let fatigue = rng.gen_range(FATIGUE_RANGE.0..=FATIGUE_RANGE.1);
    lines.push(format!("😮‍💨 Chi phí năng lượng: -{fatigue}💰"));
    total -= fatigue;

    let highlight = if jackpot {
        "Bạn đào trúng siêu phẩm!"
    } else {
        "Một ngày khai thác hăng say!"
    };
    let message = format!(
        "⚒️ Mùa khai thác vĩ đại!\nBạn khoan {excavations} hầm và kết thúc với {total}💰.\n{highlight}\nChi tiết:\n{}",
        lines.join("\n")
    );
    Outcome::adjust(message, total)
}
