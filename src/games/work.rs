//! Work: a steady, low payout gated by a 20 minute per-user cooldown.
use super::{Outcome, RuleViolation};
use rand::Rng;

pub const COOLDOWN_SECS: i64 = 20 * 60;
pub const PAY_LOW: i64 = 25;
pub const PAY_HIGH: i64 = 65;

/// Check the cooldown and pay out. `last_play` is the previous successful play, if any.
pub fn play<R: Rng + ?Sized>(
    last_play: Option<i64>,
    now: i64,
    rng: &mut R,
) -> Result<Outcome, RuleViolation> {
    if let Some(last) = last_play {
        let remaining = last + COOLDOWN_SECS - now;
        if remaining > 0 {
            let minutes = remaining / 60 + 1;
            return Err(RuleViolation::new(format!(
                "Bạn vừa làm việc xong, thử lại sau {minutes} phút nữa nhé!"
            )));
        }
    }

    let payout = rng.gen_range(PAY_LOW..=PAY_HIGH);
    Ok(Outcome::adjust(
        format!("Bạn làm việc chăm chỉ và nhận được {payout}💰!"),
        payout,
    ))
}
