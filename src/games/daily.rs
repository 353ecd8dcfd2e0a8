//! Daily: one claim per 20 hour window, with a streak bonus.
//!
//! Payout is `120 + min(100, streak * 15)`. The streak grows by one per claim and starts
//! over at 1 when more than [`STREAK_BREAK_SECS`] have passed since the previous claim.
use super::{Outcome, RuleViolation};
use crate::storage::{Mutation, PlayerRecord};

pub const RESET_SECS: i64 = 20 * 60 * 60;
pub const STREAK_BREAK_SECS: i64 = 48 * 60 * 60;
pub const BASE_PAYOUT: i64 = 120;
pub const STREAK_STEP: i64 = 15;
pub const STREAK_CAP: i64 = 100;

pub fn streak_bonus(streak: u32) -> i64 {
    (i64::from(streak) * STREAK_STEP).min(STREAK_CAP)
}

/// Streak after a claim at `now`. A record with a streak but no claim time (older
/// files) keeps counting; a claim more than [`STREAK_BREAK_SECS`] late starts over.
pub fn next_streak(record: &PlayerRecord, now: i64) -> u32 {
    if record.streak == 0 {
        1
    } else if record.has_claimed_daily() && now - record.last_daily_claim > STREAK_BREAK_SECS {
        1
    } else {
        record.streak.saturating_add(1)
    }
}

pub fn play(record: &PlayerRecord, now: i64) -> Result<Outcome, RuleViolation> {
    let elapsed = now - record.last_daily_claim;
    if record.has_claimed_daily() && elapsed < RESET_SECS {
        let hours = (RESET_SECS - elapsed) / 3600 + 1;
        return Err(RuleViolation::new(format!(
            "Bạn đã nhận quà hôm nay rồi! Thử lại sau {hours} giờ."
        )));
    }

    let streak = next_streak(record, now);
    let bonus = streak_bonus(streak);
    let payout = BASE_PAYOUT + bonus;
    let message = format!(
        "🎁 Nhận quà hàng ngày!\nChuỗi hiện tại: {streak} ngày\nBạn nhận được {payout}💰 (bao gồm {bonus}💰 thưởng chuỗi)."
    );
    Ok(Outcome {
        message,
        delta: payout,
        mutations: vec![
            Mutation::ClaimDaily { at: now, streak },
            Mutation::AdjustBalance(payout),
        ],
    })
}
