//! Language games backed by the text-generation collaborator: WordChain and the
//! Vietnamese puzzle challenge.
//!
//! Each game is split in two so the engine can run the collaborator call between them:
//! a `request` step that builds the prompt, and a `settle` step that turns the generated
//! text into an [`Outcome`].
use super::Outcome;
use rand::seq::SliceRandom;
use rand::Rng;

/// A ready-to-send collaborator request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
    pub max_tokens: u32,
}

pub const WORD_CHAIN_SEEDS: [&str; 6] = [
    "ánh sáng",
    "nông dân",
    "hải đăng",
    "thiên nhiên",
    "cộng đồng",
    "khởi nghiệp",
];
pub const WORD_CHAIN_REWARD: (i64, i64) = (90, 180);
pub const PUZZLE_REWARD: (i64, i64) = (110, 220);

const WORD_CHAIN_SYSTEM: &str = "Bạn là MC dẫn dắt trò chơi nối từ tiếng Việt. \
Hãy luôn trả lời bằng tiếng Việt, gọn gàng, nhiệt huyết.";

const PUZZLE_SYSTEM: &str = "Bạn là giám khảo chương trình Vua Tiếng Việt. \
Tạo thử thách sáng tạo, thân thiện cho người chơi luyện tiếng Việt.";

const PUZZLE_USER: &str = "Viết một thử thách gồm ba phần: \n\
1. Khởi động bằng một câu đố mẹo ngắn.\n\
2. Thử thách từ vựng với 3 từ khó, yêu cầu người chơi giải nghĩa.\n\
3. Bài tập đặt câu với một thành ngữ hoặc tục ngữ.\n\
Hãy định dạng rõ ràng bằng danh sách đánh số.";

pub const WORD_CHAIN_UNCONFIGURED: &str =
    "Tính năng nối từ cần cấu hình AI_GATEWAY_API_KEY để gọi mô hình ngôn ngữ.";
pub const WORD_CHAIN_FAILED: &str = "Không thể tạo lượt chơi nối từ lúc này, thử lại sau nhé!";
pub const PUZZLE_UNCONFIGURED: &str =
    "Vua Tiếng Việt cần cấu hình AI_GATEWAY_API_KEY để kích hoạt thử thách ngôn ngữ.";
pub const PUZZLE_FAILED: &str =
    "Không thể tạo thử thách Vua Tiếng Việt, bạn thử lại giúp mình nhé!";

pub fn pick_seed<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORD_CHAIN_SEEDS.choose(rng).copied().unwrap_or(WORD_CHAIN_SEEDS[0])
}

pub fn word_chain_prompt(seed: &str) -> Prompt {
    Prompt {
        system: WORD_CHAIN_SYSTEM,
        user: format!(
            "Tạo một lượt chơi nối từ bắt đầu bằng từ '{seed}'. Liệt kê ít nhất 6 lượt nối tiếp nhau, \
mỗi lượt dạng 'A → B' trên một dòng. Giải thích ngắn (tối đa 10 từ) nếu cần ngay sau từ bằng ngoặc đơn."
        ),
        max_tokens: 400,
    }
}

pub fn puzzle_prompt() -> Prompt {
    Prompt {
        system: PUZZLE_SYSTEM,
        user: PUZZLE_USER.to_string(),
        max_tokens: 500,
    }
}

pub fn settle_word_chain<R: Rng + ?Sized>(seed: &str, sequence: &str, rng: &mut R) -> Outcome {
    let reward = rng.gen_range(WORD_CHAIN_REWARD.0..=WORD_CHAIN_REWARD.1);
    Outcome::adjust(
        format!(
            "🔗 Trò chơi nối từ!\nTừ khởi động: {seed}\n{sequence}\n\nBạn nhận được {reward}💰 cho sự nhanh trí!"
        ),
        reward,
    )
}

pub fn settle_puzzle<R: Rng + ?Sized>(challenge: &str, rng: &mut R) -> Outcome {
    let reward = rng.gen_range(PUZZLE_REWARD.0..=PUZZLE_REWARD.1);
    Outcome::adjust(
        format!(
            "👑 Thử thách Vua Tiếng Việt!\n{challenge}\n\nHoàn thành và bạn được thưởng {reward}💰. Cố lên nào!"
        ),
        reward,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn word_chain_prompt_embeds_seed() {
        let p = word_chain_prompt("hải đăng");
        assert!(p.user.contains("'hải đăng'"));
        assert_eq!(p.max_tokens, 400);
        assert_eq!(puzzle_prompt().max_tokens, 500);
    }

    #[test]
    fn seeds_come_from_fixed_list() {
        let mut rng = StdRng::seed_from_u64(61);
        for _ in 0..50 {
            assert!(WORD_CHAIN_SEEDS.contains(&pick_seed(&mut rng)));
        }
    }

    #[test]
    fn rewards_fall_in_fixed_ranges() {
        let mut rng = StdRng::seed_from_u64(62);
        for _ in 0..200 {
            let wc = settle_word_chain("ánh sáng", "ánh sáng → sáng tạo", &mut rng);
            assert!((90..=180).contains(&wc.delta));
            assert!(wc.message.contains("ánh sáng → sáng tạo"));
            let pz = settle_puzzle("1. ...", &mut rng);
            assert!((110..=220).contains(&pz.delta));
        }
    }
}
