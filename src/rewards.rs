use num_bigint::BigUint;
use serde::Serialize;

use crate::config::ViewConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RewardTier {
    Regular,
    Gold,
    Diamond,
}

/// A tier together with the whole reward tokens it grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub tier: RewardTier,
    pub tokens: u64,
}

/// Donation thresholds in fixed-point, checked from the top tier down.
/// A donation exactly at a threshold earns that tier.
#[derive(Clone, Debug)]
pub struct RewardSchedule {
    tiers: Vec<(RewardTier, BigUint, u64)>,
}

impl RewardSchedule {
    pub fn from_config(config: &ViewConfig) -> Self {
        let unit = BigUint::from(10u32).pow(config.token_decimals);
        let r = &config.rewards;
        RewardSchedule {
            tiers: vec![
                (RewardTier::Diamond, &unit * r.diamond_threshold, r.diamond_reward),
                (RewardTier::Gold, &unit * r.gold_threshold, r.gold_reward),
                (RewardTier::Regular, &unit * r.regular_threshold, r.regular_reward),
            ],
        }
    }

    pub fn reward_for(&self, amount: &BigUint) -> Option<Reward> {
        self.tiers
            .iter()
            .find(|(_, threshold, _)| amount >= threshold)
            .map(|(tier, _, tokens)| Reward {
                tier: *tier,
                tokens: *tokens,
            })
    }

    /// Human-readable lines for the detail page, lowest tier first,
    /// e.g. `"1100 ISLM – Will be given 10LGN"`.
    pub fn describe(config: &ViewConfig) -> Vec<String> {
        let r = &config.rewards;
        [
            (r.regular_threshold, r.regular_reward),
            (r.gold_threshold, r.gold_reward),
            (r.diamond_threshold, r.diamond_reward),
        ]
        .iter()
        .map(|(threshold, reward)| {
            format!(
                "{threshold} {} – Will be given {reward}{}",
                config.token_symbol, config.reward_symbol
            )
        })
        .collect()
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}
