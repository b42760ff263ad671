pub mod claim_rewards;
pub mod create_pair;
pub mod reward_math;
pub mod stake;
pub mod update_reward_reserve;
