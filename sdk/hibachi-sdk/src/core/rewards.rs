use crate::core::constants::MOCK_REWARD_CODE;
use crate::error::Result;
use crate::types::{Answers, RewardRecord};
use async_trait::async_trait;

/// Hands out the reward once a visitor finishes the survey.
///
/// Production issuers talk to a backend, so this is async and fallible even
/// though the bundled issuer is neither.
#[async_trait]
pub trait RewardIssuer: Send + Sync {
    async fn issue_reward(&self, wallet_address: &str, answers: &Answers) -> Result<RewardRecord>;
}

/// Returns the same code to everybody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRewardIssuer {
    code: String,
}

impl StaticRewardIssuer {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Default for StaticRewardIssuer {
    fn default() -> Self {
        Self::new(MOCK_REWARD_CODE)
    }
}

#[async_trait]
impl RewardIssuer for StaticRewardIssuer {
    async fn issue_reward(&self, _wallet_address: &str, _answers: &Answers) -> Result<RewardRecord> {
        Ok(RewardRecord::new(self.code.clone()))
    }
}
