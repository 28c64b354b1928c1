use crate::advanced::graph::SurveyGraph;
use crate::basic::gate::WalletGateBuilder;
use crate::catalog::SurveyVariant;
use crate::core::constants::{
    APPROVED_WALLETS, COPY_ACK_WINDOW, DEFAULT_CONNECT_TIMEOUT, MOCK_REWARD_CODE,
};
use crate::core::rewards::StaticRewardIssuer;
use crate::error::Result;
use hibachi_policy_allowlist::Allowlist;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Deployment settings. Every field is optional in JSON and falls back to the
/// compiled defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Empty means every wallet is approved
    pub approved_wallets: Vec<String>,
    pub reward_code: String,
    pub connect_timeout_ms: u64,
    pub copy_ack_ms: u64,
    pub survey: SurveyVariant,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            approved_wallets: APPROVED_WALLETS.iter().map(|a| a.to_string()).collect(),
            reward_code: MOCK_REWARD_CODE.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            copy_ack_ms: COPY_ACK_WINDOW.as_millis() as u64,
            survey: SurveyVariant::default(),
        }
    }
}

impl FlowConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn allowlist(&self) -> Allowlist {
        Allowlist::builder()
            .add_addresses(&self.approved_wallets)
            .build()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn copy_ack_window(&self) -> Duration {
        Duration::from_millis(self.copy_ack_ms)
    }

    pub fn survey_graph(&self) -> Result<SurveyGraph> {
        self.survey.graph()
    }

    pub fn reward_issuer(&self) -> StaticRewardIssuer {
        StaticRewardIssuer::new(self.reward_code.clone())
    }

    /// Gate builder preloaded with the allow-list and timeout; providers are
    /// added by the caller.
    pub fn gate_builder(&self) -> WalletGateBuilder {
        WalletGateBuilder::new()
            .with_allowlist(Arc::new(self.allowlist()))
            .with_timeout(self.connect_timeout())
    }
}
