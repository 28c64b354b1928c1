pub mod advanced;
pub mod basic;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use crate::advanced::graph::{Question, SurveyGraph, SurveyGraphBuilder};
pub use crate::basic::flow::{ConnectOutcome, ConnectTicket, Flow, Stage, SurveyStep};
pub use crate::basic::gate::{GateStatus, ProviderSource, WalletGate, WalletGateBuilder};
pub use crate::basic::reward::{RewardPresenter, RewardView};
pub use crate::basic::survey::{Advance, QuestionView, SurveyEngine, SurveyState};
pub use crate::config::FlowConfig;
pub use crate::core::clipboard::{Clipboard, ClipboardError};
pub use crate::core::provider::{
    ProviderAccount, ProviderChoice, ProviderError, ProviderEvent, ProviderKind, ProviderPicker,
    WalletProvider,
};
pub use crate::core::rewards::{RewardIssuer, StaticRewardIssuer};
pub use crate::error::{FlowError, Result};
pub use crate::types::{Answers, RewardRecord, WalletSession};
pub use crate::utils::{explorer_link, format_address, share_link};

pub mod allowlist {
    pub use hibachi_policy_allowlist::{
        is_approved_by, normalize, validate_address, Allowlist, AllowlistBuilder,
        AllowlistError, AllowlistSource,
    };
}
