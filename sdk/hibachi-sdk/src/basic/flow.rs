use crate::advanced::graph::SurveyGraph;
use crate::basic::gate::WalletGate;
use crate::basic::reward::{RewardPresenter, RewardView};
use crate::basic::survey::{Advance, QuestionView, SurveyEngine};
use crate::config::FlowConfig;
use crate::core::clipboard::Clipboard;
use crate::core::provider::ProviderEvent;
use crate::core::rewards::RewardIssuer;
use crate::error::{FlowError, Result};
use crate::types::{Answers, RewardRecord, WalletSession};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Wallet,
    Survey,
    Reward,
}

/// Issued when a connection attempt starts; binds its result to the session
/// that was current at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectTicket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectOutcome {
    /// Approved wallet; the survey is on its first question
    Started(QuestionView),
    /// A restart happened while the attempt was pending
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurveyStep {
    Question(QuestionView),
    Rewarded(RewardView),
}

/// Top-level wizard: wallet, then survey, then reward.
///
/// Stages only move forward; [`Flow::restart`] is the only way back.
pub struct Flow {
    stage: Stage,
    epoch: u64,
    gate: Arc<WalletGate>,
    session: Option<WalletSession>,
    survey: SurveyEngine,
    completed: Option<Answers>,
    presenter: RewardPresenter,
    issuer: Arc<dyn RewardIssuer>,
}

impl Flow {
    pub fn new(
        gate: Arc<WalletGate>,
        graph: Arc<SurveyGraph>,
        issuer: Arc<dyn RewardIssuer>,
    ) -> Self {
        Self {
            stage: Stage::Wallet,
            epoch: 0,
            gate,
            session: None,
            survey: SurveyEngine::new(graph),
            completed: None,
            presenter: RewardPresenter::default(),
            issuer,
        }
    }

    /// Builds a flow from `config`, using `gate` for wallet access.
    pub fn from_config(config: &FlowConfig, gate: Arc<WalletGate>) -> Result<Self> {
        let graph = Arc::new(config.survey_graph()?);
        Ok(Self::new(gate, graph, Arc::new(config.reward_issuer()))
            .with_presenter(RewardPresenter::new(config.copy_ack_window())))
    }

    pub fn with_presenter(mut self, presenter: RewardPresenter) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn gate(&self) -> Arc<WalletGate> {
        Arc::clone(&self.gate)
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    pub fn survey(&self) -> &SurveyEngine {
        &self.survey
    }

    pub fn answers(&self) -> Option<&Answers> {
        self.completed
            .as_ref()
            .or_else(|| self.survey.state().map(|s| &s.answers))
    }

    pub fn reward(&self) -> Option<&RewardRecord> {
        self.presenter.record()
    }

    pub fn reward_view(&self) -> Option<RewardView> {
        self.presenter.view()
    }

    /// Starts a connection attempt for the current session.
    pub fn begin_connect(&self) -> Result<ConnectTicket> {
        self.expect_stage(Stage::Wallet)?;
        Ok(ConnectTicket { epoch: self.epoch })
    }

    /// Applies the result of the attempt identified by `ticket`.
    ///
    /// Results from before the last restart are dropped. An unapproved wallet
    /// is kept as the session but the flow stays on the wallet stage; the gate
    /// has already let go of its provider, so it raises no account events.
    pub fn apply_connection(
        &mut self,
        ticket: ConnectTicket,
        result: Result<WalletSession>,
    ) -> Result<ConnectOutcome> {
        if ticket.epoch != self.epoch || self.stage != Stage::Wallet {
            debug!(
                ticket = ticket.epoch,
                current = self.epoch,
                "discarding stale connection result"
            );
            return Ok(ConnectOutcome::Discarded);
        }

        let session = result?;
        if !session.approved {
            let address = session.address.clone();
            warn!(address = %address, "wallet not on allow-list");
            self.session = Some(session);
            return Err(FlowError::NotApproved(address));
        }

        let root = self.survey.graph().root().to_string();
        let view = self.survey.start(&root)?;
        self.session = Some(session);
        self.stage = Stage::Survey;
        info!("wallet approved, survey started");
        Ok(ConnectOutcome::Started(view))
    }

    /// `begin_connect`, the gate request and `apply_connection` in one go.
    pub async fn connect_wallet(&mut self) -> Result<ConnectOutcome> {
        let ticket = self.begin_connect()?;
        let result = self.gate.request_connection().await;
        self.apply_connection(ticket, result)
    }

    pub fn question(&self) -> Result<QuestionView> {
        self.expect_stage(Stage::Survey)?;
        self.survey.view()
    }

    pub fn select_option(&mut self, option: &str) -> Result<()> {
        self.expect_stage(Stage::Survey)?;
        self.survey.select_option(option)
    }

    /// Commits the pending answer. On the last answer the reward is issued
    /// and the flow moves to the reward stage.
    pub async fn advance(&mut self) -> Result<SurveyStep> {
        self.expect_stage(Stage::Survey)?;
        match self.survey.advance()? {
            Advance::Question(view) => Ok(SurveyStep::Question(view)),
            Advance::Completed(answers) => {
                self.completed = Some(answers);
                self.issue_reward().await
            },
        }
    }

    /// Retries reward issuance after a failure on the last answer.
    pub async fn retry_reward(&mut self) -> Result<SurveyStep> {
        self.expect_stage(Stage::Survey)?;
        if self.completed.is_none() {
            return Err(FlowError::InvalidState("survey not completed".to_string()));
        }
        self.issue_reward().await
    }

    pub async fn copy_reward(&mut self, clipboard: &dyn Clipboard) -> bool {
        if self.stage != Stage::Reward {
            return false;
        }
        self.presenter.copy_to_clipboard(clipboard).await
    }

    /// Back to the wallet stage with nothing retained. Valid from any stage.
    pub async fn restart(&mut self) {
        self.epoch += 1;
        self.stage = Stage::Wallet;
        self.session = None;
        self.completed = None;
        self.survey.reset();
        self.presenter.restart();
        self.gate.release().await;
        info!(epoch = self.epoch, "flow restarted");
    }

    /// Reacts to wallet-side changes. A disconnect or an account switch away
    /// from the session address restarts the flow; returns whether it did.
    pub async fn sync_provider_events(&mut self) -> bool {
        let events = self.gate.pending_events().await;
        let Some(session) = &self.session else {
            return false;
        };

        let switched = events.iter().any(|event| match event {
            ProviderEvent::AccountsChanged(accounts) => accounts
                .first()
                .map(|a| !a.eq_ignore_ascii_case(&session.address))
                .unwrap_or(true),
            ProviderEvent::ChainChanged(_) => false,
        });
        if switched {
            info!("wallet account changed, restarting");
            self.restart().await;
        }
        switched
    }

    async fn issue_reward(&mut self) -> Result<SurveyStep> {
        let (Some(session), Some(answers)) = (&self.session, &self.completed) else {
            return Err(FlowError::InvalidState("no completed survey".to_string()));
        };
        let record = self.issuer.issue_reward(&session.address, answers).await?;
        info!(address = %session.address, "reward issued");
        let view = self.presenter.present(record);
        self.stage = Stage::Reward;
        Ok(SurveyStep::Rewarded(view))
    }

    fn expect_stage(&self, stage: Stage) -> Result<()> {
        if self.stage != stage {
            return Err(FlowError::InvalidState(format!(
                "expected {:?} stage, flow is at {:?}",
                stage, self.stage
            )));
        }
        Ok(())
    }
}
