use crate::core::constants::{APPROVED_WALLETS, DEFAULT_CONNECT_TIMEOUT};
use crate::core::provider::{
    ProviderAccount, ProviderChoice, ProviderEvent, ProviderPicker, WalletProvider,
};
use crate::error::{FlowError, Result};
use crate::types::WalletSession;
use hibachi_policy_allowlist::{is_approved_by, Allowlist, AllowlistSource};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// One way of reaching a wallet, tried in the order the gate holds them.
#[derive(Clone)]
pub enum ProviderSource {
    /// Wallet injected into the page, connected without further prompts
    Injected(Arc<dyn WalletProvider>),
    /// Selection modal listing every supported provider
    ModalSelected {
        providers: Vec<Arc<dyn WalletProvider>>,
        picker: Arc<dyn ProviderPicker>,
    },
}

impl ProviderSource {
    pub fn label(&self) -> &'static str {
        match self {
            ProviderSource::Injected(_) => "injected",
            ProviderSource::ModalSelected { .. } => "modal",
        }
    }
}

impl std::fmt::Debug for ProviderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSource::Injected(p) => f.debug_tuple("Injected").field(&p.name()).finish(),
            ProviderSource::ModalSelected { providers, .. } => f
                .debug_struct("ModalSelected")
                .field(
                    "providers",
                    &providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
                )
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    Idle,
    Connecting,
    ConnectedApproved,
    ConnectedRejected,
    Error(String),
}

struct ActiveConnection {
    provider: Arc<dyn WalletProvider>,
    events: Option<broadcast::Receiver<ProviderEvent>>,
}

/// Clears the in-flight flag when the attempt ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Obtains a wallet address and checks it against the allow-list.
pub struct WalletGate {
    sources: Vec<ProviderSource>,
    allowlist: Arc<dyn AllowlistSource>,
    timeout: Duration,
    in_flight: AtomicBool,
    /// Bumped by every [`WalletGate::release`]; attempts started under an
    /// older value are dropped on completion.
    generation: AtomicU64,
    status: Mutex<GateStatus>,
    active: tokio::sync::Mutex<Option<ActiveConnection>>,
}

impl WalletGate {
    pub fn builder() -> WalletGateBuilder {
        WalletGateBuilder::new()
    }

    /// Sources that passed the capability check, in priority order.
    pub fn sources(&self) -> &[ProviderSource] {
        &self.sources
    }

    pub fn status(&self) -> GateStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_connecting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_approved(&self, address: &str) -> bool {
        is_approved_by(self.allowlist.as_ref(), address)
    }

    /// Connects through the first source that succeeds.
    ///
    /// Only one attempt runs at a time; a call made while another is pending
    /// fails with [`FlowError::ConnectionInProgress`] and touches nothing.
    pub async fn request_connection(&self) -> Result<WalletSession> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("connection already pending, ignoring request");
            return Err(FlowError::ConnectionInProgress);
        }
        let _guard = InFlight(&self.in_flight);
        let generation = self.generation.load(Ordering::Acquire);
        self.set_status(GateStatus::Connecting);

        if self.sources.is_empty() {
            self.set_status(GateStatus::Error(FlowError::NoProviderDetected.to_string()));
            return Err(FlowError::NoProviderDetected);
        }

        let mut last_error = None;
        for source in &self.sources {
            debug!(source = source.label(), "attempting wallet connection");
            match self.try_source(source).await {
                Ok((provider, account)) => {
                    return self.establish(generation, provider, account).await;
                },
                Err(e) => {
                    warn!(source = source.label(), error = %e, "wallet connection failed");
                    last_error = Some(e);
                },
            }
        }

        let message = last_error
            .map(|e| match e {
                FlowError::Connection(msg) => msg,
                other => other.to_string(),
            })
            .unwrap_or_else(|| "Failed to connect wallet".to_string());
        let _active = self.active.lock().await;
        if self.is_superseded(generation) {
            return Err(FlowError::ConnectionSuperseded);
        }
        self.set_status(GateStatus::Error(message.clone()));
        Err(FlowError::Connection(message))
    }

    /// Releases the provider held by the current connection. Safe to call at
    /// any time, including before any connection was made.
    ///
    /// An attempt still pending when this runs is cancelled: its provider is
    /// released as soon as it answers and its result is never stored.
    pub async fn release(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            debug!(provider = previous.provider.name(), "releasing wallet provider");
            previous.provider.release().await;
        }
        self.set_status(GateStatus::Idle);
    }

    /// Drains provider events received since the last call.
    pub async fn pending_events(&self) -> Vec<ProviderEvent> {
        let mut active = self.active.lock().await;
        let Some(receiver) = active.as_mut().and_then(|a| a.events.as_mut()) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "provider events dropped");
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }

    async fn try_source(
        &self,
        source: &ProviderSource,
    ) -> Result<(Arc<dyn WalletProvider>, ProviderAccount)> {
        match source {
            ProviderSource::Injected(provider) => {
                let account = self.connect_with(provider.as_ref()).await?;
                Ok((Arc::clone(provider), account))
            },
            ProviderSource::ModalSelected { providers, picker } => {
                let choices: Vec<ProviderChoice> = providers
                    .iter()
                    .map(|p| ProviderChoice {
                        kind: p.kind(),
                        name: p.name().to_string(),
                    })
                    .collect();
                let picked = tokio::time::timeout(self.timeout, picker.pick(&choices))
                    .await
                    .map_err(|_| FlowError::ConnectionTimedOut(self.timeout))?;
                let provider = picked
                    .and_then(|i| providers.get(i))
                    .ok_or_else(|| FlowError::Connection("Wallet selection was closed".to_string()))?;
                debug!(provider = provider.name(), kind = %provider.kind(), "provider picked in modal");
                let account = self.connect_with(provider.as_ref()).await?;
                Ok((Arc::clone(provider), account))
            },
        }
    }

    async fn connect_with(&self, provider: &dyn WalletProvider) -> Result<ProviderAccount> {
        let account = tokio::time::timeout(self.timeout, provider.connect())
            .await
            .map_err(|_| FlowError::ConnectionTimedOut(self.timeout))?
            .map_err(|e| FlowError::Connection(e.to_string()))?;
        if account.address.trim().is_empty() {
            return Err(FlowError::Connection(
                "Provider returned an empty address".to_string(),
            ));
        }
        Ok(account)
    }

    async fn establish(
        &self,
        generation: u64,
        provider: Arc<dyn WalletProvider>,
        account: ProviderAccount,
    ) -> Result<WalletSession> {
        let approved = self.is_approved(&account.address);
        let session = WalletSession {
            address: account.address,
            chain_id: account.chain_id,
            approved,
        };

        // Held until the status is written; `release` takes the same lock.
        let mut active = self.active.lock().await;
        if self.is_superseded(generation) {
            debug!(provider = provider.name(), "gate released during connect, dropping result");
            provider.release().await;
            return Err(FlowError::ConnectionSuperseded);
        }

        if let Some(previous) = active.take() {
            previous.provider.release().await;
        }
        if approved {
            let events = provider.subscribe();
            *active = Some(ActiveConnection { provider, events });
        } else {
            // Nothing more is expected from a rejected wallet.
            provider.release().await;
        }

        info!(
            address = %session.address,
            chain_id = session.chain_id,
            approved,
            "wallet connected"
        );
        self.set_status(if approved {
            GateStatus::ConnectedApproved
        } else {
            GateStatus::ConnectedRejected
        });
        Ok(session)
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) != generation
    }

    fn set_status(&self, status: GateStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

/// Fluent builder for [`WalletGate`]. Provider capabilities are checked once,
/// in [`build`](Self::build).
pub struct WalletGateBuilder {
    injected: Vec<Arc<dyn WalletProvider>>,
    modal: Vec<Arc<dyn WalletProvider>>,
    picker: Option<Arc<dyn ProviderPicker>>,
    allowlist: Arc<dyn AllowlistSource>,
    timeout: Duration,
}

impl Default for WalletGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletGateBuilder {
    pub fn new() -> Self {
        Self {
            injected: Vec::new(),
            modal: Vec::new(),
            picker: None,
            allowlist: Arc::new(Allowlist::builder().add_addresses(APPROVED_WALLETS).build()),
            timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Wallet tried directly before the modal is shown.
    pub fn with_injected(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.injected.push(provider);
        self
    }

    /// Extra entry offered by the modal (e.g. a relay wallet).
    pub fn with_modal_provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.modal.push(provider);
        self
    }

    pub fn with_picker(mut self, picker: Arc<dyn ProviderPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn with_allowlist(mut self, allowlist: Arc<dyn AllowlistSource>) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> WalletGate {
        let injected: Vec<_> = self
            .injected
            .into_iter()
            .filter(|p| p.is_available())
            .collect();
        let mut sources: Vec<ProviderSource> = injected
            .first()
            .map(|p| ProviderSource::Injected(Arc::clone(p)))
            .into_iter()
            .collect();

        // The modal lists injected wallets as well as the dedicated entries.
        let choices: Vec<_> = injected
            .iter()
            .cloned()
            .chain(self.modal.into_iter().filter(|p| p.is_available()))
            .collect();
        match self.picker {
            Some(picker) if !choices.is_empty() => sources.push(ProviderSource::ModalSelected {
                providers: choices,
                picker,
            }),
            None if !choices.is_empty() => {
                warn!("no provider picker configured, selection modal disabled");
            },
            _ => {},
        }

        debug!(sources = ?sources, "wallet gate ready");
        WalletGate {
            sources,
            allowlist: self.allowlist,
            timeout: self.timeout,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            status: Mutex::new(GateStatus::Idle),
            active: tokio::sync::Mutex::new(None),
        }
    }
}
