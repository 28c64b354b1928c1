#![allow(dead_code)]

use async_trait::async_trait;
use hibachi_sdk::allowlist::Allowlist;
use hibachi_sdk::{
    Answers, Clipboard, ClipboardError, FlowError, ProviderAccount, ProviderChoice,
    ProviderError, ProviderEvent, ProviderKind, ProviderPicker, RewardIssuer, RewardRecord,
    WalletGate, WalletProvider,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

pub const APPROVED: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
pub const STRANGER: &str = "0x0000000000000000000000000000000000000001";

/// Wallet that answers connection requests from a script.
pub struct ScriptedProvider {
    kind: ProviderKind,
    name: String,
    available: bool,
    delay: Duration,
    script: Mutex<VecDeque<Result<ProviderAccount, ProviderError>>>,
    pub connects: AtomicUsize,
    pub releases: AtomicUsize,
    events: broadcast::Sender<ProviderEvent>,
}

impl ScriptedProvider {
    pub fn new(kind: ProviderKind, name: &str) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            kind,
            name: name.to_string(),
            available: true,
            delay: Duration::ZERO,
            script: Mutex::new(VecDeque::new()),
            connects: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            events,
        }
    }

    pub fn injected() -> Self {
        Self::new(ProviderKind::Injected, "injected-wallet")
    }

    pub fn relay() -> Self {
        Self::new(ProviderKind::Relay, "relay-wallet")
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn answers(self, address: &str) -> Self {
        self.push(Ok(account(address)));
        self
    }

    pub fn fails(self, error: ProviderError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, result: Result<ProviderAccount, ProviderError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn connect(&self) -> Result<ProviderAccount, ProviderError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::Rejected))
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<ProviderEvent>> {
        Some(self.events.subscribe())
    }

    async fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn account(address: &str) -> ProviderAccount {
    ProviderAccount {
        address: address.to_string(),
        chain_id: 1,
    }
}

/// Modal user that always picks the entry with the given name, or closes the modal.
pub struct NamedPicker {
    pub name: Option<String>,
    pub seen: Mutex<Vec<ProviderChoice>>,
}

impl NamedPicker {
    pub fn choosing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: Some(name.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn closing() -> Arc<Self> {
        Arc::new(Self {
            name: None,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ProviderPicker for NamedPicker {
    async fn pick(&self, choices: &[ProviderChoice]) -> Option<usize> {
        *self.seen.lock().unwrap() = choices.to_vec();
        let name = self.name.as_deref()?;
        choices.iter().position(|c| c.name == name)
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    pub text: Mutex<Option<String>>,
    pub deny: bool,
}

impl MemoryClipboard {
    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError::Denied);
        }
        *self.text.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// Issuer that fails a set number of times before handing out a code.
pub struct FlakyIssuer {
    pub failures_left: AtomicUsize,
    pub calls: Mutex<Vec<(String, Answers)>>,
}

impl FlakyIssuer {
    pub fn failing(times: usize) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicUsize::new(times),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl RewardIssuer for FlakyIssuer {
    async fn issue_reward(
        &self,
        wallet_address: &str,
        answers: &Answers,
    ) -> hibachi_sdk::Result<RewardRecord> {
        self.calls
            .lock()
            .unwrap()
            .push((wallet_address.to_string(), answers.clone()));
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(FlowError::Reward("issuer offline".to_string()));
        }
        Ok(RewardRecord::new(format!("CODE-{}", answers.len())))
    }
}

pub fn approved_list() -> Arc<Allowlist> {
    Arc::new(Allowlist::builder().add_address(APPROVED).build())
}

pub fn injected_gate(provider: Arc<ScriptedProvider>) -> Arc<WalletGate> {
    Arc::new(
        WalletGate::builder()
            .with_injected(provider)
            .with_allowlist(approved_list())
            .build(),
    )
}
