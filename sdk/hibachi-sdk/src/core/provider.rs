use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::broadcast;

/// How a provider reaches the user's wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Extension that injects itself into the page
    Injected,
    /// Relay-based connection (QR code / deep link to a mobile wallet)
    Relay,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Injected => write!(f, "injected"),
            ProviderKind::Relay => write!(f, "relay"),
        }
    }
}

/// What a provider returns after the user approves the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAccount {
    pub address: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The wallet switched accounts. Empty means the user disconnected.
    AccountsChanged(Vec<String>),
    ChainChanged(u64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not available")]
    Unavailable,

    #[error("No accounts found. Please unlock your wallet.")]
    NoAccounts,

    #[error("User rejected the request")]
    Rejected,

    #[error("{0}")]
    Other(String),
}

/// Abstraction over a wallet the visitor can connect.
/// This allows the gate to work with:
/// 1. Browser-injected wallets
/// 2. Relay wallets offered through the selection modal
/// 3. Scripted fakes in tests
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn name(&self) -> &str;

    /// Capability check, run once when the gate is built.
    fn is_available(&self) -> bool;

    /// Ask the wallet for an account. May suspend while the user answers the prompt.
    async fn connect(&self) -> Result<ProviderAccount, ProviderError>;

    /// Stream of wallet-side changes, if the provider emits them.
    fn subscribe(&self) -> Option<broadcast::Receiver<ProviderEvent>> {
        None
    }

    /// Drop any cached connection. Must be safe to call repeatedly.
    async fn release(&self) {}
}

/// One entry offered by the selection modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderChoice {
    pub kind: ProviderKind,
    pub name: String,
}

/// The user-facing half of the selection modal.
#[async_trait]
pub trait ProviderPicker: Send + Sync {
    /// Returns the index of the chosen entry, or `None` if the modal was closed.
    async fn pick(&self, choices: &[ProviderChoice]) -> Option<usize>;
}
