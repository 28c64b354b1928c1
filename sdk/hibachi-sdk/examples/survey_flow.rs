// Example: walking the whole survey flow with a scripted wallet
//
// This example demonstrates how to:
// 1. Build a wallet gate from the default configuration
// 2. Connect an approved wallet and answer the branching survey
// 3. Copy the reward code and restart

use async_trait::async_trait;
use hibachi_sdk::telemetry::init_tracing;
use hibachi_sdk::{
    format_address, Clipboard, ClipboardError, Flow, FlowConfig, ProviderAccount, ProviderError,
    ProviderKind, SurveyStep, WalletProvider,
};
use std::sync::Arc;

struct DemoWallet;

#[async_trait]
impl WalletProvider for DemoWallet {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Injected
    }

    fn name(&self) -> &str {
        "demo-wallet"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<ProviderAccount, ProviderError> {
        Ok(ProviderAccount {
            address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string(),
            chain_id: 1,
        })
    }
}

struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        println!("  [clipboard] {}", text);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Gate and flow from defaults
    let config = FlowConfig::default();
    let gate = Arc::new(config.gate_builder().with_injected(Arc::new(DemoWallet)).build());
    let mut flow = Flow::from_config(&config, gate)?;

    // 2. Connect
    flow.connect_wallet().await?;
    if let Some(session) = flow.session() {
        println!("Connected {}", format_address(&session.address));
    }

    // 3. Always pick the first option
    loop {
        let question = flow.question()?;
        println!(
            "[{:>3.0}%] {} -> {}",
            question.progress * 100.0,
            question.prompt,
            question.options[0]
        );
        flow.select_option(&question.options[0])?;
        if let SurveyStep::Rewarded(reward) = flow.advance().await? {
            println!("Reward code: {}", reward.code);
            println!("Share: {}", reward.share_link);
            break;
        }
    }

    // 4. Copy and start over
    flow.copy_reward(&StdoutClipboard).await;
    flow.restart().await;
    println!("Back at {:?}", flow.stage());

    Ok(())
}
