use std::time::Duration;

/// Wallets allowed into the survey when no other list is configured.
pub const APPROVED_WALLETS: &[&str] = &[
    "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
    "0x06A85356DCb5b307096726FB86A78c59D38e08ee",
    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
    "0x6C99d42C2b15A24dfdCf939b85b6B2393EC58B09",
];

/// Placeholder gift card code until a real issuer is wired in.
pub const MOCK_REWARD_CODE: &str = "UBER-EATS-1234-5678";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// How long the "copied" acknowledgement stays visible.
pub const COPY_ACK_WINDOW: Duration = Duration::from_secs(2);

pub const EXPLORER_ADDRESS_URL: &str = "https://etherscan.io/address/";

/// Prefilled post offered next to the reward code.
pub const SHARE_URL: &str = "https://twitter.com/intent/tweet?text=Just%20completed%20the%20Hibachi%20survey%20and%20got%20rewarded!%20Check%20it%20out%3A";

pub const ROOT_QUESTION_ID: &str = "q1";
