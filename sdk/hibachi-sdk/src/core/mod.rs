pub mod clipboard;
pub mod constants;
pub mod provider;
pub mod rewards;
