use crate::core::constants::{EXPLORER_ADDRESS_URL, SHARE_URL};

/// Shortens an address for display: `0x742d...f44e`.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Block explorer page for `address`.
pub fn explorer_link(address: &str) -> String {
    format!("{}{}", EXPLORER_ADDRESS_URL, address)
}

/// Link that opens a prefilled "Share on X" post about the survey.
pub fn share_link() -> String {
    SHARE_URL.to_string()
}
