//! Minimal ABI encoding for the handful of read calls the agent makes.
//!
//! Words are 32 bytes, hex-encoded without a `0x` prefix; call data is
//! the 4-byte selector followed by the encoded words.

use crate::application::ports::ChainError;

/// `get_dy(int128,int128,uint256)`.
pub const SELECTOR_GET_DY: &str = "5e0d443f";
/// `balanceOf(address)`.
pub const SELECTOR_BALANCE_OF: &str = "70a08231";
/// `decimals()`.
pub const SELECTOR_DECIMALS: &str = "313ce567";

/// Encode an unsigned integer as a 32-byte word.
#[must_use]
pub fn encode_u256(value: u64) -> String {
    format!("{value:064x}")
}

/// Encode a non-negative `int128` as a 32-byte word.
///
/// Pool slot indices are small and never negative; negative values are
/// clamped to zero rather than sign-extended.
#[must_use]
pub fn encode_i128(value: i32) -> String {
    let clamped = u64::try_from(value).unwrap_or(0);
    encode_u256(clamped)
}

/// Encode a 20-byte address (with or without `0x` prefix) as a word.
///
/// # Errors
///
/// Returns `ChainError::Transport` when the input is not a 40-digit hex
/// string.
pub fn encode_address(address: &str) -> Result<String, ChainError> {
    let hex = address.strip_prefix("0x").unwrap_or(address);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::Transport {
            message: format!("invalid address: {address}"),
        });
    }
    Ok(format!("{:0>64}", hex.to_lowercase()))
}

/// Build call data from a selector and encoded words.
#[must_use]
pub fn call_data(selector: &str, words: &[String]) -> String {
    let mut data = String::with_capacity(2 + 8 + words.len() * 64);
    data.push_str("0x");
    data.push_str(selector);
    for word in words {
        data.push_str(word);
    }
    data
}

/// Decode a single-word `eth_call` result into a `u64`.
///
/// # Errors
///
/// Returns `ChainError::Transport` for an empty, malformed, or
/// out-of-range result.
pub fn decode_u64(result: &str) -> Result<u64, ChainError> {
    let hex = result.strip_prefix("0x").unwrap_or(result);
    if hex.is_empty() {
        return Err(ChainError::Transport {
            message: "empty call result".to_string(),
        });
    }
    // Values above u64 range mean the word is not representable here.
    let value = u128::from_str_radix(hex, 16).map_err(|e| ChainError::Transport {
        message: format!("malformed call result {result}: {e}"),
    })?;
    u64::try_from(value).map_err(|_| ChainError::Transport {
        message: format!("call result out of range: {result}"),
    })
}
