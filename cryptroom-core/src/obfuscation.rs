//! Placeholder solution encoding.
//!
//! Solutions are NOT encrypted. They are written as `FHE-` followed by the
//! base64 of the number's decimal text, which is what the web client
//! produces, so both sides can read each other's rooms.

use crate::error::{CryptroomError, Result};
use base64::{engine::general_purpose, Engine as _};

pub const OBFUSCATION_PREFIX: &str = "FHE-";

/// Encode a finite number as a tagged string.
pub fn obfuscate(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(CryptroomError::obfuscation(format!(
            "cannot encode non-finite value {}",
            value
        )));
    }

    // Display for f64 is the shortest text that parses back to the same bits
    let text = value.to_string();
    Ok(format!(
        "{}{}",
        OBFUSCATION_PREFIX,
        general_purpose::STANDARD.encode(text.as_bytes())
    ))
}

/// Decode a tagged string back into its number. Untagged input is parsed
/// as a plain number.
pub fn deobfuscate(encoded: &str) -> Result<f64> {
    match encoded.strip_prefix(OBFUSCATION_PREFIX) {
        Some(payload) => {
            let bytes = general_purpose::STANDARD.decode(payload)?;
            let text = String::from_utf8(bytes)
                .map_err(|e| CryptroomError::obfuscation(format!("payload is not UTF-8: {}", e)))?;
            parse_number(&text)
        }
        None => parse_number(encoded),
    }
}

/// Shortened form used when showing an encoded solution.
pub fn preview(encoded: &str, max_chars: usize) -> String {
    let mut shown: String = encoded.chars().take(max_chars).collect();
    shown.push_str("...");
    shown
}

fn parse_number(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| CryptroomError::obfuscation(format!("'{}' is not a number: {}", text, e)))
}
