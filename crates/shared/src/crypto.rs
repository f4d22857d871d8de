//! Screen API key generation and fingerprinting.
//!
//! Keys are stored verbatim so they can be handed back to the device during
//! pairing; logs only ever see the short prefix.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

/// Prefix carried by every screen API key.
pub const API_KEY_PREFIX: &str = "msk_";

/// Random bytes per API key (256 bits of entropy).
const API_KEY_RANDOM_BYTES: usize = 32;

/// Generates a new screen API key: `msk_` followed by 32 random bytes,
/// base64url-encoded without padding.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_RANDOM_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", API_KEY_PREFIX, URL_SAFE_NO_PAD.encode(bytes))
}

/// Extracts the loggable prefix of an API key (first 8 characters after
/// `msk_`). Returns `None` for keys that do not look like screen keys.
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    if key.starts_with(API_KEY_PREFIX) && key.len() >= API_KEY_PREFIX.len() + 8 {
        Some(&key[API_KEY_PREFIX.len()..API_KEY_PREFIX.len() + 8])
    } else {
        None
    }
}
