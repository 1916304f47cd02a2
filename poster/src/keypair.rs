//! Signer loading.
//!
//! Reads a keypair in the Solana CLI file format: a JSON array of the 64
//! secret-then-public key bytes.

use std::path::Path;

use solana_sdk::signature::Keypair;

use crate::config::ConfigError;

/// Length of a serialized keypair.
pub const KEYPAIR_LEN: usize = 64;

/// Loads a keypair file.
///
/// # Errors
///
/// Returns an error if the file is unreadable, is not a JSON byte array, or
/// does not hold a valid 64-byte keypair.
pub fn load_keypair(path: &Path) -> Result<Keypair, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| keypair_error(path, e.to_string()))?;
    parse_keypair(&text).map_err(|reason| keypair_error(path, reason))
}

/// Parses the JSON contents of a keypair file.
fn parse_keypair(text: &str) -> Result<Keypair, String> {
    let bytes: Vec<u8> =
        serde_json::from_str(text).map_err(|e| format!("not a JSON byte array: {}", e))?;

    if bytes.len() != KEYPAIR_LEN {
        return Err(format!(
            "expected {} bytes, found {}",
            KEYPAIR_LEN,
            bytes.len()
        ));
    }

    // the error from the conversion is never printed, it may echo key bytes
    Keypair::try_from(bytes.as_slice()).map_err(|_| "invalid keypair bytes".to_string())
}

fn keypair_error(path: &Path, reason: String) -> ConfigError {
    ConfigError::Keypair {
        path: path.display().to_string(),
        reason,
    }
}
