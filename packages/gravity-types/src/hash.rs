//! Hash helpers shared by checkpoints and store indexes

use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Right-pad up to 32 bytes into a `bytes32` word (Solidity `bytes32("...")`).
///
/// Returns `None` when the input is longer than 32 bytes.
pub fn right_pad_bytes32(data: &[u8]) -> Option<[u8; 32]> {
    if data.len() > 32 {
        return None;
    }
    let mut word = [0u8; 32];
    word[..data.len()].copy_from_slice(data);
    Some(word)
}

/// Convert bytes to hex string with 0x prefix
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
