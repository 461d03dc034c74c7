//! Signer recovery from secp256k1 signatures
//!
//! Validation only needs "which address produced this signature over this
//! hash". The trait keeps that primitive swappable; [`EcdsaRecovery`] is the
//! production implementation backed by alloy's k256 support.

use alloy::primitives::{Address, PrimitiveSignature, B256};

use crate::error::SignatureError;

/// Length of an `r || s || v` signature
pub const SIGNATURE_LEN: usize = 65;

pub trait SignatureRecovery: Send + Sync {
    /// Recover the address that signed `message_hash`
    fn recover(&self, message_hash: &B256, signature: &[u8]) -> Result<Address, SignatureError>;
}

/// ECDSA public key recovery over secp256k1
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaRecovery;

impl SignatureRecovery for EcdsaRecovery {
    fn recover(&self, message_hash: &B256, signature: &[u8]) -> Result<Address, SignatureError> {
        if signature.len() != SIGNATURE_LEN {
            return Err(SignatureError::MalformedSignature {
                reason: format!(
                    "expected {} bytes, got {}",
                    SIGNATURE_LEN,
                    signature.len()
                ),
            });
        }

        let sig = PrimitiveSignature::try_from(signature).map_err(|e| {
            SignatureError::MalformedSignature {
                reason: e.to_string(),
            }
        })?;

        sig.recover_address_from_prehash(message_hash)
            .map_err(|e| SignatureError::Recovery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    #[test]
    fn test_recovers_signer() {
        let signer = PrivateKeySigner::random();
        let hash = B256::from([7u8; 32]);
        let sig = signer.sign_hash_sync(&hash).unwrap();

        let recovered = EcdsaRecovery.recover(&hash, &sig.as_bytes()).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_other_hash_recovers_other_address() {
        let signer = PrivateKeySigner::random();
        let sig = signer.sign_hash_sync(&B256::from([7u8; 32])).unwrap();

        // Recovery succeeds, but yields a different key
        if let Ok(recovered) = EcdsaRecovery.recover(&B256::from([8u8; 32]), &sig.as_bytes()) {
            assert_ne!(recovered, signer.address());
        }
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = EcdsaRecovery
            .recover(&B256::ZERO, &[0u8; 64])
            .unwrap_err();
        assert!(matches!(err, SignatureError::MalformedSignature { .. }));
    }

    #[test]
    fn test_rejects_garbage_signature() {
        // r = s = 0 is never a valid signature
        assert!(EcdsaRecovery.recover(&B256::ZERO, &[0u8; 65]).is_err());
    }
}
