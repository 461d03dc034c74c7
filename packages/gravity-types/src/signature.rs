//! Validator attestation signatures
//!
//! A validator's Ethereum key signs the checkpoint of an outgoing
//! transaction. [`EthereumSignature`] is a closed set of the three things a
//! validator can sign; every consumer matches on it exhaustively.
//!
//! # Validation Flow
//!
//! 1. The stored signer must be a well-formed Ethereum address
//! 2. The signature must be 65 bytes (`r || s || v`)
//! 3. The claim checkpoint is computed under the gravity id
//! 4. The checkpoint is wrapped as an EIP-191 personal message and hashed
//! 5. The recovered address must equal the stored signer

use alloy::primitives::{eip191_hash_message, Address, B256};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::address::parse_ethereum_address;
use crate::claims::{BatchTx, ClaimKind, ContractCallTx, SignerSetTx};
use crate::config::GravityId;
use crate::error::SignatureError;
use crate::hash::bytes32_to_hex;
use crate::recovery::{EcdsaRecovery, SignatureRecovery, SIGNATURE_LEN};

/// A signature by a validator's Ethereum key over one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EthereumSignature {
    SignerSetUpdate {
        ethereum_signer: String,
        signature: Vec<u8>,
        signer_set: SignerSetTx,
    },
    ContractCall {
        ethereum_signer: String,
        signature: Vec<u8>,
        contract_call: ContractCallTx,
    },
    BatchTransfer {
        ethereum_signer: String,
        signature: Vec<u8>,
        batch: BatchTx,
    },
}

impl EthereumSignature {
    pub fn kind(&self) -> ClaimKind {
        match self {
            EthereumSignature::SignerSetUpdate { .. } => ClaimKind::SignerSetUpdate,
            EthereumSignature::ContractCall { .. } => ClaimKind::ContractCall,
            EthereumSignature::BatchTransfer { .. } => ClaimKind::BatchTransfer,
        }
    }

    /// The signer as stored, unparsed
    pub fn ethereum_signer(&self) -> &str {
        match self {
            EthereumSignature::SignerSetUpdate {
                ethereum_signer, ..
            }
            | EthereumSignature::ContractCall {
                ethereum_signer, ..
            }
            | EthereumSignature::BatchTransfer {
                ethereum_signer, ..
            } => ethereum_signer.as_str(),
        }
    }

    pub fn signature(&self) -> &[u8] {
        match self {
            EthereumSignature::SignerSetUpdate { signature, .. }
            | EthereumSignature::ContractCall { signature, .. }
            | EthereumSignature::BatchTransfer { signature, .. } => signature.as_slice(),
        }
    }

    /// Parse the stored signer. Hex case is ignored and checksums are not enforced.
    pub fn signer(&self) -> Result<Address, SignatureError> {
        Ok(parse_ethereum_address(self.ethereum_signer())?)
    }

    /// Key identifying which claim this signature attests to.
    ///
    /// Derived from the claim payload only, so every validator's signature
    /// over the same claim shares one index.
    pub fn store_index(&self) -> [u8; 32] {
        match self {
            EthereumSignature::SignerSetUpdate { signer_set, .. } => signer_set.store_index(),
            EthereumSignature::ContractCall { contract_call, .. } => contract_call.store_index(),
            EthereumSignature::BatchTransfer { batch, .. } => batch.store_index(),
        }
    }

    /// Checkpoint of the claim under `gravity_id`
    pub fn checkpoint(&self, gravity_id: &GravityId) -> Result<B256, SignatureError> {
        match self {
            EthereumSignature::SignerSetUpdate { signer_set, .. } => {
                signer_set.checkpoint(gravity_id)
            }
            EthereumSignature::ContractCall { contract_call, .. } => {
                contract_call.checkpoint(gravity_id)
            }
            EthereumSignature::BatchTransfer { batch, .. } => batch.checkpoint(gravity_id),
        }
    }

    /// The hash the validator's key actually signs:
    /// `keccak256("\x19Ethereum Signed Message:\n32" || checkpoint)`
    pub fn message_hash(&self, gravity_id: &GravityId) -> Result<B256, SignatureError> {
        let checkpoint = self.checkpoint(gravity_id)?;
        Ok(eip191_hash_message(checkpoint))
    }

    pub fn validate(&self, gravity_id: &GravityId) -> Result<(), SignatureError> {
        self.validate_with(gravity_id, &EcdsaRecovery)
    }

    pub fn validate_with<R: SignatureRecovery + ?Sized>(
        &self,
        gravity_id: &GravityId,
        recovery: &R,
    ) -> Result<(), SignatureError> {
        let expected = self.signer()?;

        if self.signature().len() != SIGNATURE_LEN {
            return Err(SignatureError::MalformedSignature {
                reason: format!(
                    "expected {} bytes, got {}",
                    SIGNATURE_LEN,
                    self.signature().len()
                ),
            });
        }

        let message_hash = self.message_hash(gravity_id)?;
        let recovered = recovery.recover(&message_hash, self.signature())?;

        if recovered != expected {
            warn!(
                kind = %self.kind(),
                expected = %expected,
                recovered = %recovered,
                store_index = %bytes32_to_hex(&self.store_index()),
                "Attestation signature does not match signer"
            );
            return Err(SignatureError::SignerMismatch {
                expected,
                recovered,
            });
        }

        debug!(
            kind = %self.kind(),
            signer = %expected,
            message_hash = %message_hash,
            "Attestation signature verified"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::EthereumSigner;
    use crate::error::AddressError;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    struct FixedRecovery(Address);

    impl SignatureRecovery for FixedRecovery {
        fn recover(&self, _: &B256, _: &[u8]) -> Result<Address, SignatureError> {
            Ok(self.0)
        }
    }

    fn gravity_id() -> GravityId {
        GravityId::new("defaultgravityid").unwrap()
    }

    fn signer_set(nonce: u64) -> SignerSetTx {
        SignerSetTx {
            nonce,
            height: 10,
            signers: vec![EthereumSigner {
                ethereum_address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
                power: 1000,
            }],
        }
    }

    fn signed(key: &PrivateKeySigner, set: SignerSetTx) -> EthereumSignature {
        let checkpoint = set.checkpoint(&gravity_id()).unwrap();
        let sig = key.sign_message_sync(checkpoint.as_slice()).unwrap();
        EthereumSignature::SignerSetUpdate {
            ethereum_signer: key.address().to_string(),
            signature: sig.as_bytes().to_vec(),
            signer_set: set,
        }
    }

    #[test]
    fn test_validate_real_signature() {
        let key = PrivateKeySigner::random();
        let att = signed(&key, signer_set(1));
        assert_eq!(att.kind(), ClaimKind::SignerSetUpdate);
        assert_eq!(att.signer().unwrap(), key.address());
        att.validate(&gravity_id()).unwrap();
    }

    #[test]
    fn test_validate_lowercase_signer() {
        let key = PrivateKeySigner::random();
        let mut att = signed(&key, signer_set(1));
        if let EthereumSignature::SignerSetUpdate {
            ethereum_signer, ..
        } = &mut att
        {
            *ethereum_signer = ethereum_signer.to_lowercase();
        }
        att.validate(&gravity_id()).unwrap();
    }

    #[test]
    fn test_validate_rejects_malformed_signer() {
        let key = PrivateKeySigner::random();
        let mut att = signed(&key, signer_set(1));
        if let EthereumSignature::SignerSetUpdate {
            ethereum_signer, ..
        } = &mut att
        {
            *ethereum_signer = String::new();
        }
        assert_eq!(
            att.validate(&gravity_id()),
            Err(SignatureError::InvalidSigner(AddressError::Empty))
        );
        assert!(att.signer().is_err());
    }

    #[test]
    fn test_validate_rejects_short_signature() {
        let key = PrivateKeySigner::random();
        let mut att = signed(&key, signer_set(1));
        if let EthereumSignature::SignerSetUpdate { signature, .. } = &mut att {
            signature.truncate(64);
        }
        assert!(matches!(
            att.validate(&gravity_id()),
            Err(SignatureError::MalformedSignature { .. })
        ));
    }

    #[test]
    fn test_validate_uses_recovery_result() {
        let key = PrivateKeySigner::random();
        let att = signed(&key, signer_set(1));

        assert!(att
            .validate_with(&gravity_id(), &FixedRecovery(key.address()))
            .is_ok());

        let other = PrivateKeySigner::random().address();
        assert_eq!(
            att.validate_with(&gravity_id(), &FixedRecovery(other)),
            Err(SignatureError::SignerMismatch {
                expected: key.address(),
                recovered: other,
            })
        );
    }

    #[test]
    fn test_store_index_ignores_signer() {
        let a = signed(&PrivateKeySigner::random(), signer_set(4));
        let b = signed(&PrivateKeySigner::random(), signer_set(4));
        assert_ne!(a.signature(), b.signature());
        assert_eq!(a.store_index(), b.store_index());

        let c = signed(&PrivateKeySigner::random(), signer_set(5));
        assert_ne!(a.store_index(), c.store_index());
    }
}
