//! Outgoing transactions validators attest to
//!
//! Each claim kind has two deterministic encodings:
//!
//! - a **checkpoint**, the keccak256 of the `abi.encode` layout the Gravity
//!   Ethereum contract rebuilds and checks signatures against;
//! - a **store index**, the keccak256 of a tagged, length-prefixed
//!   serialization of every claim field, used to group signatures by claim.
//!
//! ## Store Index Layout
//!
//! ```text
//! | tag (1 byte) | fields... |
//! ```
//!
//! Integers are big-endian `u64`, amounts are 32-byte big-endian words,
//! list lengths are big-endian `u64`, and strings / byte strings are a `u64`
//! length followed by the raw bytes. Ethereum addresses, including the
//! contract inside gravity denoms, are lowercased first so that differently
//! cased renderings of one address share an index. Signer set members are
//! ordered on the lowercased address.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolValue;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::{compare_ethereum_addresses, parse_ethereum_address};
use crate::config::GravityId;
use crate::denom::Erc20Token;
use crate::error::SignatureError;
use crate::hash::{keccak256, right_pad_bytes32};

const SIGNER_SET_METHOD: &[u8] = b"checkpoint";
const BATCH_METHOD: &[u8] = b"transactionBatch";
const CONTRACT_CALL_METHOD: &[u8] = b"logicCall";

// ============================================================================
// Claim Kind
// ============================================================================

/// The three claim kinds a validator can sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    SignerSetUpdate,
    ContractCall,
    BatchTransfer,
}

impl ClaimKind {
    /// Leading byte of the store index
    pub fn tag(&self) -> u8 {
        match self {
            ClaimKind::SignerSetUpdate => 0x01,
            ClaimKind::ContractCall => 0x02,
            ClaimKind::BatchTransfer => 0x03,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::SignerSetUpdate => "signer_set_update",
            ClaimKind::ContractCall => "contract_call",
            ClaimKind::BatchTransfer => "batch_transfer",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Signer Set
// ============================================================================

/// A member of the Ethereum signer set with its voting power
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthereumSigner {
    pub ethereum_address: String,
    pub power: u64,
}

/// Update of the validator set mirrored on the Ethereum contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerSetTx {
    pub nonce: u64,
    pub height: u64,
    pub signers: Vec<EthereumSigner>,
}

impl SignerSetTx {
    /// Members ordered by power descending, ties broken by address order
    pub fn sorted_signers(&self) -> Vec<&EthereumSigner> {
        let mut sorted: Vec<&EthereumSigner> = self.signers.iter().collect();
        sorted.sort_by(|a, b| {
            b.power.cmp(&a.power).then_with(|| {
                compare_ethereum_addresses(&a.ethereum_address, &b.ethereum_address)
            })
        });
        sorted
    }

    pub fn checkpoint(&self, gravity_id: &GravityId) -> Result<B256, SignatureError> {
        let mut validators = Vec::with_capacity(self.signers.len());
        let mut powers = Vec::with_capacity(self.signers.len());
        for signer in self.sorted_signers() {
            validators.push(claim_address("signers", &signer.ethereum_address)?);
            powers.push(U256::from(signer.power));
        }

        let encoded = (
            B256::from(*gravity_id.as_bytes()),
            method_name(SIGNER_SET_METHOD),
            U256::from(self.nonce),
            validators,
            powers,
        )
            .abi_encode_params();
        Ok(B256::from(keccak256(&encoded)))
    }

    pub fn store_index(&self) -> [u8; 32] {
        // Sort on the lowercased form so case variants keep their position
        let mut members: Vec<(String, u64)> = self
            .signers
            .iter()
            .map(|s| (s.ethereum_address.to_ascii_lowercase(), s.power))
            .collect();
        members.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| compare_ethereum_addresses(&a.0, &b.0))
        });

        let mut enc = IndexEncoder::new(ClaimKind::SignerSetUpdate);
        enc.u64(self.nonce).u64(self.height).count(members.len());
        for (address, power) in &members {
            enc.bytes(address.as_bytes()).u64(*power);
        }
        enc.finish()
    }
}

// ============================================================================
// Batch
// ============================================================================

/// A single transfer out to Ethereum, bundled into a batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SendToEthereum {
    pub id: u64,
    pub sender: String,
    pub ethereum_recipient: String,
    pub erc20_token: Erc20Token,
    pub erc20_fee: Erc20Token,
}

/// A batch of transfers of one ERC20 contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchTx {
    pub batch_nonce: u64,
    pub timeout: u64,
    pub token_contract: String,
    pub transactions: Vec<SendToEthereum>,
    pub height: u64,
}

impl BatchTx {
    pub fn checkpoint(&self, gravity_id: &GravityId) -> Result<B256, SignatureError> {
        let mut amounts = Vec::with_capacity(self.transactions.len());
        let mut destinations = Vec::with_capacity(self.transactions.len());
        let mut fees = Vec::with_capacity(self.transactions.len());
        for tx in &self.transactions {
            amounts.push(tx.erc20_token.amount);
            destinations.push(claim_address("ethereum_recipient", &tx.ethereum_recipient)?);
            fees.push(tx.erc20_fee.amount);
        }

        let encoded = (
            B256::from(*gravity_id.as_bytes()),
            method_name(BATCH_METHOD),
            amounts,
            destinations,
            fees,
            U256::from(self.batch_nonce),
            claim_address("token_contract", &self.token_contract)?,
            U256::from(self.timeout),
        )
            .abi_encode_params();
        Ok(B256::from(keccak256(&encoded)))
    }

    pub fn store_index(&self) -> [u8; 32] {
        let mut enc = IndexEncoder::new(ClaimKind::BatchTransfer);
        enc.address(&self.token_contract)
            .u64(self.batch_nonce)
            .u64(self.timeout)
            .u64(self.height)
            .count(self.transactions.len());
        for tx in &self.transactions {
            enc.u64(tx.id)
                .bytes(tx.sender.as_bytes())
                .address(&tx.ethereum_recipient)
                .token(&tx.erc20_token)
                .token(&tx.erc20_fee);
        }
        enc.finish()
    }
}

// ============================================================================
// Contract Call
// ============================================================================

/// An arbitrary call into an Ethereum contract, funded by bridged tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCallTx {
    pub invalidation_nonce: u64,
    pub invalidation_scope: Vec<u8>,
    pub address: String,
    pub payload: Vec<u8>,
    pub timeout: u64,
    pub tokens: Vec<Erc20Token>,
    pub fees: Vec<Erc20Token>,
    pub height: u64,
}

impl ContractCallTx {
    pub fn checkpoint(&self, gravity_id: &GravityId) -> Result<B256, SignatureError> {
        let (transfer_amounts, transfer_contracts) = split_tokens("tokens", &self.tokens)?;
        let (fee_amounts, fee_contracts) = split_tokens("fees", &self.fees)?;
        let invalidation_id = right_pad_bytes32(&self.invalidation_scope).ok_or_else(|| {
            SignatureError::InvalidClaim {
                field: "invalidation_scope",
                reason: format!(
                    "must be at most 32 bytes, got {}",
                    self.invalidation_scope.len()
                ),
            }
        })?;

        let encoded = (
            B256::from(*gravity_id.as_bytes()),
            method_name(CONTRACT_CALL_METHOD),
            transfer_amounts,
            transfer_contracts,
            fee_amounts,
            fee_contracts,
            claim_address("address", &self.address)?,
            Bytes::from(self.payload.clone()),
            U256::from(self.timeout),
            B256::from(invalidation_id),
            U256::from(self.invalidation_nonce),
        )
            .abi_encode_params();
        Ok(B256::from(keccak256(&encoded)))
    }

    pub fn store_index(&self) -> [u8; 32] {
        let mut enc = IndexEncoder::new(ClaimKind::ContractCall);
        enc.bytes(&self.invalidation_scope)
            .u64(self.invalidation_nonce)
            .address(&self.address)
            .bytes(&self.payload)
            .u64(self.timeout)
            .count(self.tokens.len());
        for token in &self.tokens {
            enc.token(token);
        }
        enc.count(self.fees.len());
        for fee in &self.fees {
            enc.token(fee);
        }
        enc.u64(self.height);
        enc.finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn method_name(name: &[u8]) -> B256 {
    let mut word = [0u8; 32];
    word[..name.len()].copy_from_slice(name);
    B256::from(word)
}

fn claim_address(field: &'static str, address: &str) -> Result<Address, SignatureError> {
    parse_ethereum_address(address).map_err(|e| SignatureError::InvalidClaim {
        field,
        reason: e.to_string(),
    })
}

fn split_tokens(
    field: &'static str,
    tokens: &[Erc20Token],
) -> Result<(Vec<U256>, Vec<Address>), SignatureError> {
    let mut amounts = Vec::with_capacity(tokens.len());
    let mut contracts = Vec::with_capacity(tokens.len());
    for token in tokens {
        amounts.push(token.amount);
        contracts.push(claim_address(field, token.contract())?);
    }
    Ok((amounts, contracts))
}

struct IndexEncoder {
    buf: Vec<u8>,
}

impl IndexEncoder {
    fn new(kind: ClaimKind) -> Self {
        Self {
            buf: vec![kind.tag()],
        }
    }

    fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Lengths are written as `u64`, which holds any `usize` without loss
    fn count(&mut self, len: usize) -> &mut Self {
        self.buf.extend_from_slice(&(len as u64).to_be_bytes());
        self
    }

    fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.count(data.len());
        self.buf.extend_from_slice(data);
        self
    }

    fn address(&mut self, address: &str) -> &mut Self {
        self.bytes(address.to_ascii_lowercase().as_bytes())
    }

    fn token(&mut self, token: &Erc20Token) -> &mut Self {
        self.bytes(token.index_denom().as_bytes());
        self.buf.extend_from_slice(&token.amount.to_be_bytes::<32>());
        self
    }

    fn finish(&self) -> [u8; 32] {
        keccak256(&self.buf)
    }
}
