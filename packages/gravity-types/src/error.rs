//! Error types for the Gravity types crate
//!
//! Every failure that can be triggered by caller-supplied data is returned as
//! one of these enums. Nothing in this crate aborts on malformed input.

use alloy::primitives::{Address, U256};
use thiserror::Error;

// ============================================================================
// Address Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty")]
    Empty,

    #[error("address({address}) of the wrong length exp({expected}) actual({actual})")]
    WrongLength {
        address: String,
        expected: usize,
        actual: usize,
    },

    #[error("address({address}) doesn't pass regex")]
    PatternMismatch { address: String },
}

// ============================================================================
// Denom Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenomError {
    #[error("denom prefix({denom}) not equal to expected({expected})")]
    InvalidPrefix { denom: String, expected: String },

    #[error("ethereum contract address: {0}")]
    InvalidContract(#[from] AddressError),

    #[error("len(denom)({actual}) not equal to GravityDenomLen({expected})")]
    WrongLength { expected: usize, actual: usize },

    #[error("invalid contract address: {left} != {right}")]
    ContractMismatch { left: String, right: String },

    #[error("invalid amount: {left} + {right} does not fit in 64 bits")]
    AmountOverflow { left: U256, right: U256 },

    #[error("invalid amount: {amount} does not fit in 64 bits")]
    AmountTooLarge { amount: U256 },
}

// ============================================================================
// Signature Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("ethereum signer: {0}")]
    InvalidSigner(#[from] AddressError),

    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("invalid claim {field}: {reason}")]
    InvalidClaim { field: &'static str, reason: String },

    #[error("signature recovery failed: {0}")]
    Recovery(String),

    #[error("signature recovered to {recovered}, expected signer {expected}")]
    SignerMismatch { expected: Address, recovered: Address },
}
