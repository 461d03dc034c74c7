//! Gravity denom codec
//!
//! ERC20 tokens bridged from Ethereum are represented on the host chain as
//! coins whose denom embeds the token contract:
//!
//! ```text
//! | GRAVITY_DENOM_PREFIX | GRAVITY_DENOM_SEPARATOR | 0x + 40 hex chars |
//! ```
//!
//! With the default constants `gravity0xAbCd...01` is the denom of contract
//! `0xAbCd...01` and has length 49.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::address::{validate_ethereum_address, ETH_CONTRACT_ADDRESS_LEN};
use crate::error::DenomError;

/// Prefix for all assets minted by the module
pub const GRAVITY_DENOM_PREFIX: &str = "gravity";

/// Separator between the prefix and the contract address
pub const GRAVITY_DENOM_SEPARATOR: &str = "";

/// Length of the denoms generated by the module
pub const GRAVITY_DENOM_LEN: usize =
    GRAVITY_DENOM_PREFIX.len() + GRAVITY_DENOM_SEPARATOR.len() + ETH_CONTRACT_ADDRESS_LEN;

/// Build the denom for an Ethereum token contract. Does not validate.
pub fn gravity_denom(contract: &str) -> String {
    let mut denom = String::with_capacity(
        GRAVITY_DENOM_PREFIX.len() + GRAVITY_DENOM_SEPARATOR.len() + contract.len(),
    );
    denom.push_str(GRAVITY_DENOM_PREFIX);
    denom.push_str(GRAVITY_DENOM_SEPARATOR);
    denom.push_str(contract);
    denom
}

fn full_prefix() -> String {
    format!("{}{}", GRAVITY_DENOM_PREFIX, GRAVITY_DENOM_SEPARATOR)
}

/// Strictly decode a gravity denom into its Ethereum contract address.
///
/// Checks, in order: the prefix, the embedded address, the total length.
pub fn gravity_denom_to_erc20(denom: &str) -> Result<&str, DenomError> {
    let prefix = full_prefix();
    let contract = denom
        .strip_prefix(prefix.as_str())
        .ok_or_else(|| DenomError::InvalidPrefix {
            denom: denom.to_string(),
            expected: prefix.clone(),
        })?;

    validate_ethereum_address(contract)?;

    if denom.len() != GRAVITY_DENOM_LEN {
        return Err(DenomError::WrongLength {
            expected: GRAVITY_DENOM_LEN,
            actual: denom.len(),
        });
    }

    Ok(contract)
}

// ============================================================================
// ERC20 Token
// ============================================================================

/// An amount of a bridged ERC20, carried as a host-chain coin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Erc20Token {
    pub amount: U256,
    pub denom: String,
}

impl Erc20Token {
    /// Create a token from a 64-bit amount and a contract address
    pub fn new(amount: u64, contract: &str) -> Self {
        Self::from_amount(U256::from(amount), contract)
    }

    /// Create a token from an arbitrary precision amount
    pub fn from_amount(amount: U256, contract: &str) -> Self {
        Self {
            amount,
            denom: gravity_denom(contract),
        }
    }

    /// The contract part of the denom, returned verbatim.
    ///
    /// When the denom does not carry the gravity prefix it is returned
    /// unchanged. Use [`gravity_denom_to_erc20`] for strict decoding.
    pub fn contract(&self) -> &str {
        let prefix = full_prefix();
        self.denom
            .strip_prefix(prefix.as_str())
            .unwrap_or(self.denom.as_str())
    }

    /// Denom with the embedded contract lowercased, for case-insensitive keys.
    ///
    /// Denoms without the gravity prefix are host-chain denoms and are
    /// returned unchanged.
    pub fn index_denom(&self) -> String {
        let prefix = full_prefix();
        match self.denom.strip_prefix(prefix.as_str()) {
            Some(contract) => gravity_denom(&contract.to_ascii_lowercase()),
            None => self.denom.clone(),
        }
    }

    /// Stateless validation of the embedded contract
    pub fn validate_basic(&self) -> Result<(), DenomError> {
        validate_ethereum_address(self.contract())?;
        Ok(())
    }

    /// The amount as a `u64`, failing when it does not fit
    pub fn amount_u64(&self) -> Result<u64, DenomError> {
        u64::try_from(self.amount).map_err(|_| DenomError::AmountTooLarge {
            amount: self.amount,
        })
    }

    /// Add two tokens of the same contract.
    ///
    /// The sum must fit in 64 bits.
    pub fn checked_add(&self, other: &Erc20Token) -> Result<Erc20Token, DenomError> {
        if self.contract() != other.contract() {
            return Err(DenomError::ContractMismatch {
                left: self.contract().to_string(),
                right: other.contract().to_string(),
            });
        }

        let sum = self
            .amount
            .checked_add(other.amount)
            .filter(|sum| *sum <= U256::from(u64::MAX));

        match sum {
            Some(sum) => Ok(Erc20Token::from_amount(sum, self.contract())),
            None => {
                warn!(
                    contract = self.contract(),
                    left = %self.amount,
                    right = %other.amount,
                    "ERC20 addition exceeds 64-bit amount range"
                );
                Err(DenomError::AmountOverflow {
                    left: self.amount,
                    right: other.amount,
                })
            }
        }
    }
}

impl fmt::Display for Erc20Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
