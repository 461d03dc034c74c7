//! Gravity Types: denoms and attestation signatures for the Gravity bridge
//!
//! This crate holds the pure, deterministic core shared by everything that
//! moves ERC20 tokens between Ethereum and the host chain:
//!
//! - **Address Validation** - Shape checks and canonical ordering of Ethereum addresses
//! - **Denom Codec** - Bijective mapping between ERC20 contracts and host-chain denoms
//! - **Claims** - Signer set, batch and contract call payloads with their checkpoints
//! - **Signatures** - Validator attestations over claims, with signer recovery
//! - **Configuration** - The gravity id domain separator, loaded at startup
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! gravity-types = { path = "../gravity-types" }
//! ```
//!
//! Nothing here holds shared state; every function can be called from any
//! number of attestation workers at once.

pub mod address;
pub mod claims;
pub mod config;
pub mod denom;
pub mod error;
pub mod hash;
pub mod recovery;
pub mod signature;

// Re-export commonly used items at the crate root
pub use address::{
    compare_ethereum_addresses, eth_addr_less_than, parse_ethereum_address,
    validate_ethereum_address, ETH_CONTRACT_ADDRESS_LEN,
};
pub use claims::{BatchTx, ClaimKind, ContractCallTx, EthereumSigner, SendToEthereum, SignerSetTx};
pub use config::{GravityConfig, GravityId};
pub use denom::{
    gravity_denom, gravity_denom_to_erc20, Erc20Token, GRAVITY_DENOM_LEN, GRAVITY_DENOM_PREFIX,
    GRAVITY_DENOM_SEPARATOR,
};
pub use error::{AddressError, DenomError, SignatureError};
pub use recovery::{EcdsaRecovery, SignatureRecovery};
pub use signature::EthereumSignature;
