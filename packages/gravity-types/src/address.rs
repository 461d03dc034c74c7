//! Ethereum address validation and ordering
//!
//! Addresses travel through the module as `0x`-prefixed hex strings. This
//! module checks their shape and defines the canonical order used when signer
//! sets are iterated or hashed.

use alloy::primitives::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::AddressError;

/// Length of contract address strings (`0x` + 40 hex chars)
pub const ETH_CONTRACT_ADDRESS_LEN: usize = 42;

static ETH_ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^0x[0-9a-fA-F]{40}$").expect("static address pattern"));

/// Validate an Ethereum address string.
///
/// Each failure has its own variant: empty input, wrong length, and a string
/// of the right length that is not `0x` followed by hex digits.
pub fn validate_ethereum_address(address: &str) -> Result<(), AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }
    if address.len() != ETH_CONTRACT_ADDRESS_LEN {
        return Err(AddressError::WrongLength {
            address: address.to_string(),
            expected: ETH_CONTRACT_ADDRESS_LEN,
            actual: address.len(),
        });
    }
    if !ETH_ADDRESS_RE.is_match(address) {
        return Err(AddressError::PatternMismatch {
            address: address.to_string(),
        });
    }
    Ok(())
}

/// Parse a validated address string into 20 bytes.
///
/// Hex is case-insensitive and EIP-55 checksums are not enforced.
pub fn parse_ethereum_address(address: &str) -> Result<Address, AddressError> {
    validate_ethereum_address(address)?;
    Address::from_str(address).map_err(|_| AddressError::PatternMismatch {
        address: address.to_string(),
    })
}

/// Canonical order over address strings: byte-wise comparison of the raw
/// string, not of the numeric value.
pub fn compare_ethereum_addresses(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

pub fn eth_addr_less_than(a: &str, b: &str) -> bool {
    compare_ethereum_addresses(a, b) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID: &str = "0xAbCdEf0123456789aBcDef0123456789ABCDEF01";

    #[test]
    fn test_valid_addresses() {
        assert!(validate_ethereum_address(VALID).is_ok());
        assert!(validate_ethereum_address("0x0000000000000000000000000000000000000000").is_ok());
        assert!(validate_ethereum_address("0xffffffffffffffffffffffffffffffffffffffff").is_ok());
    }

    #[test]
    fn test_empty_address() {
        assert_eq!(validate_ethereum_address(""), Err(AddressError::Empty));
    }

    #[test]
    fn test_wrong_length() {
        let short = &VALID[..41];
        match validate_ethereum_address(short) {
            Err(AddressError::WrongLength {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 42);
                assert_eq!(actual, 41);
            }
            other => panic!("expected WrongLength, got {:?}", other),
        }

        let long = format!("{}0", VALID);
        assert!(matches!(
            validate_ethereum_address(&long),
            Err(AddressError::WrongLength { actual: 43, .. })
        ));
    }

    #[test]
    fn test_pattern_mismatch() {
        // Non-hex character
        let bad_char = "0xAbCdEf0123456789aBcDef0123456789ABCDEF0g";
        assert!(matches!(
            validate_ethereum_address(bad_char),
            Err(AddressError::PatternMismatch { .. })
        ));

        // Missing 0x prefix, still 42 chars
        let no_prefix = "00AbCdEf0123456789aBcDef0123456789ABCDEF01";
        assert!(matches!(
            validate_ethereum_address(no_prefix),
            Err(AddressError::PatternMismatch { .. })
        ));

        // Uppercase X is not accepted
        let upper_x = "0XAbCdEf0123456789aBcDef0123456789ABCDEF01";
        assert!(matches!(
            validate_ethereum_address(upper_x),
            Err(AddressError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let lower = parse_ethereum_address(&VALID.to_lowercase()).unwrap();
        let mixed = parse_ethereum_address(VALID).unwrap();
        assert_eq!(lower, mixed);
        assert!(parse_ethereum_address("0x1234").is_err());
    }

    #[test]
    fn test_compare_is_bytewise() {
        // 'A' (0x41) sorts before 'a' (0x61) even though the numeric value is equal
        let upper = "0xA000000000000000000000000000000000000000";
        let lower = "0xa000000000000000000000000000000000000000";
        assert_eq!(compare_ethereum_addresses(upper, lower), Ordering::Less);
        assert!(eth_addr_less_than(upper, lower));
        assert!(!eth_addr_less_than(lower, upper));
        assert!(!eth_addr_less_than(upper, upper));
    }

    fn address_strategy() -> impl Strategy<Value = String> {
        "0x[0-9a-fA-F]{40}"
    }

    proptest! {
        #[test]
        fn prop_generated_addresses_validate(a in address_strategy()) {
            prop_assert!(validate_ethereum_address(&a).is_ok());
        }

        #[test]
        fn prop_compare_is_total_order(
            a in address_strategy(),
            b in address_strategy(),
            c in address_strategy(),
        ) {
            prop_assert_eq!(compare_ethereum_addresses(&a, &a), Ordering::Equal);
            prop_assert_eq!(
                compare_ethereum_addresses(&a, &b),
                compare_ethereum_addresses(&b, &a).reverse()
            );
            prop_assert_eq!(compare_ethereum_addresses(&a, &b) == Ordering::Equal, a == b);
            if compare_ethereum_addresses(&a, &b) != Ordering::Greater
                && compare_ethereum_addresses(&b, &c) != Ordering::Greater
            {
                prop_assert_ne!(compare_ethereum_addresses(&a, &c), Ordering::Greater);
            }
        }
    }
}
