#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use anchor_lang::prelude::*;
use crate::errors::FarmError;

mod u256 {
    use uint::construct_uint;

    construct_uint! {
        pub struct U256(4);
    }
}
pub use u256::U256;

/// floor(a * b / denom). The product is taken in 256 bits, so only a
/// quotient beyond u128 or a zero denominator fails.
pub fn mul_div_floor(a: u128, b: u128, denom: u128) -> Result<u128> {
    require!(denom != 0, FarmError::Overflow);
    let quotient = U256::from(a) * U256::from(b) / U256::from(denom);
    require!(quotient <= U256::from(u128::MAX), FarmError::Overflow);
    Ok(quotient.as_u128())
}

/// floor(a * b / denom) narrowed to u64.
pub fn mul_div_u64(a: u64, b: u64, denom: u64) -> Result<u64> {
    to_u64(mul_div_floor(a as u128, b as u128, denom as u128)?)
}

pub fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(FarmError::Overflow))
}

pub fn to_i128(value: u128) -> Result<i128> {
    i128::try_from(value).map_err(|_| error!(FarmError::Overflow))
}

pub fn add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or_else(|| error!(FarmError::Overflow))
}

pub fn sub_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or_else(|| error!(FarmError::InsufficientBalance))
}

/// Share-to-asset conversion used by both vaults: `floor(amount * numer / denom)`,
/// 1:1 while the vault is empty.
pub fn convert_proportional(amount: u64, numer: u64, denom: u64) -> Result<u64> {
    if numer == 0 || denom == 0 {
        return Ok(amount);
    }
    mul_div_u64(amount, numer, denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_rounds_down() {
        assert_eq!(mul_div_floor(10, 7, 3).unwrap(), 23);
        assert_eq!(mul_div_u64(1_000, 1, 3).unwrap(), 333);
    }

    #[test]
    fn mul_div_survives_wide_intermediate_products() {
        // 1e9 stake against an accumulator of 1e30 at 1e18 precision
        let acc = 1_000_000_000_000u128 * 1_000_000_000_000_000_000;
        assert_eq!(
            mul_div_floor(1_000_000_000, acc, 1_000_000_000_000_000_000).unwrap(),
            1_000_000_000_000_000_000_000
        );
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX).unwrap(), u128::MAX);
        assert!(mul_div_floor(u128::MAX, 2, 1).is_err());
    }

    #[test]
    fn mul_div_rejects_zero_denominator() {
        assert!(mul_div_floor(1, 1, 0).is_err());
    }

    #[test]
    fn narrowing_overflow_is_an_error() {
        assert!(to_u64(u64::MAX as u128 + 1).is_err());
        assert!(mul_div_u64(u64::MAX, 2, 1).is_err());
    }

    #[test]
    fn proportional_conversion_is_one_to_one_when_empty() {
        assert_eq!(convert_proportional(500, 0, 0).unwrap(), 500);
        assert_eq!(convert_proportional(500, 100, 200).unwrap(), 250);
    }
}
