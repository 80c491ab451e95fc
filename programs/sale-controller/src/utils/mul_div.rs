use anchor_lang::prelude::Result;

use crate::errors::SaleError;

/// Computes floor(amount * part / whole) through a u128 intermediate
/// # Arguments
/// * `amount` - The amount being divided up
/// * `part` - The numerator of the fraction
/// * `whole` - The denominator of the fraction
/// # Returns
/// * `Result<u64>` - The share of `amount`, rounded down
#[inline(always)]
pub fn pro_rata(amount: u64, part: u64, whole: u64) -> Result<u64> {
    if whole == 0 {
        return Err(SaleError::DivideByZero.into());
    }

    let product = (amount as u128)
        .checked_mul(part as u128)
        .ok_or(SaleError::ArithmeticOverflow)?;

    Ok(u64::try_from(product / whole as u128).map_err(|_| SaleError::ArithmeticOverflow)?)
}
