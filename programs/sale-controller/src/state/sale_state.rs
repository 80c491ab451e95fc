use anchor_lang::prelude::*;

use crate::{constants::UNSET_AUTHORIZER, errors::SaleError};

/// Sale state account - price, caps, sale mode and supply accounting
#[account]
#[derive(InitSpace)]
pub struct SaleState {
    // The 0-decimal mint issuing the sale's units
    pub asset_mint: Pubkey,

    // Price per unit in lamports, 0 means not set
    pub price: u64,

    // Maximum units a sender may buy in a single window, 0 means unlimited
    pub max_per_window: u64,

    // Maximum units a sender may buy over the life of the sale, 0 means unlimited
    pub max_per_sender: u64,

    // True if the public sale is open
    pub public_sale_active: bool,

    // True if the signed sale is open
    pub signed_sale_active: bool,

    // True if a sender may purchase at most once per window
    pub one_purchase_per_window: bool,

    /// Ethereum address (20 bytes) of the off-chain authorizer
    /// All zeros ([0u8; 20]) means not set
    pub authorizer: [u8; 20],

    // Supply ceiling, fixed at initialization
    pub max_supply: u64,

    // Units issued through every path, reservations included
    pub total_issued: u64,

    // Units issued through the reservation path
    pub reserved: u64,

    // Hash committing to the asset content, settable once
    pub provenance: Option<[u8; 32]>,

    // Unix timestamp at which the asset content is revealed
    pub reveal_time: i64,

    // The bump used to derive the PDA for this account
    pub bump: u8,

    // The bump of the mint authority PDA
    pub mint_authority_bump: u8,
}

impl SaleState {
    pub fn ensure_public_sale_active(&self) -> Result<()> {
        require!(self.public_sale_active, SaleError::SaleNotActive);
        Ok(())
    }

    pub fn ensure_signed_sale_active(&self) -> Result<()> {
        require!(self.signed_sale_active, SaleError::SignedSaleNotActive);
        Ok(())
    }

    pub fn ensure_price_set(&self) -> Result<()> {
        require!(self.price > 0, SaleError::PriceNotSet);
        Ok(())
    }

    pub fn ensure_authorizer_set(&self) -> Result<()> {
        require!(
            self.authorizer != UNSET_AUTHORIZER,
            SaleError::AuthorizerNotSet
        );
        Ok(())
    }

    /// Returns the issued total after `units` more, failing if it passes `max_supply`
    pub fn check_supply(&self, units: u64) -> Result<u64> {
        let new_total = self
            .total_issued
            .checked_add(units)
            .ok_or(SaleError::ArithmeticOverflow)?;

        if new_total > self.max_supply {
            msg!(
                "Supply exceeded: requested {}, available {}",
                units,
                self.max_supply.saturating_sub(self.total_issued)
            );
            return err!(SaleError::SupplyExceeded);
        }

        Ok(new_total)
    }

    /// Window cap for a purchase: the tighter of `max_per_window` and the
    /// signed ceiling, where 0 on either side means unlimited
    pub fn window_cap(&self, max_permitted: Option<u64>) -> u64 {
        match (self.max_per_window, max_permitted.unwrap_or(0)) {
            (0, permitted) => permitted,
            (window, 0) => window,
            (window, permitted) => window.min(permitted),
        }
    }

    pub fn record_issue(&mut self, units: u64) -> Result<()> {
        self.total_issued = self.check_supply(units)?;
        Ok(())
    }

    pub fn record_reservation(&mut self, units: u64) -> Result<()> {
        self.record_issue(units)?;
        self.reserved = self
            .reserved
            .checked_add(units)
            .ok_or(SaleError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn set_provenance(&mut self, provenance: [u8; 32]) -> Result<()> {
        require!(
            self.provenance.is_none(),
            SaleError::ProvenanceAlreadySet
        );
        self.provenance = Some(provenance);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn create_test_sale_state(price: u64, max_supply: u64) -> SaleState {
    SaleState {
        asset_mint: Pubkey::new_unique(),
        price,
        max_per_window: 0,
        max_per_sender: 0,
        public_sale_active: true,
        signed_sale_active: true,
        one_purchase_per_window: false,
        authorizer: [7u8; 20],
        max_supply,
        total_issued: 0,
        reserved: 0,
        provenance: None,
        reveal_time: 0,
        bump: 255,
        mint_authority_bump: 254,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_supply_allows_exactly_max() {
        let state = create_test_sale_state(1, 50);
        assert_eq!(state.check_supply(50).unwrap(), 50);
    }

    #[test]
    fn test_check_supply_rejects_one_past_max() {
        let mut state = create_test_sale_state(1, 50);
        state.record_issue(50).unwrap();

        let err = state.check_supply(1).unwrap_err();
        assert_eq!(err, SaleError::SupplyExceeded.into());
        assert_eq!(state.total_issued, 50);
    }

    #[test]
    fn test_check_supply_overflow() {
        let mut state = create_test_sale_state(1, u64::MAX);
        state.total_issued = u64::MAX - 1;

        let err = state.check_supply(2).unwrap_err();
        assert_eq!(err, SaleError::ArithmeticOverflow.into());
    }

    #[test]
    fn test_reservation_counts_towards_total_issued() {
        let mut state = create_test_sale_state(1, 10);
        state.record_reservation(4).unwrap();
        state.record_issue(3).unwrap();

        assert_eq!(state.reserved, 4);
        assert_eq!(state.total_issued, 7);

        let err = state.record_reservation(4).unwrap_err();
        assert_eq!(err, SaleError::SupplyExceeded.into());
        assert_eq!(state.reserved, 4);
    }

    #[test]
    fn test_sale_mode_flags_are_independent() {
        let mut state = create_test_sale_state(1, 10);
        state.public_sale_active = false;

        assert_eq!(
            state.ensure_public_sale_active().unwrap_err(),
            SaleError::SaleNotActive.into()
        );
        assert!(state.ensure_signed_sale_active().is_ok());

        state.signed_sale_active = false;
        assert_eq!(
            state.ensure_signed_sale_active().unwrap_err(),
            SaleError::SignedSaleNotActive.into()
        );
    }

    #[test]
    fn test_price_and_authorizer_must_be_set() {
        let mut state = create_test_sale_state(0, 10);
        assert_eq!(
            state.ensure_price_set().unwrap_err(),
            SaleError::PriceNotSet.into()
        );

        state.authorizer = UNSET_AUTHORIZER;
        assert_eq!(
            state.ensure_authorizer_set().unwrap_err(),
            SaleError::AuthorizerNotSet.into()
        );
    }

    #[test]
    fn test_window_cap_takes_tighter_limit() {
        let mut state = create_test_sale_state(1, 10);
        assert_eq!(state.window_cap(None), 0);
        assert_eq!(state.window_cap(Some(3)), 3);

        state.max_per_window = 10;
        assert_eq!(state.window_cap(None), 10);
        assert_eq!(state.window_cap(Some(3)), 3);
        assert_eq!(state.window_cap(Some(20)), 10);
        assert_eq!(state.window_cap(Some(0)), 10);
    }

    #[test]
    fn test_provenance_set_once() {
        let mut state = create_test_sale_state(1, 10);
        state.set_provenance([1u8; 32]).unwrap();

        let err = state.set_provenance([2u8; 32]).unwrap_err();
        assert_eq!(err, SaleError::ProvenanceAlreadySet.into());
        assert_eq!(state.provenance, Some([1u8; 32]));
    }
}
