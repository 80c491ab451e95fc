use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use super::SplAssetLedger;
use crate::{
    checkout::reserve,
    constants::{MINT_AUTHORITY_SEED, SALE_STATE_SEED},
    errors::SaleError,
    events::UnitsReserved,
    state::{RoleType, Roles, SaleState},
};

/// Reserve units for the operator outside the sale
/// Requires `OPERATOR_ROLE_SALE` role
#[derive(Accounts)]
pub struct ReserveTokens<'info> {
    /// The sale operator, receives the reserved units
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The `Roles` account verifying the authority has the `OPERATOR_ROLE_SALE` role
    /// # PDA Seeds
    /// - `OPERATOR_ROLE_SALE`
    /// - The authority's address
    ///
    /// CHECK: Seeds constraint validates PDA address.
    /// Validated in instruction handler by `Roles::require_granted` - returns NotAuthorized if not initialized.
    #[account(
        seeds = [RoleType::OPERATOR_ROLE_SALE, authority.key().as_ref()],
        bump,
    )]
    pub authority_role_account: UncheckedAccount<'info>,

    /// The `SaleState` account
    /// # PDA Seeds
    /// - `SALE_STATE_SEED`
    #[account(
        mut,
        seeds = [SALE_STATE_SEED],
        bump = sale_state.bump,
        has_one = asset_mint @ SaleError::InvalidAssetMint,
    )]
    pub sale_state: Box<Account<'info, SaleState>>,

    /// The asset mint
    #[account(
        mut,
        mint::authority = mint_authority,
        mint::token_program = token_program
    )]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    /// The mint authority PDA
    /// # PDA Seeds
    /// - `MINT_AUTHORITY_SEED`
    ///
    /// CHECK: Seeds constraint validates PDA address, holds no data
    #[account(
        seeds = [MINT_AUTHORITY_SEED],
        bump,
    )]
    pub mint_authority: UncheckedAccount<'info>,

    /// The operator's associated token account for the asset
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = authority,
        associated_token::token_program = token_program,
    )]
    pub destination: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The token program owning the asset mint
    pub token_program: Interface<'info, TokenInterface>,
    /// The associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> ReserveTokens<'info> {
    /// Issue `units` to the operator, bounded only by the max supply
    /// # Arguments
    /// * `units` - The number of units to reserve (must be greater than 0)
    pub fn reserve_tokens(&mut self, units: u64) -> Result<()> {
        Roles::require_granted(
            &self.authority_role_account,
            RoleType::OperatorRoleSale,
            &self.authority.key(),
        )?;

        let settlement = reserve(&mut self.sale_state, &self.authority.key(), units)?;

        let mut ledger = SplAssetLedger {
            mint: &mut self.asset_mint,
            mint_authority: &self.mint_authority,
            destination: &self.destination,
            token_program: &self.token_program,
            mint_authority_bump: self.sale_state.mint_authority_bump,
            max_supply: self.sale_state.max_supply,
        };
        let unit_ids = settlement.issue(&mut ledger)?;

        emit!(UnitsReserved {
            operator: self.authority.key(),
            first_unit_id: unit_ids.start,
            units,
            total_reserved: self.sale_state.reserved,
        });

        Ok(())
    }
}
