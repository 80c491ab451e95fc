use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token_interface::{Mint, TokenInterface};

use crate::{
    constants::*,
    errors::SaleError,
    events::SaleInitialized,
    state::{PayeeLedger, RoleType, Roles, SaleState},
};

/// Initialize the `SaleState` and `PayeeLedger` accounts
/// Requires `ADMIN_ROLE_SALE` role
#[derive(Accounts)]
pub struct InitializeSale<'info> {
    /// Pays for account creation
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The sale admin
    pub authority: Signer<'info>,

    /// The `Roles` account verifying the authority has the `ADMIN_ROLE_SALE` role
    /// # PDA Seeds
    /// - `ADMIN_ROLE_SALE`
    /// - The authority's address
    ///
    /// CHECK: Seeds constraint validates PDA address.
    /// Validated in instruction handler by `Roles::require_granted` - returns NotAuthorized if not initialized.
    #[account(
        seeds = [RoleType::ADMIN_ROLE_SALE, authority.key().as_ref()],
        bump,
    )]
    pub authority_role_account: UncheckedAccount<'info>,

    /// The `SaleState` account to be initialized
    /// # PDA Seeds
    /// - `SALE_STATE_SEED`
    #[account(
        init,
        payer = payer,
        space = 8 + SaleState::INIT_SPACE,
        seeds = [SALE_STATE_SEED],
        bump
    )]
    pub sale_state: Account<'info, SaleState>,

    /// The `PayeeLedger` account to be initialized, also the treasury
    /// # PDA Seeds
    /// - `PAYEE_LEDGER_SEED`
    #[account(
        init,
        payer = payer,
        space = 8 + PayeeLedger::INIT_SPACE,
        seeds = [PAYEE_LEDGER_SEED],
        bump
    )]
    pub payee_ledger: Account<'info, PayeeLedger>,

    /// The mint authority PDA
    /// # PDA Seeds
    /// - `MINT_AUTHORITY_SEED`
    ///
    /// CHECK: Only used as the expected mint authority of `asset_mint`
    #[account(
        seeds = [MINT_AUTHORITY_SEED],
        bump,
    )]
    pub mint_authority: UncheckedAccount<'info>,

    /// The asset mint, whole units only, minted solely by the sale
    #[account(
        mint::token_program = token_program,
        constraint = asset_mint.decimals == ASSET_DECIMALS @ SaleError::InvalidAssetMint,
        constraint = asset_mint.mint_authority == COption::Some(mint_authority.key()) @ SaleError::InvalidAssetMint,
        constraint = asset_mint.supply == 0 @ SaleError::InvalidAssetMint,
    )]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    /// The token program owning `asset_mint`
    pub token_program: Interface<'info, TokenInterface>,

    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeSale<'info> {
    /// Initialize the sale in a closed state
    /// # Arguments
    /// * `max_supply` - The supply ceiling
    /// * `price` - Price per unit in lamports, 0 leaves the price unset
    /// * `authorizer` - The secp256k1 Ethereum address signing pre-sale authorizations
    /// * `payees` - The payees sharing the proceeds
    /// * `shares` - Each payee's share, in payee order
    /// * `bumps` - The PDA bumps for account derivation
    pub fn initialize_sale(
        &mut self,
        max_supply: u64,
        price: u64,
        authorizer: [u8; 20],
        payees: Vec<Pubkey>,
        shares: Vec<u64>,
        bumps: &InitializeSaleBumps,
    ) -> Result<()> {
        Roles::require_granted(
            &self.authority_role_account,
            RoleType::AdminRoleSale,
            &self.authority.key(),
        )?;

        self.payee_ledger
            .set_inner(PayeeLedger::new(&payees, &shares, bumps.payee_ledger)?);

        self.sale_state.set_inner(SaleState {
            asset_mint: self.asset_mint.key(),
            price,
            max_per_window: 0,
            max_per_sender: 0,
            public_sale_active: false,
            signed_sale_active: false,
            one_purchase_per_window: false,
            authorizer,
            max_supply,
            total_issued: 0,
            reserved: 0,
            provenance: None,
            reveal_time: 0,
            bump: bumps.sale_state,
            mint_authority_bump: bumps.mint_authority,
        });

        emit!(SaleInitialized {
            asset_mint: self.asset_mint.key(),
            max_supply,
            price,
            payees,
            shares,
        });

        Ok(())
    }
}
