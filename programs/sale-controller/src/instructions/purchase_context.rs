use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as INSTRUCTIONS_ID;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use super::SaleManager;
use crate::{
    constants::{MINT_AUTHORITY_SEED, NONCE_SEED, PAYEE_LEDGER_SEED, SALE_BUYER_SEED, SALE_STATE_SEED},
    errors::SaleError,
    state::{PayeeLedger, SaleBuyer, SaleState},
};

/// Public sale purchase
#[event_cpi]
#[derive(Accounts)]
pub struct PublicPurchase<'info> {
    /// The buyer paying for and receiving the units, pays for account creation if needed
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// The SaleState account holding price, caps and supply
    /// # PDA Seeds
    /// - SALE_STATE_SEED
    #[account(
        mut,
        seeds = [SALE_STATE_SEED],
        bump = sale_state.bump,
        has_one = asset_mint @ SaleError::InvalidAssetMint,
    )]
    pub sale_state: Box<Account<'info, SaleState>>,

    /// The SaleBuyer account tracking the buyer's purchase counters
    /// # PDA Seeds
    /// - SALE_BUYER_SEED
    /// - Buyer's address
    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + SaleBuyer::INIT_SPACE,
        seeds = [SALE_BUYER_SEED, buyer.key().as_ref()],
        bump,
    )]
    pub sale_buyer: Box<Account<'info, SaleBuyer>>,

    /// The PayeeLedger account, receives the payment
    /// # PDA Seeds
    /// - PAYEE_LEDGER_SEED
    #[account(
        mut,
        seeds = [PAYEE_LEDGER_SEED],
        bump = payee_ledger.bump,
    )]
    pub payee_ledger: Box<Account<'info, PayeeLedger>>,

    /// The asset mint
    #[account(
        mut,
        mint::authority = mint_authority,
        mint::token_program = token_program
    )]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    /// The mint authority PDA
    /// # PDA Seeds
    /// - MINT_AUTHORITY_SEED
    /// CHECK: Seeds constraint validates PDA address, holds no data
    #[account(
        seeds = [MINT_AUTHORITY_SEED],
        bump,
    )]
    pub mint_authority: UncheckedAccount<'info>,

    /// The buyer's associated token account for the asset
    #[account(
        init_if_needed,
        payer = buyer,
        associated_token::mint = asset_mint,
        associated_token::authority = buyer,
        associated_token::token_program = token_program,
    )]
    pub buyer_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The token program owning the asset mint
    pub token_program: Interface<'info, TokenInterface>,

    /// The associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> PublicPurchase<'info> {
    #[allow(clippy::wrong_self_convention)]
    pub fn into_sale_manager(&mut self) -> SaleManager<'_, 'info> {
        SaleManager {
            buyer: &self.buyer,
            sale_state: &mut self.sale_state,
            sale_buyer: &mut self.sale_buyer,
            payee_ledger: &mut self.payee_ledger,
            asset_mint: &mut self.asset_mint,
            mint_authority: &self.mint_authority,
            buyer_token_account: &self.buyer_token_account,
            token_program: &self.token_program,
            system_program: &self.system_program,
            nonce_account: None,
            instructions: None,
        }
    }
}

/// Signed sale purchase
#[event_cpi]
#[derive(Accounts)]
#[instruction(units: u64, payment: u64, max_permitted: u64, nonce: [u8; 32])]
pub struct SignedPurchase<'info> {
    /// The buyer named in the authorization, pays for account creation if needed
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// The SaleState account holding price, caps, supply and the authorizer
    /// # PDA Seeds
    /// - SALE_STATE_SEED
    #[account(
        mut,
        seeds = [SALE_STATE_SEED],
        bump = sale_state.bump,
        has_one = asset_mint @ SaleError::InvalidAssetMint,
    )]
    pub sale_state: Box<Account<'info, SaleState>>,

    /// The SaleBuyer account tracking the buyer's purchase counters
    /// # PDA Seeds
    /// - SALE_BUYER_SEED
    /// - Buyer's address
    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + SaleBuyer::INIT_SPACE,
        seeds = [SALE_BUYER_SEED, buyer.key().as_ref()],
        bump,
    )]
    pub sale_buyer: Box<Account<'info, SaleBuyer>>,

    /// The PayeeLedger account, receives the payment
    /// # PDA Seeds
    /// - PAYEE_LEDGER_SEED
    #[account(
        mut,
        seeds = [PAYEE_LEDGER_SEED],
        bump = payee_ledger.bump,
    )]
    pub payee_ledger: Box<Account<'info, PayeeLedger>>,

    /// The asset mint
    #[account(
        mut,
        mint::authority = mint_authority,
        mint::token_program = token_program
    )]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    /// The mint authority PDA
    /// # PDA Seeds
    /// - MINT_AUTHORITY_SEED
    /// CHECK: Seeds constraint validates PDA address, holds no data
    #[account(
        seeds = [MINT_AUTHORITY_SEED],
        bump,
    )]
    pub mint_authority: UncheckedAccount<'info>,

    /// The buyer's associated token account for the asset
    #[account(
        init_if_needed,
        payer = buyer,
        associated_token::mint = asset_mint,
        associated_token::authority = buyer,
        associated_token::token_program = token_program,
    )]
    pub buyer_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The nonce account preventing authorization reuse
    /// # PDA Seeds
    /// - NONCE_SEED
    /// - Nonce (32-byte array)
    /// CHECK: Seeds constraint validates PDA address.
    /// Existence means the nonce has been used.
    #[account(
        mut,
        seeds = [NONCE_SEED, nonce.as_ref()],
        bump,
    )]
    pub nonce_account: UncheckedAccount<'info>,

    /// CHECK: Sysvar account for instruction introspection
    #[account(address = INSTRUCTIONS_ID)]
    pub instructions: UncheckedAccount<'info>,

    /// The token program owning the asset mint
    pub token_program: Interface<'info, TokenInterface>,

    /// The associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> SignedPurchase<'info> {
    #[allow(clippy::wrong_self_convention)]
    pub fn into_sale_manager(&mut self) -> SaleManager<'_, 'info> {
        SaleManager {
            buyer: &self.buyer,
            sale_state: &mut self.sale_state,
            sale_buyer: &mut self.sale_buyer,
            payee_ledger: &mut self.payee_ledger,
            asset_mint: &mut self.asset_mint,
            mint_authority: &self.mint_authority,
            buyer_token_account: &self.buyer_token_account,
            token_program: &self.token_program,
            system_program: &self.system_program,
            nonce_account: Some(&self.nonce_account),
            instructions: Some(&self.instructions),
        }
    }
}
