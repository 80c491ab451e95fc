#![allow(unexpected_cfgs)]
#![allow(deprecated)]

use anchor_lang::prelude::*;
pub mod checkout;
mod constants;
mod errors;
mod events;
mod instructions;
pub mod security;
pub mod state;
pub mod utils;

use checkout::SignedTerms;
use events::UnitsPurchased;
use instructions::*;
use state::RoleType;

#[cfg(feature = "devnet")]
declare_id!("7JuqEJBp3Mi2rXo9h6jKeGRzCosK27bX9MQGrFhqDdQn");
#[cfg(feature = "testnet")]
declare_id!("2MFBQuig819bzYZ6vs1kvFRc77Zd2GqyxwPJDnJ8tc2S");
#[cfg(feature = "mainnet")]
declare_id!("4iwMcbNTFPYogqFyopjv8ooXdopYwKS6iSneqAwzSvJw");
#[cfg(not(any(feature = "mainnet", feature = "devnet", feature = "testnet")))]
declare_id!("9P3ftEr1BhBxcmNs1JVePTadiFmrcntkvbyYnrui5uTC");

#[program]
pub mod sale_controller {
    use super::*;

    /// Initialize the sale state and the payee ledger
    ///
    /// The asset mint must have 0 decimals, no supply, and the sale's mint
    /// authority PDA as its mint authority. Both sale modes start closed.
    /// Signer must have the ADMIN_ROLE_SALE role
    pub fn initialize_sale(
        ctx: Context<InitializeSale>,
        max_supply: u64,
        price: u64,
        authorizer: [u8; 20],
        payees: Vec<Pubkey>,
        shares: Vec<u64>,
    ) -> Result<()> {
        ctx.accounts
            .initialize_sale(max_supply, price, authorizer, payees, shares, &ctx.bumps)
    }

    /// Buy units through the public sale
    ///
    /// `payment` lamports are taken from the buyer and anything above
    /// `price * units` is refunded in the same instruction.
    pub fn mint(ctx: Context<PublicPurchase>, units: u64, payment: u64) -> Result<()> {
        let receipt = instructions::purchase(
            &mut ctx.accounts.into_sale_manager(),
            units,
            payment,
            ctx.bumps.sale_buyer,
        )?;

        emit_cpi!(UnitsPurchased {
            buyer: ctx.accounts.buyer.key(),
            first_unit_id: receipt.first_unit_id,
            units: receipt.units,
            cost: receipt.cost,
            refund: receipt.refund,
            window_id: receipt.window_id,
            signed: false,
        });

        Ok(())
    }

    /// Buy units through the signed sale
    ///
    /// Requires a secp256k1 instruction directly before this one carrying the
    /// authorizer's signature over (program, buyer, max_permitted, nonce).
    /// Each nonce can be used once.
    pub fn signed_mint(
        ctx: Context<SignedPurchase>,
        units: u64,
        payment: u64,
        max_permitted: u64,
        nonce: [u8; 32],
    ) -> Result<()> {
        let receipt = instructions::signed_purchase(
            &mut ctx.accounts.into_sale_manager(),
            units,
            payment,
            SignedTerms {
                max_permitted,
                nonce,
            },
            ctx.bumps.sale_buyer,
            ctx.bumps.nonce_account,
        )?;

        emit_cpi!(UnitsPurchased {
            buyer: ctx.accounts.buyer.key(),
            first_unit_id: receipt.first_unit_id,
            units: receipt.units,
            cost: receipt.cost,
            refund: receipt.refund,
            window_id: receipt.window_id,
            signed: true,
        });

        Ok(())
    }

    /// Issue units to the operator without payment
    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn reserve_tokens(ctx: Context<ReserveTokens>, units: u64) -> Result<()> {
        ctx.accounts.reserve_tokens(units)
    }

    /// Pay a payee its share of the proceeds
    /// Unpermissioned
    pub fn release(ctx: Context<Release>) -> Result<()> {
        ctx.accounts.release()
    }

    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_price(ctx: Context<SaleOperator>, price: u64) -> Result<()> {
        ctx.accounts.set_price(price)
    }

    /// Set the most units a buyer may take per window, 0 for no limit
    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_max_per_window(ctx: Context<SaleOperator>, max_per_window: u64) -> Result<()> {
        ctx.accounts.set_max_per_window(max_per_window)
    }

    /// Set the most units a buyer may take over the whole sale, 0 for no limit
    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_max_per_sender(ctx: Context<SaleOperator>, max_per_sender: u64) -> Result<()> {
        ctx.accounts.set_max_per_sender(max_per_sender)
    }

    /// Set the secp256k1 address of the signed sale authorizer
    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_authorizer(ctx: Context<SaleOperator>, authorizer: [u8; 20]) -> Result<()> {
        ctx.accounts.set_authorizer(authorizer)
    }

    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn flip_public_sale(ctx: Context<SaleOperator>) -> Result<()> {
        ctx.accounts.flip_public_sale()
    }

    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn flip_signed_sale(ctx: Context<SaleOperator>) -> Result<()> {
        ctx.accounts.flip_signed_sale()
    }

    /// Limit each buyer to a single purchase per window
    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_one_purchase_per_window(ctx: Context<SaleOperator>, enabled: bool) -> Result<()> {
        ctx.accounts.set_one_purchase_per_window(enabled)
    }

    /// Record the provenance hash, once
    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_provenance(ctx: Context<SaleOperator>, provenance: [u8; 32]) -> Result<()> {
        ctx.accounts.set_provenance(provenance)
    }

    /// Signer must have the OPERATOR_ROLE_SALE role
    pub fn set_reveal_time(ctx: Context<SaleOperator>, reveal_time: i64) -> Result<()> {
        ctx.accounts.set_reveal_time(reveal_time)
    }

    /// Grants any role to a user
    /// Signer must be the program upgrade authority
    pub fn grant_role(ctx: Context<GrantRole>, role: RoleType, user: Pubkey) -> Result<()> {
        ctx.accounts.grant_role(role, user, &ctx.bumps)
    }

    /// Revokes any role from a user
    /// Signer must be the program upgrade authority
    pub fn revoke_role(ctx: Context<RevokeRole>, _role: RoleType) -> Result<()> {
        ctx.accounts.revoke_role()
    }

    /// Grants the OPERATOR_ROLE_SALE role to a user
    /// Signer must have the ADMIN_ROLE_SALE role
    pub fn grant_sale_role(ctx: Context<SaleGrantRole>, role: RoleType, user: Pubkey) -> Result<()> {
        ctx.accounts.grant_sale_role(role, user, &ctx.bumps)
    }

    /// Revokes the OPERATOR_ROLE_SALE role from a user
    /// Signer must have the ADMIN_ROLE_SALE role
    pub fn revoke_sale_role(ctx: Context<SaleRevokeRole>) -> Result<()> {
        ctx.accounts.revoke_sale_role()
    }
}
