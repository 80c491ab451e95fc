use anchor_lang::prelude::*;

use crate::{
    constants::SALE_STATE_SEED,
    events::{
        AuthorizerUpdated, MaxPerSenderUpdated, MaxPerWindowUpdated, OnePurchasePerWindowUpdated,
        PriceUpdated, ProvenanceSet, PublicSaleFlipped, RevealTimeUpdated, SignedSaleFlipped,
    },
    state::{RoleType, Roles, SaleState},
};

/// Configure the sale
/// Requires `OPERATOR_ROLE_SALE` role
#[derive(Accounts)]
pub struct SaleOperator<'info> {
    /// The sale operator
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

    /// The `SaleState` account to be modified
    /// # PDA Seeds
    /// - `SALE_STATE_SEED`
    #[account(
        mut,
        seeds = [SALE_STATE_SEED],
        bump = sale_state.bump,
    )]
    pub sale_state: Account<'info, SaleState>,
}

impl<'info> SaleOperator<'info> {
    fn require_operator(&self) -> Result<()> {
        Roles::require_granted(
            &self.authority_role_account,
            RoleType::OperatorRoleSale,
            &self.authority.key(),
        )?;
        Ok(())
    }

    /// Set the price per unit in lamports
    pub fn set_price(&mut self, price: u64) -> Result<()> {
        self.require_operator()?;

        let prev_price = self.sale_state.price;
        self.sale_state.price = price;

        emit!(PriceUpdated {
            prev_price,
            new_price: price,
            operator: self.authority.key(),
        });

        Ok(())
    }

    /// Set the per-window cap, 0 disables it
    pub fn set_max_per_window(&mut self, max_per_window: u64) -> Result<()> {
        self.require_operator()?;

        let prev_max_per_window = self.sale_state.max_per_window;
        self.sale_state.max_per_window = max_per_window;

        emit!(MaxPerWindowUpdated {
            prev_max_per_window,
            new_max_per_window: max_per_window,
            operator: self.authority.key(),
        });

        Ok(())
    }

    /// Set the per-sender lifetime cap, 0 disables it
    pub fn set_max_per_sender(&mut self, max_per_sender: u64) -> Result<()> {
        self.require_operator()?;

        let prev_max_per_sender = self.sale_state.max_per_sender;
        self.sale_state.max_per_sender = max_per_sender;

        emit!(MaxPerSenderUpdated {
            prev_max_per_sender,
            new_max_per_sender: max_per_sender,
            operator: self.authority.key(),
        });

        Ok(())
    }

    /// Set the secp256k1 Ethereum address whose signatures admit buyers to the signed sale
    /// # Arguments
    /// * `authorizer` - The 20-byte address, all zeros disables signed purchases
    pub fn set_authorizer(&mut self, authorizer: [u8; 20]) -> Result<()> {
        self.require_operator()?;

        let prev_authorizer = self.sale_state.authorizer;
        self.sale_state.authorizer = authorizer;

        emit!(AuthorizerUpdated {
            prev_authorizer,
            new_authorizer: authorizer,
            operator: self.authority.key(),
        });

        Ok(())
    }

    pub fn flip_public_sale(&mut self) -> Result<()> {
        self.require_operator()?;

        self.sale_state.public_sale_active = !self.sale_state.public_sale_active;

        emit!(PublicSaleFlipped {
            is_active: self.sale_state.public_sale_active,
            operator: self.authority.key(),
        });

        Ok(())
    }

    pub fn flip_signed_sale(&mut self) -> Result<()> {
        self.require_operator()?;

        self.sale_state.signed_sale_active = !self.sale_state.signed_sale_active;

        emit!(SignedSaleFlipped {
            is_active: self.sale_state.signed_sale_active,
            operator: self.authority.key(),
        });

        Ok(())
    }

    pub fn set_one_purchase_per_window(&mut self, enabled: bool) -> Result<()> {
        self.require_operator()?;

        let prev_enabled = self.sale_state.one_purchase_per_window;
        self.sale_state.one_purchase_per_window = enabled;

        emit!(OnePurchasePerWindowUpdated {
            prev_enabled,
            new_enabled: enabled,
            operator: self.authority.key(),
        });

        Ok(())
    }

    /// Record the provenance hash, can only be done once
    pub fn set_provenance(&mut self, provenance: [u8; 32]) -> Result<()> {
        self.require_operator()?;

        self.sale_state.set_provenance(provenance)?;

        emit!(ProvenanceSet {
            provenance,
            operator: self.authority.key(),
        });

        Ok(())
    }

    pub fn set_reveal_time(&mut self, reveal_time: i64) -> Result<()> {
        self.require_operator()?;

        let prev_reveal_time = self.sale_state.reveal_time;
        self.sale_state.reveal_time = reveal_time;

        emit!(RevealTimeUpdated {
            prev_reveal_time,
            new_reveal_time: reveal_time,
            operator: self.authority.key(),
        });

        Ok(())
    }
}
