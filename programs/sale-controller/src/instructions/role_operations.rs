use anchor_lang::prelude::*;

use crate::{
    errors::SaleError,
    events::{RoleGranted, RoleRevoked},
    state::{RoleType, Roles},
};

/// Grant any role to a user by initializing a `Roles` account
/// Requires the signer to be the program upgrade authority
#[derive(Accounts)]
#[instruction(role: RoleType, user: Pubkey)]
pub struct GrantRole<'info> {
    /// Pays for account creation
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The program upgrade authority
    pub authority: Signer<'info>,

    /// The Roles account to be initialized
    /// # PDA Seeds
    /// - The role seed (from RoleType)
    /// - The user's address
    #[account(
        init,
        payer = payer,
        space = Roles::INIT_SPACE,
        seeds = [role.seed(), user.as_ref()],
        bump
    )]
    pub role_to_grant: Account<'info, Roles>,

    /// The system program
    pub system_program: Program<'info, System>,

    /// The Sale Controller program
    #[account(address = crate::ID)]
    pub program: Program<'info, crate::program::SaleController>,

    /// The ProgramData account of the Sale Controller program
    #[account(
        constraint =
            program_data.upgrade_authority_address == Some(authority.key()) @ SaleError::InvalidUser
    )]
    pub program_data: Account<'info, ProgramData>,
}

/// Checks that `program_data` belongs to `program`
fn verify_program_data(
    program: &Program<'_, crate::program::SaleController>,
    program_data: &Pubkey,
) -> Result<()> {
    match program.programdata_address()? {
        Some(program_data_address) => {
            require_keys_eq!(
                program_data_address,
                *program_data,
                SaleError::ProgramMismatch
            );
            Ok(())
        }
        None => err!(SaleError::ProgramMismatch),
    }
}

impl<'info> GrantRole<'info> {
    /// Grant a user a role
    /// # Arguments
    /// * `role` - The RoleType to assign to the user
    /// * `user` - The user receiving the role
    /// * `bumps` - The bumps used for PDA derivation
    pub fn grant_role(&mut self, role: RoleType, user: Pubkey, bumps: &GrantRoleBumps) -> Result<()> {
        verify_program_data(&self.program, &self.program_data.key())?;

        self.role_to_grant.set_inner(Roles {
            address: user,
            role,
            bump: bumps.role_to_grant,
        });

        emit!(RoleGranted {
            role,
            grantee: user,
            granter: self.authority.key(),
        });

        Ok(())
    }
}

/// Revoke any role from a user by closing their `Roles` account
/// Requires the signer to be the program upgrade authority
#[derive(Accounts)]
#[instruction(role: RoleType)]
pub struct RevokeRole<'info> {
    /// Receives funds from account closure
    #[account(mut)]
    pub recipient: SystemAccount<'info>,

    /// The program upgrade authority
    pub authority: Signer<'info>,

    /// The Roles account to be closed
    #[account(
        mut,
        close = recipient,
        seeds = [role.seed(), role_to_revoke.address.as_ref()],
        bump = role_to_revoke.bump
    )]
    pub role_to_revoke: Account<'info, Roles>,

    /// The system program
    pub system_program: Program<'info, System>,

    /// The Sale Controller program
    #[account(address = crate::ID)]
    pub program: Program<'info, crate::program::SaleController>,

    /// The ProgramData account of the Sale Controller program
    #[account(
        constraint =
            program_data.upgrade_authority_address == Some(authority.key()) @ SaleError::InvalidUser
    )]
    pub program_data: Account<'info, ProgramData>,
}

impl<'info> RevokeRole<'info> {
    pub fn revoke_role(&mut self) -> Result<()> {
        verify_program_data(&self.program, &self.program_data.key())?;

        emit!(RoleRevoked {
            role: self.role_to_revoke.role,
            grantee: self.role_to_revoke.address,
            revoker: self.authority.key(),
        });

        Ok(())
    }
}

/// Grant the sale operator role by initializing a `Roles` account
/// Requires `ADMIN_ROLE_SALE` role
#[derive(Accounts)]
#[instruction(role: RoleType, user: Pubkey)]
pub struct SaleGrantRole<'info> {
    /// Pays for account creation
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The sale admin granting the role
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

    /// The new `Roles` account being created for the user
    #[account(
        init,
        payer = payer,
        space = Roles::INIT_SPACE,
        seeds = [role.seed(), user.as_ref()],
        bump
    )]
    pub role_to_grant: Account<'info, Roles>,

    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> SaleGrantRole<'info> {
    /// Grant a sale role to a user
    /// # Arguments
    /// * `role` - The role to grant, must be `OperatorRoleSale`
    /// * `user` - The public key of the user to grant the role to
    /// * `bumps` - The PDA bumps for account derivation
    pub fn grant_sale_role(
        &mut self,
        role: RoleType,
        user: Pubkey,
        bumps: &SaleGrantRoleBumps,
    ) -> Result<()> {
        Roles::require_granted(
            &self.authority_role_account,
            RoleType::AdminRoleSale,
            &self.authority.key(),
        )?;
        require!(
            role == RoleType::OperatorRoleSale,
            SaleError::InvalidRoleType
        );

        self.role_to_grant.set_inner(Roles {
            address: user,
            role,
            bump: bumps.role_to_grant,
        });

        emit!(RoleGranted {
            role,
            grantee: user,
            granter: self.authority.key(),
        });

        Ok(())
    }
}

/// Revoke the sale operator role by closing the user's `Roles` account
/// Requires `ADMIN_ROLE_SALE` role
#[derive(Accounts)]
pub struct SaleRevokeRole<'info> {
    /// The sale admin revoking the role
    pub authority: Signer<'info>,

    /// Receives the lamports from closing the Roles account
    #[account(mut)]
    pub recipient: SystemAccount<'info>,

    /// The `Roles` account verifying the authority has the `ADMIN_ROLE_SALE` role
    ///
    /// CHECK: Seeds constraint validates PDA address.
    /// Validated in instruction handler by `Roles::require_granted` - returns NotAuthorized if not initialized.
    #[account(
        seeds = [RoleType::ADMIN_ROLE_SALE, authority.key().as_ref()],
        bump,
    )]
    pub authority_role_account: UncheckedAccount<'info>,

    /// The Roles account being closed
    #[account(
        mut,
        close = recipient,
        seeds = [
            role_to_revoke.role.seed(),
            role_to_revoke.address.as_ref()
        ],
        bump = role_to_revoke.bump,
    )]
    pub role_to_revoke: Account<'info, Roles>,

    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> SaleRevokeRole<'info> {
    pub fn revoke_sale_role(&mut self) -> Result<()> {
        Roles::require_granted(
            &self.authority_role_account,
            RoleType::AdminRoleSale,
            &self.authority.key(),
        )?;
        require!(
            self.role_to_revoke.role == RoleType::OperatorRoleSale,
            SaleError::InvalidRoleType
        );

        emit!(RoleRevoked {
            role: self.role_to_revoke.role,
            grantee: self.role_to_revoke.address,
            revoker: self.authority.key(),
        });

        Ok(())
    }
}
