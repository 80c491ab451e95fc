use anchor_lang::prelude::*;

use crate::errors::SaleError;

/// Roles state account - the existence of the account grants `role` to `address`
#[account]
#[derive(Debug)]
pub struct Roles {
    // The address assigned to the role
    pub address: Pubkey,

    // The type of role assigned
    pub role: RoleType,

    // The bump used to derive the PDA for this account
    pub bump: u8,
}

impl Space for Roles {
    const INIT_SPACE: usize = 8 + size_of::<Roles>();
}

impl Roles {
    /// Load the `Roles` account behind `account` and require that it grants `role` to `authority`
    /// # Returns
    /// * `Result<Roles>` - The role, or `NotAuthorized` if the account is missing or grants something else
    pub fn require_granted(
        account: &AccountInfo,
        role: RoleType,
        authority: &Pubkey,
    ) -> Result<Roles> {
        let data = account.try_borrow_data()?;
        Self::check_granted(account.owner, &data, role, authority)
    }

    fn check_granted(
        owner: &Pubkey,
        data: &[u8],
        role: RoleType,
        authority: &Pubkey,
    ) -> Result<Roles> {
        // A role that was never granted, or was revoked, leaves a system-owned empty PDA
        require!(
            owner == &crate::ID && !data.is_empty(),
            SaleError::NotAuthorized
        );

        let roles = Roles::try_deserialize(&mut &data[..])
            .map_err(|_| error!(SaleError::NotAuthorized))?;
        require!(
            roles.role == role && roles.address == *authority,
            SaleError::NotAuthorized
        );

        Ok(roles)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorDeserialize, AnchorSerialize)]
pub enum RoleType {
    /// Creates the sale and manages operators
    AdminRoleSale,
    /// Configures the sale and reserves units
    OperatorRoleSale,
}

impl RoleType {
    pub const ADMIN_ROLE_SALE: &[u8] = b"AdminRoleSale";
    pub const OPERATOR_ROLE_SALE: &[u8] = b"OperatorRoleSale";

    pub const fn seed(&self) -> &'static [u8] {
        match self {
            RoleType::AdminRoleSale => Self::ADMIN_ROLE_SALE,
            RoleType::OperatorRoleSale => Self::OPERATOR_ROLE_SALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_seeds_are_distinct() {
        assert_ne!(
            RoleType::AdminRoleSale.seed(),
            RoleType::OperatorRoleSale.seed()
        );
        assert_eq!(RoleType::OperatorRoleSale.seed(), b"OperatorRoleSale");
    }

    #[test]
    fn test_roles_space_covers_discriminator() {
        assert!(Roles::INIT_SPACE >= 8 + 32 + 1 + 1);
    }

    fn serialized(address: Pubkey, role: RoleType) -> Vec<u8> {
        let mut data = Vec::new();
        Roles {
            address,
            role,
            bump: 254,
        }
        .try_serialize(&mut data)
        .unwrap();
        data
    }

    #[test]
    fn test_require_granted_accepts_matching_role() {
        let operator = Pubkey::new_unique();
        let mut lamports = 1_000_000;
        let mut data = serialized(operator, RoleType::OperatorRoleSale);
        let key = Pubkey::new_unique();
        let account = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &crate::ID,
            false,
            0,
        );

        let roles =
            Roles::require_granted(&account, RoleType::OperatorRoleSale, &operator).unwrap();
        assert_eq!(roles.address, operator);
        assert_eq!(roles.role, RoleType::OperatorRoleSale);
    }

    #[test]
    fn test_missing_role_account_is_not_authorized() {
        let caller = Pubkey::new_unique();
        let system_program = Pubkey::default();
        let mut lamports = 0;
        let mut data: Vec<u8> = Vec::new();
        let key = Pubkey::new_unique();
        let account = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &system_program,
            false,
            0,
        );

        let err =
            Roles::require_granted(&account, RoleType::OperatorRoleSale, &caller).unwrap_err();
        assert_eq!(err, SaleError::NotAuthorized.into());
    }

    #[test]
    fn test_foreign_owned_role_data_is_not_authorized() {
        let caller = Pubkey::new_unique();
        let data = serialized(caller, RoleType::OperatorRoleSale);

        let err = Roles::check_granted(
            &Pubkey::new_unique(),
            &data,
            RoleType::OperatorRoleSale,
            &caller,
        )
        .unwrap_err();
        assert_eq!(err, SaleError::NotAuthorized.into());
    }

    #[test]
    fn test_wrong_role_or_address_is_not_authorized() {
        let caller = Pubkey::new_unique();
        let operator_data = serialized(caller, RoleType::OperatorRoleSale);

        let err = Roles::check_granted(
            &crate::ID,
            &operator_data,
            RoleType::AdminRoleSale,
            &caller,
        )
        .unwrap_err();
        assert_eq!(err, SaleError::NotAuthorized.into());

        let err = Roles::check_granted(
            &crate::ID,
            &operator_data,
            RoleType::OperatorRoleSale,
            &Pubkey::new_unique(),
        )
        .unwrap_err();
        assert_eq!(err, SaleError::NotAuthorized.into());
    }

    #[test]
    fn test_garbage_role_data_is_not_authorized() {
        let caller = Pubkey::new_unique();
        let err = Roles::check_granted(
            &crate::ID,
            &[0u8; 42],
            RoleType::OperatorRoleSale,
            &caller,
        )
        .unwrap_err();
        assert_eq!(err, SaleError::NotAuthorized.into());
    }
}
