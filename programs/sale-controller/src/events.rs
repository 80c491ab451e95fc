use anchor_lang::prelude::*;

use crate::state::RoleType;

/// Event emitted when a role is granted to a user
/// Fields:
/// - role: The role that was granted
/// - grantee: The public key of the user who was granted the role
/// - granter: The public key of the user who granted the role
#[event]
pub struct RoleGranted {
    pub role: RoleType,
    pub grantee: Pubkey,
    pub granter: Pubkey,
}

/// Event emitted when a role is revoked from a user
/// Fields:
/// - role: The role that was revoked
/// - grantee: The public key of the user who had the role revoked
/// - revoker: The public key of the user who revoked the role
#[event]
pub struct RoleRevoked {
    pub role: RoleType,
    pub grantee: Pubkey,
    pub revoker: Pubkey,
}

/// Event emitted when the sale is initialized
/// Fields:
/// - asset_mint: The mint issuing the sale's units
/// - max_supply: The supply ceiling
/// - price: The initial price per unit in lamports
/// - payees: The payees sharing the proceeds
/// - shares: The shares of each payee, in payee order
#[event]
pub struct SaleInitialized {
    pub asset_mint: Pubkey,
    pub max_supply: u64,
    pub price: u64,
    pub payees: Vec<Pubkey>,
    pub shares: Vec<u64>,
}

/// Event emitted when the price per unit changes
#[event]
pub struct PriceUpdated {
    pub prev_price: u64,
    pub new_price: u64,
    pub operator: Pubkey,
}

/// Event emitted when the per-window cap changes
#[event]
pub struct MaxPerWindowUpdated {
    pub prev_max_per_window: u64,
    pub new_max_per_window: u64,
    pub operator: Pubkey,
}

/// Event emitted when the per-sender lifetime cap changes
#[event]
pub struct MaxPerSenderUpdated {
    pub prev_max_per_sender: u64,
    pub new_max_per_sender: u64,
    pub operator: Pubkey,
}

/// Event emitted when the authorizer address changes
/// Fields:
/// - prev_authorizer: The previous secp256k1 Ethereum address (20 bytes)
/// - new_authorizer: The new secp256k1 Ethereum address (20 bytes)
/// - operator: The address of the operator who made the change
#[event]
pub struct AuthorizerUpdated {
    pub prev_authorizer: [u8; 20],
    pub new_authorizer: [u8; 20],
    pub operator: Pubkey,
}

/// Event emitted when the public sale is opened or closed
#[event]
pub struct PublicSaleFlipped {
    pub is_active: bool,
    pub operator: Pubkey,
}

/// Event emitted when the signed sale is opened or closed
#[event]
pub struct SignedSaleFlipped {
    pub is_active: bool,
    pub operator: Pubkey,
}

/// Event emitted when the one-purchase-per-window policy changes
#[event]
pub struct OnePurchasePerWindowUpdated {
    pub prev_enabled: bool,
    pub new_enabled: bool,
    pub operator: Pubkey,
}

/// Event emitted when the provenance hash is recorded
#[event]
pub struct ProvenanceSet {
    pub provenance: [u8; 32],
    pub operator: Pubkey,
}

/// Event emitted when the reveal time changes
#[event]
pub struct RevealTimeUpdated {
    pub prev_reveal_time: i64,
    pub new_reveal_time: i64,
    pub operator: Pubkey,
}

/// Event emitted when units are purchased through the public or signed sale
/// Fields:
/// - buyer: The address receiving the units
/// - first_unit_id: The identifier of the first issued unit
/// - units: The number of units issued
/// - cost: The lamports kept for the purchase
/// - refund: The lamports returned to the buyer
/// - window_id: The window (slot) the purchase was recorded against
/// - signed: True if the purchase went through the signed sale
#[event]
pub struct UnitsPurchased {
    pub buyer: Pubkey,
    pub first_unit_id: u64,
    pub units: u64,
    pub cost: u64,
    pub refund: u64,
    pub window_id: u64,
    pub signed: bool,
}

/// Event emitted when the operator reserves units
#[event]
pub struct UnitsReserved {
    pub operator: Pubkey,
    pub first_unit_id: u64,
    pub units: u64,
    pub total_reserved: u64,
}

/// Event emitted when a payee withdraws its share
/// Fields:
/// - payee: The payee receiving the lamports
/// - amount: The lamports released in this call
/// - total_released: The payee's cumulative released lamports
#[event]
pub struct PaymentReleased {
    pub payee: Pubkey,
    pub amount: u64,
    pub total_released: u64,
}
