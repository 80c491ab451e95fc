use anchor_lang::prelude::*;

/// Replay marker for signed purchases
/// each consumed nonce is stored in its own account, which is never closed
#[account]
#[derive(InitSpace)]
pub struct ConsumedNonce {
    // The nonce carried by the authorization
    pub nonce: [u8; 32],

    // The buyer who consumed the nonce
    pub consumer: Pubkey,

    // The timestamp when the nonce was consumed
    pub created_at: i64,

    // The bump used to derive the PDA for this account
    pub bump: u8,
}
