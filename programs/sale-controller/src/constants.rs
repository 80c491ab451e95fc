// PDA SEEDS

/// Seed for the mint authority PDA
pub const MINT_AUTHORITY_SEED: &[u8] = b"mint_authority";
/// Seed for the SaleState PDA
pub const SALE_STATE_SEED: &[u8] = b"sale_state";
/// Seed for the PayeeLedger PDA (also the treasury holding collected lamports)
pub const PAYEE_LEDGER_SEED: &[u8] = b"payee_ledger";
/// Seed for SaleBuyer account PDA
pub const SALE_BUYER_SEED: &[u8] = b"buyer";
/// Seed for consumed nonce PDA
pub const NONCE_SEED: &[u8] = b"nonce";

/// Maximum number of payees the PayeeLedger can hold
pub const MAX_PAYEES: usize = 16;

/// Decimals required for the asset mint, every unit is one whole asset
pub const ASSET_DECIMALS: u8 = 0;

/// Length of the authorization message:
/// contract (32) + beneficiary (32) + max_permitted (8) + nonce (32)
pub const AUTHORIZATION_MESSAGE_LEN: usize = 104;

/// An authorizer address of all zeros means no authorizer has been configured
pub const UNSET_AUTHORIZER: [u8; 20] = [0u8; 20];
