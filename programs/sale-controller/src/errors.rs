use anchor_lang::prelude::*;

#[error_code]
pub enum SaleError {
    // Authorization
    #[msg("Caller does not hold the required role")]
    NotAuthorized,
    #[msg("Signature was not produced by the configured authorizer")]
    InvalidSignature,
    #[msg("Nonce already used")]
    NonceAlreadyUsed,
    #[msg("Authorizer address not set")]
    AuthorizerNotSet,

    // Sale state
    #[msg("Public sale is not active")]
    SaleNotActive,
    #[msg("Signed sale is not active")]
    SignedSaleNotActive,

    // Arguments
    #[msg("Number of units is 0")]
    ZeroUnits,
    #[msg("Number of units exceeds the permitted maximum")]
    ExceedsPermitted,
    #[msg("Price not set")]
    PriceNotSet,
    #[msg("Invalid payees or shares")]
    InvalidPayees,
    #[msg("Asset mint must have zero decimals and the sale mint authority")]
    InvalidAssetMint,
    #[msg("Invalid Role Type")]
    InvalidRoleType,
    #[msg("Provenance already set")]
    ProvenanceAlreadySet,

    // Capacity
    #[msg("Purchase would exceed max supply")]
    SupplyExceeded,
    #[msg("Sender reached mint max")]
    SenderLifetimeLimitExceeded,
    #[msg("Max purchase per window exceeded")]
    WindowLimitExceeded,
    #[msg("Sender already purchased in this window")]
    AlreadyPurchasedThisWindow,

    // Payment
    #[msg("Sent value is below the purchase cost")]
    InsufficientPayment,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Payee is not due any payment")]
    NoPayeeOwed,
    #[msg("Account is not a payee")]
    UnknownPayee,
    #[msg("Divide by zero")]
    DivideByZero,

    // Program plumbing
    #[msg("ProgramMismatch")]
    ProgramMismatch,
    #[msg("Invalid User")]
    InvalidUser,
}
