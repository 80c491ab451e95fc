pub mod buyer;
pub mod consumed_nonce;
pub mod payee_ledger;
pub mod roles;
pub mod sale_state;

pub use buyer::*;
pub use consumed_nonce::*;
pub use payee_ledger::*;
pub use roles::*;
pub use sale_state::*;
