pub mod initialize_sale;
pub mod purchase_context;
pub mod release;
pub mod reserve_tokens;
pub mod role_operations;
pub mod sale_admin_operations;
pub mod sale_manager;

pub use initialize_sale::*;
pub use purchase_context::*;
pub use release::*;
pub use reserve_tokens::*;
pub use role_operations::*;
pub use sale_admin_operations::*;
pub use sale_manager::*;
