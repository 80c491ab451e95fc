pub mod authorization;
pub mod mul_div;
pub mod secp;

pub use authorization::*;
pub use mul_div::*;
pub use secp::*;
