pub mod accounts;
pub mod store;

pub use accounts::*;
pub use store::*;
