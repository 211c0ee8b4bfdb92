// core.rs splits ledger responsibilities into submodules.
pub mod chain;
pub mod record;
pub mod validation;

pub use chain::*;
pub use record::*;
pub use validation::*;
