// Thin re-export module: implementation is in `blockchain/core.rs`, split
// into block and ledger construction, the exported record view, and
// integrity validation.

pub mod core;
pub use self::core::*;
