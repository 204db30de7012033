//! Batched vault router for Arbitrum Stylus.
//!
//! One call carries permits, token transfers, swaps and per-module vault actions. The router
//! decodes everything up front, applies permits, funds itself, dispatches each action with the
//! `0` vault reference rewritten to the vault created earlier in the batch, settles every module
//! once and sweeps leftovers back out.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

extern crate alloc;

pub use vault_router_types as types;

pub mod abi;
pub mod decoder;
pub mod errors;
pub mod gate;
pub mod mixer;
pub mod onchain;
pub mod permits;
pub mod resolver;
pub mod router;
pub mod settlement;
pub mod utils;

#[cfg(test)]
mod memory;

pub use router::VaultRouter;
