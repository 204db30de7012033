//! Shared types for the vault router: action tags, typed actions, permits, batch envelopes,
//! the error taxonomy and the collaborator traits the router is generic over.
//!
//! Used on-chain by the Stylus router and off-chain by the encoder/CLI tooling.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod actions;
pub mod batch;
pub mod eip712;
pub mod errors;
pub mod host;
pub mod permits;

pub use actions::{Action, ActionTag, Call, VaultRef};
pub use batch::{Batch, ModuleCall, Settlement, Swap, Transfer};
pub use errors::{DecodeError, ModuleFailure, RouterError};
pub use host::{Journal, RouterHost, SignatureVerifier, SwapAggregator, TokenLedger, VaultModules};
pub use permits::{OperatorPermit, Signature, TokenPermit};
