//! On-chain collaborators: ERC-20 tokens, vault managers and the swap aggregator reached through
//! `RawCall`.

pub mod host;
pub mod interfaces;
