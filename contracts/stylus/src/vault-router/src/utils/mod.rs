//! Small helpers that only make sense on-chain.

pub mod crypto;
