//! Off-chain companion of the vault router: action payload encoding, EIP-712 permit signing
//! and router calldata.

pub mod calldata;
pub mod encoder;
pub mod signer;


pub use vault_router_types as types;
