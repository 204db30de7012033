//! EIP-712 digests for token permits (ERC-2612) and vault-manager operator permits.
//!
//! Shared by the router (verification) and the encoder (signing) so both sides hash the
//! exact same bytes.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

pub const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const TOKEN_PERMIT_TYPE: &[u8] =
    b"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

pub const OPERATOR_PERMIT_TYPE: &[u8] =
    b"Permit(address owner,address spender,bool approved,uint256 nonce,uint256 deadline)";

/// Domain separator for `(name, version, chainId, verifyingContract)`.
pub fn domain_separator(
    name: &str,
    version: &str,
    chain_id: u64,
    verifying_contract: Address,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(keccak256(DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(keccak256(name.as_bytes()).as_slice());
    buf.extend_from_slice(keccak256(version.as_bytes()).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(verifying_contract));
    keccak256(buf)
}

/// ERC-2612 permit digest.
pub fn token_permit_digest(
    domain: FixedBytes<32>,
    owner: Address,
    spender: Address,
    value: U256,
    nonce: U256,
    deadline: U256,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 6);
    buf.extend_from_slice(keccak256(TOKEN_PERMIT_TYPE).as_slice());
    buf.extend_from_slice(&address_word(owner));
    buf.extend_from_slice(&address_word(spender));
    buf.extend_from_slice(&value.to_be_bytes::<32>());
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    buf.extend_from_slice(&deadline.to_be_bytes::<32>());
    typed_digest(domain, keccak256(buf))
}

/// Operator-approval permit digest. The nonce advances on every signature, approve or revoke.
pub fn operator_permit_digest(
    domain: FixedBytes<32>,
    owner: Address,
    spender: Address,
    approved: bool,
    nonce: U256,
    deadline: U256,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 6);
    buf.extend_from_slice(keccak256(OPERATOR_PERMIT_TYPE).as_slice());
    buf.extend_from_slice(&address_word(owner));
    buf.extend_from_slice(&address_word(spender));
    buf.extend_from_slice(&U256::from(approved as u8).to_be_bytes::<32>());
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    buf.extend_from_slice(&deadline.to_be_bytes::<32>());
    typed_digest(domain, keccak256(buf))
}

/// keccak256("\x19\x01" || domainSeparator || structHash)
fn typed_digest(domain: FixedBytes<32>, struct_hash: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain.as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    word
}
