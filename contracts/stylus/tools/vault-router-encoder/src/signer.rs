//! Recoverable secp256k1 signing of token and operator permits, plus a k256-backed verifier.

use alloy_primitives::{Address, FixedBytes, U256};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use sha3::{Digest, Keccak256};

pub use k256::ecdsa::SigningKey;

use vault_router_types::{
    eip712::{operator_permit_digest, token_permit_digest},
    OperatorPermit, Signature, SignatureVerifier, TokenPermit,
};

/// Ethereum address of a verifying key: last 20 bytes of keccak(uncompressed point).
pub fn address_of_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let mut h = Keccak256::new();
    h.update(&point.as_bytes()[1..]);
    let hash = h.finalize();
    Address::from_slice(&hash[12..32])
}

pub fn address_of(key: &SigningKey) -> Address {
    address_of_key(key.verifying_key())
}

/// Sign a 32-byte digest. The result is low-`s` with `v` in {27, 28}.
pub fn sign_digest(key: &SigningKey, digest: FixedBytes<32>) -> Result<Signature, k256::ecdsa::Error> {
    let (mut sig, mut recid) = key.sign_prehash_recoverable(digest.as_slice())?;
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
    }

    let (r, s) = sig.split_bytes();
    let mut r_buf = [0u8; 32];
    let mut s_buf = [0u8; 32];
    r_buf.copy_from_slice(r.as_slice());
    s_buf.copy_from_slice(s.as_slice());
    Ok(Signature::new(27 + recid.to_byte(), FixedBytes(r_buf), FixedBytes(s_buf)))
}

/// ERC-2612 permit over `token`, signed by `key` at `nonce`.
pub fn sign_token_permit(
    key: &SigningKey,
    domain: FixedBytes<32>,
    token: Address,
    spender: Address,
    value: U256,
    nonce: U256,
    deadline: U256,
) -> Result<TokenPermit, k256::ecdsa::Error> {
    let owner = address_of(key);
    let digest = token_permit_digest(domain, owner, spender, value, nonce, deadline);
    Ok(TokenPermit {
        token,
        owner,
        spender,
        value,
        deadline,
        signature: sign_digest(key, digest)?,
    })
}

/// Operator permit on `module`, signed by `key` at `nonce`. `spender` is the router.
pub fn sign_operator_permit(
    key: &SigningKey,
    domain: FixedBytes<32>,
    module: Address,
    spender: Address,
    approved: bool,
    nonce: U256,
    deadline: U256,
) -> Result<OperatorPermit, k256::ecdsa::Error> {
    let owner = address_of(key);
    let digest = operator_permit_digest(domain, owner, spender, approved, nonce, deadline);
    Ok(OperatorPermit {
        module,
        owner,
        approved,
        deadline,
        signature: sign_digest(key, digest)?,
    })
}

/// Off-chain `ecrecover`.
#[derive(Clone, Copy, Debug, Default)]
pub struct K256Verifier;

impl SignatureVerifier for K256Verifier {
    fn recover(&self, digest: FixedBytes<32>, signature: &Signature) -> Option<Address> {
        let recid = RecoveryId::from_byte(signature.recovery_id()?)?;
        let mut rs = [0u8; 64];
        rs[0..32].copy_from_slice(signature.r.as_slice());
        rs[32..64].copy_from_slice(signature.s.as_slice());
        let sig = EcdsaSignature::from_slice(&rs).ok()?;
        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recid).ok()?;
        Some(address_of_key(&key))
    }
}
