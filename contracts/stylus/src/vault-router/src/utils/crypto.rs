//! Signature recovery through the `ecrecover` precompile.

use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes},
    call::RawCall,
};

use crate::types::{Signature, SignatureVerifier};

const ECRECOVER_GAS: u64 = 50_000;

/// Recover an EOA address from a 32-byte digest and an ECDSA signature.
///
/// Uses the precompile at `0x01`. `v` is accepted in {0, 1, 27, 28}.
pub fn ecrecover_address(digest: FixedBytes<32>, sig: &Signature) -> Option<Address> {
    let v = 27 + sig.recovery_id()?;
    let to = Address::with_last_byte(1);

    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    // v as 32-byte big-endian word.
    input[63] = v;
    input[64..96].copy_from_slice(sig.r.as_slice());
    input[96..128].copy_from_slice(sig.s.as_slice());

    let out = unsafe { RawCall::new_static().gas(ECRECOVER_GAS).call(to, &input) }.ok()?;
    if out.len() < 32 {
        return None;
    }
    // precompile returns 32-byte word with address in the low 20 bytes.
    let recovered = Address::from_slice(&out[12..32]);
    (recovered != Address::ZERO).then_some(recovered)
}

/// On-chain verifier backed by the precompile.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcrecoverVerifier;

impl SignatureVerifier for EcrecoverVerifier {
    fn recover(&self, digest: FixedBytes<32>, signature: &Signature) -> Option<Address> {
        ecrecover_address(digest, signature)
    }
}
