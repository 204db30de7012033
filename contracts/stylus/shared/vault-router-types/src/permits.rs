use alloy_primitives::{Address, FixedBytes, U256};

/// secp256k1n / 2. Signatures with a larger `s` are malleable and rejected.
const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xdfe92f46681b20a0,
    0x5d576e7357a4501d,
    0xffffffffffffffff,
    0x7fffffffffffffff,
]);

/// ECDSA signature in Ethereum `(v, r, s)` form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    pub v: u8,
    pub r: FixedBytes<32>,
    pub s: FixedBytes<32>,
}

impl Signature {
    pub fn new(v: u8, r: FixedBytes<32>, s: FixedBytes<32>) -> Self {
        Self { v, r, s }
    }

    /// Parse `r || s || v`.
    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self {
            v: bytes[64],
            r: FixedBytes(r),
            s: FixedBytes(s),
        }
    }

    /// Serialise as `r || s || v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// Recovery id in {0, 1}, accepting both the raw and the `+27` encodings.
    pub fn recovery_id(&self) -> Option<u8> {
        match self.v {
            0 | 1 => Some(self.v),
            27 | 28 => Some(self.v - 27),
            _ => None,
        }
    }

    /// Lower-half `s`, non-zero `r`/`s` and a usable `v`.
    pub fn is_canonical(&self) -> bool {
        let s = U256::from_be_slice(self.s.as_slice());
        let r = U256::from_be_slice(self.r.as_slice());
        self.recovery_id().is_some() && !r.is_zero() && !s.is_zero() && s <= SECP256K1N_HALF
    }
}

/// ERC-2612 token spend permit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPermit {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    pub deadline: U256,
    pub signature: Signature,
}

/// Vault-manager operator permit. Grants or revokes the router as operator of `owner`'s vaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorPermit {
    pub module: Address,
    pub owner: Address,
    pub approved: bool,
    pub deadline: U256,
    pub signature: Signature,
}
