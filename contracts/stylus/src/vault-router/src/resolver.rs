//! Vault-ID register for the sentinel reference.
//!
//! A `VaultRef` of `0` means "the vault the nearest preceding `CreateVault` of this batch
//! produced on the same module". With no such creation the literal `0` is passed through to
//! the module unchanged; that is a supported input, not an error.

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::types::VaultRef;

/// How a reference was turned into a concrete vault id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Caller supplied a non-zero id.
    Explicit(U256),
    /// Sentinel replaced by a vault created earlier in this batch.
    Created(U256),
    /// Sentinel with nothing to substitute; literal `0`.
    PassThrough,
}

impl Resolved {
    pub fn vault_id(&self) -> U256 {
        match self {
            Resolved::Explicit(id) | Resolved::Created(id) => *id,
            Resolved::PassThrough => U256::ZERO,
        }
    }
}

/// Single-slot register, owned by one batch and threaded through its dispatch loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultIdRegister {
    last_created: Option<(Address, U256)>,
}

impl VaultIdRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, module: Address, vault_id: U256) {
        self.last_created = Some((module, vault_id));
    }

    pub fn last_created(&self) -> Option<(Address, U256)> {
        self.last_created
    }

    pub fn resolve(&self, module: Address, vault: VaultRef) -> Resolved {
        if !vault.is_sentinel() {
            return Resolved::Explicit(vault.0);
        }
        match self.last_created {
            Some((created_on, id)) if created_on == module => Resolved::Created(id),
            _ => Resolved::PassThrough,
        }
    }

    /// Drop the register at batch end.
    pub fn clear(&mut self) {
        self.last_created = None;
    }
}
