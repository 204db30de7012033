//! Ownership/approval gate.
//!
//! Every vault-carrying action is checked on its own against the module's
//! `isApprovedOrOwner(caller, vaultId)`; nothing is cached across calls of a batch.

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    errors::RouterError,
    resolver::Resolved,
    types::VaultModules,
};

/// Authorise `caller` to act on the resolved vault of `module`.
///
/// A sentinel that resolved to a vault created earlier in the same batch is always allowed:
/// the caller just created it.
pub fn authorize<M: VaultModules + ?Sized>(
    modules: &M,
    module: Address,
    resolved: Resolved,
    caller: Address,
) -> Result<U256, RouterError> {
    let vault_id = resolved.vault_id();
    if let Resolved::Created(_) = resolved {
        return Ok(vault_id);
    }

    if modules.is_approved_or_owner(module, caller, vault_id)? {
        Ok(vault_id)
    } else {
        Err(RouterError::NotApprovedOrOwner { caller, vault_id })
    }
}
