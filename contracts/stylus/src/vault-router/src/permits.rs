//! Permit processing: ERC-2612 token permits and vault-manager operator permits.
//!
//! Both sub-protocols verify an EIP-712 signature at the collaborator's *current* nonce before
//! anything is applied, so a replayed message recovers a different signer and fails.

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    errors::RouterError,
    types::{
        eip712::{operator_permit_digest, token_permit_digest},
        OperatorPermit, SignatureVerifier, TokenLedger, TokenPermit, VaultModules,
    },
};

fn check_deadline(now: u64, deadline: U256) -> Result<(), RouterError> {
    if U256::from(now) > deadline {
        return Err(RouterError::Expired { deadline });
    }
    Ok(())
}

/// Verify and install one token permit.
pub fn apply_token_permit<T, V>(
    tokens: &mut T,
    verifier: &V,
    now: u64,
    permit: &TokenPermit,
) -> Result<(), RouterError>
where
    T: TokenLedger + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    check_deadline(now, permit.deadline)?;

    let domain = tokens.permit_domain(permit.token)?;
    let nonce = tokens.permit_nonce(permit.token, permit.owner)?;
    let digest = token_permit_digest(
        domain,
        permit.owner,
        permit.spender,
        permit.value,
        nonce,
        permit.deadline,
    );
    if !verifier.verify(digest, &permit.signature, permit.owner) {
        return Err(RouterError::InvalidSignature { signer: permit.owner });
    }

    tokens.permit(permit)
}

/// Verify and apply one operator permit. The spender is always the router itself.
pub fn apply_operator_permit<M, V>(
    modules: &mut M,
    verifier: &V,
    router: Address,
    now: u64,
    permit: &OperatorPermit,
) -> Result<(), RouterError>
where
    M: VaultModules + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    check_deadline(now, permit.deadline)?;

    let domain = modules.operator_domain(permit.module)?;
    let nonce = modules.operator_nonce(permit.module, permit.owner)?;
    let digest = operator_permit_digest(
        domain,
        permit.owner,
        router,
        permit.approved,
        nonce,
        permit.deadline,
    );
    if !verifier.verify(digest, &permit.signature, permit.owner) {
        return Err(RouterError::InvalidSignature { signer: permit.owner });
    }

    modules.operator_permit(permit)
}
