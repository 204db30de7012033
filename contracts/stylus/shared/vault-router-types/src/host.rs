//! Collaborator abstractions the router is generic over.
//!
//! Implemented on-chain with `RawCall` against real contracts, and off-chain by an in-memory
//! host for simulation and tests. Every call is made *as the router*: `transfer` moves the
//! router's own balance, `transfer_from` spends an allowance granted to the router, and so on.

use alloy_primitives::{Address, FixedBytes, U256};

use crate::{
    batch::{Settlement, Swap},
    errors::RouterError,
    permits::{OperatorPermit, Signature, TokenPermit},
};

/// ERC-20 (+ ERC-2612) surface.
pub trait TokenLedger {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256, RouterError>;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, RouterError>;

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), RouterError>;

    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), RouterError>;

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), RouterError>;

    fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, RouterError>;

    fn permit_domain(&self, token: Address) -> Result<FixedBytes<32>, RouterError>;

    /// Install the allowance described by an already verified permit and consume its nonce.
    fn permit(&mut self, permit: &TokenPermit) -> Result<(), RouterError>;
}

/// Vault-manager surface, addressed by module.
pub trait VaultModules {
    fn collateral(&self, module: Address) -> Result<Address, RouterError>;

    fn stablecoin(&self, module: Address) -> Result<Address, RouterError>;

    fn is_approved_or_owner(
        &self,
        module: Address,
        spender: Address,
        vault_id: U256,
    ) -> Result<bool, RouterError>;

    fn operator_nonce(&self, module: Address, owner: Address) -> Result<U256, RouterError>;

    fn operator_domain(&self, module: Address) -> Result<FixedBytes<32>, RouterError>;

    /// Apply an already verified operator permit (spender = router) and consume its nonce.
    fn operator_permit(&mut self, permit: &OperatorPermit) -> Result<(), RouterError>;

    fn create_vault(&mut self, module: Address, to: Address) -> Result<U256, RouterError>;

    fn close_vault(&mut self, module: Address, vault_id: U256) -> Result<(), RouterError>;

    fn add_collateral(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError>;

    fn remove_collateral(
        &mut self,
        module: Address,
        vault_id: U256,
        amount: U256,
    ) -> Result<(), RouterError>;

    fn repay_debt(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError>;

    fn borrow(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError>;

    fn get_debt_in(
        &mut self,
        module: Address,
        vault_id: U256,
        other_module: Address,
        dst_vault_id: U256,
        amount: U256,
    ) -> Result<(), RouterError>;

    /// Net and pay out everything the module accumulated since its last settlement.
    fn settle(&mut self, module: Address, settlement: &Settlement) -> Result<(), RouterError>;
}

pub trait SwapAggregator {
    /// Swap the router's `amount_in` of `token_in`; returns the `token_out` amount received.
    fn swap(&mut self, swap: &Swap) -> Result<U256, RouterError>;
}

/// Undo log for hosts without native rollback. On-chain every method is a no-op.
pub trait Journal {
    fn checkpoint(&mut self) -> usize;

    fn rollback(&mut self, checkpoint: usize);

    fn commit(&mut self, _checkpoint: usize) {}
}

/// Everything one batch needs from its environment.
pub trait RouterHost: TokenLedger + VaultModules + SwapAggregator + Journal {
    /// Address the router acts as.
    fn router(&self) -> Address;

    fn block_timestamp(&self) -> u64;
}

/// Off-chain signature capability.
pub trait SignatureVerifier {
    fn recover(&self, digest: FixedBytes<32>, signature: &Signature) -> Option<Address>;

    fn verify(&self, digest: FixedBytes<32>, signature: &Signature, expected: Address) -> bool {
        if expected == Address::ZERO || !signature.is_canonical() {
            return false;
        }
        self.recover(digest, signature) == Some(expected)
    }
}
