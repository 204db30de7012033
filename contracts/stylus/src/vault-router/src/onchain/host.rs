use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, Bytes, FixedBytes, U256},
    alloy_sol_types::SolCall,
    call::RawCall,
};

use crate::{
    onchain::interfaces::{IERC20Permit, IVaultManager},
    types::{
        Journal, ModuleFailure, OperatorPermit, RouterError, RouterHost, Settlement, Swap,
        SwapAggregator, TokenLedger, TokenPermit, VaultModules,
    },
};

/// Host backed by real contracts. The EVM reverts the whole transaction on error, so the
/// journal is a no-op.
pub struct OnchainHost {
    router: Address,
    now: u64,
    aggregator: Address,
}

impl OnchainHost {
    pub fn new(router: Address, now: u64, aggregator: Address) -> Self {
        Self {
            router,
            now,
            aggregator,
        }
    }
}

fn static_call<C: SolCall>(target: Address, call: &C) -> Result<C::Return, ()> {
    let out = unsafe { RawCall::new_static().call(target, &call.abi_encode()) }.map_err(|_| ())?;
    C::abi_decode_returns(&out, true).map_err(|_| ())
}

fn mutating_call<C: SolCall>(target: Address, call: &C) -> Result<Vec<u8>, ()> {
    unsafe { RawCall::new().call(target, &call.abi_encode()) }.map_err(|_| ())
}

/// ERC-20 mutators: an empty return counts as success, otherwise the `bool` must be true.
fn token_call<C: SolCall>(token: Address, call: &C) -> Result<(), RouterError> {
    let out = mutating_call(token, call).map_err(|_| RouterError::TransferFailed { token })?;
    if out.is_empty() {
        return Ok(());
    }
    if out.len() < 32 || U256::from_be_slice(&out[0..32]).is_zero() {
        return Err(RouterError::TransferFailed { token });
    }
    Ok(())
}

fn module_view<C: SolCall>(module: Address, call: &C) -> Result<C::Return, RouterError> {
    static_call(module, call).map_err(|_| RouterError::module(module, ModuleFailure::Reverted))
}

fn module_call<C: SolCall>(module: Address, call: &C) -> Result<Vec<u8>, RouterError> {
    mutating_call(module, call).map_err(|_| RouterError::module(module, ModuleFailure::Reverted))
}

impl TokenLedger for OnchainHost {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256, RouterError> {
        static_call(token, &IERC20Permit::balanceOfCall { account })
            .map(|r| r.balance)
            .map_err(|_| RouterError::TransferFailed { token })
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, RouterError> {
        static_call(token, &IERC20Permit::allowanceCall { owner, spender })
            .map(|r| r.remaining)
            .map_err(|_| RouterError::TransferFailed { token })
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), RouterError> {
        token_call(token, &IERC20Permit::transferCall { to, amount })
    }

    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), RouterError> {
        token_call(token, &IERC20Permit::transferFromCall { from, to, amount })
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), RouterError> {
        token_call(token, &IERC20Permit::approveCall { spender, amount })
    }

    fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, RouterError> {
        static_call(token, &IERC20Permit::noncesCall { owner })
            .map(|r| r.nonce)
            .map_err(|_| RouterError::TransferFailed { token })
    }

    fn permit_domain(&self, token: Address) -> Result<FixedBytes<32>, RouterError> {
        static_call(token, &IERC20Permit::DOMAIN_SEPARATORCall {})
            .map(|r| r.separator)
            .map_err(|_| RouterError::TransferFailed { token })
    }

    fn permit(&mut self, permit: &TokenPermit) -> Result<(), RouterError> {
        let call = IERC20Permit::permitCall {
            owner: permit.owner,
            spender: permit.spender,
            value: permit.value,
            deadline: permit.deadline,
            v: permit.signature.v,
            r: permit.signature.r,
            s: permit.signature.s,
        };
        mutating_call(permit.token, &call)
            .map(|_| ())
            .map_err(|_| RouterError::TransferFailed { token: permit.token })
    }
}

impl VaultModules for OnchainHost {
    fn collateral(&self, module: Address) -> Result<Address, RouterError> {
        module_view(module, &IVaultManager::collateralCall {}).map(|r| r.token)
    }

    fn stablecoin(&self, module: Address) -> Result<Address, RouterError> {
        module_view(module, &IVaultManager::stablecoinCall {}).map(|r| r.token)
    }

    fn is_approved_or_owner(
        &self,
        module: Address,
        spender: Address,
        vault_id: U256,
    ) -> Result<bool, RouterError> {
        // nonexistent vaults revert in ERC-721 style managers; treat as not approved
        Ok(static_call(
            module,
            &IVaultManager::isApprovedOrOwnerCall {
                spender,
                vaultID: vault_id,
            },
        )
        .map(|r| r.ok)
        .unwrap_or(false))
    }

    fn operator_nonce(&self, module: Address, owner: Address) -> Result<U256, RouterError> {
        module_view(module, &IVaultManager::noncesCall { owner }).map(|r| r.nonce)
    }

    fn operator_domain(&self, module: Address) -> Result<FixedBytes<32>, RouterError> {
        module_view(module, &IVaultManager::DOMAIN_SEPARATORCall {}).map(|r| r.separator)
    }

    fn operator_permit(&mut self, permit: &OperatorPermit) -> Result<(), RouterError> {
        let call = IVaultManager::permitCall {
            owner: permit.owner,
            spender: self.router,
            approved: permit.approved,
            deadline: permit.deadline,
            v: permit.signature.v,
            r: permit.signature.r,
            s: permit.signature.s,
        };
        module_call(permit.module, &call).map(|_| ())
    }

    fn create_vault(&mut self, module: Address, to: Address) -> Result<U256, RouterError> {
        let out = module_call(module, &IVaultManager::createVaultCall { to })?;
        IVaultManager::createVaultCall::abi_decode_returns(&out, true)
            .map(|r| r.vaultID)
            .map_err(|_| RouterError::module(module, ModuleFailure::Reverted))
    }

    fn close_vault(&mut self, module: Address, vault_id: U256) -> Result<(), RouterError> {
        module_call(module, &IVaultManager::closeVaultCall { vaultID: vault_id }).map(|_| ())
    }

    fn add_collateral(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError> {
        let call = IVaultManager::addCollateralCall {
            vaultID: vault_id,
            amount,
        };
        module_call(module, &call).map(|_| ())
    }

    fn remove_collateral(
        &mut self,
        module: Address,
        vault_id: U256,
        amount: U256,
    ) -> Result<(), RouterError> {
        let call = IVaultManager::removeCollateralCall {
            vaultID: vault_id,
            amount,
        };
        module_call(module, &call).map(|_| ())
    }

    fn repay_debt(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError> {
        let call = IVaultManager::repayDebtCall {
            vaultID: vault_id,
            amount,
        };
        module_call(module, &call).map(|_| ())
    }

    fn borrow(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError> {
        let call = IVaultManager::borrowCall {
            vaultID: vault_id,
            amount,
        };
        module_call(module, &call).map(|_| ())
    }

    fn get_debt_in(
        &mut self,
        module: Address,
        vault_id: U256,
        other_module: Address,
        dst_vault_id: U256,
        amount: U256,
    ) -> Result<(), RouterError> {
        let call = IVaultManager::getDebtInCall {
            vaultID: vault_id,
            vaultManager: other_module,
            dstVaultID: dst_vault_id,
            amount,
        };
        module_call(module, &call).map(|_| ())
    }

    fn settle(&mut self, module: Address, settlement: &Settlement) -> Result<(), RouterError> {
        let call = IVaultManager::settleCall {
            to: settlement.recipient,
            who: settlement.caller,
            sweepTo: settlement.sweep_recipient,
            repayData: Bytes::from(settlement.repay_data.clone()),
        };
        module_call(module, &call).map(|_| ())
    }
}

impl SwapAggregator for OnchainHost {
    fn swap(&mut self, swap: &Swap) -> Result<U256, RouterError> {
        let router = self.router;
        let aggregator = self.aggregator;

        self.approve(swap.token_in, aggregator, swap.amount_in)?;
        let before = self.balance_of(swap.token_out, router)?;
        unsafe { RawCall::new().call(aggregator, &swap.data) }
            .map_err(|_| RouterError::module(aggregator, ModuleFailure::Reverted))?;
        let after = self.balance_of(swap.token_out, router)?;

        Ok(after.saturating_sub(before))
    }
}

impl Journal for OnchainHost {
    fn checkpoint(&mut self) -> usize {
        0
    }

    fn rollback(&mut self, _checkpoint: usize) {}
}

impl RouterHost for OnchainHost {
    fn router(&self) -> Address {
        self.router
    }

    fn block_timestamp(&self) -> u64 {
        self.now
    }
}
