//! Stylus entrypoint of the vault router.
//!
//! The router holds no per-user state. Each `execute*` call runs one batch against the live
//! token, vault-manager and aggregator contracts; any error reverts the transaction, which is
//! what makes the batch all-or-nothing on-chain.

use alloc::vec::Vec;

use stylus_sdk::{alloy_primitives::Address, prelude::*};

use crate::{
    abi::{self, ModuleCallTuple, OperatorPermitTuple, PermitTuple, SwapTuple, TransferTuple},
    errors::{AlreadyInitialized, NotInitialized, RouterRevert},
    mixer::Mixer,
    onchain::host::OnchainHost,
    types::{Batch, OperatorPermit},
    utils::crypto::EcrecoverVerifier,
};

sol_storage! {
    #[entrypoint]
    pub struct VaultRouter {
        /// Trusted swap aggregator, set once by `initialize`.
        address aggregator;
        bool initialized;
    }
}

#[public]
impl VaultRouter {
    /// One-shot configuration of the swap aggregator.
    pub fn initialize(&mut self, swap_aggregator: Address) -> Result<(), RouterRevert> {
        if self.initialized.get() {
            return Err(RouterRevert::AlreadyInitialized(AlreadyInitialized {}));
        }
        self.aggregator.set(swap_aggregator);
        self.initialized.set(true);
        Ok(())
    }

    pub fn swap_aggregator(&self) -> Address {
        self.aggregator.get()
    }

    pub fn execute(
        &mut self,
        permits: Vec<PermitTuple>,
        transfers: Vec<TransferTuple>,
        swaps: Vec<SwapTuple>,
        module_calls: Vec<ModuleCallTuple>,
    ) -> Result<(), RouterRevert> {
        let batch = abi::batch(permits, transfers, swaps, module_calls);
        self.run(&[], &batch)
    }

    pub fn execute_with_operator_permits(
        &mut self,
        operator_permits: Vec<OperatorPermitTuple>,
        permits: Vec<PermitTuple>,
        transfers: Vec<TransferTuple>,
        swaps: Vec<SwapTuple>,
        module_calls: Vec<ModuleCallTuple>,
    ) -> Result<(), RouterRevert> {
        let operator_permits: Vec<OperatorPermit> =
            operator_permits.into_iter().map(abi::operator_permit).collect();
        let batch = abi::batch(permits, transfers, swaps, module_calls);
        self.run(&operator_permits, &batch)
    }
}

impl VaultRouter {
    fn run(&mut self, operator_permits: &[OperatorPermit], batch: &Batch) -> Result<(), RouterRevert> {
        let aggregator = self.aggregator.get();
        if !batch.swaps.is_empty() && aggregator == Address::ZERO {
            return Err(RouterRevert::NotInitialized(NotInitialized {}));
        }

        let caller = self.vm().msg_sender();
        let mut host = OnchainHost::new(
            self.vm().contract_address(),
            self.vm().block_timestamp(),
            aggregator,
        );
        Mixer::new(&mut host, &EcrecoverVerifier)
            .execute_with_operator_permits(caller, operator_permits, batch)
            .map(|_| ())
            .map_err(RouterRevert::from)
    }
}
