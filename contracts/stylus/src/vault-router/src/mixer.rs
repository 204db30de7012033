//! Batch executor.
//!
//! One invocation runs these stages strictly in order:
//! prepare (decode everything) -> permits -> funding (transfers, swaps) -> dispatch
//! (per module: resolve, authorise, invoke, then one settlement call) -> sweep.
//!
//! A failure anywhere rolls the host back to the checkpoint taken before the permit stage.
//! Prepare has no side effects, so decode failures never reach the host at all.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    decoder::decode_module_call,
    errors::RouterError,
    gate::authorize,
    permits::{apply_operator_permit, apply_token_permit},
    resolver::VaultIdRegister,
    settlement::{sweep, Sweep, SweepPlan},
    types::{
        Action, Batch, ModuleCall, OperatorPermit, RouterHost, Settlement, Signature,
        SignatureVerifier, Swap, TokenPermit, Transfer, VaultRef,
    },
};

/// What a successful batch did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReceipt {
    /// `(module, vault id)` for every `CreateVault`, in order.
    pub created: Vec<(Address, U256)>,
    pub sweeps: Vec<Sweep>,
}

/// Per-invocation state. Never outlives one batch.
struct BatchContext {
    caller: Address,
    sweep_plan: SweepPlan,
    register: VaultIdRegister,
    created: Vec<(Address, U256)>,
}

impl BatchContext {
    fn new(caller: Address) -> Self {
        Self {
            caller,
            sweep_plan: SweepPlan::new(),
            register: VaultIdRegister::new(),
            created: Vec::new(),
        }
    }
}

pub struct Mixer<'a, H: ?Sized, V: ?Sized> {
    host: &'a mut H,
    verifier: &'a V,
}

impl<'a, H, V> Mixer<'a, H, V>
where
    H: RouterHost + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    pub fn new(host: &'a mut H, verifier: &'a V) -> Self {
        Self { host, verifier }
    }

    /// Standard batch.
    pub fn execute(&mut self, caller: Address, batch: &Batch) -> Result<BatchReceipt, RouterError> {
        self.execute_with_operator_permits(caller, &[], batch)
    }

    /// Batch with operator permits applied ahead of the token permits.
    pub fn execute_with_operator_permits(
        &mut self,
        caller: Address,
        operator_permits: &[OperatorPermit],
        batch: &Batch,
    ) -> Result<BatchReceipt, RouterError> {
        let pending = prepare(batch)?;

        let checkpoint = self.host.checkpoint();
        match self.run(caller, operator_permits, batch, &pending) {
            Ok(receipt) => {
                self.host.commit(checkpoint);
                Ok(receipt)
            }
            Err(err) => {
                self.host.rollback(checkpoint);
                Err(err)
            }
        }
    }

    fn run(
        &mut self,
        caller: Address,
        operator_permits: &[OperatorPermit],
        batch: &Batch,
        pending: &[Vec<Action>],
    ) -> Result<BatchReceipt, RouterError> {
        let mut ctx = BatchContext::new(caller);

        self.permit_stage(operator_permits, &batch.permits)?;
        self.funding_stage(&mut ctx, &batch.transfers, &batch.swaps)?;
        for (call, actions) in batch.module_calls.iter().zip(pending) {
            self.dispatch_module_call(&mut ctx, call, actions)?;
        }

        let router = self.host.router();
        let sweeps = sweep(&mut *self.host, router, &ctx.sweep_plan)?;
        ctx.register.clear();

        Ok(BatchReceipt {
            created: ctx.created,
            sweeps,
        })
    }

    fn permit_stage(
        &mut self,
        operator_permits: &[OperatorPermit],
        permits: &[TokenPermit],
    ) -> Result<(), RouterError> {
        let router = self.host.router();
        let now = self.host.block_timestamp();
        for permit in operator_permits {
            apply_operator_permit(&mut *self.host, self.verifier, router, now, permit)?;
        }
        for permit in permits {
            apply_token_permit(&mut *self.host, self.verifier, now, permit)?;
        }
        Ok(())
    }

    fn funding_stage(
        &mut self,
        ctx: &mut BatchContext,
        transfers: &[Transfer],
        swaps: &[Swap],
    ) -> Result<(), RouterError> {
        let router = self.host.router();

        for transfer in transfers {
            ctx.sweep_plan.register(transfer.token, ctx.caller);
            self.host
                .transfer_from(transfer.token, ctx.caller, router, transfer.amount)?;
        }

        for swap in swaps {
            ctx.sweep_plan.register(swap.token_in, ctx.caller);
            ctx.sweep_plan.register(swap.token_out, ctx.caller);
            self.host
                .transfer_from(swap.token_in, ctx.caller, router, swap.amount_in)?;

            let amount_out = self.host.swap(swap)?;
            if amount_out < swap.min_amount_out {
                return Err(RouterError::InsufficientOutput {
                    amount_out,
                    min_amount_out: swap.min_amount_out,
                });
            }
        }
        Ok(())
    }

    fn dispatch_module_call(
        &mut self,
        ctx: &mut BatchContext,
        call: &ModuleCall,
        actions: &[Action],
    ) -> Result<(), RouterError> {
        let router = self.host.router();
        let module = call.module;
        let sweep_to = if call.sweep_recipient == Address::ZERO {
            ctx.caller
        } else {
            call.sweep_recipient
        };
        let recipient = if call.recipient == Address::ZERO {
            router
        } else {
            call.recipient
        };

        let collateral = self.host.collateral(module)?;
        let stablecoin = self.host.stablecoin(module)?;
        ctx.sweep_plan.register(collateral, sweep_to);
        ctx.sweep_plan.register(stablecoin, sweep_to);
        self.ensure_unlimited_allowance(collateral, module)?;
        self.ensure_unlimited_allowance(stablecoin, module)?;

        for action in actions {
            self.dispatch(ctx, module, action)?;
        }

        let settlement = Settlement {
            recipient,
            caller: ctx.caller,
            sweep_recipient: sweep_to,
            repay_data: call.repay_data.clone(),
        };
        self.host.settle(module, &settlement)
    }

    fn dispatch(
        &mut self,
        ctx: &mut BatchContext,
        module: Address,
        action: &Action,
    ) -> Result<(), RouterError> {
        match action {
            Action::CreateVault { recipient } => {
                let vault_id = self.host.create_vault(module, *recipient)?;
                ctx.register.record(module, vault_id);
                ctx.created.push((module, vault_id));
                Ok(())
            }
            Action::CloseVault { vault } => {
                let vault_id = self.authorize(ctx, module, *vault)?;
                self.host.close_vault(module, vault_id)
            }
            Action::AddCollateral { vault, amount } => {
                let vault_id = self.authorize(ctx, module, *vault)?;
                self.host.add_collateral(module, vault_id, *amount)
            }
            Action::RemoveCollateral { vault, amount } => {
                let vault_id = self.authorize(ctx, module, *vault)?;
                self.host.remove_collateral(module, vault_id, *amount)
            }
            Action::RepayDebt { vault, amount } => {
                let vault_id = self.authorize(ctx, module, *vault)?;
                self.host.repay_debt(module, vault_id, *amount)
            }
            Action::Borrow { vault, amount } => {
                let vault_id = self.authorize(ctx, module, *vault)?;
                self.host.borrow(module, vault_id, *amount)
            }
            Action::GetDebtIn {
                vault,
                other_module,
                dst_vault_id,
                amount,
            } => {
                let vault_id = self.authorize(ctx, module, *vault)?;
                self.host
                    .get_debt_in(module, vault_id, *other_module, *dst_vault_id, *amount)
            }
            Action::Permit {
                owner,
                value,
                deadline,
                v,
                r,
                s,
            } => {
                // the module pulls collateral straight from `owner`
                let permit = TokenPermit {
                    token: self.host.collateral(module)?,
                    owner: *owner,
                    spender: module,
                    value: *value,
                    deadline: *deadline,
                    signature: Signature::new(*v, *r, *s),
                };
                let now = self.host.block_timestamp();
                apply_token_permit(&mut *self.host, self.verifier, now, &permit)
            }
        }
    }

    fn authorize(
        &self,
        ctx: &BatchContext,
        module: Address,
        vault: VaultRef,
    ) -> Result<U256, RouterError> {
        let resolved = ctx.register.resolve(module, vault);
        authorize(&*self.host, module, resolved, ctx.caller)
    }

    fn ensure_unlimited_allowance(&mut self, token: Address, spender: Address) -> Result<(), RouterError> {
        let router = self.host.router();
        if self.host.allowance(token, router, spender)? != U256::MAX {
            self.host.approve(token, spender, U256::MAX)?;
        }
        Ok(())
    }
}

/// Decode every envelope up front. Any malformed call fails the batch before side effects.
pub fn prepare(batch: &Batch) -> Result<Vec<Vec<Action>>, RouterError> {
    batch
        .module_calls
        .iter()
        .map(|call| decode_module_call(call).map_err(RouterError::from))
        .collect()
}
