//! `execute` / `executeWithOperatorPermits` calldata.
//!
//! Structs are ABI-equivalent to the tuples the router's `#[public]` surface takes, so the
//! selectors match.

use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};

use vault_router_types::{Batch, ModuleCall, OperatorPermit, Swap, TokenPermit, Transfer};

sol! {
    struct PermitData {
        address token;
        address owner;
        address spender;
        uint256 value;
        uint256 deadline;
        uint8 v;
        bytes32 r;
        bytes32 s;
    }

    struct OperatorPermitData {
        address module;
        address owner;
        bool approved;
        uint256 deadline;
        uint8 v;
        bytes32 r;
        bytes32 s;
    }

    struct TransferData {
        address token;
        uint256 amount;
    }

    struct SwapData {
        address tokenIn;
        address tokenOut;
        uint256 amountIn;
        uint256 minAmountOut;
        bytes data;
    }

    struct ModuleCallData {
        address module;
        address recipient;
        address sweepRecipient;
        bytes repayData;
        uint8[] actionTags;
        bytes[] actionPayloads;
    }

    interface IVaultRouter {
        function initialize(address swapAggregator) external;
        function swapAggregator() external view returns (address);
        function execute(
            PermitData[] permits,
            TransferData[] transfers,
            SwapData[] swaps,
            ModuleCallData[] moduleCalls
        ) external;
        function executeWithOperatorPermits(
            OperatorPermitData[] operatorPermits,
            PermitData[] permits,
            TransferData[] transfers,
            SwapData[] swaps,
            ModuleCallData[] moduleCalls
        ) external;
    }
}

impl From<&TokenPermit> for PermitData {
    fn from(p: &TokenPermit) -> Self {
        Self {
            token: p.token,
            owner: p.owner,
            spender: p.spender,
            value: p.value,
            deadline: p.deadline,
            v: p.signature.v,
            r: p.signature.r,
            s: p.signature.s,
        }
    }
}

impl From<&OperatorPermit> for OperatorPermitData {
    fn from(p: &OperatorPermit) -> Self {
        Self {
            module: p.module,
            owner: p.owner,
            approved: p.approved,
            deadline: p.deadline,
            v: p.signature.v,
            r: p.signature.r,
            s: p.signature.s,
        }
    }
}

impl From<&Transfer> for TransferData {
    fn from(t: &Transfer) -> Self {
        Self {
            token: t.token,
            amount: t.amount,
        }
    }
}

impl From<&Swap> for SwapData {
    fn from(s: &Swap) -> Self {
        Self {
            tokenIn: s.token_in,
            tokenOut: s.token_out,
            amountIn: s.amount_in,
            minAmountOut: s.min_amount_out,
            data: Bytes::from(s.data.clone()),
        }
    }
}

impl From<&ModuleCall> for ModuleCallData {
    fn from(c: &ModuleCall) -> Self {
        Self {
            module: c.module,
            recipient: c.recipient,
            sweepRecipient: c.sweep_recipient,
            repayData: Bytes::from(c.repay_data.clone()),
            actionTags: c.tags.clone(),
            actionPayloads: c.payloads.iter().cloned().map(Bytes::from).collect(),
        }
    }
}

fn execute_call(batch: &Batch) -> IVaultRouter::executeCall {
    IVaultRouter::executeCall {
        permits: batch.permits.iter().map(Into::into).collect(),
        transfers: batch.transfers.iter().map(Into::into).collect(),
        swaps: batch.swaps.iter().map(Into::into).collect(),
        moduleCalls: batch.module_calls.iter().map(Into::into).collect(),
    }
}

/// ABI-encoded `execute(...)` calldata, selector included.
pub fn execute_calldata(batch: &Batch) -> Vec<u8> {
    execute_call(batch).abi_encode()
}

/// ABI-encoded `executeWithOperatorPermits(...)` calldata, selector included.
pub fn execute_with_operator_permits_calldata(
    operator_permits: &[OperatorPermit],
    batch: &Batch,
) -> Vec<u8> {
    let call = execute_call(batch);
    IVaultRouter::executeWithOperatorPermitsCall {
        operatorPermits: operator_permits.iter().map(Into::into).collect(),
        permits: call.permits,
        transfers: call.transfers,
        swaps: call.swaps,
        moduleCalls: call.moduleCalls,
    }
    .abi_encode()
}

pub fn initialize_calldata(swap_aggregator: alloy_primitives::Address) -> Vec<u8> {
    IVaultRouter::initializeCall {
        swapAggregator: swap_aggregator,
    }
    .abi_encode()
}
