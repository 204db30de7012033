//! ABI tuples of the `#[public]` surface and their conversion into batch types.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
};

use crate::types::{Batch, ModuleCall, OperatorPermit, Signature, Swap, TokenPermit, Transfer};

/// `(token, owner, spender, value, deadline, v, r, s)`
pub type PermitTuple = (Address, Address, Address, U256, U256, u8, FixedBytes<32>, FixedBytes<32>);

/// `(module, owner, approved, deadline, v, r, s)`
pub type OperatorPermitTuple = (Address, Address, bool, U256, u8, FixedBytes<32>, FixedBytes<32>);

/// `(token, amount)`
pub type TransferTuple = (Address, U256);

/// `(tokenIn, tokenOut, amountIn, minAmountOut, data)`
pub type SwapTuple = (Address, Address, U256, U256, Bytes);

/// `(module, recipient, sweepRecipient, repayData, actionTags, actionPayloads)`
pub type ModuleCallTuple = (Address, Address, Address, Bytes, Vec<u8>, Vec<Bytes>);

pub fn token_permit((token, owner, spender, value, deadline, v, r, s): PermitTuple) -> TokenPermit {
    TokenPermit {
        token,
        owner,
        spender,
        value,
        deadline,
        signature: Signature::new(v, r, s),
    }
}

pub fn operator_permit(
    (module, owner, approved, deadline, v, r, s): OperatorPermitTuple,
) -> OperatorPermit {
    OperatorPermit {
        module,
        owner,
        approved,
        deadline,
        signature: Signature::new(v, r, s),
    }
}

pub fn transfer((token, amount): TransferTuple) -> Transfer {
    Transfer { token, amount }
}

pub fn swap((token_in, token_out, amount_in, min_amount_out, data): SwapTuple) -> Swap {
    Swap {
        token_in,
        token_out,
        amount_in,
        min_amount_out,
        data: data.to_vec(),
    }
}

/// Tags and payloads are kept as sent; their lengths are checked when the batch is decoded.
pub fn module_call(
    (module, recipient, sweep_recipient, repay_data, tags, payloads): ModuleCallTuple,
) -> ModuleCall {
    ModuleCall {
        module,
        recipient,
        sweep_recipient,
        repay_data: repay_data.to_vec(),
        tags,
        payloads: payloads.into_iter().map(|p| p.to_vec()).collect(),
    }
}

pub fn batch(
    permits: Vec<PermitTuple>,
    transfers: Vec<TransferTuple>,
    swaps: Vec<SwapTuple>,
    module_calls: Vec<ModuleCallTuple>,
) -> Batch {
    Batch {
        permits: permits.into_iter().map(token_permit).collect(),
        transfers: transfers.into_iter().map(transfer).collect(),
        swaps: swaps.into_iter().map(swap).collect(),
        module_calls: module_calls.into_iter().map(module_call).collect(),
    }
}
